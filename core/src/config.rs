//! UI tuning loaded from TOML.
//!
//! Every field has a default so a partial (or empty) file is valid:
//!
//! ```toml
//! ui_scale = 2.0
//!
//! [text]
//! char_spacing = 1.0
//!
//! [theme]
//! primary = [70, 130, 180]
//! ```

use {
    crate::{
        display::{rgba, Color},
        error::ConfigError,
    },
    serde::Deserialize,
    std::{convert::TryFrom, path::Path},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Uniform multiplier applied to every font scale and spacing constant.
    pub ui_scale: f32,
    pub text: TextConfig,
    pub animation: AnimationConfig,
    pub metrics: MetricsConfig,
    pub theme: Theme,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            ui_scale: 1.0,
            text: Default::default(),
            animation: Default::default(),
            metrics: Default::default(),
            theme: Default::default(),
        }
    }
}

impl UiConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: UiConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.as_ref().display(), ui_scale = config.ui_scale, "loaded ui config");
        Ok(config)
    }

    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue { field, reason: format!("{} is not positive", value) })
            }
        }

        positive("ui_scale", self.ui_scale)?;
        positive("metrics.font_scale", self.metrics.font_scale)?;
        positive("animation.page_transition_speed", self.animation.page_transition_speed)?;
        positive("animation.switch_knob_speed", self.animation.switch_knob_speed)?;
        positive("animation.notification_slide_speed", self.animation.notification_slide_speed)?;
        positive("animation.cursor_blink_interval", self.animation.cursor_blink_interval)?;
        if self.text.cache_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "text.cache_capacity",
                reason: "must be greater than zero".into(),
            });
        }
        if self.text.char_spacing < 0.0 || self.text.space_advance < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "text",
                reason: "spacing constants must not be negative".into(),
            });
        }
        Ok(())
    }
}

/// Constants of the text metrics, in unscaled pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Gap inserted between two consecutive tokens.
    pub char_spacing: f32,
    /// Advance of a space character.
    pub space_advance: f32,
    /// Maximum number of memoized `(text, scale)` widths.
    pub cache_capacity: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        TextConfig { char_spacing: 1.0, space_advance: 3.0, cache_capacity: 1024 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Page fade progress per second.
    pub page_transition_speed: f32,
    /// Switch knob travel in pixels per second.
    pub switch_knob_speed: f32,
    /// Notification slide in widths per second.
    pub notification_slide_speed: f32,
    /// Seconds between text cursor blinks.
    pub cursor_blink_interval: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            page_transition_speed: 4.0,
            switch_knob_speed: 200.0,
            notification_slide_speed: 4.0,
            cursor_blink_interval: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub font_scale: f32,
    pub padding: f32,
    pub margin: f32,
    pub border_width: f32,
    pub button_height: f32,
    pub input_height: f32,
    pub slider_height: f32,
    pub dropdown_height: f32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            font_scale: 1.0,
            padding: 8.0,
            margin: 4.0,
            border_width: 1.0,
            button_height: 32.0,
            input_height: 28.0,
            slider_height: 20.0,
            dropdown_height: 28.0,
        }
    }
}

/// An 8-bit color written as `[r, g, b]` or `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<u8>")]
pub struct ThemeColor(pub [u8; 4]);

impl ThemeColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        ThemeColor([r, g, b, 255])
    }

    pub fn color(self) -> Color {
        let [r, g, b, a] = self.0;
        rgba(r, g, b, a)
    }
}

impl TryFrom<Vec<u8>> for ThemeColor {
    type Error = String;

    fn try_from(components: Vec<u8>) -> Result<Self, Self::Error> {
        match components.as_slice() {
            &[r, g, b] => Ok(ThemeColor([r, g, b, 255])),
            &[r, g, b, a] => Ok(ThemeColor([r, g, b, a])),
            other => Err(format!("expected 3 or 4 color components, found {}", other.len())),
        }
    }
}

impl From<ThemeColor> for Color {
    fn from(color: ThemeColor) -> Self {
        color.color()
    }
}

/// Standard color palette.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub primary: ThemeColor,
    pub secondary: ThemeColor,
    pub success: ThemeColor,
    pub danger: ThemeColor,
    pub warning: ThemeColor,
    pub info: ThemeColor,
    pub background: ThemeColor,
    pub surface: ThemeColor,
    pub border: ThemeColor,
    pub text_primary: ThemeColor,
    pub text_secondary: ThemeColor,
    pub text_disabled: ThemeColor,
    pub button_normal: ThemeColor,
    pub button_hover: ThemeColor,
    pub button_pressed: ThemeColor,
    pub button_disabled: ThemeColor,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            primary: ThemeColor::rgb(70, 130, 180),
            secondary: ThemeColor::rgb(105, 105, 105),
            success: ThemeColor::rgb(34, 139, 34),
            danger: ThemeColor::rgb(220, 20, 60),
            warning: ThemeColor::rgb(255, 165, 0),
            info: ThemeColor::rgb(30, 144, 255),
            background: ThemeColor::rgb(32, 32, 32),
            surface: ThemeColor::rgb(48, 48, 48),
            border: ThemeColor::rgb(80, 80, 80),
            text_primary: ThemeColor::rgb(255, 255, 255),
            text_secondary: ThemeColor::rgb(192, 192, 192),
            text_disabled: ThemeColor::rgb(128, 128, 128),
            button_normal: ThemeColor::rgb(60, 60, 60),
            button_hover: ThemeColor::rgb(80, 80, 80),
            button_pressed: ThemeColor::rgb(40, 40, 40),
            button_disabled: ThemeColor::rgb(30, 30, 30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = UiConfig::from_toml_str("").unwrap();
        assert_eq!(config, UiConfig::default());
        assert_eq!(config.text.cache_capacity, 1024);
        assert_eq!(config.metrics.button_height, 32.0);
    }

    #[test]
    fn test_partial_sections() {
        let config = UiConfig::from_toml_str(
            r#"
            ui_scale = 2.0

            [text]
            space_advance = 4.0

            [theme]
            primary = [1, 2, 3]
            danger = [10, 20, 30, 40]
            "#,
        )
        .unwrap();
        assert_eq!(config.ui_scale, 2.0);
        assert_eq!(config.text.space_advance, 4.0);
        assert_eq!(config.text.char_spacing, 1.0);
        assert_eq!(config.theme.primary, ThemeColor([1, 2, 3, 255]));
        assert_eq!(config.theme.danger, ThemeColor([10, 20, 30, 40]));
        assert_eq!(config.theme.info, Theme::default().info);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            UiConfig::from_toml_str("ui_scale = 0.0"),
            Err(ConfigError::InvalidValue { field: "ui_scale", .. })
        ));
        assert!(matches!(
            UiConfig::from_toml_str("[text]\ncache_capacity = 0"),
            Err(ConfigError::InvalidValue { field: "text.cache_capacity", .. })
        ));
        assert!(matches!(
            UiConfig::from_toml_str("[theme]\nprimary = [1, 2]"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(UiConfig::from_toml_str("ui_scale = \"big\""), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(UiConfig::load("/nonexistent/ui.toml"), Err(ConfigError::IoError(_))));
    }
}
