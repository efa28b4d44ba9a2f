use {
    dashr_ui_core::{
        display::{Color, GraphicsDisplay, Rect, Size},
        font::{
            shape::{ICON_TAG_CLOSE, ICON_TAG_OPEN},
            Font,
        },
        text::draw_text_centered,
    },
    std::borrow::Cow,
};

/// What a button shows. Icons are rendered through the font's icon table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonContent {
    Text(String),
    Icon(String),
    /// Icon followed by a space and the text.
    IconText { icon: String, text: String },
}

impl ButtonContent {
    /// The content as a single line of text markup.
    pub fn markup(&self) -> Cow<'_, str> {
        match self {
            ButtonContent::Text(text) => Cow::Borrowed(text),
            ButtonContent::Icon(icon) => Cow::Owned(format!("{}{}{}", ICON_TAG_OPEN, icon, ICON_TAG_CLOSE)),
            ButtonContent::IconText { icon, text } => {
                Cow::Owned(format!("{}{}{} {}", ICON_TAG_OPEN, icon, ICON_TAG_CLOSE, text))
            }
        }
    }

    pub fn measure(&self, font: &Font, scale: f32) -> Size {
        font.text_size(&self.markup(), scale)
    }

    /// Draws the content centered in `bounds`.
    pub fn draw(&self, display: &mut dyn GraphicsDisplay, font: &Font, bounds: Rect, scale: f32, color: Color) {
        draw_text_centered(display, font, &self.markup(), bounds, scale, color);
    }
}

impl From<&str> for ButtonContent {
    fn from(text: &str) -> Self {
        ButtonContent::Text(text.to_owned())
    }
}

impl From<String> for ButtonContent {
    fn from(text: String) -> Self {
        ButtonContent::Text(text)
    }
}
