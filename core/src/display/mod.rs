//! Backend-agnostic 2D drawing interface.

use {crate::error, image::DynamicImage, palette::Srgba, std::sync::Arc};

/// Two-dimensional floating-point absolute point.
pub type Point = euclid::Point2D<f32, euclid::UnknownUnit>;
/// Two-dimensional floating-point relative vector.
pub type Vector = euclid::Vector2D<f32, euclid::UnknownUnit>;
/// Two-dimensional floating-point size.
pub type Size = euclid::Size2D<f32, euclid::UnknownUnit>;
/// Two-dimensional floating-point rectangle.
pub type Rect = euclid::Rect<f32, euclid::UnknownUnit>;

/// RGBA color with floating-point components in `0.0..=1.0`.
pub type Color = Srgba;

/// Shared, immutable bitmap (glyphs, icons, tiles).
pub type Image = Arc<DynamicImage>;

/// Opaque color from 8-bit components.
pub fn rgb(r: u8, g: u8, b: u8) -> Color {
    rgba(r, g, b, 255)
}

/// Color from 8-bit components.
pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
    Srgba::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
}

/// Returns `color` with its alpha replaced.
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    Srgba::new(color.color.red, color.color.green, color.color.blue, alpha.max(0.0).min(1.0))
}

/// A render target the widget tree draws into.
///
/// Everything is immediate: commands are issued in paint order every frame and
/// the implementation decides how to present them.
pub trait GraphicsDisplay {
    /// Size of the underlying surface in pixels.
    fn surface_size(&self) -> Size;

    /// Fills `rect` with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draws the outline of `rect`, `thickness` pixels wide, inset into the rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: f32);

    /// Draws a glyph stretched into `dst`; `tint` replaces RGB and keeps the glyph's alpha.
    fn blit_glyph(&mut self, image: &Image, dst: Rect, tint: Color);

    /// Draws an image stretched into `dst`, untinted.
    fn blit_image(&mut self, image: &Image, dst: Rect);

    /// Saves the draw state (clip).
    fn save(&mut self);

    /// Saves the draw state and begins drawing into a layer composited with `opacity`.
    fn save_layer(&mut self, opacity: f32);

    /// Intersects the clip with `rect` until the next `restore`.
    fn clip(&mut self, rect: Rect);

    /// Restores the last saved state, compositing a layer if one was begun.
    fn restore(&mut self);

    /// Displays the frame.
    fn present(&mut self) -> Result<(), error::DisplayError>;
}

/// Describes all possible display commands.
#[derive(Debug, Clone)]
pub enum DisplayCommand {
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, thickness: f32 },
    Glyph { image: Image, dst: Rect, tint: Color },
    Image { image: Image, dst: Rect },
    Save,
    /// The float value is the layer opacity.
    SaveLayer(f32),
    Clip(Rect),
    Restore,
}

impl DisplayCommand {
    /// Returns the area touched by the command, if it draws anything.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            DisplayCommand::FillRect { rect, .. } | DisplayCommand::StrokeRect { rect, .. } => {
                Some(*rect)
            }
            DisplayCommand::Glyph { dst, .. } | DisplayCommand::Image { dst, .. } => Some(*dst),
            _ => None,
        }
    }
}

/// Returns the union of the bounds of every drawing command in `display_list`.
pub fn display_list_bounds(display_list: &[DisplayCommand]) -> Rect {
    display_list
        .iter()
        .filter_map(DisplayCommand::bounds)
        .fold(None, |acc: Option<Rect>, rect| Some(acc.map_or(rect, |acc| acc.union(&rect))))
        .unwrap_or_default()
}

/// Recording display: every call becomes a [`DisplayCommand`].
///
/// Useful for retaining a frame and for asserting on what a widget draws.
#[derive(Debug, Clone, Default)]
pub struct DisplayListBuilder {
    display_list: Vec<DisplayCommand>,
    size: Size,
    presented: usize,
}

impl DisplayListBuilder {
    /// Creates a new, empty display list builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a builder reporting `size` as its surface size.
    pub fn with_size(size: Size) -> Self {
        DisplayListBuilder { size, ..Default::default() }
    }

    /// Creates a new display list builder, initialized with an existing list of display commands.
    pub fn from_commands(commands: &[DisplayCommand]) -> Self {
        DisplayListBuilder { display_list: commands.to_vec(), ..Default::default() }
    }

    /// Commands recorded so far.
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.display_list
    }

    /// How many times `present` was called.
    pub fn frames_presented(&self) -> usize {
        self.presented
    }

    /// Forgets recorded commands, keeping the surface size.
    pub fn clear(&mut self) {
        self.display_list.clear();
    }

    /// Returns the final list of display commands.
    pub fn build(self) -> Vec<DisplayCommand> {
        self.display_list
    }
}

impl GraphicsDisplay for DisplayListBuilder {
    fn surface_size(&self) -> Size {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.display_list.push(DisplayCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: f32) {
        self.display_list.push(DisplayCommand::StrokeRect { rect, color, thickness });
    }

    fn blit_glyph(&mut self, image: &Image, dst: Rect, tint: Color) {
        self.display_list.push(DisplayCommand::Glyph { image: image.clone(), dst, tint });
    }

    fn blit_image(&mut self, image: &Image, dst: Rect) {
        self.display_list.push(DisplayCommand::Image { image: image.clone(), dst });
    }

    fn save(&mut self) {
        self.display_list.push(DisplayCommand::Save);
    }

    fn save_layer(&mut self, opacity: f32) {
        self.display_list.push(DisplayCommand::SaveLayer(opacity));
    }

    fn clip(&mut self, rect: Rect) {
        self.display_list.push(DisplayCommand::Clip(rect));
    }

    fn restore(&mut self) {
        self.display_list.push(DisplayCommand::Restore);
    }

    fn present(&mut self) -> Result<(), error::DisplayError> {
        self.presented += 1;
        Ok(())
    }
}

/// Centers an un-positioned rectangle (`Size`) within a rectangle.
pub fn center(inner: Size, outer: Rect) -> Point {
    Point::new(
        outer.origin.x + ((outer.size.width - inner.width) / 2.0),
        outer.origin.y + ((outer.size.height - inner.height) / 2.0),
    )
}

/// Vertically centers a rectangle within another rectangle.
pub fn center_vertically(inner: Rect, outer: Rect) -> Point {
    Point::new(inner.origin.x, outer.origin.y + ((outer.size.height - inner.size.height) / 2.0))
}

/// Horizontally centers a rectangle within another rectangle.
pub fn center_horizontally(inner: Rect, outer: Rect) -> Point {
    Point::new(outer.origin.x + ((outer.size.width - inner.size.width) / 2.0), inner.origin.y)
}

/// Shrinks `rect` by `amount` on every side, never below zero size.
pub fn inset(rect: Rect, amount: f32) -> Rect {
    Rect::new(
        Point::new(rect.origin.x + amount, rect.origin.y + amount),
        Size::new((rect.size.width - amount * 2.0).max(0.0), (rect.size.height - amount * 2.0).max(0.0)),
    )
}
