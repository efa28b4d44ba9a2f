use dashr_ui_core::{
    display::{center_vertically, Color, Point, Rect, Size},
    font::Font,
    text::draw_text,
    tree::{DrawCx, FrameCx, FrameEnv, Widget},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl Default for TextAlign {
    fn default() -> Self {
        TextAlign::Left
    }
}

/// A single line of text.
///
/// With `auto_size` set (the default) the node is resized to the measured text
/// every frame, so containers can lay it out by its natural size.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Defaults to the theme's primary text color.
    pub color: Option<Color>,
    /// Defaults to the frame's body text scale.
    pub scale: Option<f32>,
    pub align: TextAlign,
    pub auto_size: bool,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Label { text: text.into(), color: None, scale: None, align: TextAlign::Left, auto_size: true }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Keeps the node's size and aligns the text inside it.
    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self.auto_size = false;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn measure(font: &Font, text: &str, scale: f32) -> Size {
        font.text_size(text, scale)
    }

    fn scale(&self, env: &FrameEnv<'_>) -> f32 {
        self.scale.unwrap_or_else(|| env.text_scale())
    }
}

impl Widget for Label {
    fn update(&mut self, cx: &mut FrameCx<'_>, _dt: f32) {
        if !self.auto_size {
            return;
        }
        let size = Label::measure(cx.env.font, &self.text, self.scale(cx.env));
        let rect = cx.rect();
        if rect.size != size {
            cx.set_rect(Rect::new(rect.origin, size));
        }
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        let bounds = cx.absolute_rect();
        let scale = self.scale(cx.env);
        let size = Label::measure(cx.env.font, &self.text, scale);
        let x = match self.align {
            TextAlign::Left => bounds.origin.x,
            TextAlign::Center => bounds.origin.x + (bounds.size.width - size.width) / 2.0,
            TextAlign::Right => bounds.max_x() - size.width,
        };
        let origin = center_vertically(Rect::new(Point::new(x, 0.0), size), bounds);

        let theme = cx.env.theme();
        let color = match self.color {
            _ if !cx.is_enabled() => theme.text_disabled.color(),
            Some(color) => color,
            None => theme.text_primary.color(),
        };
        draw_text(cx.display, cx.env.font, &self.text, origin, scale, color);
    }
}
