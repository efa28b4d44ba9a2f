use dashr_ui_core::{
    display::Color,
    tree::{DrawCx, Widget},
};

/// A filled rectangle with an optional border; the usual backdrop for groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub background: Option<Color>,
    pub border: Option<Color>,
    pub border_width: f32,
}

impl Panel {
    pub fn new(background: Color) -> Self {
        Panel { background: Some(background), border: None, border_width: 1.0 }
    }

    pub fn transparent() -> Self {
        Panel { background: None, border: None, border_width: 1.0 }
    }

    pub fn with_border(mut self, color: Color, width: f32) -> Self {
        self.border = Some(color);
        self.border_width = width;
        self
    }
}

impl Widget for Panel {
    fn draw(&self, cx: &mut DrawCx<'_>) {
        let bounds = cx.absolute_rect();
        if let Some(background) = self.background {
            cx.display.fill_rect(bounds, background);
        }
        if let Some(border) = self.border {
            cx.display.stroke_rect(bounds, border, self.border_width);
        }
    }
}
