//! Drawing laid-out text.

use crate::{
    display::{center, rgb, Color, GraphicsDisplay, Point, Rect, Size},
    font::{tokenize, Font, Token},
};

/// Color of the box drawn for an icon id the font does not know.
pub const MISSING_ICON_COLOR: (u8, u8, u8) = (255, 0, 255);

/// Draws `text` with its top-left corner at `origin`.
///
/// Advances exactly like [`Font::measure_text`] and returns the drawn width.
pub fn draw_text(
    display: &mut dyn GraphicsDisplay,
    font: &Font,
    text: &str,
    origin: Point,
    scale: f32,
    color: Color,
) -> f32 {
    let spacing = font.spacing(scale);
    let cell = font.size() as f32 * scale;
    let mut x = origin.x;

    for (i, token) in tokenize(text).enumerate() {
        if i > 0 {
            x += spacing;
        }

        let at = Point::new(x.round(), origin.y.round());
        match token {
            Token::Space => {}
            Token::Char(c) => match font.glyph(c) {
                Some(glyph) => {
                    let size = Size::new(
                        (glyph.raw_width() as f32 * scale).round().max(1.0),
                        (glyph.height() as f32 * scale).round().max(1.0),
                    );
                    display.blit_glyph(glyph.image(), Rect::new(at, size), color);
                }
                None => {
                    display.stroke_rect(Rect::new(at, Size::new(cell, cell)), color, scale.round().max(1.0));
                }
            },
            Token::Icon(id) => match font.icon(id) {
                Some(icon) => display.blit_image(icon, Rect::new(at, Size::new(cell, cell))),
                None => {
                    let (r, g, b) = MISSING_ICON_COLOR;
                    display.fill_rect(Rect::new(at, Size::new(cell, cell)), rgb(r, g, b));
                }
            },
        }

        x += font.advance(token, scale);
    }

    x - origin.x
}

/// Draws `text` centered within `bounds`.
pub fn draw_text_centered(
    display: &mut dyn GraphicsDisplay,
    font: &Font,
    text: &str,
    bounds: Rect,
    scale: f32,
    color: Color,
) -> f32 {
    let origin = center(font.text_size(text, scale), bounds);
    draw_text(display, font, text, origin, scale, color)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            display::{DisplayCommand, DisplayListBuilder},
            font::tests::test_font,
        },
        float_cmp::approx_eq,
    };

    #[test]
    fn test_draw_advances_like_measure() {
        let font = test_font();
        let mut display = DisplayListBuilder::new();
        for text in &["ab", "a b<icon:heart>?", "<icon:", ""] {
            let drawn = draw_text(&mut display, &font, text, Point::new(3.0, 4.0), 1.5, rgb(255, 255, 255));
            assert!(approx_eq!(f32, drawn, font.measure_text(text, 1.5)));
        }
    }

    #[test]
    fn test_draw_commands() {
        let font = test_font();
        let mut display = DisplayListBuilder::new();
        draw_text(&mut display, &font, "a?<icon:heart><icon:gone>", Point::new(0.4, 10.0), 1.0, rgb(1, 2, 3));

        let commands = display.build();
        assert_eq!(commands.len(), 4);
        match &commands[0] {
            DisplayCommand::Glyph { dst, tint, .. } => {
                assert_eq!(*dst, Rect::new(Point::new(0.0, 10.0), Size::new(8.0, 8.0)));
                assert_eq!(*tint, rgb(1, 2, 3));
            }
            other => panic!("expected glyph, got {:?}", other),
        }
        // 'a' advances 4, then 1 spacing
        match &commands[1] {
            DisplayCommand::StrokeRect { rect, thickness, .. } => {
                assert_eq!(rect.origin, Point::new(5.0, 10.0));
                assert_eq!(rect.size, Size::new(8.0, 8.0));
                assert_eq!(*thickness, 1.0);
            }
            other => panic!("expected tofu, got {:?}", other),
        }
        assert!(matches!(commands[2], DisplayCommand::Image { .. }));
        match &commands[3] {
            DisplayCommand::FillRect { color, .. } => assert_eq!(*color, rgb(255, 0, 255)),
            other => panic!("expected placeholder, got {:?}", other),
        }
    }

    #[test]
    fn test_spaces_draw_nothing() {
        let font = test_font();
        let mut display = DisplayListBuilder::new();
        draw_text(&mut display, &font, "   ", Point::new(0.0, 0.0), 1.0, rgb(0, 0, 0));
        assert!(display.commands().is_empty());
    }

    #[test]
    fn test_centered() {
        let font = test_font();
        let mut display = DisplayListBuilder::new();
        // "i" is 1 wide and 8 tall
        draw_text_centered(
            &mut display,
            &font,
            "i",
            Rect::new(Point::new(0.0, 0.0), Size::new(11.0, 20.0)),
            1.0,
            rgb(0, 0, 0),
        );
        match &display.commands()[0] {
            DisplayCommand::Glyph { dst, .. } => assert_eq!(dst.origin, Point::new(5.0, 6.0)),
            other => panic!("expected glyph, got {:?}", other),
        }
    }
}
