//! Bitmap font metrics.
//!
//! A [`Font`] maps characters to [`Glyph`]s and icon ids to images. Text is
//! measured token by token (see [`shape`]) and the result is memoized per
//! `(text, scale)` in a bounded LRU cache.

mod glyph;
pub mod shape;

pub use self::{
    glyph::{measure_glyph_width, Glyph},
    shape::{tokenize, Token},
};

use {
    crate::{
        config::TextConfig,
        display::{Image, Size},
        error::FontError,
    },
    lru::LruCache,
    std::{cell::RefCell, collections::HashMap, num::NonZeroUsize},
};

type WidthKey = (String, u32);

/// Immutable glyph and icon set with a text width cache.
#[derive(Debug)]
pub struct Font {
    glyphs: HashMap<char, Glyph>,
    icons: HashMap<String, Image>,
    size: u32,
    text: TextConfig,
    widths: RefCell<LruCache<WidthKey, f32>>,
}

impl Font {
    /// Nominal atlas cell edge; the fallback glyph width and the line height.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn text_config(&self) -> &TextConfig {
        &self.text
    }

    #[inline]
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    #[inline]
    pub fn icon(&self, id: &str) -> Option<&Image> {
        self.icons.get(id)
    }

    /// Horizontal advance of a single token, without inter-token spacing.
    pub fn advance(&self, token: Token<'_>, scale: f32) -> f32 {
        match token {
            Token::Space => self.text.space_advance * scale,
            Token::Icon(_) => self.size as f32 * scale,
            Token::Char(c) => match self.glyphs.get(&c) {
                Some(glyph) => glyph.width() as f32 * scale,
                None => self.size as f32 * scale,
            },
        }
    }

    /// Gap inserted between two consecutive tokens.
    #[inline]
    pub fn spacing(&self, scale: f32) -> f32 {
        self.text.char_spacing * scale
    }

    /// Width of `text` rendered at `scale`, memoized per exact `(text, scale)`.
    pub fn measure_text(&self, text: &str, scale: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let key = (text.to_owned(), scale.to_bits());
        if let Some(width) = self.widths.borrow_mut().get(&key) {
            return *width;
        }

        let width = self.measure_uncached(text, scale);
        self.widths.borrow_mut().put(key, width);
        width
    }

    /// Same as [`measure_text`](Font::measure_text), bypassing the cache.
    pub fn measure_uncached(&self, text: &str, scale: f32) -> f32 {
        let spacing = self.spacing(scale);
        let mut width = 0.0;
        for (i, token) in tokenize(text).enumerate() {
            if i > 0 {
                width += spacing;
            }
            width += self.advance(token, scale);
        }
        width
    }

    /// Width and line height of `text`.
    pub fn text_size(&self, text: &str, scale: f32) -> Size {
        Size::new(self.measure_text(text, scale), self.line_height(scale))
    }

    #[inline]
    pub fn line_height(&self, scale: f32) -> f32 {
        self.size as f32 * scale
    }

    /// Drops every memoized width.
    pub fn invalidate_text_cache(&self) {
        let mut widths = self.widths.borrow_mut();
        tracing::trace!(entries = widths.len(), "invalidating text width cache");
        widths.clear();
    }

    /// Number of memoized widths.
    pub fn cached_widths(&self) -> usize {
        self.widths.borrow().len()
    }
}

/// Validating constructor for [`Font`].
///
/// ```ignore
/// let font = FontBuilder::new(16)
///     .glyph('a', a_image)?
///     .icon("heart", heart_image)?
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct FontBuilder {
    size: u32,
    glyphs: HashMap<char, Glyph>,
    icons: HashMap<String, Image>,
    text: TextConfig,
}

impl FontBuilder {
    pub fn new(size: u32) -> Self {
        FontBuilder { size, ..Default::default() }
    }

    /// Spacing constants and cache capacity.
    pub fn text_config(mut self, text: TextConfig) -> Self {
        self.text = text;
        self
    }

    pub fn glyph(mut self, c: char, image: Image) -> Result<Self, FontError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(FontError::EmptyGlyph(c));
        }
        if self.glyphs.contains_key(&c) {
            return Err(FontError::DuplicateGlyph(c));
        }
        self.glyphs.insert(c, Glyph::new(image));
        Ok(self)
    }

    pub fn icon(mut self, id: impl Into<String>, image: Image) -> Result<Self, FontError> {
        let id = id.into();
        if image.width() == 0 || image.height() == 0 {
            return Err(FontError::EmptyIcon(id));
        }
        if self.icons.contains_key(&id) {
            return Err(FontError::DuplicateIcon(id));
        }
        self.icons.insert(id, image);
        Ok(self)
    }

    pub fn build(self) -> Result<Font, FontError> {
        if self.size == 0 {
            return Err(FontError::ZeroSize);
        }
        let capacity = NonZeroUsize::new(self.text.cache_capacity).ok_or(FontError::ZeroCacheCapacity)?;

        tracing::debug!(
            size = self.size,
            glyphs = self.glyphs.len(),
            icons = self.icons.len(),
            "built bitmap font"
        );

        Ok(Font {
            glyphs: self.glyphs,
            icons: self.icons,
            size: self.size,
            text: self.text,
            widths: RefCell::new(LruCache::new(capacity)),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use {super::*, crate::font::glyph::tests::inked_cell, float_cmp::approx_eq};

    /// 8px font: 'a' is 4 wide, 'b' is 2 wide, 'i' is 1 wide; one "heart" icon.
    pub(crate) fn test_font() -> Font {
        FontBuilder::new(8)
            .glyph('a', inked_cell(8, 8, &[1, 4]))
            .and_then(|b| b.glyph('b', inked_cell(8, 8, &[3, 4])))
            .and_then(|b| b.glyph('i', inked_cell(8, 8, &[0])))
            .and_then(|b| b.icon("heart", inked_cell(8, 8, &[0, 7])))
            .and_then(FontBuilder::build)
            .unwrap()
    }

    #[test]
    fn test_empty_text() {
        let font = test_font();
        assert_eq!(font.measure_text("", 1.0), 0.0);
        assert_eq!(font.measure_text("", 3.5), 0.0);
    }

    #[test]
    fn test_token_advances() {
        let font = test_font();
        // 4 + 1 + 2
        assert!(approx_eq!(f32, font.measure_text("ab", 1.0), 7.0));
        // 4 + 1 + 3 + 1 + 2
        assert!(approx_eq!(f32, font.measure_text("a b", 1.0), 11.0));
        // missing glyph falls back to the nominal size
        assert!(approx_eq!(f32, font.measure_text("?", 1.0), 8.0));
        // icons advance by size, resolved or not
        assert!(approx_eq!(f32, font.measure_text("<icon:heart>", 2.0), 16.0));
        assert!(approx_eq!(f32, font.measure_text("i<icon:nope>i", 1.0), 1.0 + 1.0 + 8.0 + 1.0 + 1.0));
    }

    #[test]
    fn test_unterminated_icon_tag_measures_as_text() {
        let font = test_font();
        let literal = font.measure_text("<icon:", 1.0);
        // five missing glyphs, one `i` and five gaps
        assert!(approx_eq!(f32, literal, 5.0 * 8.0 + 1.0 + 5.0));
    }

    #[test]
    fn test_monotonic_in_scale() {
        let font = test_font();
        for text in &["a", "ab i", "<icon:heart> b", "zz<icon:"] {
            let mut last = 0.0;
            for k in &[0.5f32, 1.0, 1.5, 2.0, 4.0] {
                let width = font.measure_text(text, *k);
                assert!(width >= last);
                last = width;
            }
        }
    }

    #[test]
    fn test_cache_is_consistent() {
        let font = test_font();
        let first = font.measure_text("ab ab", 1.25);
        assert_eq!(font.cached_widths(), 1);
        assert_eq!(first.to_bits(), font.measure_text("ab ab", 1.25).to_bits());
        assert_eq!(first.to_bits(), font.measure_uncached("ab ab", 1.25).to_bits());

        font.measure_text("ab ab", 2.0);
        assert_eq!(font.cached_widths(), 2);

        font.invalidate_text_cache();
        assert_eq!(font.cached_widths(), 0);
        assert_eq!(first.to_bits(), font.measure_text("ab ab", 1.25).to_bits());
    }

    #[test]
    fn test_cache_is_bounded() {
        let font = FontBuilder::new(4)
            .text_config(TextConfig { cache_capacity: 2, ..Default::default() })
            .build()
            .unwrap();
        font.measure_text("a", 1.0);
        font.measure_text("b", 1.0);
        font.measure_text("c", 1.0);
        assert_eq!(font.cached_widths(), 2);
    }

    #[test]
    fn test_builder_validation() {
        assert_eq!(FontBuilder::new(0).build().unwrap_err(), FontError::ZeroSize);
        assert_eq!(
            FontBuilder::new(8)
                .text_config(TextConfig { cache_capacity: 0, ..Default::default() })
                .build()
                .unwrap_err(),
            FontError::ZeroCacheCapacity
        );
        assert_eq!(
            FontBuilder::new(8).glyph('a', inked_cell(0, 8, &[])).unwrap_err(),
            FontError::EmptyGlyph('a')
        );
        assert_eq!(
            FontBuilder::new(8)
                .glyph('a', inked_cell(8, 8, &[1]))
                .and_then(|b| b.glyph('a', inked_cell(8, 8, &[2])))
                .unwrap_err(),
            FontError::DuplicateGlyph('a')
        );
        assert_eq!(
            FontBuilder::new(8)
                .icon("x", inked_cell(8, 8, &[1]))
                .and_then(|b| b.icon("x", inked_cell(8, 8, &[1])))
                .unwrap_err(),
            FontError::DuplicateIcon("x".into())
        );
    }

    #[test]
    fn test_custom_spacing() {
        let font = FontBuilder::new(8)
            .text_config(TextConfig { char_spacing: 2.0, space_advance: 5.0, cache_capacity: 8 })
            .build()
            .unwrap();
        // 8 + 2 + 5 + 2 + 8
        assert!(approx_eq!(f32, font.measure_text("x y", 1.0), 25.0));
    }
}
