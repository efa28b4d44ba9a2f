use {
    crate::display::Image,
    image::{DynamicImage, GenericImageView},
    std::cell::OnceCell,
};

/// One character's bitmap plus its lazily measured ink width.
#[derive(Debug, Clone)]
pub struct Glyph {
    image: Image,
    trimmed_width: OnceCell<u32>,
}

impl Glyph {
    pub fn new(image: Image) -> Self {
        Glyph { image, trimmed_width: OnceCell::new() }
    }

    #[inline]
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Width of the bitmap, including transparent padding.
    #[inline]
    pub fn raw_width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Distance from the leftmost to the rightmost inked column, inclusive.
    ///
    /// Measured on first use and cached; the bitmap never changes after load.
    pub fn width(&self) -> u32 {
        *self.trimmed_width.get_or_init(|| measure_glyph_width(&self.image))
    }

    #[cfg(test)]
    pub(crate) fn is_measured(&self) -> bool {
        self.trimmed_width.get().is_some()
    }
}

/// Scans the columns of `image` for ink.
///
/// With an alpha channel a column is inked when any pixel has non-zero alpha,
/// otherwise when any pixel is not pure black. A bitmap without ink reports its
/// full width.
pub fn measure_glyph_width(image: &DynamicImage) -> u32 {
    let (width, height) = image.dimensions();
    let has_alpha = image.color().has_alpha();

    let inked = |x: u32| {
        (0..height).any(|y| {
            let pixel = image.get_pixel(x, y).0;
            if has_alpha {
                pixel[3] > 0
            } else {
                pixel[0] != 0 || pixel[1] != 0 || pixel[2] != 0
            }
        })
    };

    let left = (0..width).find(|&x| inked(x));
    let right = (0..width).rev().find(|&x| inked(x));

    match (left, right) {
        (Some(left), Some(right)) => right - left + 1,
        _ => width,
    }
}
