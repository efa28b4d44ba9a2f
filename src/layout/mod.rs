//! Layout containers.
//!
//! A container recomputes its children's geometry whenever a child is added
//! or removed, when it is resized, and when one of its properties changes
//! through [`UiTree::modify`](dashr_ui_core::tree::UiTree::modify). Per-child
//! metadata (weights, grid cells, flex factors) is kept by the container and
//! dropped when the child leaves it.
//!
//! The sizing math lives in free functions over plain slices so it can be
//! checked without a tree.

mod flex;
mod grid;
mod linear;

pub use self::{
    flex::{flex_sizes, FlexItem, FlexLayout, Justify},
    grid::{GridLayout, GridPlacement},
    linear::{linear_sizes, LinearLayout},
};

use dashr_ui_core::display::{Point, Rect, Size};

/// Main axis of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    #[inline]
    pub fn main(self, size: Size) -> f32 {
        match self {
            Direction::Horizontal => size.width,
            Direction::Vertical => size.height,
        }
    }

    #[inline]
    pub fn cross(self, size: Size) -> f32 {
        match self {
            Direction::Horizontal => size.height,
            Direction::Vertical => size.width,
        }
    }

    /// Builds a rectangle from main/cross axis components.
    #[inline]
    pub fn rect(self, main_pos: f32, cross_pos: f32, main_size: f32, cross_size: f32) -> Rect {
        match self {
            Direction::Horizontal => {
                Rect::new(Point::new(main_pos, cross_pos), Size::new(main_size, cross_size))
            }
            Direction::Vertical => Rect::new(Point::new(cross_pos, main_pos), Size::new(cross_size, main_size)),
        }
    }
}

/// Cross-axis policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    Start,
    Center,
    End,
    Stretch,
}

/// Offset and size of a child on the cross axis, relative to the start of
/// the available span.
pub fn align_cross(align: Align, available: f32, size: f32) -> (f32, f32) {
    match align {
        Align::Start => (0.0, size),
        Align::Center => (((available - size) / 2.0).floor(), size),
        Align::End => (available - size, size),
        Align::Stretch => (0.0, available),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_cross() {
        assert_eq!(align_cross(Align::Start, 50.0, 20.0), (0.0, 20.0));
        assert_eq!(align_cross(Align::Center, 50.0, 21.0), (14.0, 21.0));
        assert_eq!(align_cross(Align::End, 50.0, 20.0), (30.0, 20.0));
        assert_eq!(align_cross(Align::Stretch, 50.0, 20.0), (0.0, 50.0));
    }

    #[test]
    fn test_direction_axes() {
        let size = Size::new(3.0, 4.0);
        assert_eq!(Direction::Horizontal.main(size), 3.0);
        assert_eq!(Direction::Vertical.main(size), 4.0);
        assert_eq!(
            Direction::Vertical.rect(1.0, 2.0, 10.0, 20.0),
            Rect::new(Point::new(2.0, 1.0), Size::new(20.0, 10.0))
        );
    }
}
