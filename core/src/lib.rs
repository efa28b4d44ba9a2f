//! Core components of dashr_ui: the display interface, bitmap fonts,
//! configuration, input and UI events, and the component tree.

pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod font;
pub mod input;
pub mod text;
pub mod tree;

pub use euclid;
pub use image;
pub use palette;

/// Broadcast queues.
pub use dashr_ui_event as queue;

pub mod prelude {
    pub use crate::{
        display::GraphicsDisplay,
        tree::{DrawCx, FrameCx, NodeCx, Widget},
    };
    pub use dashr_ui_event::prelude::*;
}
