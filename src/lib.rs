//! Retained-mode widget toolkit for 2D game clients.
//!
//! Widgets live in a [`UiTree`](core::tree::UiTree), are positioned by the
//! containers in [`layout`], measured with the bitmap font engine in
//! [`core::font`], and organized into pages and overlays driven by the
//! [`UiManager`](manager::UiManager).

pub mod layout;
pub mod logging;
pub mod manager;
pub mod overlay;
pub mod page;
pub mod widgets;

pub use dashr_ui_core as core;
pub use dashr_ui_event as queue;

pub use dashr_ui_core::{display, error, euclid, font, image, palette};

pub mod prelude {
    pub use crate::{
        layout::{Align, Direction, FlexItem, FlexLayout, GridLayout, GridPlacement, Justify, LinearLayout},
        manager::UiManager,
        overlay::{DebugOverlay, Overlay, OverlayManager},
        page::{NavigationStack, Page, PageChange, PageManager, TabButton, TabContainer},
    };
    pub use dashr_ui_core::{
        config::UiConfig,
        display::{GraphicsDisplay, Point, Rect, Size},
        event::{Command, EventValue, Severity, UiEvent},
        font::{Font, FontBuilder},
        input::{InputEvent, Key, Modifiers, MouseButton},
        tree::{Container, DrawCx, FrameCx, FrameEnv, NodeCx, NodeId, UiTree, Widget},
    };
    pub use dashr_ui_event::prelude::*;
}
