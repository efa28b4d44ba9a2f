//! Full-screen pages, navigation between them, and tabbed containers.

mod manager;
mod navigation;
mod tabs;

pub use self::{
    manager::PageManager,
    navigation::NavigationStack,
    tabs::{TabButton, TabContainer},
};

use dashr_ui_core::{
    display::{Color, Point, Rect, Size},
    event::{PAGE_ENTER, PAGE_EXIT},
    tree::{DrawCx, FrameCx, NodeCx, Widget},
};

/// Broadcast by [`PageManager`] whenever the current page changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageChange {
    pub from: Option<String>,
    pub to: String,
}

/// Root widget of a page. Fades in while active and out while inactive,
/// hiding itself once fully faded out.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    id: String,
    active: bool,
    /// `0.0` is hidden, `1.0` fully shown.
    progress: f32,
    /// Name of a host tile repeated over the page.
    pub backdrop: Option<String>,
    pub background: Option<Color>,
}

impl Page {
    pub fn new(id: impl Into<String>) -> Self {
        Page { id: id.into(), active: false, progress: 0.0, backdrop: None, background: None }
    }

    pub fn with_backdrop(mut self, tile: impl Into<String>) -> Self {
        self.backdrop = Some(tile.into());
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Makes the page current and visible, firing `page_enter`.
    pub fn activate(&mut self, cx: &mut NodeCx<'_>, immediate: bool) {
        self.active = true;
        if immediate {
            self.progress = 1.0;
        }
        cx.set_visible(true);
        let event = cx.event(PAGE_ENTER).with("page", self.id.as_str());
        cx.trigger(event);
    }

    /// Starts fading out, firing `page_exit`. `immediate` hides the page at once.
    pub fn deactivate(&mut self, cx: &mut NodeCx<'_>, immediate: bool) {
        self.active = false;
        if immediate {
            self.progress = 0.0;
            cx.set_visible(false);
        }
        let event = cx.event(PAGE_EXIT).with("page", self.id.as_str());
        cx.trigger(event);
    }

    pub(crate) fn reset(&mut self) {
        self.active = false;
    }
}

impl Widget for Page {
    fn update(&mut self, cx: &mut FrameCx<'_>, dt: f32) {
        let step = cx.env.config.animation.page_transition_speed * dt;
        if self.active && self.progress < 1.0 {
            self.progress = (self.progress + step).min(1.0);
        } else if !self.active && self.progress > 0.0 {
            self.progress = (self.progress - step).max(0.0);
            if self.progress <= 0.0 {
                cx.set_visible(false);
            }
        }
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        let bounds = cx.absolute_rect();
        if self.progress < 1.0 {
            cx.display.save_layer(self.progress);
        } else {
            cx.display.save();
        }
        cx.display.clip(bounds);

        if let Some(background) = self.background {
            cx.display.fill_rect(bounds, background);
        }

        let tile = self.backdrop.as_ref().and_then(|name| cx.env.tiles.get(name));
        if let Some(tile) = tile {
            let size = Size::new(tile.width() as f32 * cx.env.ui_scale, tile.height() as f32 * cx.env.ui_scale);
            if size.width >= 1.0 && size.height >= 1.0 {
                let mut y = bounds.origin.y;
                while y < bounds.max_y() {
                    let mut x = bounds.origin.x;
                    while x < bounds.max_x() {
                        cx.display.blit_image(tile, Rect::new(Point::new(x, y), size));
                        x += size.width;
                    }
                    y += size.height;
                }
            }
        }
    }

    fn draw_over(&self, cx: &mut DrawCx<'_>) {
        cx.display.restore();
    }
}
