//! Layers drawn above every page, toggled by id or by key.

mod debug;

pub use self::debug::{DebugOverlay, FrameStats};

use {
    dashr_ui_core::{
        display::GraphicsDisplay,
        input::Key,
        tree::{FrameEnv, NodeId, UiTree},
    },
    std::collections::HashMap,
    tracing::debug,
};

/// A subtree of the [`UiTree`] shown independently of the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    id: String,
    root: NodeId,
    enabled: bool,
    toggle_key: Option<Key>,
}

impl Overlay {
    /// A hidden overlay drawing the subtree at `root`.
    pub fn new(id: impl Into<String>, root: NodeId) -> Self {
        Overlay { id: id.into(), root, enabled: false, toggle_key: None }
    }

    pub fn with_toggle_key(mut self, key: Key) -> Self {
        self.toggle_key = Some(key);
        self
    }

    pub fn shown(mut self) -> Self {
        self.enabled = true;
        self
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn toggle_key(&self) -> Option<Key> {
        self.toggle_key
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn show(&mut self) {
        self.enabled = true;
    }

    pub fn hide(&mut self) {
        self.enabled = false;
    }
}

/// Overlays by id plus the order they are drawn in.
#[derive(Debug, Clone, Default)]
pub struct OverlayManager {
    overlays: HashMap<String, Overlay>,
    order: Vec<String>,
}

impl OverlayManager {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds `overlay` at `position` in the draw order (appending when `None`
    /// or past the end). An overlay with the same id is replaced.
    pub fn add(&mut self, overlay: Overlay, position: Option<usize>) {
        let id = overlay.id.clone();
        if self.overlays.insert(id.clone(), overlay).is_some() {
            self.order.retain(|existing| *existing != id);
        }
        match position {
            Some(position) if position < self.order.len() => self.order.insert(position, id),
            _ => self.order.push(id),
        }
    }

    /// Unregisters `id`; the caller owns the returned overlay's subtree.
    pub fn remove(&mut self, id: &str) -> Option<Overlay> {
        let overlay = self.overlays.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(overlay)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&Overlay> {
        self.overlays.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Overlay> {
        self.overlays.get_mut(id)
    }

    /// Ids in draw order, bottom first.
    #[inline]
    pub fn render_order(&self) -> &[String] {
        &self.order
    }

    fn apply(&mut self, id: &str, f: impl FnOnce(&mut Overlay)) -> bool {
        match self.overlays.get_mut(id) {
            Some(overlay) => {
                f(&mut *overlay);
                debug!(overlay = %id, enabled = overlay.enabled, "overlay state");
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        self.apply(id, Overlay::toggle)
    }

    pub fn show(&mut self, id: &str) -> bool {
        self.apply(id, Overlay::show)
    }

    pub fn hide(&mut self, id: &str) -> bool {
        self.apply(id, Overlay::hide)
    }

    /// Toggles every overlay bound to `key`; returns whether any was.
    pub fn handle_key(&mut self, key: Key) -> bool {
        let mut toggled = false;
        for overlay in self.overlays.values_mut().filter(|overlay| overlay.toggle_key == Some(key)) {
            overlay.toggle();
            debug!(overlay = %overlay.id, enabled = overlay.enabled, "overlay toggled by key");
            toggled = true;
        }
        toggled
    }

    /// Enabled overlays in draw order.
    pub fn enabled_overlays(&self) -> Vec<&Overlay> {
        self.ordered().filter(|overlay| overlay.enabled).collect()
    }

    pub fn enable_all(&mut self) {
        self.overlays.values_mut().for_each(Overlay::show);
    }

    pub fn disable_all(&mut self) {
        self.overlays.values_mut().for_each(Overlay::hide);
    }

    fn ordered(&self) -> impl Iterator<Item = &Overlay> {
        self.order.iter().filter_map(move |id| self.overlays.get(id))
    }

    /// Updates enabled overlays.
    pub fn update(&self, tree: &mut UiTree, dt: f32, env: &FrameEnv<'_>) {
        for overlay in self.ordered().filter(|overlay| overlay.enabled) {
            tree.update(overlay.root, dt, env);
        }
    }

    /// Draws enabled overlays in order, whatever page is current.
    pub fn render_all(&self, tree: &UiTree, display: &mut dyn GraphicsDisplay, env: &FrameEnv<'_>) {
        for overlay in self.ordered().filter(|overlay| overlay.enabled) {
            tree.draw(overlay.root, display, env);
        }
    }
}
