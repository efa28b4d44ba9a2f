//! The top-level dispatcher tying pages, overlays and notifications together.

use {
    crate::{
        overlay::{Overlay, OverlayManager},
        page::{NavigationStack, Page, PageChange, PageManager, TabContainer},
        widgets::{Notification, RadioGroup},
    },
    dashr_ui_core::{
        config::UiConfig,
        display::{GraphicsDisplay, Image, Point, Rect, Size},
        error::ConfigError,
        event::{Command, Severity, EXPIRED},
        font::Font,
        input::InputEvent,
        tree::{Container, FrameEnv, NodeId, UiTree},
    },
    dashr_ui_event::{prelude::*, RcEventListener, RcEventQueue},
    std::collections::HashMap,
    tracing::{debug, warn},
};

/// Rounds of command application per step; handlers reacting to applied
/// commands can post more.
const MAX_COMMAND_ROUNDS: usize = 8;

fn frame_env<'a>(
    config: &'a UiConfig,
    font: &'a Font,
    tiles: &'a HashMap<String, Image>,
    cursor: Point,
) -> FrameEnv<'a> {
    FrameEnv::new(font, config, tiles).with_cursor(cursor)
}

/// Owns the component tree and everything layered over it.
///
/// The host feeds it input, calls [`update`](UiManager::update) and
/// [`render`](UiManager::render) once per frame, and passes its font and
/// loaded tiles along each time. Commands posted by event handlers are applied
/// after each of those steps; [`Command::Custom`] goes to
/// [`listen_commands`](UiManager::listen_commands) subscribers.
pub struct UiManager {
    tree: UiTree,
    pages: PageManager,
    navigation: NavigationStack,
    overlays: OverlayManager,
    config: UiConfig,
    notification_layer: NodeId,
    notifications: Vec<NodeId>,
    radio_groups: HashMap<String, RadioGroup>,
    app_commands: RcEventQueue<Command>,
    cursor: Point,
    viewport: Size,
    scale_changed: bool,
}

impl UiManager {
    pub const NOTIFICATION_WIDTH: f32 = 200.0;
    pub const NOTIFICATION_HEIGHT: f32 = 40.0;

    pub fn new(config: UiConfig, viewport: Size) -> Self {
        let mut tree = UiTree::new();
        let notification_layer = tree.insert(Container, Rect::new(Point::zero(), viewport));
        UiManager {
            tree,
            pages: PageManager::new(),
            navigation: NavigationStack::new(),
            overlays: OverlayManager::new(),
            config,
            notification_layer,
            notifications: Vec::new(),
            radio_groups: HashMap::new(),
            app_commands: RcEventQueue::new(),
            cursor: Point::zero(),
            viewport,
            scale_changed: false,
        }
    }

    #[inline]
    pub fn tree(&self) -> &UiTree {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut UiTree {
        &mut self.tree
    }

    #[inline]
    pub fn pages(&self) -> &PageManager {
        &self.pages
    }

    #[inline]
    pub fn navigation(&self) -> &NavigationStack {
        &self.navigation
    }

    #[inline]
    pub fn overlays(&self) -> &OverlayManager {
        &self.overlays
    }

    #[inline]
    pub fn overlays_mut(&mut self) -> &mut OverlayManager {
        &mut self.overlays
    }

    #[inline]
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    #[inline]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[inline]
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Live notifications, oldest first.
    #[inline]
    pub fn notifications(&self) -> &[NodeId] {
        &self.notifications
    }

    /// Subscribes to commands the UI does not interpret itself.
    pub fn listen_commands(&self) -> RcEventListener<Command> {
        self.app_commands.listen()
    }

    /// Subscribes to page changes.
    pub fn listen_pages(&self) -> RcEventListener<PageChange> {
        self.pages.listen()
    }

    /// Inserts `page` as a root spanning the viewport and registers it.
    pub fn add_page(&mut self, page: Page) -> NodeId {
        let node = self.tree.insert(page, Rect::new(Point::zero(), self.viewport));
        self.pages.add_page(&mut self.tree, node);
        node
    }

    /// Registers an already inserted page node. Returns its id, or `None` if
    /// `node` is not a page.
    pub fn register_page(&mut self, node: NodeId) -> Option<String> {
        self.pages.add_page(&mut self.tree, node)
    }

    pub fn remove_page(&mut self, id: &str) -> Option<NodeId> {
        self.pages.remove_page(&mut self.tree, id)
    }

    pub fn add_overlay(&mut self, overlay: Overlay, position: Option<usize>) {
        self.overlays.add(overlay, position);
    }

    /// Takes over `group`; selections inside it are kept exclusive from now on.
    pub fn add_radio_group(&mut self, group: RadioGroup) {
        if self.radio_groups.insert(group.name().to_owned(), group).is_some() {
            warn!("replacing radio group");
        }
    }

    pub fn radio_group(&self, name: &str) -> Option<&RadioGroup> {
        self.radio_groups.get(name)
    }

    /// Shows `id` without touching the history.
    pub fn show_page(&mut self, id: &str, immediate: bool) -> bool {
        self.pages.set_current_page(&mut self.tree, id, immediate)
    }

    pub fn push_page(&mut self, id: &str, immediate: bool) -> bool {
        self.navigation.push(&mut self.pages, &mut self.tree, id, immediate)
    }

    pub fn pop_page(&mut self, immediate: bool) -> bool {
        self.navigation.pop(&mut self.pages, &mut self.tree, immediate)
    }

    /// Queues `command` for the next time commands are applied.
    pub fn post(&mut self, command: Command) {
        self.tree.push_command(command);
    }

    /// Resizes every page and the notification layer.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.tree.set_size(self.notification_layer, viewport);
        let pages: Vec<NodeId> = self.pages.page_ids().filter_map(|id| self.pages.get(id)).collect();
        for page in pages {
            self.tree.set_size(page, viewport);
        }
    }

    /// Changes the global UI scale. Cached text widths are dropped on the next frame.
    pub fn set_ui_scale(&mut self, scale: f32) -> Result<(), ConfigError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ConfigError::InvalidValue { field: "ui_scale", reason: format!("{} is not positive", scale) });
        }
        debug!(scale, "ui scale changed");
        self.config.ui_scale = scale;
        self.scale_changed = true;
        Ok(())
    }

    /// Shows a toast in the top-right corner, below any already showing.
    /// A non-positive `duration` keeps it until clicked.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity, duration: f32) -> NodeId {
        let scale = self.config.ui_scale;
        let metrics = self.config.metrics;
        let notification = Notification::new(message, severity);
        let notification = if duration > 0.0 { notification.with_duration(duration) } else { notification.sticky() };

        let size = Size::new(UiManager::NOTIFICATION_WIDTH * scale, UiManager::NOTIFICATION_HEIGHT * scale);
        let origin = Point::new(self.viewport.width - size.width - metrics.margin * scale, self.next_notification_y());
        let node = self.tree.insert_child(self.notification_layer, notification, Rect::new(origin, size));
        self.tree.add_handler(node, EXPIRED, move |_| Ok(Some(Command::Remove(node))));
        self.notifications.push(node);
        node
    }

    fn next_notification_y(&self) -> f32 {
        let margin = self.config.metrics.margin * self.config.ui_scale;
        self.notifications
            .iter()
            .filter_map(|&node| self.tree.rect(node))
            .fold(margin, |y, rect| y + rect.size.height + margin)
    }

    /// Closes the gaps left by removed notifications.
    fn restack_notifications(&mut self) {
        let margin = self.config.metrics.margin * self.config.ui_scale;
        let mut y = margin;
        for &node in &self.notifications {
            if let Some(rect) = self.tree.rect(node) {
                self.tree.set_position(node, Point::new(rect.origin.x, y));
                y += rect.size.height + margin;
            }
        }
    }

    /// Routes one input event: overlay toggle keys, then notifications, then
    /// the current page. Returns whether something consumed it.
    pub fn handle_input(&mut self, event: &InputEvent, font: &Font, tiles: &HashMap<String, Image>) -> bool {
        if let Some(pos) = event.position() {
            self.cursor = pos;
        }

        let consumed = match event {
            InputEvent::KeyDown { key, .. } if self.overlays.handle_key(*key) => true,
            _ => {
                let env = frame_env(&self.config, font, tiles, self.cursor);
                self.tree.dispatch(self.notification_layer, event, &env)
                    || self.pages.handle_event(&mut self.tree, event, &env)
            }
        };

        self.apply_commands();
        consumed
    }

    /// Advances pages, notifications and overlays by `dt` seconds.
    pub fn update(&mut self, dt: f32, font: &Font, tiles: &HashMap<String, Image>) {
        if self.scale_changed {
            font.invalidate_text_cache();
            self.scale_changed = false;
        }

        let env = frame_env(&self.config, font, tiles, self.cursor);
        self.pages.update(&mut self.tree, dt, &env);
        self.tree.update(self.notification_layer, dt, &env);
        self.overlays.update(&mut self.tree, dt, &env);

        self.apply_commands();
    }

    /// Draws the pages, then notifications, then enabled overlays, with the
    /// pointer at `cursor`.
    pub fn render(
        &mut self,
        display: &mut dyn GraphicsDisplay,
        font: &Font,
        tiles: &HashMap<String, Image>,
        cursor: Point,
    ) {
        self.cursor = cursor;
        let env = frame_env(&self.config, font, tiles, self.cursor);
        self.pages.render(&self.tree, display, &env);
        self.tree.draw(self.notification_layer, display, &env);
        self.overlays.render_all(&self.tree, display, &env);

        self.apply_commands();
    }

    /// Applies everything handlers posted, including commands posted while
    /// applying. Returns how many were applied.
    pub fn apply_commands(&mut self) -> usize {
        let mut applied = 0;
        for _ in 0..MAX_COMMAND_ROUNDS {
            let commands = self.tree.drain_commands();
            if commands.is_empty() {
                return applied;
            }
            applied += commands.len();
            for command in commands {
                self.apply(command);
            }
        }

        let dropped = self.tree.drain_commands();
        if !dropped.is_empty() {
            warn!(count = dropped.len(), "command chain too deep, dropping the rest");
        }
        applied
    }

    fn apply(&mut self, command: Command) {
        debug!(%command, "applying command");
        match command {
            Command::ShowPage { page, immediate } => {
                self.show_page(&page, immediate);
            }
            Command::PushPage(page) => {
                self.push_page(&page, false);
            }
            Command::PopPage => {
                self.pop_page(false);
            }
            Command::PopToPage(page) => {
                self.navigation.pop_to(&mut self.pages, &mut self.tree, &page, false);
            }
            Command::ClearHistory => self.navigation.clear(),
            Command::ToggleOverlay(id) => self.overlay_command(&id, OverlayManager::toggle),
            Command::ShowOverlay(id) => self.overlay_command(&id, OverlayManager::show),
            Command::HideOverlay(id) => self.overlay_command(&id, OverlayManager::hide),
            Command::Notify { message, severity, duration } => {
                self.notify(message, severity, duration);
            }
            Command::SetVisible { node, visible } => self.tree.set_visible(node, visible),
            Command::SetEnabled { node, enabled } => self.tree.set_enabled(node, enabled),
            Command::Remove(node) => self.remove_node(node),
            Command::SelectRadio { group, node } => match self.radio_groups.get(&group) {
                Some(radio_group) => radio_group.apply_selection(&mut self.tree, node),
                None => warn!(%group, "selection in unknown radio group"),
            },
            Command::SelectTab { container, tab } => {
                let selected = self.tree.modify_with(container, |tabs: &mut TabContainer, cx| tabs.set_active_tab(cx, &tab));
                if selected.is_none() {
                    warn!(?container, "tab selection for a node that is not a tab container");
                }
            }
            command @ Command::Custom { .. } => {
                if self.app_commands.emit_owned(command).was_undelivered() {
                    debug!("custom command had no listeners");
                }
            }
        }
    }

    fn overlay_command(&mut self, id: &str, f: impl FnOnce(&mut OverlayManager, &str) -> bool) {
        if !f(&mut self.overlays, id) {
            warn!(overlay = %id, "no such overlay");
        }
    }

    /// Removes `node` and forgets every reference the manager kept to it.
    fn remove_node(&mut self, node: NodeId) {
        let page = self.pages.page_ids().find(|&id| self.pages.get(id) == Some(node)).map(str::to_owned);
        if let Some(page) = page {
            self.pages.remove_page(&mut self.tree, &page);
            return;
        }

        for group in self.radio_groups.values_mut() {
            group.remove(node);
        }
        let notification_count = self.notifications.len();
        self.notifications.retain(|&notification| notification != node);
        self.tree.remove(node);
        if self.notifications.len() != notification_count {
            self.restack_notifications();
        }
    }
}
