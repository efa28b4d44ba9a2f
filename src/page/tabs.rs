use {
    crate::widgets::{Button, ButtonContent, ButtonState},
    dashr_ui_core::{
        display::{Point, Rect, Size},
        event::{Command, CLICK, TAB_CHANGE},
        input::InputEvent,
        tree::{DrawCx, FrameCx, NodeCx, NodeId, UiTree, Widget},
    },
    indexmap::IndexMap,
    tracing::{debug, warn},
};

/// Gap above and below the tab buttons inside the strip.
const STRIP_PADDING: f32 = 2.0;

/// Header of one tab: a [`Button`] that stays highlighted while its tab is active.
#[derive(Debug, Clone, PartialEq)]
pub struct TabButton {
    button: Button,
    tab: String,
    active: bool,
}

impl TabButton {
    pub fn new(tab: impl Into<String>, label: impl Into<ButtonContent>) -> Self {
        TabButton { button: Button::new(label), tab: tab.into(), active: false }
    }

    #[inline]
    pub fn tab(&self) -> &str {
        &self.tab
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn button(&self) -> &Button {
        &self.button
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Widget for TabButton {
    fn update(&mut self, cx: &mut FrameCx<'_>, dt: f32) {
        self.button.update(cx, dt);
    }

    fn handle_event(&mut self, cx: &mut FrameCx<'_>, event: &InputEvent) -> bool {
        self.button.handle_event(cx, event)
    }

    fn enabled_changed(&mut self, enabled: bool) {
        self.button.enabled_changed(enabled);
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        let state = match self.button.state() {
            ButtonState::Normal if self.active => ButtonState::Hover,
            state => state,
        };
        self.button.draw_as(cx, state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tab {
    button: NodeId,
    content: NodeId,
}

/// A strip of [`TabButton`]s over a content area showing only the active tab.
///
/// Tab buttons post [`Command::SelectTab`] when clicked; whoever drains the
/// tree's commands passes it to [`set_active_tab`](TabContainer::set_active_tab).
/// Changing the active tab fires `tab_change` on the container with the new
/// `tab` id, its `index` and the `old_index`.
#[derive(Debug, Clone, PartialEq)]
pub struct TabContainer {
    tabs: IndexMap<String, Tab>,
    active: Option<String>,
    /// Buttons of tabs whose content was removed elsewhere; destroyed on the next arrange.
    stale_buttons: Vec<NodeId>,
    /// Contents of tabs whose button was removed elsewhere; detached on the next arrange.
    stale_contents: Vec<NodeId>,
    pub tab_width: f32,
    pub tab_height: f32,
    pub tab_spacing: f32,
}

impl Default for TabContainer {
    fn default() -> Self {
        TabContainer {
            tabs: IndexMap::new(),
            active: None,
            stale_buttons: Vec::new(),
            stale_contents: Vec::new(),
            tab_width: 100.0,
            tab_height: 32.0,
            tab_spacing: 2.0,
        }
    }
}

impl TabContainer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_tab_size(mut self, width: f32, height: f32) -> Self {
        self.tab_width = width;
        self.tab_height = height;
        self
    }

    #[inline]
    pub fn active_tab(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.as_deref().and_then(|id| self.tabs.get_index_of(id))
    }

    pub fn tab_ids(&self) -> impl Iterator<Item = &str> {
        self.tabs.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn content(&self, id: &str) -> Option<NodeId> {
        self.tabs.get(id).map(|tab| tab.content)
    }

    pub fn button(&self, id: &str) -> Option<NodeId> {
        self.tabs.get(id).map(|tab| tab.button)
    }

    /// Height of the strip holding the tab buttons.
    pub fn strip_height(&self) -> f32 {
        self.tab_height + STRIP_PADDING * 2.0
    }

    /// Adds tab `id` showing `content`, which is moved under the container.
    /// The first tab added becomes active. Returns the new tab button, or
    /// `None` if `id` is taken or `content` cannot be adopted.
    pub fn add_tab(
        &mut self,
        cx: &mut NodeCx<'_>,
        id: impl Into<String>,
        label: impl Into<ButtonContent>,
        content: NodeId,
    ) -> Option<NodeId> {
        let id = id.into();
        if self.tabs.contains_key(&id) {
            warn!(tab = %id, "tab already exists");
            return None;
        }
        if !cx.tree.add_child(cx.id, content) {
            return None;
        }
        cx.tree.set_visible(content, false);

        let button = cx.tree.insert_child(cx.id, TabButton::new(id.clone(), label), Rect::default());
        let container = cx.id;
        let tab = id.clone();
        cx.tree.add_handler(button, CLICK, move |_| Ok(Some(Command::SelectTab { container, tab: tab.clone() })));

        self.tabs.insert(id.clone(), Tab { button, content });
        if self.active.is_none() {
            self.set_active_tab(cx, &id);
        }
        Some(button)
    }

    /// Removes tab `id`, destroying its button and handing back its content
    /// detached from the tree. If it was active the first remaining tab takes over.
    pub fn remove_tab(&mut self, cx: &mut NodeCx<'_>, id: &str) -> Option<NodeId> {
        let tab = self.tabs.shift_remove(id)?;
        cx.tree.remove(tab.button);
        cx.tree.remove_child(cx.id, tab.content);

        if self.active.as_deref() == Some(id) {
            self.active = None;
            match self.tabs.keys().next().cloned() {
                Some(next) => {
                    self.set_active_tab(cx, &next);
                }
                None => {
                    let event = cx.event(TAB_CHANGE).with("index", None::<usize>).with("old_index", None::<usize>);
                    cx.trigger(event);
                }
            }
        }
        Some(tab.content)
    }

    /// Shows tab `id` and hides the previous one. Returns `false` for an unknown id.
    pub fn set_active_tab(&mut self, cx: &mut NodeCx<'_>, id: &str) -> bool {
        let index = match self.tabs.get_index_of(id) {
            Some(index) => index,
            None => {
                warn!(tab = %id, "no such tab");
                return false;
            }
        };
        if self.active.as_deref() == Some(id) {
            return true;
        }

        let old_index = self.active_index();
        if let Some((_, &old)) = old_index.and_then(|old| self.tabs.get_index(old)) {
            TabContainer::show(cx.tree, old, false);
        }
        TabContainer::show(cx.tree, self.tabs[index], true);

        debug!(from = ?self.active, to = %id, "tab change");
        self.active = Some(id.to_owned());
        let event = cx.event(TAB_CHANGE).with("tab", id).with("index", Some(index)).with("old_index", old_index);
        cx.trigger(event);
        true
    }

    fn show(tree: &mut UiTree, tab: Tab, shown: bool) {
        tree.set_visible(tab.content, shown);
        tree.modify(tab.button, |button: &mut TabButton| button.set_active(shown));
    }
}

impl Widget for TabContainer {
    fn arrange(&mut self, cx: &mut NodeCx<'_>) {
        for button in std::mem::take(&mut self.stale_buttons) {
            cx.tree.remove(button);
        }
        for content in std::mem::take(&mut self.stale_contents) {
            cx.tree.remove_child(cx.id, content);
        }
        if self.active.is_none() {
            if let Some(first) = self.tabs.keys().next().cloned() {
                self.set_active_tab(cx, &first);
            }
        }

        let size = cx.rect().size;
        let strip = self.strip_height();
        let content = Rect::new(Point::new(0.0, strip), Size::new(size.width, (size.height - strip).max(0.0)));

        for (i, tab) in self.tabs.values().enumerate() {
            let x = i as f32 * (self.tab_width + self.tab_spacing);
            cx.place(tab.button, Rect::new(Point::new(x, STRIP_PADDING), Size::new(self.tab_width, self.tab_height)));
            cx.place(tab.content, content);
        }
    }

    /// Forgets tabs whose nodes were taken away by someone else.
    fn child_removed(&mut self, child: NodeId) {
        let gone = self.tabs.iter().find(|(_, tab)| tab.button == child || tab.content == child).map(|(id, _)| id.clone());
        let (id, tab) = match gone.and_then(|id| self.tabs.shift_remove_entry(&id)) {
            Some(entry) => entry,
            None => return,
        };
        if tab.button == child {
            self.stale_contents.push(tab.content);
        } else {
            self.stale_buttons.push(tab.button);
        }
        if self.active.as_deref() == Some(id.as_str()) {
            self.active = None;
        }
    }

    fn draw(&self, cx: &mut DrawCx<'_>) {
        let theme = cx.env.theme();
        let bounds = cx.absolute_rect();
        let strip = Rect::new(bounds.origin, Size::new(bounds.size.width, self.strip_height().min(bounds.size.height)));
        cx.display.fill_rect(strip, theme.surface.color());
    }
}
