use {
    super::{Page, PageChange},
    dashr_ui_core::{
        display::GraphicsDisplay,
        input::InputEvent,
        tree::{FrameEnv, NodeId, UiTree},
    },
    dashr_ui_event::{prelude::*, RcEventListener, RcEventQueue},
    indexmap::IndexMap,
    tracing::{debug, warn},
};

/// Registry of pages by id, and which of them is current.
///
/// Pages are nodes in the caller's [`UiTree`] whose widget is a [`Page`].
#[derive(Debug, Default)]
pub struct PageManager {
    pages: IndexMap<String, NodeId>,
    current: Option<String>,
    previous: Option<String>,
    changes: RcEventQueue<PageChange>,
}

impl PageManager {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers the page at `node`, hidden and inactive. Returns its id, or
    /// `None` if `node` is not a page.
    pub fn add_page(&mut self, tree: &mut UiTree, node: NodeId) -> Option<String> {
        let id = tree.modify(node, |page: &mut Page| {
            page.reset();
            page.id().to_owned()
        })?;
        tree.set_visible(node, false);

        if let Some(old) = self.pages.insert(id.clone(), node) {
            if old != node {
                warn!(page = %id, "replacing registered page");
            }
        }
        Some(id)
    }

    /// Unregisters `id` and removes its node from the tree.
    pub fn remove_page(&mut self, tree: &mut UiTree, id: &str) -> Option<NodeId> {
        let node = self.pages.shift_remove(id)?;
        tree.remove(node);
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        if self.previous.as_deref() == Some(id) {
            self.previous = None;
        }
        Some(node)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<NodeId> {
        self.pages.get(id).copied()
    }

    pub fn page_ids(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Switches to `id`. The old page fades out and the new one fades in, or
    /// both snap when `immediate`. Returns `false` for an unknown id.
    pub fn set_current_page(&mut self, tree: &mut UiTree, id: &str, immediate: bool) -> bool {
        let node = match self.pages.get(id) {
            Some(&node) => node,
            None => {
                warn!(page = %id, "no such page");
                return false;
            }
        };
        if self.current.as_deref() == Some(id) {
            return true;
        }

        let from = self.current.take();
        if let Some(old) = from.as_deref().and_then(|from| self.pages.get(from)) {
            tree.modify_with(*old, |page: &mut Page, cx| page.deactivate(cx, immediate));
        }
        tree.modify_with(node, |page: &mut Page, cx| page.activate(cx, immediate));

        debug!(from = ?from, to = %id, immediate, "page change");
        self.previous = from.clone();
        self.current = Some(id.to_owned());
        self.changes.emit_owned(PageChange { from, to: id.to_owned() });
        true
    }

    pub fn current_page(&self) -> Option<NodeId> {
        self.current.as_deref().and_then(|id| self.get(id))
    }

    #[inline]
    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn previous_page(&self) -> Option<NodeId> {
        self.previous.as_deref().and_then(|id| self.get(id))
    }

    /// Subscribes to page changes.
    pub fn listen(&self) -> RcEventListener<PageChange> {
        self.changes.listen()
    }

    fn is_live(tree: &UiTree, node: NodeId) -> bool {
        tree.is_visible(node) || tree.widget::<Page>(node).map_or(false, Page::is_active)
    }

    /// Updates every page that is visible or active.
    pub fn update(&self, tree: &mut UiTree, dt: f32, env: &FrameEnv<'_>) {
        for &node in self.pages.values() {
            if PageManager::is_live(tree, node) {
                tree.update(node, dt, env);
            }
        }
    }

    /// Draws the outgoing page under the current one.
    pub fn render(&self, tree: &UiTree, display: &mut dyn GraphicsDisplay, env: &FrameEnv<'_>) {
        let current = self.current_page();
        if let Some(previous) = self.previous_page() {
            if Some(previous) != current && tree.is_visible(previous) {
                tree.draw(previous, display, env);
            }
        }
        if let Some(current) = current {
            tree.draw(current, display, env);
        }
    }

    /// Offers input to the current page only.
    pub fn handle_event(&self, tree: &mut UiTree, event: &InputEvent, env: &FrameEnv<'_>) -> bool {
        match self.current_page() {
            Some(current) => tree.dispatch(current, event, env),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::widgets::{
            testing::{rect, Harness},
            Button,
        },
        dashr_ui_core::{
            display::{DisplayCommand, DisplayListBuilder},
            event::{PAGE_ENTER, PAGE_EXIT},
        },
        std::{cell::RefCell, rc::Rc},
    };

    fn pages(tree: &mut UiTree, ids: &[&str]) -> (PageManager, Vec<NodeId>) {
        let mut manager = PageManager::new();
        let nodes = ids
            .iter()
            .map(|id| {
                let node = tree.insert(Page::new(*id), rect(0.0, 0.0, 100.0, 100.0));
                assert_eq!(manager.add_page(tree, node).as_deref(), Some(*id));
                node
            })
            .collect();
        (manager, nodes)
    }

    fn page(tree: &UiTree, node: NodeId) -> &Page {
        tree.widget::<Page>(node).unwrap()
    }

    #[test]
    fn test_immediate_switch_snaps_progress() {
        let mut tree = UiTree::new();
        let (mut manager, nodes) = pages(&mut tree, &["a", "b"]);
        let changes = manager.listen();

        assert!(manager.set_current_page(&mut tree, "a", true));
        assert!(manager.set_current_page(&mut tree, "b", true));

        assert!(!page(&tree, nodes[0]).is_active());
        assert_eq!(page(&tree, nodes[0]).progress(), 0.0);
        assert!(page(&tree, nodes[1]).is_active());
        assert_eq!(page(&tree, nodes[1]).progress(), 1.0);
        assert_eq!(manager.current_page(), Some(nodes[1]));
        assert_eq!(manager.previous_page(), Some(nodes[0]));

        assert_eq!(
            changes.peek(),
            vec![
                PageChange { from: None, to: "a".into() },
                PageChange { from: Some("a".into()), to: "b".into() },
            ]
        );
    }

    #[test]
    fn test_unknown_and_repeated_targets() {
        let mut tree = UiTree::new();
        let (mut manager, _) = pages(&mut tree, &["a"]);
        let changes = manager.listen();

        assert!(!manager.set_current_page(&mut tree, "missing", false));
        assert!(manager.set_current_page(&mut tree, "a", false));
        assert!(manager.set_current_page(&mut tree, "a", false));
        assert_eq!(changes.peek().len(), 1);

        let button = tree.insert(Button::new("x"), rect(0.0, 0.0, 1.0, 1.0));
        assert!(manager.add_page(&mut tree, button).is_none());
    }

    #[test]
    fn test_only_live_pages_update() {
        let harness = Harness::new();
        let env = harness.env(0.0, 0.0);
        let mut tree = UiTree::new();
        let (mut manager, nodes) = pages(&mut tree, &["a", "b", "c"]);

        manager.set_current_page(&mut tree, "a", true);
        manager.set_current_page(&mut tree, "b", false);
        manager.update(&mut tree, 0.125, &env);

        // a fades out, b fades in, c untouched
        assert_eq!(page(&tree, nodes[0]).progress(), 0.5);
        assert_eq!(page(&tree, nodes[1]).progress(), 0.5);
        assert_eq!(page(&tree, nodes[2]).progress(), 0.0);
        assert!(!tree.is_visible(nodes[2]));

        // both are drawn during the cross-fade, previous first
        let mut display = DisplayListBuilder::new();
        manager.render(&tree, &mut display, &env);
        let layers = display.commands().iter().filter(|c| matches!(c, DisplayCommand::SaveLayer(_))).count();
        assert_eq!(layers, 2);

        manager.update(&mut tree, 0.125, &env);
        assert!(!tree.is_visible(nodes[0]));
        let mut display = DisplayListBuilder::new();
        manager.render(&tree, &mut display, &env);
        assert!(matches!(display.commands()[0], DisplayCommand::Save));
    }

    #[test]
    fn test_enter_exit_events_and_removal() {
        let mut tree = UiTree::new();
        let (mut manager, nodes) = pages(&mut tree, &["a", "b"]);
        let log = Rc::new(RefCell::new(Vec::new()));
        for &node in &nodes {
            for name in &[PAGE_ENTER, PAGE_EXIT] {
                let log = log.clone();
                tree.add_handler(node, *name, move |event| {
                    log.borrow_mut().push(format!("{} {}", event.name, event.require("page")?.as_str().unwrap_or("")));
                    Ok(None)
                });
            }
        }

        manager.set_current_page(&mut tree, "a", true);
        manager.set_current_page(&mut tree, "b", true);
        assert_eq!(*log.borrow(), vec!["page_enter a", "page_exit a", "page_enter b"]);

        assert_eq!(manager.remove_page(&mut tree, "b"), Some(nodes[1]));
        assert!(!tree.contains(nodes[1]));
        assert_eq!(manager.current_page(), None);
        assert!(manager.remove_page(&mut tree, "b").is_none());
        assert_eq!(manager.page_ids().collect::<Vec<_>>(), vec!["a"]);
    }
}
