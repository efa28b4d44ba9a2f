//! The component tree.
//!
//! Nodes live in an arena owned by [`UiTree`] and refer to each other by
//! [`NodeId`]. A parent owns its children (removing it removes the subtree);
//! the child's `parent` link is only used to resolve absolute positions.
//!
//! Each node carries a boxed [`Widget`] providing its behavior. While a widget
//! callback runs, the widget is taken out of the arena so it can borrow the
//! tree mutably through its context.

use {
    crate::{
        config::{Theme, UiConfig},
        display::{GraphicsDisplay, Image, Point, Rect, Size},
        event::{Command, Handler, UiEvent},
        font::Font,
        input::InputEvent,
    },
    slotmap::{SecondaryMap, SlotMap},
    std::{
        any::Any,
        collections::HashMap,
        ops::{Deref, DerefMut},
    },
};

slotmap::new_key_type! {
    /// Handle to a node in a [`UiTree`].
    pub struct NodeId;
}

/// Type-erasure helper so trees can hand out concrete widget types.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior attached to a node.
///
/// Every method has a no-op default. The tree takes care of recursion:
/// updates and draws continue into visible children in list order after the
/// widget's own hook, and input reaches children (last first) before
/// [`handle_event`](Widget::handle_event) runs for the node itself.
pub trait Widget: AsAny {
    /// Per-frame state changes (hover detection, animations, timers).
    fn update(&mut self, _cx: &mut FrameCx<'_>, _dt: f32) {}

    /// Draws the node underneath its children. Must not depend on anything
    /// but the widget's state and the frame environment.
    fn draw(&self, _cx: &mut DrawCx<'_>) {}

    /// Draws the node on top of its children.
    fn draw_over(&self, _cx: &mut DrawCx<'_>) {}

    /// The node's own reaction to input, after its children declined it.
    /// Returns `true` when the event is consumed.
    fn handle_event(&mut self, _cx: &mut FrameCx<'_>, _event: &InputEvent) -> bool {
        false
    }

    /// Recomputes the geometry of the children.
    fn arrange(&mut self, _cx: &mut NodeCx<'_>) {}

    /// A child was detached; drop anything recorded for it. Detaching from
    /// inside this widget's own callbacks delivers this once the callback returns.
    fn child_removed(&mut self, _child: NodeId) {}

    fn enabled_changed(&mut self, _enabled: bool) {}
}

/// A node without behavior of its own; groups children.
#[derive(Debug, Default, Clone, Copy)]
pub struct Container;

impl Widget for Container {}

struct Node {
    rect: Rect,
    visible: bool,
    enabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    handlers: HashMap<String, Vec<Handler>>,
}

impl Node {
    fn new(rect: Rect) -> Self {
        Node { rect, visible: true, enabled: true, parent: None, children: Vec::new(), handlers: HashMap::new() }
    }
}

/// Everything a frame's update, draw and input pass can read.
#[derive(Clone, Copy)]
pub struct FrameEnv<'a> {
    pub font: &'a Font,
    pub config: &'a UiConfig,
    /// Host-supplied multiplier for every font scale and spacing constant.
    pub ui_scale: f32,
    pub cursor: Point,
    pub tiles: &'a HashMap<String, Image>,
}

impl<'a> FrameEnv<'a> {
    pub fn new(font: &'a Font, config: &'a UiConfig, tiles: &'a HashMap<String, Image>) -> Self {
        FrameEnv { font, config, ui_scale: config.ui_scale, cursor: Point::zero(), tiles }
    }

    pub fn with_cursor(mut self, cursor: Point) -> Self {
        self.cursor = cursor;
        self
    }

    /// Font scale for body text.
    #[inline]
    pub fn text_scale(&self) -> f32 {
        self.config.metrics.font_scale * self.ui_scale
    }

    #[inline]
    pub fn theme(&self) -> &'a Theme {
        &self.config.theme
    }
}

/// Mutable access to the tree on behalf of one node.
pub struct NodeCx<'a> {
    pub tree: &'a mut UiTree,
    pub id: NodeId,
}

impl<'a> NodeCx<'a> {
    #[inline]
    pub fn rect(&self) -> Rect {
        self.tree.rect(self.id).unwrap_or_default()
    }

    #[inline]
    pub fn absolute_rect(&self) -> Rect {
        self.tree.absolute_rect(self.id).unwrap_or_default()
    }

    #[inline]
    pub fn contains_point(&self, point: Point) -> bool {
        self.tree.contains_point(self.id, point)
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.tree.is_enabled(self.id)
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.tree.is_visible(self.id)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.tree.set_visible(self.id, visible);
    }

    /// Moves/resizes this node; see [`UiTree::set_rect`].
    pub fn set_rect(&mut self, rect: Rect) {
        self.tree.set_rect(self.id, rect);
    }

    /// Positions a child without notifying this node again.
    pub fn place(&mut self, child: NodeId, rect: Rect) {
        self.tree.place(child, rect);
    }

    pub fn children(&self) -> Vec<NodeId> {
        self.tree.children(self.id).to_vec()
    }

    /// Fires `event` on this node's handlers.
    pub fn trigger(&mut self, event: UiEvent) -> usize {
        self.tree.trigger_event(&event)
    }

    /// Starts an event sourced from this node.
    #[inline]
    pub fn event(&self, name: &str) -> UiEvent {
        UiEvent::new(name, self.id)
    }

    pub fn push_command(&mut self, command: Command) {
        self.tree.push_command(command);
    }
}

/// [`NodeCx`] plus the frame environment, for update and input handling.
pub struct FrameCx<'a> {
    pub node: NodeCx<'a>,
    pub env: &'a FrameEnv<'a>,
}

impl<'a> Deref for FrameCx<'a> {
    type Target = NodeCx<'a>;

    fn deref(&self) -> &NodeCx<'a> {
        &self.node
    }
}

impl<'a> DerefMut for FrameCx<'a> {
    fn deref_mut(&mut self) -> &mut NodeCx<'a> {
        &mut self.node
    }
}

/// Read-only view of the tree while drawing one node.
pub struct DrawCx<'a> {
    pub tree: &'a UiTree,
    pub id: NodeId,
    pub display: &'a mut dyn GraphicsDisplay,
    pub env: &'a FrameEnv<'a>,
}

impl<'a> DrawCx<'a> {
    #[inline]
    pub fn absolute_rect(&self) -> Rect {
        self.tree.absolute_rect(self.id).unwrap_or_default()
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.tree.is_enabled(self.id)
    }

    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.tree.contains_point(self.id, self.env.cursor)
    }
}

/// Arena of nodes plus the queue of commands posted by handlers.
#[derive(Default)]
pub struct UiTree {
    nodes: SlotMap<NodeId, Node>,
    widgets: SecondaryMap<NodeId, Box<dyn Widget>>,
    commands: Vec<Command>,
    /// `(parent, child)` detachments seen while the parent's widget was checked out.
    pending_removals: Vec<(NodeId, NodeId)>,
}

impl UiTree {
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a detached node.
    pub fn insert(&mut self, widget: impl Widget, rect: Rect) -> NodeId {
        self.insert_boxed(Box::new(widget), rect)
    }

    pub fn insert_boxed(&mut self, widget: Box<dyn Widget>, rect: Rect) -> NodeId {
        let id = self.nodes.insert(Node::new(rect));
        self.widgets.insert(id, widget);
        id
    }

    /// Creates a node and appends it to `parent`.
    pub fn insert_child(&mut self, parent: NodeId, widget: impl Widget, rect: Rect) -> NodeId {
        let id = self.insert(widget, rect);
        self.add_child(parent, id);
        id
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends `child` to `parent`, detaching it from its previous parent first.
    ///
    /// Returns `false` if either node is missing or `child` is `parent` or one
    /// of its ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor_or_self(child, parent) {
            return false;
        }

        self.detach(child);

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        self.arrange(parent);
        true
    }

    /// Detaches `child` from `parent` without destroying it.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child);
        true
    }

    /// Removes `id` and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
            }
            self.widgets.remove(next);
        }
        true
    }

    fn detach(&mut self, child: NodeId) {
        let parent = match self.nodes.get_mut(child).and_then(|node| node.parent.take()) {
            Some(parent) => parent,
            None => return,
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        match self.widgets.get_mut(parent) {
            Some(widget) => widget.child_removed(child),
            None if self.nodes.contains_key(parent) => self.pending_removals.push((parent, child)),
            None => {}
        }
        self.arrange(parent);
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, mut of: NodeId) -> bool {
        loop {
            if candidate == of {
                return true;
            }
            match self.parent(of) {
                Some(parent) => of = parent,
                None => return false,
            }
        }
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Children in list (paint) order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Position and size relative to the parent.
    #[inline]
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id).map(|node| node.rect)
    }

    /// Sum of the relative positions up to the root.
    pub fn absolute_position(&self, id: NodeId) -> Option<Point> {
        let mut node = self.nodes.get(id)?;
        let mut pos = node.rect.origin;
        while let Some(parent) = node.parent.and_then(|p| self.nodes.get(p)) {
            pos += parent.rect.origin.to_vector();
            node = parent;
        }
        Some(pos)
    }

    pub fn absolute_rect(&self, id: NodeId) -> Option<Rect> {
        Some(Rect::new(self.absolute_position(id)?, self.rect(id)?.size))
    }

    /// Point-in-rect test in absolute coordinates. Edges are inclusive on
    /// the top/left and exclusive on the bottom/right.
    pub fn contains_point(&self, id: NodeId, point: Point) -> bool {
        self.absolute_rect(id).map_or(false, |rect| rect.contains(point))
    }

    /// Moves/resizes a node.
    ///
    /// A size change re-runs the node's own layout, and any change lets the
    /// parent re-run its layout.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        let (old, parent) = match self.nodes.get_mut(id) {
            Some(node) => (std::mem::replace(&mut node.rect, rect), node.parent),
            None => return,
        };
        if old.size != rect.size {
            self.arrange(id);
        }
        if old != rect {
            if let Some(parent) = parent {
                self.arrange(parent);
            }
        }
    }

    pub fn set_position(&mut self, id: NodeId, pos: Point) {
        if let Some(rect) = self.rect(id) {
            self.set_rect(id, Rect::new(pos, rect.size));
        }
    }

    pub fn set_size(&mut self, id: NodeId, size: Size) {
        if let Some(rect) = self.rect(id) {
            self.set_rect(id, Rect::new(rect.origin, size));
        }
    }

    /// Layout entry point: sets the rect, re-arranging the node's own
    /// children on a size change but leaving the parent alone.
    pub fn place(&mut self, id: NodeId, rect: Rect) {
        let old = match self.nodes.get_mut(id) {
            Some(node) => std::mem::replace(&mut node.rect, rect),
            None => return,
        };
        if old.size != rect.size {
            self.arrange(id);
        }
    }

    #[inline]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.nodes.get(id).map_or(false, |node| node.visible)
    }

    #[inline]
    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.nodes.get(id).map_or(false, |node| node.enabled)
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.visible = visible;
        }
    }

    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) {
        let changed = match self.nodes.get_mut(id) {
            Some(node) => std::mem::replace(&mut node.enabled, enabled) != enabled,
            None => false,
        };
        if changed {
            if let Some(widget) = self.widgets.get_mut(id) {
                widget.enabled_changed(enabled);
            }
        }
    }

    /// Borrows the widget of `id` as its concrete type.
    pub fn widget<T: Widget>(&self, id: NodeId) -> Option<&T> {
        self.widgets.get(id).and_then(|widget| (**widget).as_any().downcast_ref::<T>())
    }

    /// Mutates the widget of `id`, then re-runs its layout.
    pub fn modify<T: Widget, R>(&mut self, id: NodeId, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.modify_with(id, |widget: &mut T, _| f(widget))
    }

    /// Like [`modify`](UiTree::modify), with access to the node so setters can fire events.
    pub fn modify_with<T: Widget, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut T, &mut NodeCx<'_>) -> R,
    ) -> Option<R> {
        let result = self.with_widget(id, |widget, tree| {
            let widget = (*widget).as_any_mut().downcast_mut::<T>()?;
            Some(f(widget, &mut NodeCx { tree, id }))
        })??;
        self.arrange(id);
        Some(result)
    }

    fn with_widget<R>(&mut self, id: NodeId, f: impl FnOnce(&mut dyn Widget, &mut UiTree) -> R) -> Option<R> {
        let mut widget = self.widgets.remove(id)?;
        let result = f(widget.as_mut(), self);
        if !self.pending_removals.is_empty() {
            let mut pending = std::mem::take(&mut self.pending_removals);
            pending.retain(|&(parent, child)| {
                if parent == id {
                    widget.child_removed(child);
                }
                parent != id
            });
            self.pending_removals = pending;
        }
        if self.nodes.contains_key(id) {
            self.widgets.insert(id, widget);
        }
        Some(result)
    }

    /// Re-runs the layout of `id`. No-op while that widget is already busy.
    pub fn arrange(&mut self, id: NodeId) {
        self.with_widget(id, |widget, tree| widget.arrange(&mut NodeCx { tree, id }));
    }

    /// Registers `handler` for events named `name` fired on `id`.
    pub fn add_handler(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        handler: impl FnMut(&UiEvent) -> crate::event::HandlerResult + 'static,
    ) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.handlers.entry(name.into()).or_default().push(Box::new(handler));
                true
            }
            None => false,
        }
    }

    /// Runs the handlers registered on `event.source` for `event.name`, in
    /// registration order. A failing handler is logged and the rest still run.
    /// Returns how many handlers ran.
    pub fn trigger_event(&mut self, event: &UiEvent) -> usize {
        let mut handlers = match self.nodes.get_mut(event.source).and_then(|n| n.handlers.remove(&event.name)) {
            Some(handlers) => handlers,
            None => return 0,
        };

        for handler in handlers.iter_mut() {
            match handler(event) {
                Ok(Some(command)) => self.commands.push(command),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(event = %event.name, source = ?event.source, %error, "event handler failed")
                }
            }
        }

        let ran = handlers.len();
        if let Some(node) = self.nodes.get_mut(event.source) {
            node.handlers.insert(event.name.clone(), handlers);
        }
        ran
    }

    pub fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Takes every command posted since the last drain.
    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Updates `id` and then its visible children, in list order. Invisible
    /// nodes are skipped with their subtree.
    pub fn update(&mut self, id: NodeId, dt: f32, env: &FrameEnv<'_>) {
        if !self.is_visible(id) {
            return;
        }
        self.with_widget(id, |widget, tree| widget.update(&mut FrameCx { node: NodeCx { tree, id }, env }, dt));

        for child in self.children(id).to_vec() {
            self.update(child, dt, env);
        }
    }

    /// Draws `id` and its visible children in list order.
    pub fn draw(&self, id: NodeId, display: &mut dyn GraphicsDisplay, env: &FrameEnv<'_>) {
        let node = match self.nodes.get(id) {
            Some(node) if node.visible => node,
            _ => return,
        };
        let widget = self.widgets.get(id);

        if let Some(widget) = widget {
            widget.draw(&mut DrawCx { tree: self, id, display: &mut *display, env });
        }
        for &child in &node.children {
            self.draw(child, display, env);
        }
        if let Some(widget) = widget {
            widget.draw_over(&mut DrawCx { tree: self, id, display: &mut *display, env });
        }
    }

    /// Offers `event` to the subtree at `id`: children last-to-first, then the
    /// node itself. Stops at the first taker. Invisible or disabled nodes
    /// refuse without consulting their children.
    pub fn dispatch(&mut self, id: NodeId, event: &InputEvent, env: &FrameEnv<'_>) -> bool {
        match self.nodes.get(id) {
            Some(node) if node.visible && node.enabled => {}
            _ => return false,
        }

        for child in self.children(id).to_vec().into_iter().rev() {
            if self.dispatch(child, event, env) {
                return true;
            }
        }

        self.with_widget(id, |widget, tree| {
            widget.handle_event(&mut FrameCx { node: NodeCx { tree, id }, env }, event)
        })
        .unwrap_or(false)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use {
        super::*,
        crate::{
            display::{rgb, DisplayCommand, DisplayListBuilder},
            error::HandlerError,
            font::tests::test_font,
        },
        std::{cell::RefCell, rc::Rc},
    };

    pub(crate) fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Point::new(x, y), Size::new(w, h))
    }

    /// Records which nodes saw input, consuming when `consume` is set.
    struct Tracer {
        log: Rc<RefCell<Vec<&'static str>>>,
        name: &'static str,
        consume: bool,
        removed: Vec<NodeId>,
        enabled_calls: Vec<bool>,
    }

    impl Tracer {
        fn new(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str, consume: bool) -> Self {
            Tracer { log: log.clone(), name, consume, removed: Vec::new(), enabled_calls: Vec::new() }
        }
    }

    impl Widget for Tracer {
        fn handle_event(&mut self, _cx: &mut FrameCx<'_>, _event: &InputEvent) -> bool {
            self.log.borrow_mut().push(self.name);
            self.consume
        }

        fn update(&mut self, _cx: &mut FrameCx<'_>, _dt: f32) {
            self.log.borrow_mut().push(self.name);
        }

        fn draw(&self, cx: &mut DrawCx<'_>) {
            cx.display.fill_rect(cx.absolute_rect(), rgb(0, 0, 0));
        }

        fn child_removed(&mut self, child: NodeId) {
            self.removed.push(child);
        }

        fn enabled_changed(&mut self, enabled: bool) {
            self.enabled_calls.push(enabled);
        }
    }

    /// Stretches every child to its own width, stacked 10px apart.
    struct Stack;

    impl Widget for Stack {
        fn arrange(&mut self, cx: &mut NodeCx<'_>) {
            let width = cx.rect().size.width;
            for (i, child) in cx.children().into_iter().enumerate() {
                cx.place(child, rect(0.0, i as f32 * 10.0, width, 10.0));
            }
        }
    }

    fn with_env<R>(f: impl FnOnce(&FrameEnv<'_>) -> R) -> R {
        let font = test_font();
        let config = UiConfig::default();
        let tiles = HashMap::new();
        f(&FrameEnv::new(&font, &config, &tiles))
    }

    #[test]
    fn test_absolute_position() {
        let mut tree = UiTree::new();
        let root = tree.insert(Container, rect(10.0, 20.0, 100.0, 100.0));
        let mid = tree.insert_child(root, Container, rect(5.0, 5.0, 50.0, 50.0));
        let leaf = tree.insert_child(mid, Container, rect(1.0, 2.0, 3.0, 4.0));

        assert_eq!(tree.absolute_position(root), Some(Point::new(10.0, 20.0)));
        assert_eq!(tree.absolute_position(leaf), Some(Point::new(16.0, 27.0)));
        assert!(tree.contains_point(leaf, Point::new(16.0, 27.0)));
        assert!(tree.contains_point(leaf, Point::new(18.5, 30.5)));
        assert!(!tree.contains_point(leaf, Point::new(1.0, 2.0)));

        tree.remove_child(mid, leaf);
        assert_eq!(tree.parent(leaf), None);
        assert_eq!(tree.absolute_position(leaf), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_reverse_order_dispatch_and_consumption() {
        with_env(|env| {
            let log = Rc::new(RefCell::new(Vec::new()));
            let mut tree = UiTree::new();
            let root = tree.insert(Tracer::new(&log, "root", false), rect(0.0, 0.0, 10.0, 10.0));
            tree.insert_child(root, Tracer::new(&log, "first", false), rect(0.0, 0.0, 1.0, 1.0));
            tree.insert_child(root, Tracer::new(&log, "second", false), rect(0.0, 0.0, 1.0, 1.0));

            assert!(!tree.dispatch(root, &InputEvent::key_down(crate::input::Key::Tab), env));
            assert_eq!(*log.borrow(), vec!["second", "first", "root"]);

            log.borrow_mut().clear();
            tree.insert_child(root, Tracer::new(&log, "third", true), rect(0.0, 0.0, 1.0, 1.0));
            assert!(tree.dispatch(root, &InputEvent::key_down(crate::input::Key::Tab), env));
            assert_eq!(*log.borrow(), vec!["third"]);
        });
    }

    #[test]
    fn test_disabled_parent_hides_children() {
        with_env(|env| {
            let log = Rc::new(RefCell::new(Vec::new()));
            let mut tree = UiTree::new();
            let root = tree.insert(Tracer::new(&log, "root", true), rect(0.0, 0.0, 10.0, 10.0));
            tree.insert_child(root, Tracer::new(&log, "child", true), rect(0.0, 0.0, 1.0, 1.0));

            tree.set_enabled(root, false);
            assert!(!tree.dispatch(root, &InputEvent::key_down(crate::input::Key::Tab), env));
            tree.set_enabled(root, true);
            tree.set_visible(root, false);
            assert!(!tree.dispatch(root, &InputEvent::key_down(crate::input::Key::Tab), env));
            assert!(log.borrow().is_empty());

            assert_eq!(tree.widget::<Tracer>(root).unwrap().enabled_calls, vec![false, true]);
        });
    }

    #[test]
    fn test_update_skips_invisible_subtrees() {
        with_env(|env| {
            let log = Rc::new(RefCell::new(Vec::new()));
            let mut tree = UiTree::new();
            let root = tree.insert(Tracer::new(&log, "root", false), rect(0.0, 0.0, 10.0, 10.0));
            let hidden = tree.insert_child(root, Tracer::new(&log, "hidden", false), rect(0.0, 0.0, 1.0, 1.0));
            tree.insert_child(hidden, Tracer::new(&log, "grandchild", false), rect(0.0, 0.0, 1.0, 1.0));
            tree.insert_child(root, Tracer::new(&log, "shown", false), rect(0.0, 0.0, 1.0, 1.0));
            tree.set_visible(hidden, false);

            tree.update(root, 0.016, env);
            assert_eq!(*log.borrow(), vec!["root", "shown"]);

            let mut display = DisplayListBuilder::new();
            tree.draw(root, &mut display, env);
            assert_eq!(display.commands().len(), 2);
            assert!(matches!(display.commands()[0], DisplayCommand::FillRect { .. }));
        });
    }

    #[test]
    fn test_handlers_run_in_order_and_survive_errors() {
        let mut tree = UiTree::new();
        let node = tree.insert(Container, rect(0.0, 0.0, 1.0, 1.0));
        let other = tree.insert(Container, rect(0.0, 0.0, 1.0, 1.0));
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = order.clone();
        tree.add_handler(node, "click", move |_| {
            o.borrow_mut().push(1);
            Err(HandlerError::Failed("boom".into()))
        });
        let o = order.clone();
        tree.add_handler(node, "click", move |_| {
            o.borrow_mut().push(2);
            Ok(Some(Command::PopPage))
        });
        let o = order.clone();
        tree.add_handler(other, "click", move |_| {
            o.borrow_mut().push(3);
            Ok(None)
        });

        assert_eq!(tree.trigger_event(&UiEvent::new("click", node)), 2);
        assert_eq!(*order.borrow(), vec![1, 2]);
        assert_eq!(tree.drain_commands(), vec![Command::PopPage]);
        assert!(tree.drain_commands().is_empty());

        assert_eq!(tree.trigger_event(&UiEvent::new("toggle", node)), 0);
        assert_eq!(tree.trigger_event(&UiEvent::new("click", node)), 2);
    }

    #[test]
    fn test_structural_changes_rearrange() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = UiTree::new();
        let stack = tree.insert(Stack, rect(0.0, 0.0, 50.0, 100.0));
        let a = tree.insert_child(stack, Container, rect(0.0, 0.0, 1.0, 1.0));
        let b = tree.insert_child(stack, Container, rect(0.0, 0.0, 1.0, 1.0));
        assert_eq!(tree.rect(b), Some(rect(0.0, 10.0, 50.0, 10.0)));

        tree.set_size(stack, Size::new(80.0, 100.0));
        assert_eq!(tree.rect(a), Some(rect(0.0, 0.0, 80.0, 10.0)));

        let tracer = tree.insert(Tracer::new(&log, "tracer", false), rect(0.0, 0.0, 5.0, 5.0));
        tree.add_child(tracer, a);
        assert_eq!(tree.children(stack), &[b]);
        assert_eq!(tree.rect(b), Some(rect(0.0, 0.0, 80.0, 10.0)));

        tree.add_child(stack, a);
        assert_eq!(tree.widget::<Tracer>(tracer).unwrap().removed, vec![a]);
        assert_eq!(tree.children(stack), &[b, a]);
    }

    /// Hands its first child over to `target` when it sees input.
    struct Donor {
        target: NodeId,
        removed: Vec<NodeId>,
    }

    impl Widget for Donor {
        fn handle_event(&mut self, cx: &mut FrameCx<'_>, _event: &InputEvent) -> bool {
            if let Some(&child) = cx.children().first() {
                let target = self.target;
                cx.tree.add_child(target, child);
            }
            true
        }

        fn child_removed(&mut self, child: NodeId) {
            self.removed.push(child);
        }
    }

    #[test]
    fn test_child_removed_reaches_busy_parent() {
        let mut tree = UiTree::new();
        let target = tree.insert(Container, rect(0.0, 0.0, 50.0, 50.0));
        let donor = tree.insert(Donor { target, removed: Vec::new() }, rect(0.0, 0.0, 50.0, 50.0));
        let child = tree.insert_child(donor, Container, rect(0.0, 0.0, 10.0, 10.0));

        with_env(|env| assert!(tree.dispatch(donor, &InputEvent::left_down(5.0, 5.0), env)));

        assert_eq!(tree.parent(child), Some(target));
        assert!(tree.children(donor).is_empty());
        assert_eq!(tree.widget::<Donor>(donor).unwrap().removed, vec![child]);
        assert!(tree.pending_removals.is_empty());
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut tree = UiTree::new();
        let root = tree.insert(Container, rect(0.0, 0.0, 1.0, 1.0));
        let child = tree.insert_child(root, Container, rect(0.0, 0.0, 1.0, 1.0));
        assert!(!tree.add_child(child, root));
        assert!(!tree.add_child(root, root));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut tree = UiTree::new();
        let root = tree.insert(Container, rect(0.0, 0.0, 1.0, 1.0));
        let child = tree.insert_child(root, Container, rect(0.0, 0.0, 1.0, 1.0));
        let grandchild = tree.insert_child(child, Container, rect(0.0, 0.0, 1.0, 1.0));
        assert!(tree.remove(child));
        assert!(!tree.contains(grandchild));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.len(), 1);
        assert!(!tree.remove(child));
    }

    #[test]
    fn test_modify_downcasts() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = UiTree::new();
        let node = tree.insert(Tracer::new(&log, "a", false), rect(0.0, 0.0, 1.0, 1.0));
        assert_eq!(tree.modify(node, |p: &mut Tracer| p.name), Some("a"));
        assert!(tree.modify(node, |_: &mut Container| ()).is_none());
        assert!(tree.widget::<Tracer>(node).is_some());
    }
}
