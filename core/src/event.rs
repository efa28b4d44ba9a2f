//! Named UI events, handler results and the commands handlers post.

use {
    crate::{error::HandlerError, tree::NodeId},
    std::{collections::BTreeMap, fmt},
};

pub const CLICK: &str = "click";
pub const TOGGLE: &str = "toggle";
pub const SELECT: &str = "select";
pub const VALUE_CHANGE: &str = "value_change";
pub const SELECTION_CHANGE: &str = "selection_change";
pub const TEXT_CHANGE: &str = "text_change";
pub const ENTER: &str = "enter";
pub const EXPIRED: &str = "expired";
pub const PAGE_ENTER: &str = "page_enter";
pub const PAGE_EXIT: &str = "page_exit";
pub const TAB_CHANGE: &str = "tab_change";

/// A value carried in a [`UiEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// An optional position in a list; `None` means "nothing selected".
    Index(Option<usize>),
    Node(NodeId),
}

impl EventValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EventValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EventValue::Float(f) => Some(*f),
            EventValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            EventValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<Option<usize>> {
        match self {
            EventValue::Index(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<bool> for EventValue {
    fn from(b: bool) -> Self {
        EventValue::Bool(b)
    }
}

impl From<f64> for EventValue {
    fn from(f: f64) -> Self {
        EventValue::Float(f)
    }
}

impl From<f32> for EventValue {
    fn from(f: f32) -> Self {
        EventValue::Float(f as f64)
    }
}

impl From<i64> for EventValue {
    fn from(i: i64) -> Self {
        EventValue::Int(i)
    }
}

impl From<String> for EventValue {
    fn from(s: String) -> Self {
        EventValue::Text(s)
    }
}

impl From<&str> for EventValue {
    fn from(s: &str) -> Self {
        EventValue::Text(s.to_owned())
    }
}

impl From<Option<usize>> for EventValue {
    fn from(i: Option<usize>) -> Self {
        EventValue::Index(i)
    }
}

/// A named bag of values plus the node that fired it.
#[derive(Debug, Clone, PartialEq)]
pub struct UiEvent {
    pub name: String,
    pub source: NodeId,
    pub data: BTreeMap<&'static str, EventValue>,
}

impl UiEvent {
    pub fn new(name: impl Into<String>, source: NodeId) -> Self {
        UiEvent { name: name.into(), source, data: BTreeMap::new() }
    }

    pub fn with(mut self, key: &'static str, value: impl Into<EventValue>) -> Self {
        self.data.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&EventValue> {
        self.data.get(key)
    }

    /// Like [`get`](UiEvent::get), as an error handlers can propagate with `?`.
    pub fn require(&self, key: &str) -> Result<&EventValue, HandlerError> {
        self.data
            .get(key)
            .ok_or_else(|| HandlerError::MissingField { event: self.name.clone(), field: key.to_owned() })
    }
}

/// Notification severity; selects the accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Info
    }
}

/// Work a handler asks the UI manager to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Switch pages without touching the history.
    ShowPage { page: String, immediate: bool },
    PushPage(String),
    PopPage,
    PopToPage(String),
    ClearHistory,
    ToggleOverlay(String),
    ShowOverlay(String),
    HideOverlay(String),
    Notify { message: String, severity: Severity, duration: f32 },
    SetVisible { node: NodeId, visible: bool },
    SetEnabled { node: NodeId, enabled: bool },
    /// Remove a node and its subtree.
    Remove(NodeId),
    /// Enforce exclusivity after `node` was selected in radio group `group`.
    SelectRadio { group: String, node: NodeId },
    /// Activate tab `tab` of the tab container at `container`.
    SelectTab { container: NodeId, tab: String },
    /// Anything the UI does not interpret; forwarded to the application.
    Custom { name: String, value: Option<EventValue> },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ShowPage { page, .. } => write!(f, "show page {}", page),
            Command::PushPage(page) => write!(f, "push page {}", page),
            Command::PopPage => write!(f, "pop page"),
            Command::PopToPage(page) => write!(f, "pop to page {}", page),
            Command::ClearHistory => write!(f, "clear history"),
            Command::ToggleOverlay(id) => write!(f, "toggle overlay {}", id),
            Command::ShowOverlay(id) => write!(f, "show overlay {}", id),
            Command::HideOverlay(id) => write!(f, "hide overlay {}", id),
            Command::Notify { message, severity, .. } => write!(f, "notify {:?} {}", severity, message),
            Command::SetVisible { node, visible } => write!(f, "set {:?} visible={}", node, visible),
            Command::SetEnabled { node, enabled } => write!(f, "set {:?} enabled={}", node, enabled),
            Command::Remove(node) => write!(f, "remove {:?}", node),
            Command::SelectRadio { group, node } => write!(f, "select {:?} in {}", node, group),
            Command::SelectTab { container, tab } => write!(f, "select tab {} of {:?}", tab, container),
            Command::Custom { name, .. } => write!(f, "custom {}", name),
        }
    }
}

/// Result of an event handler: optionally a command for the manager.
pub type HandlerResult = Result<Option<Command>, HandlerError>;

/// A callback registered for one event name on one node.
pub type Handler = Box<dyn FnMut(&UiEvent) -> HandlerResult>;
