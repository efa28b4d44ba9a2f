use thiserror::Error;

/// An error while assembling a bitmap font.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("nominal font size must be greater than zero")]
    ZeroSize,
    #[error("text width cache capacity must be greater than zero")]
    ZeroCacheCapacity,
    #[error("glyph image for {0:?} is empty")]
    EmptyGlyph(char),
    #[error("glyph {0:?} was added twice")]
    DuplicateGlyph(char),
    #[error("icon image for {0:?} is empty")]
    EmptyIcon(String),
    #[error("icon {0:?} was added twice")]
    DuplicateIcon(String),
}

/// An error while loading or validating a [`UiConfig`](crate::config::UiConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    IoError(#[from] std::io::Error),
    #[error("{0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// An error returned by an event handler.
///
/// Handler errors are logged and swallowed by the tree; they never stop the
/// remaining handlers of the same trigger.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandlerError {
    #[error("event {event:?} is missing field {field:?}")]
    MissingField { event: String, field: String },
    #[error("{0}")]
    Failed(String),
}

/// An error surfaced by a rendering backend.
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("display surface was lost")]
    SurfaceLost,
    #[error("{0}")]
    InternalError(#[from] Box<dyn std::error::Error>),
}
