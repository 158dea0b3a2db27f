//! Error handling types and utilities.

/// A specialized Result type for docs-search setup operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when user input cannot be read as a type query.
///
/// Recoverable: the engine answers such input with a text search instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty type query")]
    Empty,
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },
    #[error("unexpected end of type query")]
    UnexpectedEnd,
    #[error("type query nested too deeply at offset {offset}")]
    TooDeep { offset: usize },
}
