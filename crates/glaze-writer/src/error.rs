use glaze_span::Span;
use thiserror::Error;

/// A writer failure: what went wrong and where in the source it happened.
///
/// Writers fail as a unit; no partial artifact is handed out alongside an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Error {
    pub message: String,
    pub span: Span,
}

impl Error {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
