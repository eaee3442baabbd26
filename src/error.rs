//! Error taxonomy for the overlay core.
//!
//! Most geometry failures are absorbed where they happen (missing targets are
//! no-ops, degenerate math falls back to identity). The variants here cover
//! the internal fallible steps that propagate with `?` and the few surfaces
//! that do report errors: strict-mode invariant checks, configuration, and
//! the replay script loader.

use crate::element::ElementId;

/// Convenience alias used throughout the crate.
pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// An operation targeted an element id that is not in the store.
    #[error("element not found: {0}")]
    MissingElement(ElementId),
    /// A computation had no meaningful result (empty selection, singular matrix, ...).
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),
    /// `zOrder` / `elements` / selection fell out of sync.
    #[error("state invariant violated: {0}")]
    InvariantViolation(String),
    /// An environment or script setting could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// A replay script was not valid JSON for the expected shape.
    #[error("invalid replay script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
