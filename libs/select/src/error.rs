//! Error types for selection configuration.

use thiserror::Error;

/// Errors raised while loading selection configuration.
///
/// Selection itself never fails; see [`crate::Selection`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// The strategy or pool document is malformed.
    #[error("invalid selection configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<serde_json::Error> for SelectError {
    fn from(err: serde_json::Error) -> Self {
        SelectError::InvalidConfiguration(err.to_string())
    }
}
