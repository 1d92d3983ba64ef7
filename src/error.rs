//! Error types for spark-board.
//!
//! The rendering core itself never fails: unregistered tags, unseen
//! coordinates and stale overlay uids are silent no-ops. The only failure
//! that reaches callers from the core is an unparsable color spec, raised at
//! the point where the caller hands the string over.

use thiserror::Error;

/// A color-spec string could not be turned into an [`Rgba`](crate::types::Rgba).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The string is not a hex color, a known keyword, or a named color.
    #[error("invalid color spec: {0:?}")]
    Invalid(String),
}

/// Errors raised while setting up or driving a board session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BoardError {
    /// A configured or supplied color spec was rejected.
    #[error(transparent)]
    Color(#[from] ColorError),

    /// The configuration parsed but describes an unusable board.
    #[error("invalid board config: {0}")]
    Config(String),

    /// The configuration file is not valid JSON for [`BoardConfig`](crate::config::BoardConfig).
    #[error("failed to parse board config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Terminal or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T, E = BoardError> = std::result::Result<T, E>;
