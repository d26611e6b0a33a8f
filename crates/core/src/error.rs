//! Error types for the attractors core.

use thiserror::Error;

/// Errors produced by attractor lookup, stepping, bulk computation and storage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttractorError {
    /// No catalog entry has the requested id.
    #[error("unknown attractor: {0}")]
    UnknownAttractor(String),

    /// A catalog index was past the end of the registry.
    #[error("attractor index {index} out of range (catalog has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The attractor exists but is a curve, so it cannot be bulk-iterated.
    #[error("attractor '{0}' is not a point attractor")]
    NotAPointAttractor(String),

    /// The attractor exists but is a point map, so it cannot be stepped per tick.
    #[error("attractor '{0}' is not a curve attractor")]
    NotACurveAttractor(String),

    /// A constant id was not found on the active attractor.
    #[error("attractor '{attractor}' has no constant '{constant}'")]
    UnknownConstant { attractor: String, constant: String },

    /// A point stepper was invoked with a history that does not end right before `index`.
    #[error("point step out of order: index {index} requires {index} prior entries, got {history_len}")]
    OutOfOrder { index: usize, history_len: usize },

    /// `max_points` must be at least one.
    #[error("max points must be positive")]
    InvalidMaxPoints,

    /// The bulk iterator failed, was superseded, or its worker went away.
    #[error("bulk computation failed: {0}")]
    BulkFailed(String),

    /// A bulk computation observed its cancellation token.
    #[error("bulk computation cancelled")]
    Cancelled,

    /// The settings storage backend could not be read or written.
    #[error("settings storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Snapshot width or height was zero or too large.
    #[error("invalid dimensions: width and height must be non-zero and fit in u32")]
    InvalidDimensions,

    /// Filesystem failure (snapshot writing, trajectory export).
    #[error("i/o error: {0}")]
    Io(String),
}
