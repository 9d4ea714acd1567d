//! Error types for scene construction.

use thiserror::Error;

/// Errors raised while assembling or updating a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A link names a parent index that does not precede it.
    #[error("link '{link}' has invalid parent index {parent} (only {available} links precede it)")]
    InvalidParent {
        /// Link name.
        link: String,
        /// Requested parent index.
        parent: usize,
        /// Number of links already in the articulation.
        available: usize,
    },

    /// A non-root link was added without a parent.
    #[error("link '{0}' has no parent; only the root link may be parentless")]
    MissingParent(String),

    /// Joint configuration has the wrong length.
    #[error("articulation '{articulation}' expects {expected} joint values, got {actual}")]
    QposSizeMismatch {
        /// Articulation name.
        articulation: String,
        /// Degrees of freedom.
        expected: usize,
        /// Provided values.
        actual: usize,
    },
}

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
