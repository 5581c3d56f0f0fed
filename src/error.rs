//! Error types for preference storage access.
//!
//! These never cross the controller boundary: the preference layer turns a
//! failed read into "absent" and a failed write into a no-op.

/// Error returned by a [`crate::storage::PreferenceStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The backing store cannot be reached at all (disabled, sandboxed).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Reading a single key failed.
    #[error("failed to read {key}: {message}")]
    Read { key: String, message: String },
    /// Writing a single key failed (quota exceeded, private mode).
    #[error("failed to write {key}: {message}")]
    Write { key: String, message: String },
}
