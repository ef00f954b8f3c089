//! # Store Error Types Module
//!
//! This module defines the error kinds reported by the remote store adapter.
//! Handlers use the kind to pick a user-facing failure message and to decide
//! whether a lost session is worth reconnecting.

/// Error kinds for remote store operations
#[derive(Debug, Clone)]
pub enum StoreError {
    /// Connection could not be established or was lost
    Connect(String),
    /// Login was rejected by the remote store
    Auth(String),
    /// The remote entry does not exist
    NotFound(String),
    /// The remote store rejected the operation
    Rejected(String),
    /// The operation exceeded its deadline
    Timeout(String),
    /// Local or transport I/O failure
    Io(String),
}

impl StoreError {
    /// Whether a fresh connection may succeed where this error occurred.
    ///
    /// Auth and rejection errors are permanent until the operator fixes the
    /// credentials or the request; everything else is connection trouble.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Connect(_) | StoreError::Timeout(_) | StoreError::Io(_)
        )
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Connect(msg) => write!(f, "Connection error: {msg}"),
            StoreError::Auth(msg) => write!(f, "Authentication error: {msg}"),
            StoreError::NotFound(msg) => write!(f, "Not found: {msg}"),
            StoreError::Rejected(msg) => write!(f, "Rejected by remote: {msg}"),
            StoreError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
            StoreError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
