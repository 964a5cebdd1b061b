//! Error types for the IMR binding helper
//!
//! Construction, set allocation and view creation failures are reported
//! through [`Error`]. Protocol violations (setting after commit, targeting a
//! slot the reflected layout does not declare) are programming errors and
//! panic instead.

use std::fmt;

/// Result type for binding helper operations
pub type Result<T> = std::result::Result<T, Error>;

/// Binding helper errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (Vulkan, mock device, etc.)
    BackendError(String),

    /// Invalid resource or layout description
    InvalidResource(String),

    /// The descriptor pool backing a helper could not be created
    PoolCreationFailed(String),

    /// A descriptor set could not be allocated from the helper's pool
    SetAllocationFailed(String),

    /// An auxiliary image view could not be created
    ViewCreationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::PoolCreationFailed(msg) => write!(f, "Descriptor pool creation failed: {}", msg),
            Error::SetAllocationFailed(msg) => write!(f, "Descriptor set allocation failed: {}", msg),
            Error::ViewCreationFailed(msg) => write!(f, "Image view creation failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
