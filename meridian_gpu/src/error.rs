//! Error types for the Meridian GPU buffer core
//!
//! Every error here is a precondition violation: the operation that produced
//! it stops immediately and nothing is rolled back. Callers treat any `Err`
//! coming out of this crate as fatal.

use std::fmt;

/// Result type for Meridian operations
pub type Result<T> = std::result::Result<T, Error>;

/// Meridian errors
#[derive(Debug, Clone)]
pub enum Error {
    /// An upload asked for more elements than the buffer has left
    CapacityExceeded(String),

    /// An operation was called out of order (bind before build, double preflush, ...)
    InvalidSequence(String),

    /// The graphics context reported an API version no backend handles
    UnsupportedApi(String),

    /// A mutation request is malformed (zero-length region, out of bounds, ...)
    MalformedMutation(String),

    /// Invalid input data or lookup (wrong slice length, unknown attribute, ...)
    InvalidResource(String),

    /// Backend-specific error reported by the graphics context
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CapacityExceeded(msg) => write!(f, "Capacity exceeded: {}", msg),
            Error::InvalidSequence(msg) => write!(f, "Invalid call sequence: {}", msg),
            Error::UnsupportedApi(msg) => write!(f, "Unsupported API: {}", msg),
            Error::MalformedMutation(msg) => write!(f, "Malformed mutation: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR entry and build the matching error value
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("meridian::DataBuffer", CapacityExceeded,
///     "{} elements requested, {} available", count, available);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $kind:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::meridian::Error::$kind(message)
    }};
}

/// Log an ERROR entry and return the matching error from the current function
///
/// # Example
///
/// ```ignore
/// if offset.checked_add(size).map_or(true, |end| end > capacity) {
///     engine_bail!("meridian::DataBuffer", MalformedMutation,
///         "Region of {} bytes at {} outside buffer", size, offset);
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $kind:ident, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $kind, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
