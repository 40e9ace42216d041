//! Error types for the selectbus library.

use thiserror::Error;

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for selectbus
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// `add` was called on a default-constructed or already-torn-down anchor
    #[error("anchor is empty or already torn down")]
    InvalidAnchor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidAnchor;
        assert_eq!(err.to_string(), "anchor is empty or already torn down");
    }
}
