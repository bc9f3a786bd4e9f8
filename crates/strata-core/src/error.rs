//! Error types shared across strata crates.

use thiserror::Error;

/// Convenience alias for results produced by core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by core primitives.
#[derive(Debug, Error)]
pub enum Error {
    /// An identifier could not be parsed.
    #[error("invalid id: {message}")]
    InvalidId {
        /// Details of the parse failure.
        message: String,
    },

    /// An input value failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Builds an [`Error::InvalidId`] with the given message.
    #[must_use]
    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId {
            message: message.into(),
        }
    }

    /// Builds an [`Error::InvalidInput`] with the given message.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_id_display() {
        let err = Error::invalid_id("not a ulid: xyz");
        assert_eq!(err.to_string(), "invalid id: not a ulid: xyz");
    }

    #[test]
    fn test_invalid_input_display() {
        let err = Error::invalid_input("log format must be json or pretty");
        assert_eq!(
            err.to_string(),
            "invalid input: log format must be json or pretty"
        );
    }
}
