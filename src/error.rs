//! Error types for the rating tracker
//!
//! The library surfaces typed errors so callers can tell a malformed matchup
//! apart from a missing competitor. Configuration loading and the binary wrap
//! these in `anyhow` like the rest of the outer layers.

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RatingError>;

/// Errors raised by the rating algorithm and the competitor registry
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Competitor not found: {id}")]
    NotFound { id: String },

    #[error("Competitor already exists: {id}")]
    AlreadyExists { id: String },

    #[error("Duplicate competitor identity: {id}")]
    DuplicateIdentity { id: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl RatingError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RatingError::NotFound {
            id: "Homer".to_string(),
        };
        assert_eq!(err.to_string(), "Competitor not found: Homer");

        let err = RatingError::invalid_input("need at least 2 ratings");
        assert_eq!(err.to_string(), "Invalid input: need at least 2 ratings");
    }
}
