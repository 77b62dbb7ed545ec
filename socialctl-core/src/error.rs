/// Structured error types for socialctl-core.
///
/// Uses `thiserror` so the service and repositories hand back typed failures.
/// The binary crate (socialctl-cli) wraps these in `anyhow` for reporting,
/// but library consumers can branch on [`SocialError::kind`].
use std::error::Error as StdError;

use thiserror::Error;

use crate::models::ValidationError;

/// Coarse error classification for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidArgument,
    Storage,
    Config,
}

/// Main error type for social graph operations
#[derive(Error, Debug)]
pub enum SocialError {
    /// Referenced person (by id or name) does not exist
    #[error("{resource} '{key}' not found")]
    NotFound { resource: &'static str, key: String },

    /// Uniqueness rule violated (e.g. duplicate name)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request rejected before reaching the store
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Input failed newtype validation
    #[error("Invalid argument: {0}")]
    Validation(#[from] ValidationError),

    /// Backing store failed
    #[error("Storage error while {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for social graph operations
pub type Result<T> = std::result::Result<T, SocialError>;

impl SocialError {
    /// Create a not-found error for a person looked up by id
    pub fn person_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "person",
            key: id.into(),
        }
    }

    /// Create a not-found error for a person looked up by name
    pub fn name_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "person named",
            key: name.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict(reason.into())
    }

    /// Create an invalid argument error
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    /// Wrap a store failure with what was being attempted
    pub fn storage(
        context: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::Storage {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::InvalidArgument(_) | Self::Validation(_) => ErrorKind::InvalidArgument,
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SocialError::person_not_found("abc-123");
        assert_eq!(err.to_string(), "person 'abc-123' not found");

        let err = SocialError::name_not_found("Alice");
        assert_eq!(err.to_string(), "person named 'Alice' not found");

        let err = SocialError::storage("listing people", "connection reset");
        assert!(err.to_string().contains("listing people"));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_validation_maps_to_invalid_argument() {
        let err: SocialError = ValidationError::Empty { field: "name" }.into();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "Invalid argument: name cannot be empty");
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(SocialError::conflict("dup").kind(), ErrorKind::Conflict);
        assert_eq!(SocialError::invalid("self").kind(), ErrorKind::InvalidArgument);
        assert_eq!(SocialError::config("bad toml").kind(), ErrorKind::Config);
        assert_eq!(
            SocialError::person_not_found("x").kind(),
            ErrorKind::NotFound
        );
    }
}
