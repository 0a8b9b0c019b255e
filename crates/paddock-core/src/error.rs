//! Error types for the Paddock application.

use thiserror::Error;

use crate::ballot::Category;

/// A shared error type for the entire Paddock application.
///
/// The first group of variants is the domain taxonomy surfaced to operators
/// and voters. The second group covers storage and plumbing failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaddockError {
    /// Illegal state transition or malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operating on a resource owned by another user
    #[error("Permission denied: {0}")]
    Permission(String),

    /// The user has no vote left in this category
    #[error("User '{user_id}' cannot vote again in {category}")]
    AlreadyVoted { user_id: String, category: Category },

    /// The one-time cancellation is used up or there is nothing to cancel
    #[error("User '{user_id}' cannot cancel a vote in {category}: {reason}")]
    CancelNotAllowed {
        user_id: String,
        category: Category,
        reason: String,
    },

    /// A car owner tried to vote for their own car
    #[error("User '{user_id}' cannot vote for their own car '{car_id}'")]
    SelfVote { user_id: String, car_id: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Uniqueness constraint violated by an insert
    #[error("Conflict: {0}")]
    Conflict(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaddockError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Permission error
    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_permission(&self) -> bool {
        matches!(self, Self::Permission(_))
    }

    pub fn is_already_voted(&self) -> bool {
        matches!(self, Self::AlreadyVoted { .. })
    }

    pub fn is_cancel_not_allowed(&self) -> bool {
        matches!(self, Self::CancelNotAllowed { .. })
    }

    pub fn is_self_vote(&self) -> bool {
        matches!(self, Self::SelfVote { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a uniqueness violation reported by a store.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// True for the errors a voter or operator caused, as opposed to storage
    /// or plumbing failures. Domain errors never leave partial writes behind.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Permission(_)
                | Self::AlreadyVoted { .. }
                | Self::CancelNotAllowed { .. }
                | Self::SelfVote { .. }
                | Self::NotFound { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PaddockError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PaddockError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PaddockError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PaddockError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, PaddockError>`.
pub type Result<T> = std::result::Result<T, PaddockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_classified() {
        assert!(PaddockError::validation("busy").is_domain());
        assert!(
            PaddockError::SelfVote {
                user_id: "u".into(),
                car_id: "c".into()
            }
            .is_domain()
        );
        assert!(!PaddockError::conflict("dup").is_domain());
        assert!(!PaddockError::io("disk").is_domain());
    }

    #[test]
    fn test_already_voted_message_names_category() {
        let err = PaddockError::AlreadyVoted {
            user_id: "u-1".into(),
            category: Category::TimeAttack,
        };
        assert_eq!(err.to_string(), "User 'u-1' cannot vote again in time_attack");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PaddockError = io.into();
        assert!(matches!(err, PaddockError::Io { .. }));
    }
}
