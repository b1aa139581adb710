//! Domain errors

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Member not found: {0}")]
    MemberNotFound(Uuid),

    #[error("Photo not found: {0}")]
    PhotoNotFound(Uuid),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Upload error: {0}")]
    UploadError(String),

    #[error("Deletion error: {0}")]
    DeletionError(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Concurrent update conflict on member {0}")]
    Conflict(Uuid),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Transient failures where repeating the same request can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::UploadError(_)
                | DomainError::DeletionError(_)
                | DomainError::DatabaseError(_)
                | DomainError::Conflict(_)
        )
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(DomainError::UploadError("timeout".into()).is_retryable());
        assert!(DomainError::Conflict(Uuid::new_v4()).is_retryable());
        assert!(!DomainError::InvalidOperation("main".into()).is_retryable());
        assert!(!DomainError::MemberNotFound(Uuid::new_v4()).is_retryable());
    }
}
