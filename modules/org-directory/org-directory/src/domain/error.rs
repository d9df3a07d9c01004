//! Domain error types for the org directory module.

use org_directory_sdk::OrgDirectoryError;
use thiserror::Error;

pub const TENANT_DEPARTMENT: &str = "tenant_department";
pub const TENANT_USER: &str = "tenant_user";

/// Domain-level errors for org directory operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// The anchor entity does not exist or lives in another tenant.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A malformed or out-of-range option.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A store or other collaborator failed or timed out.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

impl From<DomainError> for OrgDirectoryError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { kind, id } => OrgDirectoryError::NotFound { kind, id },
            DomainError::InvalidArgument(msg) => OrgDirectoryError::invalid_argument(msg),
            DomainError::Unavailable(msg) => OrgDirectoryError::unavailable(msg),
            DomainError::Internal(e) => OrgDirectoryError::internal(e.to_string()),
        }
    }
}

impl From<OrgDirectoryError> for DomainError {
    fn from(e: OrgDirectoryError) -> Self {
        match e {
            OrgDirectoryError::NotFound { kind, id } => Self::NotFound { kind, id },
            OrgDirectoryError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            OrgDirectoryError::Unavailable(msg) => Self::Unavailable(msg),
            OrgDirectoryError::Internal(msg) => Self::Internal(anyhow::anyhow!(msg)),
        }
    }
}
