use async_trait::async_trait;
use org_directory_sdk::BkUsername;

use super::audit::AuditRecord;
use super::error::DomainError;

/// Output port to the login service's token store.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Resolve a login token to the `bk_username` it was issued for.
    ///
    /// Rejected tokens are reported as `DomainError::InvalidArgument` with the
    /// validator's reason.
    async fn validate(&self, bk_token: &str) -> Result<BkUsername, DomainError>;
}

/// Output port for persisting audit records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append records. Records are immutable once appended.
    async fn append(&self, records: Vec<AuditRecord>) -> Result<(), DomainError>;
}
