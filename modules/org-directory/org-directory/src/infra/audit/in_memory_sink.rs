//! In-memory audit sink.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::audit::AuditRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::AuditSink;

/// Keeps appended audit records in memory, in append order.
#[derive(Default)]
pub struct InMemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
    appends: Mutex<usize>,
}

impl InMemoryAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every record appended so far.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    /// Number of `append` calls received.
    #[must_use]
    pub fn append_calls(&self) -> usize {
        *self.appends.lock()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn append(&self, records: Vec<AuditRecord>) -> Result<(), DomainError> {
        *self.appends.lock() += 1;
        self.records.lock().extend(records);
        Ok(())
    }
}
