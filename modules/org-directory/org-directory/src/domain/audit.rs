//! Operation audit records and the recorder that emits them.
//!
//! The recorder only builds records; persistence belongs to the
//! [`AuditSink`] implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::error::DomainError;
use super::ports::AuditSink;

/// Records appended to the sink per call when recording a batch.
pub const BULK_APPEND_BATCH_SIZE: usize = 100;

/// Type of the object an audited operation acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditObjectType {
    DataSource,
    Idp,
    User,
    Organization,
    Tenant,
    VirtualUser,
}

/// Audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOperation {
    // data sources
    CreateDataSource,
    ModifyDataSource,
    DeleteDataSource,
    SyncDataSource,
    ImportDataSource,
    // identity providers
    CreateIdp,
    ModifyIdp,
    ModifyIdpStatus,
    // users
    CreateUser,
    ModifyUser,
    DeleteUser,
    ModifyUserOrganizationRelations,
    ModifyUserStatus,
    ModifyUserAccountExpiredAt,
    ModifyUserLeaders,
    ModifyUserPassword,
    ModifyUserEmail,
    ModifyUserPhone,
    // organizations
    CreateOrganization,
    ModifyOrganization,
    DeleteOrganization,
    ModifyParentOrganization,
    // tenants
    CreateTenant,
    ModifyTenant,
    DeleteTenant,
    ModifyTenantStatus,
    CreateTenantRealManager,
    DeleteTenantRealManager,
    ModifyTenantAccountValidityPeriodConfig,
    // virtual users
    CreateVirtualUser,
    ModifyVirtualUser,
    DeleteVirtualUser,
}

/// An immutable audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    /// Shared by all records emitted for one batch operation.
    pub event_id: Uuid,
    pub creator: String,
    pub tenant_id: String,
    pub operation: AuditOperation,
    pub object_type: AuditObjectType,
    pub object_id: String,
    pub extras: Map<String, Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// One object touched by a batch operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuditTarget {
    pub object_id: String,
    pub extras: Map<String, Value>,
}

impl AuditTarget {
    #[must_use]
    pub fn new(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            extras: Map::new(),
        }
    }

    #[must_use]
    pub fn with_extras(mut self, extras: Map<String, Value>) -> Self {
        self.extras = extras;
        self
    }
}

/// A before/after snapshot of a changed object.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditObject {
    pub id: String,
    pub object_type: AuditObjectType,
    pub name: Option<String>,
    pub operation: AuditOperation,
    pub data_before: Map<String, Value>,
    pub data_after: Map<String, Value>,
    pub extras: Map<String, Value>,
}

impl AuditObject {
    fn into_extras(self) -> Map<String, Value> {
        let mut extras = self.extras;
        if let Some(name) = self.name {
            extras.insert("name".to_owned(), Value::String(name));
        }
        extras.insert("data_before".to_owned(), Value::Object(self.data_before));
        extras.insert("data_after".to_owned(), Value::Object(self.data_after));
        extras
    }
}

/// Builds audit records and appends them to a sink.
pub struct AuditRecorder {
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Record a single operation on a single object.
    ///
    /// # Errors
    ///
    /// Propagates sink failures.
    #[instrument(
        skip_all,
        fields(operator = %operator, tenant_id = %tenant_id, operation = ?operation)
    )]
    pub async fn record(
        &self,
        operator: &str,
        tenant_id: &str,
        operation: AuditOperation,
        object_type: AuditObjectType,
        object_id: &str,
        extras: Map<String, Value>,
    ) -> Result<AuditRecord, DomainError> {
        let record = new_record(
            Uuid::now_v7(),
            operator,
            tenant_id,
            operation,
            object_type,
            AuditTarget {
                object_id: object_id.to_owned(),
                extras,
            },
        );
        self.sink.append(vec![record.clone()]).await?;
        Ok(record)
    }

    /// Record one operation applied to many objects.
    ///
    /// All records share one event id and are appended in chunks of
    /// [`BULK_APPEND_BATCH_SIZE`].
    ///
    /// # Errors
    ///
    /// Propagates sink failures. Chunks appended before the failure stay appended.
    #[instrument(
        skip_all,
        fields(operator = %operator, tenant_id = %tenant_id, count = targets.len())
    )]
    pub async fn record_batch(
        &self,
        operator: &str,
        tenant_id: &str,
        operation: AuditOperation,
        object_type: AuditObjectType,
        targets: Vec<AuditTarget>,
    ) -> Result<Vec<AuditRecord>, DomainError> {
        let event_id = Uuid::now_v7();
        let records: Vec<AuditRecord> = targets
            .into_iter()
            .map(|target| new_record(event_id, operator, tenant_id, operation, object_type, target))
            .collect();

        for chunk in records.chunks(BULK_APPEND_BATCH_SIZE) {
            self.sink.append(chunk.to_vec()).await?;
        }
        debug!(event_id = %event_id, "Appended batch audit records");
        Ok(records)
    }

    /// Record a change with its before/after snapshot folded into the extras.
    ///
    /// # Errors
    ///
    /// Propagates sink failures.
    pub async fn record_change(
        &self,
        operator: &str,
        tenant_id: &str,
        object: AuditObject,
    ) -> Result<AuditRecord, DomainError> {
        let operation = object.operation;
        let object_type = object.object_type;
        let object_id = object.id.clone();
        self.record(
            operator,
            tenant_id,
            operation,
            object_type,
            &object_id,
            object.into_extras(),
        )
        .await
    }
}

fn new_record(
    event_id: Uuid,
    operator: &str,
    tenant_id: &str,
    operation: AuditOperation,
    object_type: AuditObjectType,
    target: AuditTarget,
) -> AuditRecord {
    AuditRecord {
        id: Uuid::now_v7(),
        event_id,
        creator: operator.to_owned(),
        tenant_id: tenant_id.to_owned(),
        operation,
        object_type,
        object_id: target.object_id,
        extras: target.extras,
        created_at: OffsetDateTime::now_utc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_serialize_as_snake_case() {
        let json = serde_json::to_value(AuditOperation::ModifyUserOrganizationRelations).unwrap();
        assert_eq!(json, Value::String("modify_user_organization_relations".to_owned()));

        let json = serde_json::to_value(AuditObjectType::VirtualUser).unwrap();
        assert_eq!(json, Value::String("virtual_user".to_owned()));
    }

    #[test]
    fn change_extras_carry_snapshot() {
        let mut before = Map::new();
        before.insert("name".to_owned(), Value::String("Dept A".to_owned()));
        let mut after = Map::new();
        after.insert("name".to_owned(), Value::String("Dept A1".to_owned()));

        let extras = AuditObject {
            id: "2".to_owned(),
            object_type: AuditObjectType::Organization,
            name: Some("Dept A1".to_owned()),
            operation: AuditOperation::ModifyOrganization,
            data_before: before.clone(),
            data_after: after.clone(),
            extras: Map::new(),
        }
        .into_extras();

        assert_eq!(extras["name"], Value::String("Dept A1".to_owned()));
        assert_eq!(extras["data_before"], Value::Object(before));
        assert_eq!(extras["data_after"], Value::Object(after));
    }
}
