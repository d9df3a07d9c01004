//! Storage ports consumed by the resolver.
//!
//! Every method is a batch read. Ids that do not exist (or were removed
//! concurrently) are simply absent from the result; only store failures are
//! errors, and those are reported as `DomainError::Unavailable`.

use std::collections::HashMap;

use async_trait::async_trait;
use org_directory_sdk::{BkUsername, TenantDepartmentId, TenantInfo};

use super::error::DomainError;
use super::model::{
    DirectoryDepartment, DirectoryDepartmentId, DirectoryUser, DirectoryUserId, TenantDepartment,
    TenantUser,
};

/// Read access to the shared directory (departments, users, and their relations).
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Fetch departments by id.
    async fn get_departments(
        &self,
        ids: &[DirectoryDepartmentId],
    ) -> Result<Vec<DirectoryDepartment>, DomainError>;

    /// Fetch the ids of all departments whose parent is one of `parent_ids`.
    async fn list_child_departments(
        &self,
        parent_ids: &[DirectoryDepartmentId],
    ) -> Result<Vec<DirectoryDepartmentId>, DomainError>;

    /// Fetch the root-first ancestor chain of each department.
    ///
    /// Departments that do not exist have no entry in the returned map;
    /// roots map to an empty chain.
    async fn get_ancestors(
        &self,
        ids: &[DirectoryDepartmentId],
    ) -> Result<HashMap<DirectoryDepartmentId, Vec<DirectoryDepartmentId>>, DomainError>;

    /// Fetch users by id.
    async fn get_users(&self, ids: &[DirectoryUserId]) -> Result<Vec<DirectoryUser>, DomainError>;

    /// Departments the user directly belongs to, in membership order.
    async fn list_user_departments(
        &self,
        user_id: DirectoryUserId,
    ) -> Result<Vec<DirectoryDepartmentId>, DomainError>;

    /// Leaders of the user, in link order.
    async fn list_user_leaders(
        &self,
        user_id: DirectoryUserId,
    ) -> Result<Vec<DirectoryUserId>, DomainError>;
}

/// Read access to per-tenant projections of directory entities.
#[async_trait]
pub trait TenantProjectionRepository: Send + Sync {
    async fn list_tenants(&self) -> Result<Vec<TenantInfo>, DomainError>;

    /// Find a tenant department by its tenant-visible id.
    async fn get_department(
        &self,
        tenant_id: &str,
        id: TenantDepartmentId,
    ) -> Result<Option<TenantDepartment>, DomainError>;

    async fn list_departments(&self, tenant_id: &str) -> Result<Vec<TenantDepartment>, DomainError>;

    /// Find the tenant projections of the given directory departments.
    async fn find_departments(
        &self,
        tenant_id: &str,
        directory_ids: &[DirectoryDepartmentId],
    ) -> Result<Vec<TenantDepartment>, DomainError>;

    /// Find a tenant user by handle in any tenant.
    async fn get_user(&self, bk_username: &str) -> Result<Option<TenantUser>, DomainError>;

    /// Find tenant users by handle in any tenant.
    async fn get_users(&self, bk_usernames: &[BkUsername]) -> Result<Vec<TenantUser>, DomainError>;

    async fn list_users(&self, tenant_id: &str) -> Result<Vec<TenantUser>, DomainError>;

    /// Find the tenant projections of the given directory users.
    async fn find_users(
        &self,
        tenant_id: &str,
        directory_ids: &[DirectoryUserId],
    ) -> Result<Vec<TenantUser>, DomainError>;
}
