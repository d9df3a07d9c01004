//! Public API trait for the organization directory.
//!
//! Request handlers (REST, gRPC, or in-process consumers) hold an
//! `Arc<dyn OrgDirectoryClient>` and translate [`OrgDirectoryError`] into
//! transport-level status codes.

use async_trait::async_trait;

use crate::error::OrgDirectoryError;
use crate::models::{
    BkUsername, ChildrenOptions, DepartmentDetail, DepartmentRef, DepartmentWithParent, Page,
    PageRequest, TenantDepartmentId, TenantInfo, TenantUserInfo, TokenIdentity, TokenUserInfo,
    UserListQuery, UserRef,
};

/// Public API of the organization directory.
///
/// Every operation is a read-only function of `(tenant, anchor, options)`.
/// Directory nodes that have no projection in the tenant are silently
/// filtered out of results; only a missing *anchor* is an error.
///
/// ```ignore
/// let directory: Arc<dyn OrgDirectoryClient> = ...;
///
/// let dept = directory.get_department("default", dept_id, true).await?;
/// let grandchildren = directory
///     .list_department_children(
///         "default",
///         dept_id,
///         ChildrenOptions::with_level(2),
///         PageRequest::default(),
///     )
///     .await?;
/// let leaders = directory.list_user_leaders("default", "lisi").await?;
/// ```
#[async_trait]
pub trait OrgDirectoryClient: Send + Sync {
    /// List all tenants.
    async fn list_tenants(&self) -> Result<Vec<TenantInfo>, OrgDirectoryError>;

    /// Get a tenant department, optionally with its root-first ancestor chain.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the department does not exist in the tenant
    async fn get_department(
        &self,
        tenant_id: &str,
        id: TenantDepartmentId,
        with_ancestors: bool,
    ) -> Result<DepartmentDetail, OrgDirectoryError>;

    /// List tenant departments, optionally only the direct children of `parent_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `parent_id` is given but does not exist in the tenant
    /// - `InvalidArgument` for a malformed page request
    async fn list_departments(
        &self,
        tenant_id: &str,
        parent_id: Option<TenantDepartmentId>,
        page: PageRequest,
    ) -> Result<Page<DepartmentWithParent>, OrgDirectoryError>;

    /// List the departments exactly `options.level` hops below `parent_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the parent does not exist in the tenant
    /// - `InvalidArgument` if `level < 1` or the page request is malformed
    async fn list_department_children(
        &self,
        tenant_id: &str,
        parent_id: TenantDepartmentId,
        options: ChildrenOptions,
        page: PageRequest,
    ) -> Result<Page<DepartmentRef>, OrgDirectoryError>;

    /// Get a tenant user.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user does not exist in the tenant
    async fn get_user(
        &self,
        tenant_id: &str,
        bk_username: &str,
    ) -> Result<TenantUserInfo, OrgDirectoryError>;

    /// List the departments a user directly belongs to.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user does not exist in the tenant
    async fn list_user_departments(
        &self,
        tenant_id: &str,
        bk_username: &str,
        with_ancestors: bool,
    ) -> Result<Vec<DepartmentDetail>, OrgDirectoryError>;

    /// List a user's leaders.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user does not exist in the tenant
    async fn list_user_leaders(
        &self,
        tenant_id: &str,
        bk_username: &str,
    ) -> Result<Vec<UserRef>, OrgDirectoryError>;

    /// Filtered or fuzzy user listing.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for inconsistent, empty, or over-long lookup values
    async fn list_users(
        &self,
        tenant_id: &str,
        query: &UserListQuery,
    ) -> Result<Page<TenantUserInfo>, OrgDirectoryError>;

    /// Batch display-name lookup. Unknown or cross-tenant handles are dropped.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `bk_usernames` is empty or exceeds the batch limit
    async fn list_user_display_names(
        &self,
        tenant_id: &str,
        bk_usernames: &[BkUsername],
    ) -> Result<Vec<UserRef>, OrgDirectoryError>;

    /// Batch user lookup. Unknown or cross-tenant handles are dropped.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `bk_usernames` is empty or exceeds the batch limit
    async fn list_users_by_usernames(
        &self,
        tenant_id: &str,
        bk_usernames: &[BkUsername],
    ) -> Result<Vec<TenantUserInfo>, OrgDirectoryError>;

    /// Verify a login token and return the identity behind it.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the token is rejected
    /// - `NotFound` if the token's user no longer exists
    /// - `Unavailable` if no token validator is configured
    async fn verify_token(&self, bk_token: &str) -> Result<TokenIdentity, OrgDirectoryError>;

    /// Verify a login token and return the basic profile behind it.
    ///
    /// # Errors
    ///
    /// Same as [`OrgDirectoryClient::verify_token`].
    async fn token_user_info(&self, bk_token: &str) -> Result<TokenUserInfo, OrgDirectoryError>;
}
