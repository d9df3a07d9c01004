//! Local (in-process) client for the org directory module.

use std::sync::Arc;

use async_trait::async_trait;
use org_directory_sdk::{
    BkUsername, ChildrenOptions, DepartmentDetail, DepartmentRef, DepartmentWithParent,
    OrgDirectoryClient, OrgDirectoryError, Page, PageRequest, TenantDepartmentId, TenantInfo,
    TenantUserInfo, TokenIdentity, TokenUserInfo, UserListQuery, UserRef,
};

use super::{DomainError, Service};

/// Local client wrapping the org directory service.
pub struct OrgDirectoryLocalClient {
    svc: Arc<Service>,
}

impl OrgDirectoryLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> OrgDirectoryError {
    tracing::error!(operation = op, error = ?e, "org-directory call failed");
    e.into()
}

#[async_trait]
impl OrgDirectoryClient for OrgDirectoryLocalClient {
    async fn list_tenants(&self) -> Result<Vec<TenantInfo>, OrgDirectoryError> {
        self.svc
            .list_tenants()
            .await
            .map_err(|e| log_and_convert("list_tenants", e))
    }

    async fn get_department(
        &self,
        tenant_id: &str,
        id: TenantDepartmentId,
        with_ancestors: bool,
    ) -> Result<DepartmentDetail, OrgDirectoryError> {
        self.svc
            .get_department(tenant_id, id, with_ancestors)
            .await
            .map_err(|e| log_and_convert("get_department", e))
    }

    async fn list_departments(
        &self,
        tenant_id: &str,
        parent_id: Option<TenantDepartmentId>,
        page: PageRequest,
    ) -> Result<Page<DepartmentWithParent>, OrgDirectoryError> {
        self.svc
            .list_departments(tenant_id, parent_id, page)
            .await
            .map_err(|e| log_and_convert("list_departments", e))
    }

    async fn list_department_children(
        &self,
        tenant_id: &str,
        parent_id: TenantDepartmentId,
        options: ChildrenOptions,
        page: PageRequest,
    ) -> Result<Page<DepartmentRef>, OrgDirectoryError> {
        self.svc
            .list_department_children(tenant_id, parent_id, options, page)
            .await
            .map_err(|e| log_and_convert("list_department_children", e))
    }

    async fn get_user(
        &self,
        tenant_id: &str,
        bk_username: &str,
    ) -> Result<TenantUserInfo, OrgDirectoryError> {
        self.svc
            .get_user(tenant_id, bk_username)
            .await
            .map_err(|e| log_and_convert("get_user", e))
    }

    async fn list_user_departments(
        &self,
        tenant_id: &str,
        bk_username: &str,
        with_ancestors: bool,
    ) -> Result<Vec<DepartmentDetail>, OrgDirectoryError> {
        self.svc
            .list_user_departments(tenant_id, bk_username, with_ancestors)
            .await
            .map_err(|e| log_and_convert("list_user_departments", e))
    }

    async fn list_user_leaders(
        &self,
        tenant_id: &str,
        bk_username: &str,
    ) -> Result<Vec<UserRef>, OrgDirectoryError> {
        self.svc
            .list_user_leaders(tenant_id, bk_username)
            .await
            .map_err(|e| log_and_convert("list_user_leaders", e))
    }

    async fn list_users(
        &self,
        tenant_id: &str,
        query: &UserListQuery,
    ) -> Result<Page<TenantUserInfo>, OrgDirectoryError> {
        self.svc
            .list_users(tenant_id, query)
            .await
            .map_err(|e| log_and_convert("list_users", e))
    }

    async fn list_user_display_names(
        &self,
        tenant_id: &str,
        bk_usernames: &[BkUsername],
    ) -> Result<Vec<UserRef>, OrgDirectoryError> {
        self.svc
            .list_user_display_names(tenant_id, bk_usernames)
            .await
            .map_err(|e| log_and_convert("list_user_display_names", e))
    }

    async fn list_users_by_usernames(
        &self,
        tenant_id: &str,
        bk_usernames: &[BkUsername],
    ) -> Result<Vec<TenantUserInfo>, OrgDirectoryError> {
        self.svc
            .list_users_by_usernames(tenant_id, bk_usernames)
            .await
            .map_err(|e| log_and_convert("list_users_by_usernames", e))
    }

    async fn verify_token(&self, bk_token: &str) -> Result<TokenIdentity, OrgDirectoryError> {
        self.svc
            .verify_token(bk_token)
            .await
            .map_err(|e| log_and_convert("verify_token", e))
    }

    async fn token_user_info(&self, bk_token: &str) -> Result<TokenUserInfo, OrgDirectoryError> {
        self.svc
            .token_user_info(bk_token)
            .await
            .map_err(|e| log_and_convert("token_user_info", e))
    }
}
