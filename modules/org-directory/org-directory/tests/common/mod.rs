#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities for org-directory integration tests

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use org_directory::config::OrgDirectoryConfig;
use org_directory::domain::error::DomainError;
use org_directory::domain::local_client::OrgDirectoryLocalClient;
use org_directory::domain::model::{
    DirectoryDepartment, DirectoryDepartmentId, DirectoryUser, DirectoryUserId,
};
use org_directory::domain::ports::TokenValidator;
use org_directory::domain::repos::DirectoryRepository;
use org_directory::domain::service::Service;
use org_directory::infra::storage::{DirectorySnapshot, InMemoryDirectory};
use org_directory_sdk::{BkUsername, OrgDirectoryClient};

pub const FIXTURE: &str = include_str!("../fixtures/org.yaml");

pub const DEFAULT: &str = "default";
pub const PARTIAL: &str = "partial";
pub const OTHER: &str = "other";

// Tenant department ids in the default tenant.
pub const COMPANY: i64 = 101;
pub const DEPT_A: i64 = 102;
pub const DEPT_B: i64 = 103;
pub const CENTER_AA: i64 = 104;
pub const CENTER_AB: i64 = 105;
pub const CENTER_BA: i64 = 106;
pub const GROUP_AAA: i64 = 107;
pub const GROUP_ABA: i64 = 108;
pub const GROUP_BAA: i64 = 109;

pub fn snapshot() -> DirectorySnapshot {
    DirectorySnapshot::from_yaml(FIXTURE).unwrap()
}

pub fn create_store() -> Arc<InMemoryDirectory> {
    Arc::new(InMemoryDirectory::from_snapshot(snapshot()).unwrap())
}

pub fn create_service() -> Arc<Service> {
    let store = create_store();
    Arc::new(Service::new(
        store.clone(),
        store,
        OrgDirectoryConfig::default(),
    ))
}

pub fn create_service_with_config(config: OrgDirectoryConfig) -> Arc<Service> {
    let store = create_store();
    Arc::new(Service::new(store.clone(), store, config))
}

/// Service whose directory reads go through `directory` while tenant
/// projections come from the fixture store.
pub fn create_service_with_directory(directory: Arc<dyn DirectoryRepository>) -> Arc<Service> {
    Arc::new(Service::new(
        directory,
        create_store(),
        OrgDirectoryConfig::default(),
    ))
}

pub fn create_client(service: Arc<Service>) -> Arc<dyn OrgDirectoryClient> {
    Arc::new(OrgDirectoryLocalClient::new(service))
}

pub fn names(items: &[org_directory_sdk::DepartmentRef]) -> Vec<&str> {
    items.iter().map(|d| d.name.as_str()).collect()
}

/// Token validator backed by a fixed token table.
pub struct StaticTokenValidator {
    tokens: HashMap<String, BkUsername>,
}

impl StaticTokenValidator {
    pub fn new(tokens: &[(&str, &str)]) -> Self {
        Self {
            tokens: tokens
                .iter()
                .map(|(t, u)| ((*t).to_owned(), (*u).to_owned()))
                .collect(),
        }
    }
}

#[async_trait]
impl TokenValidator for StaticTokenValidator {
    async fn validate(&self, bk_token: &str) -> Result<BkUsername, DomainError> {
        self.tokens
            .get(bk_token)
            .cloned()
            .ok_or_else(|| DomainError::invalid_argument("bk_token is invalid"))
    }
}

/// Directory wrapper that counts store calls.
pub struct CountingDirectory {
    inner: Arc<InMemoryDirectory>,
    calls: AtomicUsize,
}

impl CountingDirectory {
    pub fn new(inner: Arc<InMemoryDirectory>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DirectoryRepository for CountingDirectory {
    async fn get_departments(
        &self,
        ids: &[DirectoryDepartmentId],
    ) -> Result<Vec<DirectoryDepartment>, DomainError> {
        self.hit();
        self.inner.get_departments(ids).await
    }

    async fn list_child_departments(
        &self,
        parent_ids: &[DirectoryDepartmentId],
    ) -> Result<Vec<DirectoryDepartmentId>, DomainError> {
        self.hit();
        self.inner.list_child_departments(parent_ids).await
    }

    async fn get_ancestors(
        &self,
        ids: &[DirectoryDepartmentId],
    ) -> Result<HashMap<DirectoryDepartmentId, Vec<DirectoryDepartmentId>>, DomainError> {
        self.hit();
        self.inner.get_ancestors(ids).await
    }

    async fn get_users(&self, ids: &[DirectoryUserId]) -> Result<Vec<DirectoryUser>, DomainError> {
        self.hit();
        self.inner.get_users(ids).await
    }

    async fn list_user_departments(
        &self,
        user_id: DirectoryUserId,
    ) -> Result<Vec<DirectoryDepartmentId>, DomainError> {
        self.hit();
        self.inner.list_user_departments(user_id).await
    }

    async fn list_user_leaders(
        &self,
        user_id: DirectoryUserId,
    ) -> Result<Vec<DirectoryUserId>, DomainError> {
        self.hit();
        self.inner.list_user_leaders(user_id).await
    }
}

/// Directory whose every read fails the way a timed-out store would.
pub struct FailingDirectory;

fn down<T>() -> Result<T, DomainError> {
    Err(DomainError::unavailable("directory store timed out"))
}

#[async_trait]
impl DirectoryRepository for FailingDirectory {
    async fn get_departments(
        &self,
        _ids: &[DirectoryDepartmentId],
    ) -> Result<Vec<DirectoryDepartment>, DomainError> {
        down()
    }

    async fn list_child_departments(
        &self,
        _parent_ids: &[DirectoryDepartmentId],
    ) -> Result<Vec<DirectoryDepartmentId>, DomainError> {
        down()
    }

    async fn get_ancestors(
        &self,
        _ids: &[DirectoryDepartmentId],
    ) -> Result<HashMap<DirectoryDepartmentId, Vec<DirectoryDepartmentId>>, DomainError> {
        down()
    }

    async fn get_users(&self, _ids: &[DirectoryUserId]) -> Result<Vec<DirectoryUser>, DomainError> {
        down()
    }

    async fn list_user_departments(
        &self,
        _user_id: DirectoryUserId,
    ) -> Result<Vec<DirectoryDepartmentId>, DomainError> {
        down()
    }

    async fn list_user_leaders(
        &self,
        _user_id: DirectoryUserId,
    ) -> Result<Vec<DirectoryUserId>, DomainError> {
        down()
    }
}
