//! Domain service for the org directory.
//!
//! Resolves tenant-scoped queries against the shared directory. Directory
//! nodes without a projection in the requested tenant are dropped from
//! results; only a missing anchor is reported as `NotFound`.

mod departments;
mod tokens;
mod users;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use org_directory_sdk::{DepartmentRef, Page, PageRequest, TenantDepartmentId};

use super::error::{DomainError, TENANT_DEPARTMENT, TENANT_USER};
use super::model::{DirectoryDepartmentId, TenantDepartment, TenantUser};
use super::ports::TokenValidator;
use super::repos::{DirectoryRepository, TenantProjectionRepository};
use crate::config::OrgDirectoryConfig;

/// A directory department that is projected into the requested tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Projected {
    directory_id: DirectoryDepartmentId,
    id: TenantDepartmentId,
    name: String,
    parent_directory_id: Option<DirectoryDepartmentId>,
}

impl Projected {
    fn to_ref(&self) -> DepartmentRef {
        DepartmentRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Validated page window: zero-based offset plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    offset: usize,
    size: usize,
}

impl Window {
    fn apply<T>(self, items: Vec<T>) -> Page<T> {
        let count = items.len();
        let items = items
            .into_iter()
            .skip(self.offset)
            .take(self.size)
            .collect();
        Page { count, items }
    }
}

/// Org directory domain service.
pub struct Service {
    directory: Arc<dyn DirectoryRepository>,
    tenants: Arc<dyn TenantProjectionRepository>,
    token_validator: Option<Arc<dyn TokenValidator>>,
    config: OrgDirectoryConfig,
}

impl Service {
    #[must_use]
    pub fn new(
        directory: Arc<dyn DirectoryRepository>,
        tenants: Arc<dyn TenantProjectionRepository>,
        config: OrgDirectoryConfig,
    ) -> Self {
        Self {
            directory,
            tenants,
            token_validator: None,
            config,
        }
    }

    /// Attach the login service's token validator.
    #[must_use]
    pub fn with_token_validator(mut self, validator: Arc<dyn TokenValidator>) -> Self {
        self.token_validator = Some(validator);
        self
    }

    fn window(&self, page: PageRequest) -> Result<Window, DomainError> {
        let size = page.page_size.unwrap_or(self.config.default_page_size);
        if page.page < 1 {
            return Err(DomainError::invalid_argument(format!(
                "page must be >= 1, got {}",
                page.page
            )));
        }
        if size < 1 || size > self.config.max_page_size {
            return Err(DomainError::invalid_argument(format!(
                "page_size must be within 1..={}, got {size}",
                self.config.max_page_size
            )));
        }
        Ok(Window {
            offset: (page.page - 1).saturating_mul(size),
            size,
        })
    }

    /// Load the anchor department, scoped to the tenant.
    async fn anchor_department(
        &self,
        tenant_id: &str,
        id: TenantDepartmentId,
    ) -> Result<TenantDepartment, DomainError> {
        self.tenants
            .get_department(tenant_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found(TENANT_DEPARTMENT, id))
    }

    /// Load the anchor user, scoped to the tenant.
    ///
    /// Handles are unique across tenants, so a user of another tenant is
    /// reported exactly like a missing one.
    async fn anchor_user(
        &self,
        tenant_id: &str,
        bk_username: &str,
    ) -> Result<TenantUser, DomainError> {
        self.tenants
            .get_user(bk_username)
            .await?
            .filter(|user| user.tenant_id == tenant_id)
            .ok_or_else(|| DomainError::not_found(TENANT_USER, bk_username))
    }

    /// Project directory departments into the tenant.
    ///
    /// Unprojected or vanished departments are dropped. The result is
    /// deduplicated and ordered by directory id. Costs two store calls
    /// regardless of the number of ids.
    async fn project_departments(
        &self,
        tenant_id: &str,
        directory_ids: &[DirectoryDepartmentId],
    ) -> Result<Vec<Projected>, DomainError> {
        if directory_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<DirectoryDepartmentId> = directory_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let projections: HashMap<DirectoryDepartmentId, TenantDepartmentId> = self
            .tenants
            .find_departments(tenant_id, &ids)
            .await?
            .into_iter()
            .filter(|dept| dept.tenant_id == tenant_id)
            .map(|dept| (dept.data_source_department_id, dept.id))
            .collect();
        if projections.is_empty() {
            return Ok(Vec::new());
        }

        let projected_ids: Vec<DirectoryDepartmentId> = ids
            .iter()
            .copied()
            .filter(|id| projections.contains_key(id))
            .collect();
        let mut out: BTreeMap<DirectoryDepartmentId, Projected> = BTreeMap::new();
        for dept in self.directory.get_departments(&projected_ids).await? {
            if let Some(&id) = projections.get(&dept.id) {
                out.insert(
                    dept.id,
                    Projected {
                        directory_id: dept.id,
                        id,
                        name: dept.name,
                        parent_directory_id: dept.parent_id,
                    },
                );
            }
        }
        Ok(out.into_values().collect())
    }

    /// Resolve root-first ancestor chains for many directory departments at once.
    ///
    /// Departments unknown to the directory have no entry in the result.
    /// Unprojected ancestors are dropped from each chain in place.
    async fn ancestor_chains(
        &self,
        tenant_id: &str,
        directory_ids: &[DirectoryDepartmentId],
    ) -> Result<HashMap<DirectoryDepartmentId, Vec<DepartmentRef>>, DomainError> {
        let chains = self.directory.get_ancestors(directory_ids).await?;

        let all: Vec<DirectoryDepartmentId> = chains.values().flatten().copied().collect();
        let refs: HashMap<DirectoryDepartmentId, DepartmentRef> = self
            .project_departments(tenant_id, &all)
            .await?
            .into_iter()
            .map(|p| (p.directory_id, p.to_ref()))
            .collect();

        Ok(chains
            .into_iter()
            .map(|(id, chain)| {
                let chain = chain.iter().filter_map(|a| refs.get(a).cloned()).collect();
                (id, chain)
            })
            .collect())
    }
}

/// Trim a handle batch and drop blank entries.
///
/// The limit applies to the batch as sent; emptiness is judged after blanks
/// are dropped.
fn check_batch(name: &str, values: &[String], limit: usize) -> Result<Vec<String>, DomainError> {
    if values.len() > limit {
        return Err(DomainError::invalid_argument(format!(
            "{name} accepts at most {limit} values, got {}",
            values.len()
        )));
    }
    let values: Vec<String> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect();
    if values.is_empty() {
        return Err(DomainError::invalid_argument(format!(
            "{name} must not be empty"
        )));
    }
    Ok(values)
}
