use std::collections::HashMap;

use org_directory_sdk::{
    ChildrenOptions, DepartmentDetail, DepartmentRef, DepartmentWithParent, Page, PageRequest,
    TenantDepartmentId,
};
use tracing::{debug, instrument};

use super::{Projected, Service};
use crate::domain::error::{DomainError, TENANT_DEPARTMENT};
use crate::domain::model::DirectoryDepartmentId;

impl Service {
    /// Get a tenant department, optionally with its ancestor chain.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the department is not projected in the tenant or has
    ///   vanished from the directory
    /// - `Unavailable` on store failure
    #[instrument(
        skip_all,
        fields(tenant_id = %tenant_id, department_id = id, with_ancestors = with_ancestors)
    )]
    pub async fn get_department(
        &self,
        tenant_id: &str,
        id: TenantDepartmentId,
        with_ancestors: bool,
    ) -> Result<DepartmentDetail, DomainError> {
        let anchor = self.anchor_department(tenant_id, id).await?;
        let directory_id = anchor.data_source_department_id;

        let dept = self
            .directory
            .get_departments(&[directory_id])
            .await?
            .into_iter()
            .find(|d| d.id == directory_id)
            .ok_or_else(|| DomainError::not_found(TENANT_DEPARTMENT, id))?;

        let ancestors = if with_ancestors {
            let mut chains = self.ancestor_chains(tenant_id, &[directory_id]).await?;
            Some(
                chains
                    .remove(&directory_id)
                    .ok_or_else(|| DomainError::not_found(TENANT_DEPARTMENT, id))?,
            )
        } else {
            None
        };

        Ok(DepartmentDetail {
            id: anchor.id,
            name: dept.name,
            ancestors,
        })
    }

    /// List tenant departments, or only the direct children of `parent_id`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for a malformed page request
    /// - `NotFound` if `parent_id` is not projected in the tenant
    /// - `Unavailable` on store failure
    #[instrument(skip_all, fields(tenant_id = %tenant_id, parent_id = ?parent_id))]
    pub async fn list_departments(
        &self,
        tenant_id: &str,
        parent_id: Option<TenantDepartmentId>,
        page: PageRequest,
    ) -> Result<Page<DepartmentWithParent>, DomainError> {
        let window = self.window(page)?;

        let items: Vec<DepartmentWithParent> = if let Some(parent_id) = parent_id {
            let anchor = self.anchor_department(tenant_id, parent_id).await?;
            let children = self
                .directory
                .list_child_departments(&[anchor.data_source_department_id])
                .await?;
            self.project_departments(tenant_id, &children)
                .await?
                .into_iter()
                .map(|p| DepartmentWithParent {
                    id: p.id,
                    name: p.name,
                    parent_id: Some(parent_id),
                })
                .collect()
        } else {
            let all: Vec<DirectoryDepartmentId> = self
                .tenants
                .list_departments(tenant_id)
                .await?
                .into_iter()
                .map(|d| d.data_source_department_id)
                .collect();
            let projected = self.project_departments(tenant_id, &all).await?;
            let by_directory_id: HashMap<DirectoryDepartmentId, TenantDepartmentId> = projected
                .iter()
                .map(|p| (p.directory_id, p.id))
                .collect();
            projected
                .into_iter()
                .map(|p| DepartmentWithParent {
                    parent_id: p
                        .parent_directory_id
                        .and_then(|parent| by_directory_id.get(&parent).copied()),
                    id: p.id,
                    name: p.name,
                })
                .collect()
        };

        debug!(count = items.len(), "Listed departments");
        Ok(window.apply(items))
    }

    /// List the departments exactly `options.level` hops below `parent_id`.
    ///
    /// Walks the directory one level per store call, so the number of calls
    /// grows with `level` but never with fan-out.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `level < 1` or the page request is malformed
    /// - `NotFound` if the parent is not projected in the tenant
    /// - `Unavailable` on store failure
    #[instrument(
        skip_all,
        fields(tenant_id = %tenant_id, parent_id = parent_id, level = options.level)
    )]
    pub async fn list_department_children(
        &self,
        tenant_id: &str,
        parent_id: TenantDepartmentId,
        options: ChildrenOptions,
        page: PageRequest,
    ) -> Result<Page<DepartmentRef>, DomainError> {
        let level = usize::try_from(options.level)
            .ok()
            .filter(|level| *level >= 1)
            .ok_or_else(|| {
                DomainError::invalid_argument(format!("level must be >= 1, got {}", options.level))
            })?;
        let window = self.window(page)?;

        let anchor = self.anchor_department(tenant_id, parent_id).await?;

        let mut frontier = vec![anchor.data_source_department_id];
        for depth in 0..level {
            if frontier.is_empty() {
                debug!(depth, "Hierarchy exhausted before requested level");
                break;
            }
            frontier = self.directory.list_child_departments(&frontier).await?;
        }

        let items: Vec<DepartmentRef> = self
            .project_departments(tenant_id, &frontier)
            .await?
            .iter()
            .map(Projected::to_ref)
            .collect();
        Ok(window.apply(items))
    }
}
