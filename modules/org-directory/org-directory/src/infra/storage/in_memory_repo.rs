//! In-memory directory store.
//!
//! Holds the directory and its tenant projections in flat id-keyed tables
//! behind a single `RwLock`. Implements both storage ports.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use org_directory_sdk::{BkUsername, TenantDepartmentId, TenantId, TenantInfo};
use parking_lot::RwLock;

use super::snapshot::DirectorySnapshot;
use crate::domain::error::DomainError;
use crate::domain::model::{
    DirectoryDepartment, DirectoryDepartmentId, DirectoryUser, DirectoryUserId, TenantDepartment,
    TenantUser,
};
use crate::domain::repos::{DirectoryRepository, TenantProjectionRepository};

#[derive(Default)]
struct State {
    tenants: BTreeMap<TenantId, TenantInfo>,
    departments: BTreeMap<DirectoryDepartmentId, DirectoryDepartment>,
    users: BTreeMap<DirectoryUserId, DirectoryUser>,
    /// Per user, in link order.
    memberships: HashMap<DirectoryUserId, Vec<DirectoryDepartmentId>>,
    /// Per user, in link order.
    leaders: HashMap<DirectoryUserId, Vec<DirectoryUserId>>,
    tenant_departments: BTreeMap<TenantDepartmentId, TenantDepartment>,
    tenant_users: BTreeMap<BkUsername, TenantUser>,
}

impl State {
    /// Root-first ancestors of `id`, stopping at a vanished parent.
    fn ancestors(&self, id: DirectoryDepartmentId) -> Vec<DirectoryDepartmentId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut cursor = self.departments.get(&id).and_then(|d| d.parent_id);
        while let Some(parent) = cursor {
            if !seen.insert(parent) {
                break;
            }
            let Some(dept) = self.departments.get(&parent) else {
                break;
            };
            chain.push(parent);
            cursor = dept.parent_id;
        }
        chain.reverse();
        chain
    }
}

/// In-memory implementation of [`DirectoryRepository`] and [`TenantProjectionRepository`].
pub struct InMemoryDirectory {
    state: RwLock<State>,
}

impl InMemoryDirectory {
    /// Creates a store seeded from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot fails validation.
    pub fn from_snapshot(snapshot: DirectorySnapshot) -> anyhow::Result<Self> {
        snapshot.validate()?;

        let mut state = State::default();
        for tenant in snapshot.tenants {
            state.tenants.insert(tenant.id.clone(), tenant);
        }
        for dept in snapshot.departments {
            state.departments.insert(dept.id, dept);
        }
        for user in snapshot.users {
            state.users.insert(user.id, user);
        }
        for m in snapshot.memberships {
            state.memberships.entry(m.user_id).or_default().push(m.department_id);
        }
        for l in snapshot.leaders {
            state.leaders.entry(l.user_id).or_default().push(l.leader_id);
        }
        for d in snapshot.tenant_departments {
            state.tenant_departments.insert(d.id, d);
        }
        for u in snapshot.tenant_users {
            state.tenant_users.insert(u.id.clone(), u);
        }

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Remove a directory department, leaving its children, memberships and
    /// projections dangling the way a concurrent delete would.
    pub fn remove_department(&self, id: DirectoryDepartmentId) -> Option<DirectoryDepartment> {
        self.state.write().departments.remove(&id)
    }

    /// Remove a tenant department projection.
    pub fn remove_tenant_department(&self, id: TenantDepartmentId) -> Option<TenantDepartment> {
        self.state.write().tenant_departments.remove(&id)
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectory {
    async fn get_departments(
        &self,
        ids: &[DirectoryDepartmentId],
    ) -> Result<Vec<DirectoryDepartment>, DomainError> {
        let state = self.state.read();
        Ok(ids
            .iter()
            .filter_map(|id| state.departments.get(id).cloned())
            .collect())
    }

    async fn list_child_departments(
        &self,
        parent_ids: &[DirectoryDepartmentId],
    ) -> Result<Vec<DirectoryDepartmentId>, DomainError> {
        let parents: HashSet<_> = parent_ids.iter().copied().collect();
        let state = self.state.read();
        Ok(state
            .departments
            .values()
            .filter(|d| d.parent_id.is_some_and(|p| parents.contains(&p)))
            .map(|d| d.id)
            .collect())
    }

    async fn get_ancestors(
        &self,
        ids: &[DirectoryDepartmentId],
    ) -> Result<HashMap<DirectoryDepartmentId, Vec<DirectoryDepartmentId>>, DomainError> {
        let state = self.state.read();
        Ok(ids
            .iter()
            .filter(|id| state.departments.contains_key(*id))
            .map(|&id| (id, state.ancestors(id)))
            .collect())
    }

    async fn get_users(&self, ids: &[DirectoryUserId]) -> Result<Vec<DirectoryUser>, DomainError> {
        let state = self.state.read();
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id).cloned())
            .collect())
    }

    async fn list_user_departments(
        &self,
        user_id: DirectoryUserId,
    ) -> Result<Vec<DirectoryDepartmentId>, DomainError> {
        let state = self.state.read();
        Ok(state.memberships.get(&user_id).cloned().unwrap_or_default())
    }

    async fn list_user_leaders(
        &self,
        user_id: DirectoryUserId,
    ) -> Result<Vec<DirectoryUserId>, DomainError> {
        let state = self.state.read();
        Ok(state.leaders.get(&user_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl TenantProjectionRepository for InMemoryDirectory {
    async fn list_tenants(&self) -> Result<Vec<TenantInfo>, DomainError> {
        Ok(self.state.read().tenants.values().cloned().collect())
    }

    async fn get_department(
        &self,
        tenant_id: &str,
        id: TenantDepartmentId,
    ) -> Result<Option<TenantDepartment>, DomainError> {
        Ok(self
            .state
            .read()
            .tenant_departments
            .get(&id)
            .filter(|d| d.tenant_id == tenant_id)
            .cloned())
    }

    async fn list_departments(
        &self,
        tenant_id: &str,
    ) -> Result<Vec<TenantDepartment>, DomainError> {
        Ok(self
            .state
            .read()
            .tenant_departments
            .values()
            .filter(|d| d.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn find_departments(
        &self,
        tenant_id: &str,
        directory_ids: &[DirectoryDepartmentId],
    ) -> Result<Vec<TenantDepartment>, DomainError> {
        let wanted: HashSet<_> = directory_ids.iter().copied().collect();
        Ok(self
            .state
            .read()
            .tenant_departments
            .values()
            .filter(|d| d.tenant_id == tenant_id && wanted.contains(&d.data_source_department_id))
            .cloned()
            .collect())
    }

    async fn get_user(&self, bk_username: &str) -> Result<Option<TenantUser>, DomainError> {
        Ok(self.state.read().tenant_users.get(bk_username).cloned())
    }

    async fn get_users(&self, bk_usernames: &[BkUsername]) -> Result<Vec<TenantUser>, DomainError> {
        let state = self.state.read();
        Ok(bk_usernames
            .iter()
            .filter_map(|name| state.tenant_users.get(name).cloned())
            .collect())
    }

    async fn list_users(&self, tenant_id: &str) -> Result<Vec<TenantUser>, DomainError> {
        Ok(self
            .state
            .read()
            .tenant_users
            .values()
            .filter(|u| u.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn find_users(
        &self,
        tenant_id: &str,
        directory_ids: &[DirectoryUserId],
    ) -> Result<Vec<TenantUser>, DomainError> {
        let wanted: HashSet<_> = directory_ids.iter().copied().collect();
        Ok(self
            .state
            .read()
            .tenant_users
            .values()
            .filter(|u| u.tenant_id == tenant_id && wanted.contains(&u.data_source_user_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dept(
        id: DirectoryDepartmentId,
        parent_id: Option<DirectoryDepartmentId>,
    ) -> DirectoryDepartment {
        DirectoryDepartment {
            id,
            data_source_id: 1,
            name: format!("D{id}"),
            parent_id,
        }
    }

    fn store() -> InMemoryDirectory {
        InMemoryDirectory::from_snapshot(DirectorySnapshot {
            departments: vec![dept(1, None), dept(2, Some(1)), dept(3, Some(2)), dept(4, Some(1))],
            ..DirectorySnapshot::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn ancestors_are_root_first() {
        let repo = store();
        let chains = repo.get_ancestors(&[3, 1, 99]).await.unwrap();
        assert_eq!(chains[&3], vec![1, 2]);
        assert!(chains[&1].is_empty());
        assert!(!chains.contains_key(&99));
    }

    #[tokio::test]
    async fn ancestors_stop_at_removed_parent() {
        let repo = store();
        repo.remove_department(2);
        let chains = repo.get_ancestors(&[3]).await.unwrap();
        assert!(chains[&3].is_empty());
    }

    #[tokio::test]
    async fn children_are_listed_by_id() {
        let repo = store();
        assert_eq!(repo.list_child_departments(&[1]).await.unwrap(), vec![2, 4]);
        assert_eq!(repo.list_child_departments(&[2, 4]).await.unwrap(), vec![3]);
        assert!(repo.list_child_departments(&[3]).await.unwrap().is_empty());
    }
}
