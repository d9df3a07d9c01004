//! YAML snapshot of a directory and its tenant projections.
//!
//! Used to seed [`InMemoryDirectory`](super::InMemoryDirectory) from fixtures
//! and from the CLI.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, bail};
use org_directory_sdk::{BkUsername, TenantDepartmentId, TenantInfo};
use serde::{Deserialize, Serialize};

use crate::domain::model::{
    DirectoryDepartment, DirectoryDepartmentId, DirectoryUser, DirectoryUserId, TenantDepartment,
    TenantUser,
};

/// A user's direct membership in a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Membership {
    pub user_id: DirectoryUserId,
    pub department_id: DirectoryDepartmentId,
}

/// A leader link from a user to one of its leaders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeaderLink {
    pub user_id: DirectoryUserId,
    pub leader_id: DirectoryUserId,
}

/// Complete directory contents.
///
/// Memberships and leader links keep their file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectorySnapshot {
    pub tenants: Vec<TenantInfo>,
    pub departments: Vec<DirectoryDepartment>,
    pub users: Vec<DirectoryUser>,
    pub memberships: Vec<Membership>,
    pub leaders: Vec<LeaderLink>,
    pub tenant_departments: Vec<TenantDepartment>,
    pub tenant_users: Vec<TenantUser>,
}

impl DirectorySnapshot {
    /// Parse and validate a YAML snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the snapshot is inconsistent.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let snapshot: Self =
            serde_saphyr::from_str(yaml).context("failed to parse directory snapshot")?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Read, parse and validate a YAML snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails [`Self::from_yaml`].
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read directory snapshot {}", path.display()))?;
        Self::from_yaml(&yaml)
            .with_context(|| format!("invalid directory snapshot {}", path.display()))
    }

    /// Check referential integrity and that the department graph is a forest.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> anyhow::Result<()> {
        let tenants = unique("tenant", self.tenants.iter().map(|t| t.id.clone()))?;
        let departments: HashMap<DirectoryDepartmentId, Option<DirectoryDepartmentId>> = self
            .departments
            .iter()
            .map(|d| (d.id, d.parent_id))
            .collect();
        if departments.len() != self.departments.len() {
            bail!("duplicate directory department id");
        }
        let users = unique("directory user", self.users.iter().map(|u| u.id))?;

        for dept in &self.departments {
            if let Some(parent) = dept.parent_id
                && !departments.contains_key(&parent)
            {
                bail!("department {} has unknown parent {parent}", dept.id);
            }
        }
        for dept in &self.departments {
            let mut seen = HashSet::from([dept.id]);
            let mut cursor = dept.parent_id;
            while let Some(parent) = cursor {
                if !seen.insert(parent) {
                    bail!("department {} is part of a parent cycle", dept.id);
                }
                cursor = departments.get(&parent).copied().flatten();
            }
        }

        for m in &self.memberships {
            if !users.contains(&m.user_id) || !departments.contains_key(&m.department_id) {
                bail!(
                    "membership {} -> {} references an unknown entity",
                    m.user_id,
                    m.department_id
                );
            }
        }
        for l in &self.leaders {
            if !users.contains(&l.user_id) || !users.contains(&l.leader_id) {
                bail!(
                    "leader link {} -> {} references an unknown user",
                    l.user_id,
                    l.leader_id
                );
            }
        }

        unique::<TenantDepartmentId>(
            "tenant department",
            self.tenant_departments.iter().map(|d| d.id),
        )?;
        for d in &self.tenant_departments {
            if !tenants.contains(&d.tenant_id) {
                bail!("tenant department {} references unknown tenant {}", d.id, d.tenant_id);
            }
            if !departments.contains_key(&d.data_source_department_id) {
                bail!(
                    "tenant department {} references unknown directory department {}",
                    d.id,
                    d.data_source_department_id
                );
            }
        }

        unique::<BkUsername>("tenant user", self.tenant_users.iter().map(|u| u.id.clone()))?;
        for u in &self.tenant_users {
            if !tenants.contains(&u.tenant_id) {
                bail!("tenant user {} references unknown tenant {}", u.id, u.tenant_id);
            }
            if !users.contains(&u.data_source_user_id) {
                bail!(
                    "tenant user {} references unknown directory user {}",
                    u.id,
                    u.data_source_user_id
                );
            }
        }
        Ok(())
    }
}

fn unique<T>(kind: &str, ids: impl Iterator<Item = T>) -> anyhow::Result<HashSet<T>>
where
    T: std::hash::Hash + Eq + std::fmt::Display,
{
    let mut seen = HashSet::new();
    for id in ids {
        if seen.contains(&id) {
            bail!("duplicate {kind} id {id}");
        }
        seen.insert(id);
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r"
tenants:
  - id: default
    name: Default
    status: enabled
departments:
  - { id: 1, data_source_id: 1, name: Company }
  - { id: 2, data_source_id: 1, name: Dept A, parent_id: 1 }
users:
  - id: 1
    data_source_id: 1
    username: zhangsan
    full_name: Zhang San
    phone: { number: '13512345671' }
memberships:
  - { user_id: 1, department_id: 1 }
tenant_departments:
  - { id: 10, tenant_id: default, data_source_department_id: 1 }
tenant_users:
  - { id: zhangsan, tenant_id: default, data_source_user_id: 1 }
";

    #[test]
    fn parses_minimal_snapshot() {
        let snapshot = DirectorySnapshot::from_yaml(MINIMAL).unwrap();
        assert_eq!(snapshot.departments.len(), 2);
        assert_eq!(snapshot.users[0].phone.country_code, "86");
        assert_eq!(snapshot.tenant_users[0].language, "zh-cn");
        assert!(snapshot.leaders.is_empty());
    }

    #[test]
    fn rejects_unknown_parent() {
        let yaml = MINIMAL.replace("parent_id: 1", "parent_id: 99");
        let err = DirectorySnapshot::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("unknown parent"));
    }

    #[test]
    fn rejects_parent_cycle() {
        let snapshot = DirectorySnapshot {
            departments: vec![
                DirectoryDepartment {
                    id: 1,
                    data_source_id: 1,
                    name: "A".to_owned(),
                    parent_id: Some(2),
                },
                DirectoryDepartment {
                    id: 2,
                    data_source_id: 1,
                    name: "B".to_owned(),
                    parent_id: Some(1),
                },
            ],
            ..DirectorySnapshot::default()
        };
        let err = snapshot.validate().unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn rejects_projection_of_unknown_tenant() {
        let yaml = MINIMAL.replace(
            "{ id: zhangsan, tenant_id: default",
            "{ id: zhangsan, tenant_id: other",
        );
        assert!(DirectorySnapshot::from_yaml(&yaml).is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        let yaml = format!("{MINIMAL}\nextra: 1\n");
        assert!(DirectorySnapshot::from_yaml(&yaml).is_err());
    }
}
