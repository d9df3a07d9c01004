//! Directory and tenant-projection records as the domain sees them.
//!
//! Relations are plain identifier values: a department's parent is an id
//! into the same flat table, never an owning reference.

use org_directory_sdk::{BkUsername, TenantDepartmentId, TenantId};
use serde::{Deserialize, Serialize};

pub type DataSourceId = i64;
pub type DirectoryDepartmentId = i64;
pub type DirectoryUserId = i64;

/// Department in the shared directory of one data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryDepartment {
    pub id: DirectoryDepartmentId,
    pub data_source_id: DataSourceId,
    pub name: String,
    /// `None` for roots.
    #[serde(default)]
    pub parent_id: Option<DirectoryDepartmentId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Phone {
    pub number: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

fn default_country_code() -> String {
    "86".to_owned()
}

impl Default for Phone {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Phone {
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            country_code: default_country_code(),
        }
    }
}

/// User in the shared directory of one data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryUser {
    pub id: DirectoryUserId,
    pub data_source_id: DataSourceId,
    pub username: String,
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Phone,
}

/// A per-tenant value that either follows the directory or overrides it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inheritable<T> {
    #[default]
    Inherited,
    Custom(T),
}

impl<T> Inheritable<T> {
    /// The value in effect for this tenant user.
    pub fn active<'a>(&'a self, inherited: &'a T) -> &'a T {
        match self {
            Self::Inherited => inherited,
            Self::Custom(value) => value,
        }
    }
}

/// Tenant-scoped projection of a directory department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantDepartment {
    pub id: TenantDepartmentId,
    pub tenant_id: TenantId,
    pub data_source_department_id: DirectoryDepartmentId,
}

/// Tenant-scoped projection of a directory user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantUser {
    pub id: BkUsername,
    pub tenant_id: TenantId,
    pub data_source_user_id: DirectoryUserId,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default)]
    pub phone: Inheritable<Phone>,
    #[serde(default)]
    pub email: Inheritable<String>,
}

fn default_language() -> String {
    "zh-cn".to_owned()
}

fn default_time_zone() -> String {
    "Asia/Shanghai".to_owned()
}

impl TenantUser {
    #[must_use]
    pub fn active_phone<'a>(&'a self, directory: &'a DirectoryUser) -> &'a Phone {
        self.phone.active(&directory.phone)
    }

    #[must_use]
    pub fn active_email<'a>(&'a self, directory: &'a DirectoryUser) -> &'a str {
        self.email.active(&directory.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory_user() -> DirectoryUser {
        DirectoryUser {
            id: 1,
            data_source_id: 1,
            username: "zhangsan".to_owned(),
            full_name: "Zhang San".to_owned(),
            email: "zhangsan@m.com".to_owned(),
            phone: Phone::new("13512345671"),
        }
    }

    fn tenant_user(phone: Inheritable<Phone>, email: Inheritable<String>) -> TenantUser {
        TenantUser {
            id: "zhangsan".to_owned(),
            tenant_id: "default".to_owned(),
            data_source_user_id: 1,
            language: default_language(),
            time_zone: default_time_zone(),
            phone,
            email,
        }
    }

    #[test]
    fn inherited_values_follow_directory() {
        let dir = directory_user();
        let user = tenant_user(Inheritable::Inherited, Inheritable::Inherited);
        assert_eq!(user.active_phone(&dir).number, "13512345671");
        assert_eq!(user.active_email(&dir), "zhangsan@m.com");
    }

    #[test]
    fn custom_values_override_directory() {
        let dir = directory_user();
        let user = tenant_user(
            Inheritable::Custom(Phone::new("13900000000")),
            Inheritable::Custom("custom@m.com".to_owned()),
        );
        assert_eq!(user.active_phone(&dir).number, "13900000000");
        assert_eq!(user.active_email(&dir), "custom@m.com");
    }
}
