//! Contract models for the `org-directory` module.
//!
//! Everything here is expressed in tenant-scoped identifiers. Directory-level
//! identifiers never cross the API boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OrgDirectoryError;

/// Tenant identifier.
pub type TenantId = String;

/// Tenant-visible department identifier.
pub type TenantDepartmentId = i64;

/// Tenant-visible user handle, globally unique across tenants.
pub type BkUsername = String;

/// Tenant lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    #[default]
    Enabled,
    Disabled,
}

/// Tenant summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantInfo {
    pub id: TenantId,
    pub name: String,
    pub status: TenantStatus,
}

/// A tenant department reduced to its handle and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRef {
    pub id: TenantDepartmentId,
    pub name: String,
}

/// A tenant department, optionally with its root-first ancestor chain.
///
/// `ancestors` is `None` when the caller did not ask for it, and is then left
/// out of the serialized form entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentDetail {
    pub id: TenantDepartmentId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestors: Option<Vec<DepartmentRef>>,
}

/// A tenant department together with its tenant-scoped parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentWithParent {
    pub id: TenantDepartmentId,
    pub name: String,
    /// `None` for roots and for departments whose parent is not projected in the tenant.
    pub parent_id: Option<TenantDepartmentId>,
}

/// A tenant user reduced to its handle and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub bk_username: BkUsername,
    pub display_name: String,
}

/// Full tenant user view with the active contact values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantUserInfo {
    pub bk_username: BkUsername,
    pub tenant_id: TenantId,
    pub display_name: String,
    pub language: String,
    pub time_zone: String,
    pub phone: String,
    pub phone_country_code: String,
    pub email: String,
}

/// Identity carried by a verified login token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIdentity {
    pub bk_username: BkUsername,
    pub tenant_id: TenantId,
}

/// Basic profile of the user behind a verified login token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUserInfo {
    pub bk_username: BkUsername,
    pub tenant_id: TenantId,
    pub display_name: String,
    pub language: String,
    pub time_zone: String,
}

/// Options for the children-with-depth listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildrenOptions {
    /// Exact number of hops below the parent. Must be `>= 1`.
    pub level: i32,
}

impl Default for ChildrenOptions {
    fn default() -> Self {
        Self { level: 1 }
    }
}

impl ChildrenOptions {
    #[must_use]
    pub const fn with_level(level: i32) -> Self {
        Self { level }
    }
}

/// One-based page selector. `page_size = None` falls back to the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: Option<usize>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: None,
        }
    }
}

impl PageRequest {
    #[must_use]
    pub const fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size: Some(page_size),
        }
    }
}

/// A page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    pub items: Vec<T>,
}

/// Field a user listing can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupField {
    BkUsername,
    DisplayName,
    Phone,
    Email,
}

impl LookupField {
    /// All supported fields.
    pub const ALL: [Self; 4] = [Self::BkUsername, Self::DisplayName, Self::Phone, Self::Email];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BkUsername => "bk_username",
            Self::DisplayName => "display_name",
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for LookupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookupField {
    type Err = OrgDirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                OrgDirectoryError::invalid_argument(format!("unknown lookup field: {s}"))
            })
    }
}

/// Filtered/fuzzy user listing query.
///
/// When both `exact_lookups` and `fuzzy_lookups` are present, the exact values
/// win and the fuzzy ones are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListQuery {
    pub lookup_field: Option<LookupField>,
    pub exact_lookups: Option<Vec<String>>,
    pub fuzzy_lookups: Option<Vec<String>>,
    #[serde(default)]
    pub page: PageRequest,
}

impl UserListQuery {
    #[must_use]
    pub fn exact(field: LookupField, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lookup_field: Some(field),
            exact_lookups: Some(values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fuzzy(field: LookupField, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lookup_field: Some(field),
            fuzzy_lookups: Some(values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_fuzzy(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fuzzy_lookups = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_field_parses_known_names() {
        for field in LookupField::ALL {
            assert_eq!(field.as_str().parse::<LookupField>(), Ok(field));
        }
    }

    #[test]
    fn lookup_field_rejects_unknown_name() {
        let err = "mobile".parse::<LookupField>().unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn department_detail_omits_unrequested_ancestors() {
        let detail = DepartmentDetail {
            id: 3,
            name: "Center AA".to_owned(),
            ancestors: None,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert!(json.get("ancestors").is_none());

        let detail = DepartmentDetail {
            ancestors: Some(Vec::new()),
            ..detail
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["ancestors"], serde_json::json!([]));
    }

    #[test]
    fn children_options_default_to_one_level() {
        assert_eq!(ChildrenOptions::default().level, 1);
    }
}
