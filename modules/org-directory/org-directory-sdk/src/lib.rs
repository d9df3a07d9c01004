//! Org Directory SDK
//!
//! This crate provides the public API for the `org-directory` module:
//!
//! - [`OrgDirectoryClient`] - Public API trait for consumers
//! - [`DepartmentDetail`], [`DepartmentRef`], [`TenantUserInfo`], ... - Contract models
//! - [`LookupField`], [`UserListQuery`] - Typed user-listing filters
//! - [`OrgDirectoryError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use org_directory_sdk::{ChildrenOptions, OrgDirectoryClient, PageRequest};
//!
//! let dept = directory.get_department(&tenant_id, dept_id, true).await?;
//! let children = directory
//!     .list_department_children(
//!         &tenant_id,
//!         dept_id,
//!         ChildrenOptions::default(),
//!         PageRequest::default(),
//!     )
//!     .await?;
//! ```

pub mod api;
pub mod error;
pub mod models;

pub use api::OrgDirectoryClient;
pub use error::OrgDirectoryError;
pub use models::{
    BkUsername, ChildrenOptions, DepartmentDetail, DepartmentRef, DepartmentWithParent,
    LookupField, Page, PageRequest, TenantDepartmentId, TenantId, TenantInfo, TenantStatus,
    TenantUserInfo, TokenIdentity, TokenUserInfo, UserListQuery, UserRef,
};
