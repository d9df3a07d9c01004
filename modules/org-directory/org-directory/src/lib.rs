//! Org Directory Module
//!
//! Resolves tenant-scoped organization queries (ancestor chains, children at
//! an exact depth, memberships, leaders, filtered user listings) against a
//! shared directory, and records operation audits.
//!
//! Consumers use the [`org_directory_sdk::OrgDirectoryClient`] trait returned
//! by [`OrgDirectoryModule::client`].

pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use config::OrgDirectoryConfig;
pub use module::OrgDirectoryModule;
