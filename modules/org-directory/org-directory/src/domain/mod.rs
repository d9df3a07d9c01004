//! Domain layer for the org directory module.

pub mod audit;
pub mod error;
pub mod local_client;
pub mod lookup;
pub mod model;
pub mod ports;
pub mod repos;
pub mod service;

pub use error::DomainError;
pub use service::Service;
