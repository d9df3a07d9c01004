//! Wiring for the org directory module.

use std::sync::Arc;

use org_directory_sdk::OrgDirectoryClient;
use tracing::{debug, info};

use crate::config::OrgDirectoryConfig;
use crate::domain::local_client::OrgDirectoryLocalClient;
use crate::domain::ports::TokenValidator;
use crate::domain::service::Service;
use crate::infra::storage::{DirectorySnapshot, InMemoryDirectory};

/// An initialized org directory backed by the in-memory store.
pub struct OrgDirectoryModule {
    service: Arc<Service>,
}

impl OrgDirectoryModule {
    /// Seed the store from `snapshot` and build the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is inconsistent.
    pub fn init(
        config: OrgDirectoryConfig,
        snapshot: DirectorySnapshot,
        token_validator: Option<Arc<dyn TokenValidator>>,
    ) -> anyhow::Result<Self> {
        info!("Initializing org_directory module");
        debug!(
            max_lookups = config.max_lookups,
            default_page_size = config.default_page_size,
            max_page_size = config.max_page_size,
            "Loaded org_directory config"
        );

        let store = Arc::new(InMemoryDirectory::from_snapshot(snapshot)?);
        let mut service = Service::new(store.clone(), store, config);
        if let Some(validator) = token_validator {
            service = service.with_token_validator(validator);
        }

        info!("Org directory module initialized");
        Ok(Self {
            service: Arc::new(service),
        })
    }

    /// The public client, as registered for consumers.
    #[must_use]
    pub fn client(&self) -> Arc<dyn OrgDirectoryClient> {
        Arc::new(OrgDirectoryLocalClient::new(self.service.clone()))
    }
}
