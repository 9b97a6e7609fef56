//! # Registry Facade
//!
//! The API the HTTP layer calls. Per identifier it drives the state machine
//!
//! ```text
//! unseen --status--> captive --release--> released --hold--> captive
//! ```
//!
//! where `hold` on a captive client and `release` on a released one are
//! idempotent updates. Nothing here locks across identifiers; the store is
//! the only shared resource.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::configs::captive_config::CaptiveConfig;
use crate::connections::{ClientStore, StoreError};
use crate::core::engine;
use crate::core::record::{ClientIdentifier, ClientRecord, ClientView, ValidationError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("client {0} is unknown")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(identifier) => RegistryError::NotFound(identifier),
            other => RegistryError::Storage(other),
        }
    }
}

/// # Registry
///
/// Cheap to clone; clones share the store and the configuration.
#[derive(Clone)]
pub struct Registry {
    store: Arc<dyn ClientStore>,
    config: Arc<CaptiveConfig>,
}

impl Registry {
    pub fn new(store: Arc<dyn ClientStore>, config: Arc<CaptiveConfig>) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &CaptiveConfig {
        &self.config
    }

    /// Returns the captivity view for `identifier`, creating its record on
    /// first sight. Concurrent first-sight calls for the same identifier all
    /// succeed and leave exactly one record behind.
    pub async fn status(&self, identifier: &str) -> Result<ClientView, RegistryError> {
        let identifier = ClientIdentifier::parse(identifier)?;
        let record = self.lookup_or_create(identifier).await?;
        Ok(engine::report(&record, &self.config))
    }

    /// Lets a known client out of captivity.
    pub async fn release(&self, identifier: &str) -> Result<(), RegistryError> {
        self.set_client_captive(identifier, false).await
    }

    /// Puts a known client back into captivity.
    pub async fn hold(&self, identifier: &str) -> Result<(), RegistryError> {
        self.set_client_captive(identifier, true).await
    }

    /// Succeeds when the backing store answers.
    pub async fn health(&self) -> Result<(), RegistryError> {
        self.store.ping().await.map_err(RegistryError::Storage)
    }

    async fn set_client_captive(&self, identifier: &str, captive: bool) -> Result<(), RegistryError> {
        let identifier = ClientIdentifier::parse(identifier)?;
        self.store.set_client_captive(&identifier, captive).await?;
        info!(identifier = %identifier, captive, "client captivity updated");
        Ok(())
    }

    async fn lookup_or_create(&self, identifier: ClientIdentifier) -> Result<ClientRecord, RegistryError> {
        if let Some(record) = self.store.get(&identifier).await? {
            return Ok(record);
        }

        let record = engine::first_sight(identifier, &self.config);
        match self.store.insert(&record).await {
            Ok(()) => {
                info!(identifier = %record.identifier, "new client registered as captive");
                Ok(record)
            }
            Err(StoreError::DuplicateKey(_)) => {
                // Another request created it between our read and our insert.
                debug!(identifier = %record.identifier, "lost first-sight race, re-reading");
                match self.store.get(&record.identifier).await? {
                    Some(existing) => Ok(existing),
                    None => Err(RegistryError::Storage(StoreError::Corrupt {
                        identifier: record.identifier.to_string(),
                        reason: "record vanished after duplicate insert".to_string(),
                    })),
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}
