//! # In-Memory Client Store
//!
//! A `HashMap` behind a `tokio::sync::RwLock`. Records do not survive a
//! restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;

use super::{ClientStore, StoreError};
use crate::core::record::{ClientIdentifier, ClientRecord};

#[derive(Debug, Default)]
pub struct MemoryClientStore {
    clients: RwLock<HashMap<ClientIdentifier, ClientRecord>>,
}

impl MemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStore for MemoryClientStore {
    async fn get(&self, identifier: &ClientIdentifier) -> Result<Option<ClientRecord>, StoreError> {
        let clients = self.clients.read().await;
        Ok(clients.get(identifier).cloned())
    }

    async fn insert(&self, record: &ClientRecord) -> Result<(), StoreError> {
        let mut clients = self.clients.write().await;
        match clients.entry(record.identifier.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey(record.identifier.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn set_client_captive(
        &self,
        identifier: &ClientIdentifier,
        captive: bool,
    ) -> Result<(), StoreError> {
        let mut clients = self.clients.write().await;
        match clients.get_mut(identifier) {
            Some(record) => {
                record.captive = captive;
                Ok(())
            }
            None => Err(StoreError::NotFound(identifier.to_string())),
        }
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.clients.read().await.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
