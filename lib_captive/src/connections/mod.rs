//! # Connections Module
//!
//! Persistence of client records. The registry only talks to the
//! [`ClientStore`] trait; backends decide how the uniqueness of identifiers is
//! enforced.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::record::{ClientIdentifier, ClientRecord};

/// Process-local store for tests and lab deployments.
pub mod memory_store;

/// PostgreSQL store backed by a deadpool connection pool.
#[cfg(feature = "connections")]
pub mod db_postgres;

pub use memory_store::MemoryClientStore;

/// Errors raised by a [`ClientStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("client {0} already exists")]
    DuplicateKey(String),

    #[error("client {0} not found")]
    NotFound(String),

    #[cfg(feature = "connections")]
    #[error("failed to get connection from pool: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[cfg(feature = "connections")]
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("storage setup failed: {0}")]
    Setup(String),

    #[error("stored record for client {identifier} is invalid: {reason}")]
    Corrupt { identifier: String, reason: String },
}

/// # Client Store
///
/// Durable mapping `identifier -> ClientRecord`. Every method is a single
/// atomic operation against the backend; implementations must be safe to
/// share between concurrent requests.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Returns the record for `identifier`, or `None` if it was never stored.
    async fn get(&self, identifier: &ClientIdentifier) -> Result<Option<ClientRecord>, StoreError>;

    /// Stores a new record. Fails with [`StoreError::DuplicateKey`] if a record
    /// with the same identifier already exists.
    async fn insert(&self, record: &ClientRecord) -> Result<(), StoreError>;

    /// Overwrites the captive flag. Fails with [`StoreError::NotFound`] if the
    /// identifier is unknown.
    async fn set_client_captive(
        &self,
        identifier: &ClientIdentifier,
        captive: bool,
    ) -> Result<(), StoreError>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Cheap round trip to prove the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
