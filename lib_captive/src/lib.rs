//! # lib_captive
//!
//! The client captivity registry behind the captive portal API (RFC 8908).
//! It decides, for any client identifier, whether that client is captive and
//! which portal and venue URLs it should be shown, and it lets operators
//! release or re-capture clients.
//!
//! ## Modules
//! - **`configs`**: the immutable deployment configuration, loaded from YAML.
//! - **`connections`**: the `ClientStore` trait and its backends.
//! - **`core`**: client records, the captivity engine and the registry facade.
//! - **`loggers`**: tracing subscriber setup (feature `loggers`).

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

pub mod configs;
pub mod connections;
pub mod core;
#[cfg(feature = "loggers")]
pub mod loggers;

pub use configs::captive_config::{CaptiveConfig, ConfigError, StorageBackend, StorageConfig, UrlToggle};
pub use connections::{ClientStore, MemoryClientStore, StoreError};
#[cfg(feature = "connections")]
pub use connections::db_postgres::PgClientStore;
pub use crate::core::record::{ClientIdentifier, ClientRecord, ClientView, ValidationError};
pub use crate::core::registry::{Registry, RegistryError};
