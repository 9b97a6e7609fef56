//! # Core Registry Module
//!
//! The decision logic of the captive portal service.
//!
//! - **`record`**: the persisted `ClientRecord`, the reported `ClientView` and
//!   the validated `ClientIdentifier`.
//! - **`engine`**: pure functions that synthesize first-sight records and
//!   compute what a client is told.
//! - **`registry`**: the facade the HTTP layer calls (`status`, `release`,
//!   `hold`), which owns the create-on-first-sight race handling.

pub mod engine;
pub mod record;
pub mod registry;

pub use record::{ClientIdentifier, ClientRecord, ClientView, ValidationError};
pub use registry::{Registry, RegistryError};
