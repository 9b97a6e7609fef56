//! # Configuration Modules
//!
//! Deployment configuration for the captive portal registry. The configuration
//! is read once at startup and then shared read-only.

/// The captive portal configuration model and its YAML loader.
pub mod captive_config;
