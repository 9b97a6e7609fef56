//! # Captivity Engine
//!
//! Pure decision logic. Given configuration, it synthesizes the record stored
//! at first sight and computes the view a client is shown. It never touches
//! the store.

use crate::configs::captive_config::CaptiveConfig;
use crate::core::record::{ClientIdentifier, ClientRecord, ClientView};

/// Builds the record persisted the first time `identifier` is seen. New
/// clients start captive; the URLs are captured only for enabled features.
pub fn first_sight(identifier: ClientIdentifier, config: &CaptiveConfig) -> ClientRecord {
    ClientRecord {
        identifier,
        captive: true,
        user_portal_url: config.portal_url().map(str::to_string),
        venue_info_url: config.venue_info_url().map(str::to_string),
        can_extend_session: None,
        seconds_remaining: None,
        bytes_remaining: None,
    }
}

/// Computes what a client is told.
///
/// `allow_unknown_clients` forces `captive` to false on every response while
/// leaving the stored flag alone. Configuration decides whether each URL is
/// visible; the stored record supplies the URL itself, falling back to the
/// configured one when the record was created while the feature was off.
pub fn report(record: &ClientRecord, config: &CaptiveConfig) -> ClientView {
    let visible = |enabled: bool, stored: &Option<String>, configured: &str| {
        enabled.then(|| stored.clone().unwrap_or_else(|| configured.to_string()))
    };

    ClientView {
        captive: record.captive && !config.allow_unknown_clients,
        user_portal_url: visible(
            config.portal.enabled,
            &record.user_portal_url,
            &config.portal.url,
        ),
        venue_info_url: visible(
            config.venue_info.enabled,
            &record.venue_info_url,
            &config.venue_info.url,
        ),
        can_extend_session: record.can_extend_session,
        seconds_remaining: record.seconds_remaining,
        bytes_remaining: record.bytes_remaining,
    }
}
