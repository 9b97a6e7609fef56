//! # Client Records
//!
//! The data model shared by the store, the engine and the HTTP layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Longest identifier accepted, in bytes. MAC addresses, DHCP client ids and
/// session tokens all fit comfortably.
pub const MAX_IDENTIFIER_LEN: usize = 255;

/// Rejections raised before anything touches the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("client identifier is empty")]
    EmptyIdentifier,

    #[error("client identifier is longer than {max} bytes ({len})")]
    IdentifierTooLong { len: usize, max: usize },

    #[error("client identifier contains control characters")]
    ControlCharacters,

    #[error("request field `{0}` is missing")]
    MissingField(&'static str),

    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// # Client Identifier
///
/// An opaque, validated key naming one network client (for example a MAC
/// address). Construct it with [`ClientIdentifier::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentifier(String);

impl ClientIdentifier {
    /// Validates a raw identifier. Surrounding whitespace is not trimmed: it is
    /// part of the opaque key, but an identifier made only of whitespace is
    /// treated as empty.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        if raw.len() > MAX_IDENTIFIER_LEN {
            return Err(ValidationError::IdentifierTooLong {
                len: raw.len(),
                max: MAX_IDENTIFIER_LEN,
            });
        }
        if raw.chars().any(char::is_control) {
            return Err(ValidationError::ControlCharacters);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClientIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// # Client Record
///
/// One persisted row per observed client. Only `captive` changes after
/// creation; everything else is fixed at first sight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    pub identifier: ClientIdentifier,
    pub captive: bool,
    pub user_portal_url: Option<String>,
    pub venue_info_url: Option<String>,
    /// Reserved for session extension support.
    pub can_extend_session: Option<bool>,
    /// Reserved quota; nothing populates it yet.
    pub seconds_remaining: Option<u64>,
    /// Reserved quota; nothing populates it yet.
    pub bytes_remaining: Option<u64>,
}

/// # Client View
///
/// The RFC 8908 API state returned to a client. Absent fields are omitted
/// from the JSON rather than serialized as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientView {
    pub captive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_portal_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_info_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_extend_session: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds_remaining: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_remaining: Option<u64>,
}
