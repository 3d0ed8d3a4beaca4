//! Wire-level types for canonical publication events.
//!
//! These structs define the output contract of the mapper. They are built
//! fresh for every record, serialized once, and discarded — nothing here is
//! cached or shared between records.

use serde::{Deserialize, Serialize};

/// Identifier tuple linking a canonical asset back to its source system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    /// URI of the authority that minted the identifier
    pub authority: String,
    /// Source-native id of the asset
    pub identifier_value: String,
}

impl Identifier {
    /// Create an identifier for a source-native id under the given authority.
    pub fn new(authority: impl Into<String>, identifier_value: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            identifier_value: identifier_value.into(),
        }
    }
}

/// Canonical, system-agnostic description of a video asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Asset uuid, carried over from the native record
    pub uuid: String,
    /// Source identifiers; always exactly one entry
    pub identifiers: Vec<Identifier>,
    /// Publication date of the asset (opaque timestamp string)
    pub published_date: String,
    /// Derived media type, e.g. "video/mp4"
    pub media_type: String,
    /// Correlation id of the publish request
    pub publish_reference: String,
    /// Last-modified timestamp from the request metadata
    pub last_modified: String,
}

/// Outer envelope delivered on the outbound channel or HTTP response.
///
/// The inner payload is embedded as an opaque serialized string; consumers
/// that need the canonical fields must re-parse it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationEvent {
    /// Canonical address of the mapped content, derived from the uuid
    pub content_uri: String,
    /// Serialized [`Payload`] JSON
    pub payload: String,
    /// Last-modified timestamp from the request metadata
    pub last_modified: String,
}

/// Out-of-band request metadata required for every mapping.
///
/// Sourced from the `X-Request-Id` and `Message-Timestamp` headers on both
/// delivery paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Correlation id propagated into the payload as publishReference
    pub publish_reference: String,
    /// Timestamp propagated into payload and envelope as lastModified
    pub last_modified: String,
}

impl RequestContext {
    /// Create a request context from already-validated header values.
    pub fn new(publish_reference: impl Into<String>, last_modified: impl Into<String>) -> Self {
        Self {
            publish_reference: publish_reference.into(),
            last_modified: last_modified.into(),
        }
    }
}

/// Result of a successful mapping, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedEvent {
    /// Asset uuid; doubles as the outbound message key
    pub uuid: String,
    /// Serialized [`PublicationEvent`] JSON
    pub body: String,
}
