//! The transform-and-validate pipeline shared by both delivery paths.
//!
//! Both the broker consumer and the HTTP handler funnel through
//! [`VideoMapper::map_json`]: parse, extract, validate, assemble, serialize.
//! Either a complete valid publication event comes out, or nothing does.

use crate::errors::MapError;
use crate::extract::NativeVideo;
use crate::media_type::media_type_for;
use crate::model::{Identifier, MappedEvent, Payload, PublicationEvent, RequestContext};
use serde_json::Value;

/// Authority recorded on identifiers minted from Brightcove ids.
pub const BRIGHTCOVE_AUTHORITY: &str = "http://api.ft.com/system/BRIGHTCOVE";

/// Base URI under which mapped video content is addressable.
pub const VIDEO_CONTENT_URI_BASE: &str = "http://video-mapper-iw-uk-p.svc.ft.com/video/model/";

/// Type-family prefix for derived media types.
pub const VIDEO_MEDIA_TYPE_PREFIX: &str = "video/";

/// Origin-System-Id header value identifying Brightcove traffic.
pub const BRIGHTCOVE_ORIGIN: &str = "http://cmdb.ft.com/systems/brightcove";

/// Fixed strings the mapper bakes into every event.
///
/// `Default` carries the production values; tests inject their own to keep
/// assertions independent of deployment constants.
#[derive(Debug, Clone)]
pub struct MapperConfig {
    /// Prefix for contentUri derivation
    pub content_uri_base: String,
    /// Authority recorded on the single identifier entry
    pub authority: String,
    /// Prefix for media-type derivation
    pub media_type_prefix: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            content_uri_base: VIDEO_CONTENT_URI_BASE.to_string(),
            authority: BRIGHTCOVE_AUTHORITY.to_string(),
            media_type_prefix: VIDEO_MEDIA_TYPE_PREFIX.to_string(),
        }
    }
}

/// Maps native Brightcove video records into publication events.
///
/// Stateless beyond read-only configuration: every call builds its entities
/// fresh and discards them after serialization, so a single instance can be
/// shared freely between the delivery adapters.
#[derive(Debug, Clone, Default)]
pub struct VideoMapper {
    config: MapperConfig,
}

impl VideoMapper {
    /// Create a mapper with the given configuration.
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    /// Parse a raw JSON body and map it to a publication event.
    ///
    /// This is the single entry point used by both delivery adapters.
    pub fn map_json(&self, body: &str, context: &RequestContext) -> Result<MappedEvent, MapError> {
        let record: Value =
            serde_json::from_str(body).map_err(|e| MapError::InvalidJson(e.to_string()))?;
        self.map(&record, context)
    }

    /// Map an already-parsed raw record to a publication event.
    pub fn map(&self, record: &Value, context: &RequestContext) -> Result<MappedEvent, MapError> {
        let video = NativeVideo::from_value(record)?;

        if video.name.is_none() {
            tracing::warn!(
                uuid = %video.uuid,
                "name field of native video JSON is missing or empty, media type will be {}",
                self.config.media_type_prefix
            );
        }
        let media_type = media_type_for(&self.config.media_type_prefix, video.name.as_deref());

        let payload = Payload {
            uuid: video.uuid.clone(),
            identifiers: vec![Identifier::new(&self.config.authority, &video.id)],
            published_date: video.updated_at,
            media_type,
            publish_reference: context.publish_reference.clone(),
            last_modified: context.last_modified.clone(),
        };
        let payload_json =
            serde_json::to_string(&payload).map_err(|e| MapError::Serialization {
                what: "payload",
                detail: e.to_string(),
            })?;

        let event = PublicationEvent {
            content_uri: format!("{}{}", self.config.content_uri_base, video.uuid),
            payload: payload_json,
            last_modified: context.last_modified.clone(),
        };
        let body = serde_json::to_string(&event).map_err(|e| MapError::Serialization {
            what: "event",
            detail: e.to_string(),
        })?;

        Ok(MappedEvent {
            uuid: video.uuid,
            body,
        })
    }
}
