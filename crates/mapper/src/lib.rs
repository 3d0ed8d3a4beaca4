//! Video Mapper Core Library
//!
//! Transforms native Brightcove video records into canonical publication
//! events: field extraction, validation, media-type derivation, and envelope
//! assembly. Delivery (broker consumption, HTTP) lives in the sibling crates
//! and funnels through [`VideoMapper::map_json`].

pub mod errors;
pub mod extract;
pub mod mapper;
pub mod media_type;
pub mod model;

// Re-export commonly used types
pub use errors::MapError;
pub use mapper::{
    MapperConfig, VideoMapper, BRIGHTCOVE_AUTHORITY, BRIGHTCOVE_ORIGIN, VIDEO_CONTENT_URI_BASE,
    VIDEO_MEDIA_TYPE_PREFIX,
};
pub use model::{Identifier, MappedEvent, Payload, PublicationEvent, RequestContext};
