//! Typed API layer for the Cast-to-Sonos cloud service.
//!
//! Two components live here, both consuming the gateway crate's transport
//! seam:
//!
//! - [`ResourceAggregator`] discovers every household the authenticated user
//!   can reach, fans out to each one concurrently, and merges the groups and
//!   players into disambiguated, display-ready option lists.
//! - [`PlaybackDispatcher`] normalizes a heterogeneous target selector,
//!   issues play and audio-clip commands, and reconciles the remote's
//!   partial-success responses into single outcome records.
//!
//! Neither component retries: classified auth failures pass through so the
//! caller can apply its refresh-and-retry-once policy.

pub mod error;
pub mod playback;
pub mod topology;
pub mod types;

pub use error::{ApiError, Result};
pub use playback::{PlaybackDispatcher, APP_ID, CLIP_NAME};
pub use topology::ResourceAggregator;
pub use types::{
    AudioClipOutcome, ClipPriority, ClipType, FileReference, Household, PlaybackOutcome,
    PlaybackStatus, PlayerOption, SpeakerGroup, TargetSelector, Topology, ALL_GROUPS_LABEL,
    UNKNOWN_SESSION, WILDCARD_GROUP,
};
