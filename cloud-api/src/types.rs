//! Data model for the cloud API surface.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Reserved selector value meaning "all groups". Never a real identifier.
pub const WILDCARD_GROUP: &str = "*";

/// Display name shown for the wildcard selector option.
pub const ALL_GROUPS_LABEL: &str = "All Groups";

/// Session id reported when no group accepted a play command.
pub const UNKNOWN_SESSION: &str = "unknown";

/// A top-level grouping of speakers under one user account/location.
///
/// Read-only, sourced from the remote per call; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Household {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Wire shape of the households listing.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct HouseholdsResponse {
    #[serde(default)]
    pub households: Vec<Household>,
}

/// Raw group entry within a household's listing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawGroup {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Raw player entry within a household's listing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPlayer {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Wire shape of a household's groups listing.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GroupsResponse {
    #[serde(default)]
    pub groups: Vec<RawGroup>,
    #[serde(default)]
    pub players: Vec<RawPlayer>,
}

/// A display-ready playback target option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerGroup {
    pub id: String,
    pub name: String,
}

/// Players share the display-option shape.
pub type PlayerOption = SpeakerGroup;

/// Merged discovery result across all households.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub groups: Vec<SpeakerGroup>,
    pub players: Vec<PlayerOption>,
}

/// The set of groups a playback command targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    /// Every group the account can reach (the `"*"` sentinel on the wire)
    All,
    /// A single group id
    One(String),
    /// An explicit list of group ids
    Many(Vec<String>),
}

impl TargetSelector {
    /// Normalize a host-supplied group list.
    ///
    /// Empty or absent selects all groups, as does a one-element list holding
    /// only the wildcard sentinel. Anything else passes through unchanged.
    pub fn normalize(groups: Option<Vec<String>>) -> Self {
        match groups {
            None => TargetSelector::All,
            Some(list) if list.is_empty() => TargetSelector::All,
            Some(list) if list.len() == 1 && list[0] == WILDCARD_GROUP => TargetSelector::All,
            Some(list) => TargetSelector::Many(list),
        }
    }
}

impl From<String> for TargetSelector {
    fn from(id: String) -> Self {
        if id == WILDCARD_GROUP {
            TargetSelector::All
        } else {
            TargetSelector::One(id)
        }
    }
}

impl From<&str> for TargetSelector {
    fn from(id: &str) -> Self {
        TargetSelector::from(id.to_string())
    }
}

impl Serialize for TargetSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TargetSelector::All => serializer.serialize_str(WILDCARD_GROUP),
            TargetSelector::One(id) => serializer.serialize_str(id),
            TargetSelector::Many(ids) => ids.serialize(serializer),
        }
    }
}

/// One group that accepted a play command.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GroupSuccess {
    #[serde(rename = "groupId")]
    pub group_id: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// One group that rejected a play command.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GroupFailure {
    #[serde(rename = "groupId")]
    pub group_id: String,
    #[serde(default)]
    pub error: String,
}

/// Remote per-group results of a play command.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PlayUrlResult {
    #[serde(default)]
    pub successful: Vec<GroupSuccess>,
    #[serde(default)]
    pub failed: Vec<GroupFailure>,
}

/// Reported state of a playback invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Playing,
    Failed,
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackStatus::Playing => write!(f, "playing"),
            PlaybackStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Normalized result of a play command across its targets.
///
/// Computed once per invocation and never persisted. `status` is `Playing`
/// iff at least one group accepted the command; `primary_session_id` is the
/// session of the first successful group, or [`UNKNOWN_SESSION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackOutcome {
    pub primary_session_id: String,
    pub requested_targets: TargetSelector,
    pub succeeded_group_ids: Vec<String>,
    pub failed_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_volume: Option<u8>,
    pub status: PlaybackStatus,
    pub timestamp_utc: String,
}

impl PlaybackOutcome {
    /// Partition the remote's per-group results into one outcome record.
    pub(crate) fn from_result(
        result: &PlayUrlResult,
        requested_targets: TargetSelector,
        applied_volume: Option<u8>,
    ) -> Self {
        let succeeded_group_ids: Vec<String> = result
            .successful
            .iter()
            .map(|success| success.group_id.clone())
            .collect();
        let primary_session_id = result
            .successful
            .first()
            .map(|success| success.session_id.clone())
            .unwrap_or_else(|| UNKNOWN_SESSION.to_string());
        let status = if succeeded_group_ids.is_empty() {
            PlaybackStatus::Failed
        } else {
            PlaybackStatus::Playing
        };

        Self {
            primary_session_id,
            requested_targets,
            succeeded_group_ids,
            failed_count: result.failed.len(),
            applied_volume,
            status,
            timestamp_utc: now_utc(),
        }
    }
}

/// Audio clip categories supported by the player endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClipType {
    /// A caller-supplied audio file; requires a file reference
    #[default]
    Custom,
    /// The player's built-in chime
    Chime,
}

/// Clip scheduling priority. High can interrupt low; low cannot interrupt high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClipPriority {
    Low,
    High,
}

/// A host-supplied audio file reference.
///
/// Hosts hand files over either as a bare URL string or as a structured
/// upload object carrying a `url` field; both decode here and normalize to a
/// URL through [`FileReference::as_url`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FileReference {
    Url(String),
    Upload {
        #[serde(default)]
        url: Option<String>,
    },
}

impl FileReference {
    /// The stream URL this reference resolves to, if any.
    pub fn as_url(&self) -> Option<&str> {
        match self {
            FileReference::Url(url) => Some(url.as_str()).filter(|u| !u.is_empty()),
            FileReference::Upload { url } => url.as_deref().filter(|u| !u.is_empty()),
        }
    }
}

/// Wire shape of an audio clip response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AudioClipResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Normalized result of an audio clip command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioClipOutcome {
    pub id: String,
    pub player_id: String,
    pub name: String,
    pub status: String,
    pub timestamp_utc: String,
}

pub(crate) fn now_utc() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
