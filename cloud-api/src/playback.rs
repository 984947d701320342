//! Playback dispatch: the extended play command and per-player audio clips.

use cloud_gateway::{classify, ApiRequest, GatewayError, HttpGateway};
use serde_json::json;
use tracing::warn;

use crate::error::{ApiError, Result};
use crate::types::{
    now_utc, AudioClipOutcome, AudioClipResponse, ClipPriority, ClipType, FileReference,
    PlaybackOutcome, PlayUrlResult, TargetSelector,
};

/// Path of the extended play command endpoint.
const PLAY_URL_PATH: &str = "/api/v2/extended/playUrl";

/// Fixed application identifier sent with audio clips.
pub const APP_ID: &str = "com.casttosonos.sdk";

/// Display name attached to scheduled audio clips.
pub const CLIP_NAME: &str = "Cast to Sonos Audio Clip";

/// Status reported when the remote omits one for a scheduled clip.
const DEFAULT_CLIP_STATUS: &str = "scheduled";

/// Issues play and audio-clip commands against a chosen subset of targets.
///
/// The dispatcher never retries within itself; acting on a recoverable auth
/// failure is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct PlaybackDispatcher<G> {
    gateway: G,
}

impl<G: HttpGateway> PlaybackDispatcher<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Start continuous playback of `media_url` on the selected groups.
    ///
    /// The group list is normalized first (absent/empty and `["*"]` both mean
    /// all groups), and the remote's per-group results are reconciled into a
    /// single [`PlaybackOutcome`].
    pub async fn play_url(
        &self,
        access_token: &str,
        media_url: &str,
        groups: Option<Vec<String>>,
        volume: Option<u8>,
    ) -> Result<PlaybackOutcome> {
        if access_token.is_empty() {
            return Err(ApiError::NotAuthenticated);
        }

        let targets = TargetSelector::normalize(groups);
        let mut payload = json!({
            "groups": targets,
            "url": media_url,
            "metadata": {},
        });
        // Zero is a valid volume; inclusion keys on presence, not truthiness
        if let Some(volume) = volume {
            payload["volume"] = json!(volume);
        }

        let request = ApiRequest::post_json(PLAY_URL_PATH, payload).bearer(access_token);
        let response =
            classify::check(self.gateway.execute(request).await?).map_err(|err| match err {
                GatewayError::Api { message, .. } => ApiError::PlaybackFailed(message),
                other => ApiError::Gateway(other),
            })?;
        if response.status != 200 {
            let message = response
                .error_description()
                .map(str::to_string)
                .unwrap_or_else(|| response.raw_body.clone());
            return Err(ApiError::PlaybackFailed(message));
        }

        let result: PlayUrlResult = response
            .parsed_body
            .clone()
            .and_then(|body| serde_json::from_value(body).ok())
            .unwrap_or_default();
        for failure in &result.failed {
            warn!(
                group_id = %failure.group_id,
                error = %failure.error,
                "group rejected play command"
            );
        }

        Ok(PlaybackOutcome::from_result(&result, targets, volume))
    }

    /// Schedule a short, auto-stopping audio clip on a single player.
    ///
    /// Custom clips require a file reference; built-in clip types do not.
    pub async fn play_audio_clip(
        &self,
        access_token: &str,
        player_id: &str,
        clip_type: Option<ClipType>,
        file: Option<FileReference>,
        volume: Option<u8>,
        priority: Option<ClipPriority>,
    ) -> Result<AudioClipOutcome> {
        if access_token.is_empty() {
            return Err(ApiError::NotAuthenticated);
        }

        let clip_type = clip_type.unwrap_or_default();
        let mut payload = json!({
            "name": CLIP_NAME,
            "appId": APP_ID,
            "clipType": clip_type,
        });
        if clip_type == ClipType::Custom {
            let stream_url = file
                .as_ref()
                .and_then(FileReference::as_url)
                .ok_or(ApiError::MissingFile)?;
            payload["streamUrl"] = json!(stream_url);
        }
        if let Some(priority) = priority {
            payload["priority"] = json!(priority);
        }
        // Same presence-not-truthiness rule as play_url
        if let Some(volume) = volume {
            payload["volume"] = json!(volume);
        }

        let path = format!("/api/v2/sonos/players/{player_id}/audioClip");
        let request = ApiRequest::post_json(path, payload).bearer(access_token);
        let response =
            classify::check(self.gateway.execute(request).await?).map_err(|err| match err {
                GatewayError::Api { message, .. } => ApiError::AudioClipFailed(message),
                other => ApiError::Gateway(other),
            })?;
        if response.status != 200 {
            let message = response
                .error_description()
                .or_else(|| response.message())
                .map(str::to_string)
                .unwrap_or_else(|| response.raw_body.clone());
            return Err(ApiError::AudioClipFailed(message));
        }

        let result: AudioClipResponse = response
            .parsed_body
            .clone()
            .and_then(|body| serde_json::from_value(body).ok())
            .unwrap_or_default();

        Ok(AudioClipOutcome {
            id: result.id,
            player_id: player_id.to_string(),
            name: result.name,
            status: result.status.unwrap_or_else(|| DEFAULT_CLIP_STATUS.to_string()),
            timestamp_utc: now_utc(),
        })
    }
}
