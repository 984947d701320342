//! The host-facing controller and its refresh-and-retry-once policy.

use casttosonos_api::{
    AudioClipOutcome, ClipPriority, ClipType, FileReference, PlaybackDispatcher,
    PlaybackOutcome, PlayerOption, ResourceAggregator, SpeakerGroup, Topology,
    ALL_GROUPS_LABEL, WILDCARD_GROUP,
};
use cloud_auth::{AuthManager, LivenessReport, TokenState};
use cloud_gateway::{HttpGateway, ReqwestGateway};
use tracing::info;

use crate::error::Result;

/// Entry point for hosts embedding the SDK; one controller per account.
///
/// Operations that consume the access token take the host's [`TokenState`]
/// mutably: when a call fails because the remote classified the token as
/// expired, the controller refreshes, replaces the whole token record, and
/// retries the call exactly once. Every other failure propagates untouched;
/// the response classifier in the gateway crate is the only place that
/// decides retryability.
#[derive(Debug, Clone)]
pub struct CastController<G = ReqwestGateway> {
    auth: AuthManager<G>,
    aggregator: ResourceAggregator<G>,
    dispatcher: PlaybackDispatcher<G>,
}

impl CastController<ReqwestGateway> {
    /// Controller against the production API endpoint.
    pub fn new() -> Self {
        Self::with_gateway(ReqwestGateway::new())
    }

    /// Controller against a custom endpoint (tests, staging).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_gateway(ReqwestGateway::with_base_url(base_url))
    }
}

impl Default for CastController<ReqwestGateway> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: HttpGateway + Clone> CastController<G> {
    /// Build a controller over any gateway implementation.
    pub fn with_gateway(gateway: G) -> Self {
        Self {
            auth: AuthManager::new(gateway.clone()),
            aggregator: ResourceAggregator::new(gateway.clone()),
            dispatcher: PlaybackDispatcher::new(gateway),
        }
    }

    /// Exchange an authorization code for the initial token bundle.
    pub async fn exchange(
        &self,
        code: &str,
        redirect_uri: &str,
        code_verifier: &str,
    ) -> Result<TokenState> {
        Ok(self.auth.exchange_code(code, redirect_uri, code_verifier).await?)
    }

    /// Refresh the token bundle; the result replaces the input wholesale.
    pub async fn refresh(&self, tokens: &TokenState) -> Result<TokenState> {
        Ok(self.auth.refresh(tokens).await?)
    }

    /// Verify the access token against the identity endpoint.
    pub async fn test_liveness(&self, tokens: &TokenState) -> Result<LivenessReport> {
        Ok(self.auth.test_liveness(&tokens.access_token).await?)
    }

    /// Discover the full topology, refreshing the token once if needed.
    pub async fn discover(&self, tokens: &mut TokenState) -> Result<Topology> {
        match self.aggregator.discover(&tokens.access_token).await {
            Err(err) if err.is_recoverable_auth() => {
                self.refresh_tokens(tokens).await?;
                Ok(self.aggregator.discover(&tokens.access_token).await?)
            }
            result => Ok(result?),
        }
    }

    /// Group options for target pickers, led by the wildcard "All Groups"
    /// entry.
    pub async fn list_groups(&self, tokens: &mut TokenState) -> Result<Vec<SpeakerGroup>> {
        let topology = self.discover(tokens).await?;
        let mut options = Vec::with_capacity(topology.groups.len() + 1);
        options.push(SpeakerGroup {
            id: WILDCARD_GROUP.to_string(),
            name: ALL_GROUPS_LABEL.to_string(),
        });
        options.extend(topology.groups);
        Ok(options)
    }

    /// Player options for audio-clip target pickers.
    pub async fn list_players(&self, tokens: &mut TokenState) -> Result<Vec<PlayerOption>> {
        Ok(self.discover(tokens).await?.players)
    }

    /// Start continuous playback on the selected groups, refreshing the
    /// token once if needed.
    pub async fn play_url(
        &self,
        tokens: &mut TokenState,
        media_url: &str,
        groups: Option<Vec<String>>,
        volume: Option<u8>,
    ) -> Result<PlaybackOutcome> {
        match self
            .dispatcher
            .play_url(&tokens.access_token, media_url, groups.clone(), volume)
            .await
        {
            Err(err) if err.is_recoverable_auth() => {
                self.refresh_tokens(tokens).await?;
                Ok(self
                    .dispatcher
                    .play_url(&tokens.access_token, media_url, groups, volume)
                    .await?)
            }
            result => Ok(result?),
        }
    }

    /// Schedule an audio clip on a single player, refreshing the token once
    /// if needed.
    #[allow(clippy::too_many_arguments)]
    pub async fn play_audio_clip(
        &self,
        tokens: &mut TokenState,
        player_id: &str,
        clip_type: Option<ClipType>,
        file: Option<FileReference>,
        volume: Option<u8>,
        priority: Option<ClipPriority>,
    ) -> Result<AudioClipOutcome> {
        match self
            .dispatcher
            .play_audio_clip(
                &tokens.access_token,
                player_id,
                clip_type,
                file.clone(),
                volume,
                priority,
            )
            .await
        {
            Err(err) if err.is_recoverable_auth() => {
                self.refresh_tokens(tokens).await?;
                Ok(self
                    .dispatcher
                    .play_audio_clip(
                        &tokens.access_token,
                        player_id,
                        clip_type,
                        file,
                        volume,
                        priority,
                    )
                    .await?)
            }
            result => Ok(result?),
        }
    }

    /// Connection health label shown next to the account.
    pub fn connection_label(tokens: &TokenState) -> String {
        match &tokens.scope {
            Some(scope) => format!("Sonos Account ({scope})"),
            None => "Sonos Account".to_string(),
        }
    }

    /// Replace the host's token record wholesale with a refreshed one.
    ///
    /// The access and refresh tokens are swapped as a pair; a partial write
    /// of one without the other cannot happen.
    async fn refresh_tokens(&self, tokens: &mut TokenState) -> Result<()> {
        info!("recoverable auth failure, refreshing token and retrying once");
        *tokens = self.auth.refresh(tokens).await?;
        Ok(())
    }
}
