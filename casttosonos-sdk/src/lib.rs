//! # casttosonos-sdk
//!
//! Host-facing SDK for the Cast-to-Sonos cloud API. It authenticates with
//! OAuth 2.1 + PKCE, keeps that authentication alive across long-lived
//! automation sessions, discovers the user's playback targets across any
//! number of households, and dispatches play and audio-clip commands against
//! a chosen subset of those targets.
//!
//! The entry point is [`CastController`]. Hosts hold the [`TokenState`] in
//! their own credential store and pass it into each call; operations that
//! consume the access token take it mutably so the controller can refresh
//! and retry exactly once when the remote reports an expired token.
//!
//! ```rust,no_run
//! use casttosonos_sdk::{CastController, TokenState};
//!
//! # async fn run(mut tokens: TokenState) -> casttosonos_sdk::Result<()> {
//! let controller = CastController::new();
//! let topology = controller.discover(&mut tokens).await?;
//! for group in &topology.groups {
//!     println!("{} ({})", group.name, group.id);
//! }
//! let outcome = controller
//!     .play_url(&mut tokens, "https://files.example/a.mp3", None, Some(25))
//!     .await?;
//! println!("playback: {}", outcome.status);
//! # Ok(())
//! # }
//! ```

mod controller;
mod error;

pub use controller::CastController;
pub use error::{Result, SdkError};

pub use casttosonos_api::{
    ApiError, AudioClipOutcome, ClipPriority, ClipType, FileReference, Household,
    PlaybackOutcome, PlaybackStatus, PlayerOption, SpeakerGroup, TargetSelector, Topology,
    ALL_GROUPS_LABEL, WILDCARD_GROUP,
};
pub use cloud_auth::{authorize_url, AuthError, LivenessReport, TokenState};
pub use cloud_gateway::{GatewayError, HttpGateway, ReqwestGateway};
