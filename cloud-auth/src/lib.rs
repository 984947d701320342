//! OAuth 2.1 token lifecycle for the Cast-to-Sonos cloud API.
//!
//! This crate owns everything token-shaped: the authorization-code exchange
//! (PKCE), refresh with refresh-token preservation, a lightweight liveness
//! probe against the identity endpoint, and the browser-facing authorization
//! URL template.
//!
//! The crate is deliberately stateless. Tokens live in the host's credential
//! store; every operation here takes the credentials it needs and hands back
//! a fresh [`TokenState`] for the host to persist as one atomic record.

mod error;
mod manager;
mod token;

pub use error::{AuthError, Result};
pub use manager::{authorize_url, AuthManager, LivenessReport};
pub use token::TokenState;

/// Fixed OAuth client identifier registered with the cloud API.
pub const CLIENT_ID: &str = "casttosonos-client-1";

/// Scope requested during authorization.
pub const OAUTH_SCOPE: &str = "playback-control-all";

/// Browser-facing authorization endpoint.
pub const AUTHORIZE_URL: &str = "https://api.casttosonos.com/oauth/authorize";

/// Token endpoint path, relative to the gateway base URL.
pub const TOKEN_PATH: &str = "/oauth/token";

/// Identity endpoint used to test token liveness.
pub const WHOAMI_PATH: &str = "/api/v2/whoami";
