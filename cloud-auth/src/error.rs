use cloud_gateway::GatewayError;
use thiserror::Error;

/// Errors from the authentication lifecycle.
///
/// Exchange, refresh, and liveness failures carry the remote status and raw
/// body because these are the conditions most likely to need remote-side
/// debugging.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A credential the operation requires was absent
    #[error("Missing {0}")]
    MissingCredential(&'static str),

    /// The token endpoint rejected the authorization-code exchange
    #[error("Token exchange failed ({status}): {body}")]
    TokenExchangeFailed { status: u16, body: String },

    /// The token endpoint rejected the refresh grant
    #[error("Failed to refresh access token ({status}): {body}")]
    RefreshFailed { status: u16, body: String },

    /// A 200 token response lacked an `access_token`
    #[error("Token response missing access_token")]
    MalformedTokenResponse,

    /// The identity endpoint rejected the access token
    #[error("Authentication failed ({status}): {body}")]
    AuthTestFailed { status: u16, body: String },

    /// Transport-level failure reaching the API
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Convenience type alias for Results using AuthError.
pub type Result<T> = std::result::Result<T, AuthError>;
