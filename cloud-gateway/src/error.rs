use thiserror::Error;

/// Errors surfaced by the gateway and the response classifier.
///
/// The auth-failure split matters operationally: a recoverable failure tells
/// the caller a token refresh followed by a single retry should clear it,
/// while a terminal failure means the user has to reconnect their account.
/// Conflating the two causes either needless reconnect prompts or silent
/// repeated failures.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network-level failure before a usable response was received
    #[error("Transport error: {0}")]
    Transport(String),

    /// A 401 naming an expired or invalid token; refresh and retry once
    #[error("Access token expired")]
    RecoverableAuthFailure,

    /// Any other 401; user re-consent is required
    #[error("Authentication failed. Please reconnect your Sonos account.")]
    TerminalAuthFailure,

    /// A 403; surfaced verbatim and never retried
    #[error("Access denied. Please verify your permissions. {0}")]
    PermissionDenied(String),

    /// Any other 4xx/5xx with the best available description
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },
}

impl GatewayError {
    /// True when the caller should refresh the token and retry the call once.
    pub fn is_recoverable_auth(&self) -> bool {
        matches!(self, GatewayError::RecoverableAuthFailure)
    }
}

/// Convenience type alias for Results using GatewayError.
pub type Result<T> = std::result::Result<T, GatewayError>;
