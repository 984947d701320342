use cloud_gateway::GatewayError;
use thiserror::Error;

/// Errors from discovery and playback operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No access token was supplied
    #[error("Please authenticate first.")]
    NotAuthenticated,

    /// The household listing could not be fetched
    #[error("Failed to fetch households ({status}): {message}")]
    HouseholdFetchFailed { status: u16, message: String },

    /// The account has no households; terminal, not transient
    #[error("No Sonos households found for the authenticated user.")]
    NoHouseholds,

    /// One household's group listing could not be fetched
    #[error("Failed to fetch groups for household {household_id}")]
    GroupFetchFailed { household_id: String },

    /// A custom clip was requested without a usable file URL
    #[error("No file URL provided. Please ensure a file is selected.")]
    MissingFile,

    /// The play command was rejected
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// The audio clip command was rejected
    #[error("Failed to load audio clip: {0}")]
    AudioClipFailed(String),

    /// Classified auth, permission, or transport failure, passed through
    /// unwrapped so the caller's retry policy can see it
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ApiError {
    /// True when a token refresh followed by one retry may clear the failure.
    pub fn is_recoverable_auth(&self) -> bool {
        matches!(
            self,
            ApiError::Gateway(GatewayError::RecoverableAuthFailure)
        )
    }
}

/// Convenience type alias for Results using ApiError.
pub type Result<T> = std::result::Result<T, ApiError>;
