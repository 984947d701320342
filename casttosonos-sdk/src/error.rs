use casttosonos_api::ApiError;
use cloud_auth::AuthError;
use thiserror::Error;

/// Top-level error surfaced to hosts embedding the SDK.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Failure in the authentication lifecycle
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Failure in discovery or playback dispatch
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SdkError {
    /// True when a token refresh followed by one retry may clear the failure.
    ///
    /// The controller consumes this internally; it is exposed for hosts that
    /// drive the retry policy themselves.
    pub fn is_recoverable_auth(&self) -> bool {
        match self {
            SdkError::Api(api) => api.is_recoverable_auth(),
            SdkError::Auth(_) => false,
        }
    }
}

/// Convenience type alias for Results using SdkError.
pub type Result<T> = std::result::Result<T, SdkError>;
