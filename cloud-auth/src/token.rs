//! Token state owned by the host's credential store.

use serde::{Deserialize, Serialize};

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// The OAuth token bundle the host persists between invocations.
///
/// Created by the authorization-code exchange and replaced wholesale by a
/// successful refresh. The SDK never caches it beyond the current call.
/// `refresh_token` is never overwritten with an empty value: when a refresh
/// response omits one, the previous token is carried forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Permissive decode of a token-endpoint response body.
///
/// Every field is optional so that validation happens in the manager: a 200
/// response lacking `access_token` becomes `MalformedTokenResponse` rather
/// than an opaque decode error.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponseWire {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
}
