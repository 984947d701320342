//! The authentication manager: exchange, refresh, and liveness probing.

use std::collections::BTreeMap;

use cloud_gateway::{ApiRequest, ApiResponse, HttpGateway};
use serde_json::Value;
use tracing::{error, info};

use crate::error::{AuthError, Result};
use crate::token::{TokenResponseWire, TokenState};
use crate::{AUTHORIZE_URL, CLIENT_ID, OAUTH_SCOPE, TOKEN_PATH, WHOAMI_PATH};

/// Outcome of a liveness probe against the identity endpoint.
///
/// `flags` collects every boolean field the remote reports (for example
/// `hasSonosToken` and `hasSonosRefreshToken`); hosts surface these as a
/// connection health label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessReport {
    pub authenticated: bool,
    pub flags: BTreeMap<String, bool>,
}

impl LivenessReport {
    /// Look up a remote capability flag, defaulting to false when unreported.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}

/// Owns the OAuth token lifecycle against the cloud API.
///
/// The conceptual state machine is driven externally by the host:
/// unauthenticated accounts reach `Authenticated` through
/// [`exchange_code`](AuthManager::exchange_code); when an access token is
/// later rejected as expired, the host runs [`refresh`](AuthManager::refresh)
/// and retries once; a failed refresh drops the account back to
/// unauthenticated and requires user re-consent.
///
/// Token-endpoint statuses are interpreted here rather than by the response
/// classifier so that exchange and refresh failures keep their raw response
/// bodies; nothing on this path is ever retryable.
#[derive(Debug, Clone)]
pub struct AuthManager<G> {
    gateway: G,
}

impl<G: HttpGateway> AuthManager<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Exchange an authorization code for a token bundle.
    ///
    /// Posts the `authorization_code` grant with the PKCE verifier the host
    /// generated alongside the original challenge.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        code_verifier: &str,
    ) -> Result<TokenState> {
        if code.is_empty() {
            return Err(AuthError::MissingCredential("authorization code"));
        }

        let request = ApiRequest::post_form(
            TOKEN_PATH,
            vec![
                ("grant_type".to_string(), "authorization_code".to_string()),
                ("code".to_string(), code.to_string()),
                ("redirect_uri".to_string(), redirect_uri.to_string()),
                ("client_id".to_string(), CLIENT_ID.to_string()),
                ("code_verifier".to_string(), code_verifier.to_string()),
            ],
        );
        let response = self.gateway.execute(request).await?;

        if response.status != 200 {
            return Err(AuthError::TokenExchangeFailed {
                status: response.status,
                body: response.raw_body,
            });
        }

        let wire = decode_token_body(&response)?;
        let access_token = wire.access_token.ok_or(AuthError::MalformedTokenResponse)?;

        Ok(TokenState {
            access_token,
            refresh_token: wire.refresh_token.unwrap_or_default(),
            expires_in: wire.expires_in,
            token_type: wire.token_type.unwrap_or_else(|| "Bearer".to_string()),
            scope: wire.scope,
        })
    }

    /// Refresh the access token with the `refresh_token` grant.
    ///
    /// The returned [`TokenState`] is a complete replacement for the input;
    /// the host must persist it as one record so the access and refresh
    /// tokens never go out of step.
    pub async fn refresh(&self, current: &TokenState) -> Result<TokenState> {
        if current.refresh_token.is_empty() {
            return Err(AuthError::MissingCredential("refresh token"));
        }

        let request = ApiRequest::post_form(
            TOKEN_PATH,
            vec![
                ("grant_type".to_string(), "refresh_token".to_string()),
                ("refresh_token".to_string(), current.refresh_token.clone()),
                ("client_id".to_string(), CLIENT_ID.to_string()),
            ],
        );
        let response = self.gateway.execute(request).await?;

        if response.status != 200 {
            error!(
                status = response.status,
                body = %response.raw_body,
                "token refresh failed"
            );
            return Err(AuthError::RefreshFailed {
                status: response.status,
                body: response.raw_body,
            });
        }

        let wire = decode_token_body(&response)?;
        let access_token = wire.access_token.ok_or(AuthError::MalformedTokenResponse)?;

        // Some providers omit the refresh token on renewal; keep the old one
        // rather than forgetting the means of re-authenticating.
        let issued_refresh = wire.refresh_token.filter(|token| !token.is_empty());
        info!(
            has_new_refresh_token = issued_refresh.is_some(),
            expires_in = ?wire.expires_in,
            "token refresh successful"
        );
        let refresh_token =
            issued_refresh.unwrap_or_else(|| current.refresh_token.clone());

        Ok(TokenState {
            access_token,
            refresh_token,
            expires_in: wire.expires_in,
            token_type: wire.token_type.unwrap_or_else(|| "Bearer".to_string()),
            scope: wire.scope,
        })
    }

    /// Probe the identity endpoint to verify the access token still works.
    pub async fn test_liveness(&self, access_token: &str) -> Result<LivenessReport> {
        if access_token.is_empty() {
            return Err(AuthError::MissingCredential("access token"));
        }

        let request = ApiRequest::get(WHOAMI_PATH).bearer(access_token);
        let response = self.gateway.execute(request).await?;

        if response.status != 200 {
            error!(
                status = response.status,
                body = %response.raw_body,
                "auth test failed"
            );
            return Err(AuthError::AuthTestFailed {
                status: response.status,
                body: response.raw_body,
            });
        }

        let mut flags = BTreeMap::new();
        if let Some(Value::Object(fields)) = &response.parsed_body {
            for (key, value) in fields {
                if let Value::Bool(flag) = value {
                    flags.insert(key.clone(), *flag);
                }
            }
        }

        Ok(LivenessReport {
            authenticated: true,
            flags,
        })
    }
}

/// Build the browser-facing authorization URL.
///
/// A pure template: fixed client id, `response_type=code`, the fixed scope,
/// and the caller's CSRF `state` passed through unmodified. The PKCE code
/// challenge is appended by the host before redirecting the user.
pub fn authorize_url(state: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("client_id", CLIENT_ID)
        .append_pair("response_type", "code")
        .append_pair("scope", OAUTH_SCOPE)
        .append_pair("state", state)
        .finish();
    format!("{AUTHORIZE_URL}?{query}")
}

fn decode_token_body(response: &ApiResponse) -> Result<TokenResponseWire> {
    let body = response
        .parsed_body
        .clone()
        .ok_or(AuthError::MalformedTokenResponse)?;
    serde_json::from_value(body).map_err(|_| AuthError::MalformedTokenResponse)
}
