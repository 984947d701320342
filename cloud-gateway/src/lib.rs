//! Private HTTP gateway for the Cast-to-Sonos cloud API.
//!
//! This crate provides a minimal async gateway for talking to the cloud API:
//! a request/response pair that higher layers build and inspect, an
//! [`HttpGateway`] trait as the transport seam, and a [`reqwest`]-backed
//! implementation. It also owns response classification (see [`classify`]),
//! which is the single place that decides whether a failed call is worth
//! retrying after a token refresh.

pub mod classify;
mod error;

pub use error::{GatewayError, Result};

use async_trait::async_trait;
use serde_json::Value;

/// Default production endpoint for the Cast-to-Sonos cloud API.
pub const DEFAULT_BASE_URL: &str = "https://api.casttosonos.com";

/// HTTP method of an outbound API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Body payload of an outbound API request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body
    None,
    /// JSON payload
    Json(Value),
    /// `application/x-www-form-urlencoded` payload (OAuth token endpoint)
    Form(Vec<(String, String)>),
}

/// An outbound request against the cloud API.
///
/// Paths are relative to the gateway's base URL. The bearer token is attached
/// explicitly per request rather than held by the gateway, so a single
/// gateway can serve calls for any token the host supplies.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    /// A GET request for the given path.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            bearer: None,
            body: RequestBody::None,
        }
    }

    /// A POST request carrying a JSON body.
    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            bearer: None,
            body: RequestBody::Json(body),
        }
    }

    /// A POST request carrying a form-encoded body.
    pub fn post_form(path: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            bearer: None,
            body: RequestBody::Form(fields),
        }
    }

    /// Attach a bearer token to the request.
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// Raw response from the cloud API.
///
/// Carries the status code, the body text, and the body parsed as JSON when
/// it is JSON. Higher layers decide what a given status means for them; the
/// gateway itself never fails on a non-2xx status.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub raw_body: String,
    pub parsed_body: Option<Value>,
}

impl ApiResponse {
    /// Remote-supplied human-readable description, when present.
    pub fn error_description(&self) -> Option<&str> {
        self.parsed_body
            .as_ref()?
            .get("error_description")?
            .as_str()
    }

    /// The `message` field some endpoints use instead of `error_description`.
    pub fn message(&self) -> Option<&str> {
        self.parsed_body.as_ref()?.get("message")?.as_str()
    }
}

/// Async transport seam for the SDK.
///
/// Production code uses [`ReqwestGateway`]; hosts embedding the SDK in an
/// environment with its own HTTP stack can supply their own implementation.
/// Implementations only surface transport-level failures; any received
/// response, whatever its status, comes back as an [`ApiResponse`].
#[async_trait]
pub trait HttpGateway: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// A gateway backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestGateway {
    /// Gateway against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Gateway against a custom endpoint (tests, staging).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// The endpoint this gateway talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ReqwestGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpGateway for ReqwestGateway {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::None => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let raw_body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let parsed_body = serde_json::from_str(&raw_body).ok();

        Ok(ApiResponse {
            status,
            raw_body,
            parsed_body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_request_builder() {
        let request = ApiRequest::get("/api/v2/whoami").bearer("token-1");

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/api/v2/whoami");
        assert_eq!(request.bearer.as_deref(), Some("token-1"));
        assert_eq!(request.body, RequestBody::None);
    }

    #[test]
    fn test_post_json_request_builder() {
        let body = json!({"url": "https://example.com/a.mp3"});
        let request = ApiRequest::post_json("/api/v2/extended/playUrl", body.clone());

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.body, RequestBody::Json(body));
        assert!(request.bearer.is_none());
    }

    #[test]
    fn test_post_form_request_builder() {
        let fields = vec![("grant_type".to_string(), "refresh_token".to_string())];
        let request = ApiRequest::post_form("/oauth/token", fields.clone());

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.body, RequestBody::Form(fields));
    }

    #[test]
    fn test_error_description_extraction() {
        let response = ApiResponse {
            status: 400,
            raw_body: r#"{"error":"invalid_request","error_description":"bad redirect"}"#.into(),
            parsed_body: Some(json!({
                "error": "invalid_request",
                "error_description": "bad redirect"
            })),
        };

        assert_eq!(response.error_description(), Some("bad redirect"));
        assert_eq!(response.message(), None);
    }

    #[test]
    fn test_error_description_absent_for_unparsable_body() {
        let response = ApiResponse {
            status: 500,
            raw_body: "<html>gateway timeout</html>".into(),
            parsed_body: None,
        };

        assert_eq!(response.error_description(), None);
        assert_eq!(response.message(), None);
    }

    #[test]
    fn test_message_field_extraction() {
        let response = ApiResponse {
            status: 400,
            raw_body: r#"{"message":"player busy"}"#.into(),
            parsed_body: Some(json!({"message": "player busy"})),
        };

        assert_eq!(response.message(), Some("player busy"));
    }
}
