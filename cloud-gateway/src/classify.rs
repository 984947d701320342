//! Response classification for cloud API calls.
//!
//! Every component runs its responses through [`check`] before interpreting
//! them, regardless of which endpoint it called. Classification is the sole
//! place that decides retryability: nothing downstream retries on its own.

use crate::{ApiResponse, GatewayError};

/// Token-failure markers the remote places inside 401 bodies.
const RECOVERABLE_TOKEN_ERRORS: [&str; 2] = ["invalid_token", "token_expired"];

/// Classify a response, passing successes through unchanged.
///
/// Rules, applied in order:
/// 1. 401 whose body names an `invalid_token`/`token_expired` condition is a
///    recoverable auth failure; any other 401, including one with an
///    unparsable body, is terminal and requires user re-consent.
/// 2. 403 is a permission failure, surfaced verbatim.
/// 3. Any other status >= 400 is a generic API error, preferring the
///    remote-supplied `error_description` over the raw body.
/// 4. Everything else passes through.
pub fn check(response: ApiResponse) -> Result<ApiResponse, GatewayError> {
    if response.status == 401 {
        let recoverable = response
            .parsed_body
            .as_ref()
            .and_then(|body| body.get("error"))
            .and_then(|code| code.as_str())
            .is_some_and(|code| RECOVERABLE_TOKEN_ERRORS.contains(&code));
        if recoverable {
            tracing::debug!("401 names an expired token, flagging as recoverable");
            return Err(GatewayError::RecoverableAuthFailure);
        }
        return Err(GatewayError::TerminalAuthFailure);
    }

    if response.status == 403 {
        return Err(GatewayError::PermissionDenied(response.raw_body));
    }

    if response.status >= 400 {
        let message = response
            .error_description()
            .map(str::to_string)
            .unwrap_or_else(|| response.raw_body.clone());
        return Err(GatewayError::Api {
            status: response.status,
            message,
        });
    }

    Ok(response)
}
