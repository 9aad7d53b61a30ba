//! Bearer token issued by the portal

use chrono::{DateTime, Utc};
use featline_core::ExtractError;
use serde::Deserialize;

use crate::service::ServiceError;

/// Short-lived bearer token shared read-only by every page request of a run.
///
/// Never refreshed: a run that outlives the token gets a warning, then the
/// server's rejection.
#[derive(Clone)]
pub struct Token {
    value: String,
    expires: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("value", &"<redacted>")
            .field("expires", &self.expires)
            .finish()
    }
}

impl Token {
    pub fn new(value: impl Into<String>, expires: Option<DateTime<Utc>>) -> Self {
        Self {
            value: value.into(),
            expires,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    /// Whether the server-reported expiry has passed at `now`.
    ///
    /// Tokens without a reported expiry never count as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|e| now >= e)
    }
}

/// `generateToken` response body
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
    /// Epoch milliseconds
    expires: Option<i64>,
    error: Option<ServiceError>,
}

/// Extract the token from a `generateToken` response body.
pub fn parse_token_response(body: &str) -> Result<Token, ExtractError> {
    let resp: TokenResponse = serde_json::from_str(body)
        .map_err(|e| ExtractError::auth(format!("invalid token response JSON: {e}")))?;

    if let Some(err) = resp.error {
        return Err(ExtractError::auth(err));
    }

    let value = resp
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ExtractError::auth("response has no token field"))?;
    let expires = resp.expires.and_then(DateTime::<Utc>::from_timestamp_millis);
    Ok(Token::new(value, expires))
}
