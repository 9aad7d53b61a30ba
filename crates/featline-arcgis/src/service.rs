//! ArcGIS REST client and the service seam the pipeline runs against

use featline_core::http::{get_text, post_form};
use featline_core::{ExtractError, http_client};
use serde::Deserialize;

use crate::config::Config;
use crate::credentials::Credentials;
use crate::fetch::{FeaturePage, PageRequest, parse_page};
use crate::source::parse_item_response;
use crate::token::{Token, parse_token_response};

/// `{"error": {...}}` object ArcGIS returns, often with HTTP 200
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceError {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub details: Option<Vec<String>>,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message.as_deref().unwrap_or("unknown service error"))?;
        if let Some(code) = self.code {
            write!(f, " (code {code})")?;
        }
        if let Some(details) = self.details.as_ref().filter(|d| !d.is_empty()) {
            write!(f, ": {}", details.join("; "))?;
        }
        Ok(())
    }
}

/// Remote operations an extraction needs.
///
/// Calls are blocking and issued one at a time.
pub trait FeatureService {
    /// Exchange credentials for a bearer token.
    fn generate_token(&self, credentials: &Credentials) -> Result<Token, ExtractError>;

    /// Feature service URL an item id points at.
    fn item_url(&self, item_id: &str, token: &Token) -> Result<String, ExtractError>;

    /// One page of a layer `query` endpoint.
    ///
    /// Failures carry `request.offset`.
    fn query_page(
        &self,
        endpoint: &str,
        request: &PageRequest,
        token: &Token,
    ) -> Result<FeaturePage, ExtractError>;
}

/// reqwest-backed [`FeatureService`] for ArcGIS Online and Enterprise portals
#[derive(Debug)]
pub struct ArcGisClient {
    client: reqwest::Client,
    config: Config,
}

impl ArcGisClient {
    pub fn new(config: &Config) -> Result<Self, ExtractError> {
        let client = http_client(&config.http).map_err(|e| ExtractError::invalid("http", e))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

/// `generateToken` form for a token bound to `config.referer`
fn token_form(config: &Config, credentials: &Credentials) -> Vec<(&'static str, String)> {
    vec![
        ("username", credentials.username().to_string()),
        ("password", credentials.password().to_string()),
        ("referer", config.referer.clone()),
        ("client", "referer".to_string()),
        ("expiration", config.token_expiration.to_string()),
        ("f", "json".to_string()),
    ]
}

/// Layer `query` form selecting every field of every feature in one page
fn query_form(request: &PageRequest, token: &Token) -> Vec<(&'static str, String)> {
    vec![
        ("where", PageRequest::WHERE_ALL.to_string()),
        ("outFields", PageRequest::ALL_FIELDS.to_string()),
        ("resultOffset", request.offset.to_string()),
        ("resultRecordCount", request.limit.to_string()),
        ("token", token.as_str().to_string()),
        ("f", "json".to_string()),
    ]
}

impl FeatureService for ArcGisClient {
    fn generate_token(&self, credentials: &Credentials) -> Result<Token, ExtractError> {
        let form = token_form(&self.config, credentials);

        log::info!("Requesting token from {}", self.config.portal_url);
        let body = post_form(&self.client, &self.config.token_url(), &form)
            .map_err(ExtractError::auth)?;
        let token = parse_token_response(&body)?;
        match token.expires() {
            Some(expires) => log::debug!("Token valid until {expires}"),
            None => log::debug!("Token issued without reported expiry"),
        }
        Ok(token)
    }

    fn item_url(&self, item_id: &str, token: &Token) -> Result<String, ExtractError> {
        log::info!("Retrieving item {item_id}");
        let query = [("f", "json".to_string()), ("token", token.as_str().to_string())];
        let body = get_text(&self.client, &self.config.item_url(item_id), &query)
            .map_err(|e| ExtractError::lookup(format!("item {item_id}: {e}")))?;
        parse_item_response(item_id, &body)
    }

    fn query_page(
        &self,
        endpoint: &str,
        request: &PageRequest,
        token: &Token,
    ) -> Result<FeaturePage, ExtractError> {
        let form = query_form(request, token);

        log::debug!("Query offset={} count={}", request.offset, request.limit);
        // POST keeps the token out of URLs
        let body = post_form(&self.client, endpoint, &form)
            .map_err(|e| ExtractError::page(request.offset, e))?;
        parse_page(&body).map_err(|msg| ExtractError::page(request.offset, msg))
    }
}
