//! ArcGIS extraction configuration

use featline_core::{ExtractError, HttpConfig};

/// Page size the feature service is asked for
pub const DEFAULT_BATCH_SIZE: u32 = 1000;

/// Runtime configuration for an extraction run
#[derive(Debug, Clone)]
pub struct Config {
    /// Portal hosting `generateToken` and item lookups
    pub portal_url: String,
    /// Referer the token is bound to
    pub referer: String,
    /// Requested token lifetime in minutes
    pub token_expiration: u32,
    /// Records requested per page
    pub batch_size: u32,
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            portal_url: "https://www.arcgis.com".to_string(),
            referer: "featline".to_string(),
            token_expiration: 60,
            batch_size: DEFAULT_BATCH_SIZE,
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Reject settings that would make the run meaningless.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.batch_size == 0 {
            return Err(ExtractError::invalid("fetch.batch_size", "must be positive"));
        }
        if self.token_expiration == 0 {
            return Err(ExtractError::invalid(
                "arcgis.token_expiration",
                "must be positive",
            ));
        }
        if self.http.connect_timeout.is_zero() {
            return Err(ExtractError::invalid(
                "http.connect_timeout",
                "must be positive",
            ));
        }
        if self.http.request_timeout.is_zero() {
            return Err(ExtractError::invalid(
                "http.request_timeout",
                "must be positive",
            ));
        }
        if !(self.portal_url.starts_with("https://") || self.portal_url.starts_with("http://")) {
            return Err(ExtractError::invalid(
                "arcgis.portal_url",
                format!("not an http(s) URL: {}", self.portal_url),
            ));
        }
        Ok(())
    }

    fn portal_base(&self) -> &str {
        self.portal_url.trim_end_matches('/')
    }

    /// Token issuance endpoint
    pub fn token_url(&self) -> String {
        format!("{}/sharing/rest/generateToken", self.portal_base())
    }

    /// Item metadata endpoint
    pub fn item_url(&self, item_id: &str) -> String {
        format!("{}/sharing/rest/content/items/{item_id}", self.portal_base())
    }
}
