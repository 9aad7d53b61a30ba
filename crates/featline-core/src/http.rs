//! Blocking HTTP helpers over a shared async client.
//!
//! Uses async reqwest internally, driven through a shared tokio runtime,
//! but presents a sync interface: extraction is strictly sequential.

use std::sync::LazyLock;
use std::time::Duration;

/// Default connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default per-request timeout (connect + headers + body)
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Error types for HTTP operations
#[derive(Debug)]
pub enum StreamError {
    /// HTTP error with optional status code
    Http {
        status: Option<u16>,
        message: String,
    },
    /// Client could not be constructed (TLS backend, invalid settings)
    Client(String),
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Client(message) => write!(f, "HTTP client: {message}"),
        }
    }
}

impl std::error::Error for StreamError {}

impl StreamError {
    /// Create HTTP error from reqwest error.
    ///
    /// The URL is stripped so query strings never reach logs.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        let status = e.status().map(|s| s.as_u16());
        let message = if e.is_timeout() {
            "request timed out".to_string()
        } else {
            e.without_url().to_string()
        };
        Self::Http { status, message }
    }
}

/// HTTP settings applied to every request of a run
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Skip TLS certificate verification (self-signed portals)
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
            request_timeout: REQUEST_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}

/// Build an async HTTP client with bounded timeouts.
pub fn http_client(config: &HttpConfig) -> Result<reqwest::Client, StreamError> {
    if config.accept_invalid_certs {
        log::warn!("TLS certificate verification disabled");
    }
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .user_agent(concat!("featline/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| StreamError::Client(e.without_url().to_string()))
}

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Form or query parameters as name/value pairs
pub type Params<'a> = [(&'a str, String)];

/// POST a form-encoded body, return the response text on 2xx.
pub fn post_form(
    client: &reqwest::Client,
    url: &str,
    form: &Params<'_>,
) -> Result<String, StreamError> {
    SHARED_RUNTIME.handle().block_on(async {
        let resp = client
            .post(url)
            .form(form)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(StreamError::from_reqwest)?;
        resp.text().await.map_err(StreamError::from_reqwest)
    })
}

/// GET with query parameters, return the response text on 2xx.
pub fn get_text(
    client: &reqwest::Client,
    url: &str,
    query: &Params<'_>,
) -> Result<String, StreamError> {
    SHARED_RUNTIME.handle().block_on(async {
        let resp = client
            .get(url)
            .query(query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(StreamError::from_reqwest)?;
        resp.text().await.map_err(StreamError::from_reqwest)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_http_with_status() {
        let err = StreamError::Http {
            status: Some(404),
            message: "test".to_string(),
        };
        assert_eq!(format!("{err}"), "HTTP 404: test");
    }

    #[test]
    fn display_http_without_status() {
        let err = StreamError::Http {
            status: None,
            message: "timeout".to_string(),
        };
        assert_eq!(format!("{err}"), "HTTP error: timeout");
    }

    #[test]
    fn display_client_error() {
        let err = StreamError::Client("no tls".to_string());
        assert_eq!(format!("{err}"), "HTTP client: no tls");
    }

    #[test]
    fn default_config_has_bounded_timeouts() {
        let config = HttpConfig::default();
        assert_eq!(config.connect_timeout, CONNECT_TIMEOUT);
        assert_eq!(config.request_timeout, REQUEST_TIMEOUT);
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn client_builds_with_defaults() {
        assert!(http_client(&HttpConfig::default()).is_ok());
    }
}
