//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// File-level configuration for featline
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub arcgis: ArcGisConfig,
    pub fetch: FetchConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArcGisConfig {
    #[serde(deserialize_with = "deserialize_env_var")]
    pub portal_url: String,
    pub referer: String,
    /// Minutes
    pub token_expiration: u32,
}

impl Default for ArcGisConfig {
    fn default() -> Self {
        let defaults = featline_arcgis::Config::default();
        Self {
            portal_url: defaults.portal_url,
            referer: defaults.referer,
            token_expiration: defaults.token_expiration,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub batch_size: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_size: featline_arcgis::config::DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Seconds
    pub connect_timeout: u64,
    /// Seconds
    pub request_timeout: u64,
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: featline_core::http::CONNECT_TIMEOUT.as_secs(),
            request_timeout: featline_core::http::REQUEST_TIMEOUT.as_secs(),
            accept_invalid_certs: false,
        }
    }
}

/// Deserialize a string that may be an environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    expand_env_var(&s).ok_or_else(|| {
        serde::de::Error::custom(format!("environment variable in {s} is not set"))
    })
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./featline.toml (current directory)
    /// 2. ~/.config/featline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("featline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "featline") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Runtime configuration for an extraction run
    pub fn runtime(&self) -> featline_arcgis::Config {
        featline_arcgis::Config {
            portal_url: self.arcgis.portal_url.clone(),
            referer: self.arcgis.referer.clone(),
            token_expiration: self.arcgis.token_expiration,
            batch_size: self.fetch.batch_size,
            http: featline_core::HttpConfig {
                connect_timeout: Duration::from_secs(self.http.connect_timeout),
                request_timeout: Duration::from_secs(self.http.request_timeout),
                accept_invalid_certs: self.http.accept_invalid_certs,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.arcgis.portal_url, "https://www.arcgis.com");
        assert_eq!(config.fetch.batch_size, 1000);
        assert_eq!(config.http.request_timeout, 60);
        assert!(config.runtime().validate().is_ok());
    }

    #[test]
    fn expand_env_var_simple() {
        std::env::set_var("FEATLINE_TEST_PORTAL", "https://gis.example.com");
        assert_eq!(
            expand_env_var("${FEATLINE_TEST_PORTAL}"),
            Some("https://gis.example.com".to_string())
        );
        std::env::remove_var("FEATLINE_TEST_PORTAL");
    }

    #[test]
    fn expand_env_var_literal() {
        assert_eq!(expand_env_var("literal"), Some("literal".to_string()));
    }

    #[test]
    fn expand_env_var_missing() {
        assert_eq!(expand_env_var("${NONEXISTENT_VAR_12345}"), None);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[arcgis]
portal_url = "https://gis.example.com/portal"
token_expiration = 120

[fetch]
batch_size = 2000

[http]
request_timeout = 15
accept_invalid_certs = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.arcgis.portal_url, "https://gis.example.com/portal");
        assert_eq!(config.arcgis.referer, "featline");
        assert_eq!(config.arcgis.token_expiration, 120);
        assert_eq!(config.fetch.batch_size, 2000);

        let runtime = config.runtime();
        assert_eq!(runtime.http.request_timeout, Duration::from_secs(15));
        assert_eq!(runtime.http.connect_timeout, Duration::from_secs(30));
        assert!(runtime.http.accept_invalid_certs);
    }

    #[test]
    fn unset_portal_variable_fails_parse() {
        let toml = r#"
[arcgis]
portal_url = "${NONEXISTENT_VAR_12345}"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }
}
