//! Error taxonomy for feature extraction runs

use std::path::PathBuf;

/// Error that aborts an extraction run.
///
/// Every variant carries the context an operator needs to re-run:
/// which variable, which offset, which destination.
#[derive(Debug)]
pub enum ExtractError {
    /// Missing required secret or invalid setting
    Configuration { var: String, message: String },
    /// Token issuance failed
    Authentication { message: String },
    /// Item lookup or page request failed, or the response had the wrong shape.
    ///
    /// `offset` is set for page requests and `None` for item lookups.
    Retrieval { offset: Option<u64>, message: String },
    /// Output destination unwritable
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration { var, message } => write!(f, "{var}: {message}"),
            Self::Authentication { message } => write!(f, "authentication failed: {message}"),
            Self::Retrieval {
                offset: Some(offset),
                message,
            } => write!(f, "retrieval failed at offset {offset}: {message}"),
            Self::Retrieval {
                offset: None,
                message,
            } => write!(f, "retrieval failed: {message}"),
            Self::Write { path, source } => {
                write!(f, "cannot write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ExtractError {
    /// Missing environment variable
    pub fn missing(var: impl Into<String>) -> Self {
        Self::Configuration {
            var: var.into(),
            message: "environment variable not found".to_string(),
        }
    }

    /// Setting present but unusable
    pub fn invalid(var: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Configuration {
            var: var.into(),
            message: message.to_string(),
        }
    }

    pub fn auth(message: impl std::fmt::Display) -> Self {
        Self::Authentication {
            message: message.to_string(),
        }
    }

    /// Page request failure at `offset`
    pub fn page(offset: u64, message: impl std::fmt::Display) -> Self {
        Self::Retrieval {
            offset: Some(offset),
            message: message.to_string(),
        }
    }

    /// Retrieval failure that is not tied to a page (item lookup)
    pub fn lookup(message: impl std::fmt::Display) -> Self {
        Self::Retrieval {
            offset: None,
            message: message.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure happened before any network activity
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
