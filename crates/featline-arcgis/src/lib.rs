//! Featline ArcGIS - bulk extraction from ArcGIS feature services
//!
//! Resolves credentials, issues a token, pages through a feature layer's
//! `query` endpoint until `exceededTransferLimit` clears, and writes the
//! flattened attributes as CSV.
//!
//! # Example
//!
//! ```ignore
//! use featline_arcgis::{ArcGisClient, Config, Credentials, FeatureSource, run};
//!
//! let config = Config::default();
//! let credentials = Credentials::from_env()?;
//! let client = ArcGisClient::new(&config)?;
//! let source = FeatureSource::Url("https://services.arcgis.com/x/FeatureServer/0".into());
//! let summary = run(&config, credentials, &source, "out.csv".as_ref(), &client, &progress)?;
//! println!("Wrote {} rows", summary.rows);
//! ```

pub mod config;
pub mod credentials;
pub mod fetch;
pub mod runner;
pub mod service;
pub mod source;
pub mod token;

// Re-exports
pub use config::Config;
pub use credentials::{Credentials, PASSWORD_VAR, USER_VAR};
pub use fetch::{Feature, FeaturePage, FetchOutcome, PageRequest, fetch_all, normalize};
pub use runner::{Summary, run};
pub use service::{ArcGisClient, FeatureService, ServiceError};
pub use source::FeatureSource;
pub use token::Token;
