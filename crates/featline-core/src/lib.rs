//! Featline Core - Common infrastructure for feature extraction
//!
//! This crate provides the error taxonomy, blocking HTTP helpers, logging,
//! progress reporting, and the table normalizer and CSV sink shared by
//! feature sources.

pub mod error;
pub mod http;
pub mod logging;
pub mod progress;
pub mod sink;
pub mod table;

// Re-exports for convenience
pub use error::ExtractError;
pub use http::{HttpConfig, SHARED_RUNTIME, StreamError, http_client};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, fmt_num};
pub use sink::write_csv;
pub use table::{Cell, Record, Table};
