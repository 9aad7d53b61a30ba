//! Paginated retrieval of every feature in a layer.
//!
//! Pages are requested at a fixed stride of `batch_size` until the server
//! stops reporting `exceededTransferLimit`. The stride is added regardless
//! of how many records a page returned, which is only correct while the
//! server keeps a stable result order for the length of the run (no
//! concurrent writes to the layer).

use chrono::Utc;
use featline_core::{ExtractError, Record, Table, fmt_num};
use indicatif::ProgressBar;
use serde::{Deserialize, Deserializer};

use crate::service::{FeatureService, ServiceError};
use crate::token::Token;

/// One page of a `query` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u32,
}

impl PageRequest {
    /// Filter matching every feature
    pub const WHERE_ALL: &'static str = "1=1";
    pub const ALL_FIELDS: &'static str = "*";

    pub fn new(offset: u64, limit: u32) -> Self {
        Self { offset, limit }
    }
}

/// Feature envelope. Only the attributes survive; geometry is dropped at parse time.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Feature {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes: Record,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Record, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Record>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parsed page: its features and whether more remain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeaturePage {
    pub features: Vec<Feature>,
    pub exceeded_transfer_limit: bool,
}

/// `query` response body
#[derive(Debug, Deserialize)]
struct QueryResponse {
    features: Option<Vec<Feature>>,
    #[serde(rename = "exceededTransferLimit")]
    exceeded_transfer_limit: Option<bool>,
    error: Option<ServiceError>,
}

/// Parse a `query` response body.
///
/// Absent `features` is an empty page; absent `exceededTransferLimit` means
/// this is the last page.
pub fn parse_page(body: &str) -> Result<FeaturePage, String> {
    let resp: QueryResponse =
        serde_json::from_str(body).map_err(|e| format!("malformed query response: {e}"))?;
    if let Some(err) = resp.error {
        return Err(err.to_string());
    }
    Ok(FeaturePage {
        features: resp.features.unwrap_or_default(),
        exceeded_transfer_limit: resp.exceeded_transfer_limit.unwrap_or(false),
    })
}

/// Everything one extraction retrieved
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// In server page order, not deduplicated
    pub features: Vec<Feature>,
    pub pages: usize,
}

/// Fetch every page of `endpoint`.
///
/// The first failed page aborts the run with its offset; nothing partial is
/// returned and nothing is retried.
pub fn fetch_all<S: FeatureService + ?Sized>(
    service: &S,
    endpoint: &str,
    token: &Token,
    batch_size: u32,
    pb: &ProgressBar,
) -> Result<FetchOutcome, ExtractError> {
    let mut offset: u64 = 0;
    let mut outcome = FetchOutcome::default();
    let mut expiry_warned = false;
    let mut more = true;

    while more {
        if !expiry_warned && token.is_expired_at(Utc::now()) {
            log::warn!("Token expired at offset {offset}; remaining pages may be rejected");
            expiry_warned = true;
        }

        let request = PageRequest::new(offset, batch_size);
        let page = service.query_page(endpoint, &request, token)?;
        outcome.pages += 1;

        let received = page.features.len();
        outcome.features.extend(page.features);
        let total = fmt_num(outcome.features.len());
        log::info!(
            "Batch {}: {received} records at offset {offset} ({total} total)",
            outcome.pages
        );
        pb.set_message(format!("batch {}: {total} records", outcome.pages));

        more = page.exceeded_transfer_limit;
        offset += u64::from(batch_size);
    }

    Ok(outcome)
}

/// Flatten fetched features into one table of their attributes.
pub fn normalize(features: &[Feature]) -> Table {
    Table::from_records(features.iter().map(|f| &f.attributes))
}
