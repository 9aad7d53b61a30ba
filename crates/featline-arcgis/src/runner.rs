//! Main runner for an extraction: token → endpoint → pages → table → CSV

use std::path::Path;
use std::time::{Duration, Instant};

use featline_core::{ExtractError, ProgressContext, fmt_num, write_csv};

use crate::config::Config;
use crate::credentials::Credentials;
use crate::fetch::{fetch_all, normalize};
use crate::service::FeatureService;
use crate::source::FeatureSource;

/// Extraction summary
#[derive(Debug)]
pub struct Summary {
    pub pages: usize,
    pub rows: usize,
    pub columns: usize,
    pub elapsed: Duration,
}

/// Run one extraction of `source` into `output`.
///
/// `credentials` are consumed by token issuance. The output file is only
/// created once the full table has been assembled.
pub fn run<S: FeatureService + ?Sized>(
    config: &Config,
    credentials: Credentials,
    source: &FeatureSource,
    output: &Path,
    service: &S,
    progress: &ProgressContext,
) -> Result<Summary, ExtractError> {
    let start = Instant::now();
    config.validate()?;

    let token = service.generate_token(&credentials)?;
    drop(credentials);

    let endpoint = source.query_endpoint(service, &token)?;
    log::info!("Extracting {} from {endpoint}", source.label());

    let pb = progress.stage_line("fetch");
    let fetched = fetch_all(service, &endpoint, &token, config.batch_size, &pb);
    pb.finish_and_clear();
    let fetched = fetched?;

    let table = normalize(&fetched.features);
    if table.is_empty() {
        log::warn!("{} returned no features", source.label());
    }
    let rows = write_csv(&table, output)?;

    let summary = Summary {
        pages: fetched.pages,
        rows,
        columns: table.num_columns(),
        elapsed: start.elapsed(),
    };

    log::info!("=== Extraction Summary ===");
    log::info!("Pages: {}", summary.pages);
    log::info!(
        "Rows: {} ({} columns)",
        fmt_num(summary.rows),
        summary.columns
    );
    log::info!("Output: {}", output.display());
    log::info!("Time: {:.1}s", summary.elapsed.as_secs_f64());

    Ok(summary)
}
