//! Extraction subcommands - one engine, two ways to locate the layer

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use featline_arcgis::{ArcGisClient, Credentials, FeatureSource};
use featline_core::{ProgressContext, fmt_num};

#[derive(Args, Debug)]
pub struct ItemArgs {
    /// ArcGIS Online item id
    #[arg(value_parser = parse_item_id)]
    pub item_id: String,

    /// Filename to write output to
    pub output: PathBuf,

    /// Layer index within the item's feature service
    #[arg(long, default_value_t = 0)]
    pub layer: u32,
}

#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Feature layer URL (.../FeatureServer/<n>)
    #[arg(long, value_parser = parse_layer_url)]
    pub url: String,

    /// Filename to write output to
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Item ids are opaque alphanumeric tokens; anything else would alter the lookup path.
fn parse_item_id(s: &str) -> Result<String, String> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("Invalid item id: {s:?}"));
    }
    Ok(s.to_string())
}

fn parse_layer_url(s: &str) -> Result<String, String> {
    if s.starts_with("https://") || s.starts_with("http://") {
        Ok(s.to_string())
    } else {
        Err(format!("Not an http(s) URL: {s}"))
    }
}

pub fn run_item(
    args: ItemArgs,
    config: &featline_arcgis::Config,
    progress: &ProgressContext,
) -> Result<()> {
    let source = FeatureSource::ItemId {
        id: args.item_id,
        layer: args.layer,
    };
    extract(&source, &args.output, config, progress)
}

pub fn run_url(
    args: UrlArgs,
    config: &featline_arcgis::Config,
    progress: &ProgressContext,
) -> Result<()> {
    extract(&FeatureSource::Url(args.url), &args.output, config, progress)
}

fn extract(
    source: &FeatureSource,
    output: &Path,
    config: &featline_arcgis::Config,
    progress: &ProgressContext,
) -> Result<()> {
    // Resolved before any client exists: missing secrets never reach the network
    let credentials = Credentials::from_env().context("Cannot resolve ArcGIS credentials")?;
    Credentials::scrub_env();

    let client = ArcGisClient::new(config)?;
    let summary = featline_arcgis::run(config, credentials, source, output, &client, progress)
        .with_context(|| format!("Extraction of {} failed", source.label()))?;

    print_summary(
        "Extraction",
        &[
            ("Source", source.label()),
            ("Pages", summary.pages.to_string()),
            (
                "Rows",
                format!("{} ({} columns)", fmt_num(summary.rows), summary.columns),
            ),
            ("Output", output.display().to_string()),
            ("Time", format!("{:.1}s", summary.elapsed.as_secs_f64())),
        ],
    );
    Ok(())
}

/// Print a key-value summary table on stderr
fn print_summary(title: &str, rows: &[(&str, String)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new(title).fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    eprintln!("\n{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_accepts_hex() {
        assert_eq!(
            parse_item_id("0123456789abcdef0123456789abcdef").unwrap(),
            "0123456789abcdef0123456789abcdef"
        );
    }

    #[test]
    fn item_id_rejects_path_characters() {
        assert!(parse_item_id("").is_err());
        assert!(parse_item_id("../admin").is_err());
        assert!(parse_item_id("abc?f=html").is_err());
    }

    #[test]
    fn layer_url_requires_http() {
        assert!(parse_layer_url("https://svc.example.com/FeatureServer/0").is_ok());
        assert!(parse_layer_url("svc.example.com/FeatureServer/0").is_err());
    }
}
