//! featline - Extract ArcGIS feature layers to CSV
//!
//! Pages through a feature layer's `query` endpoint and writes every
//! record's attributes as one flat table.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "featline")]
#[command(about = "Extract a feature set from an ArcGIS feature service to CSV")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./featline.toml or ~/.config/featline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Portal hosting token issuance and item lookups
    #[arg(long, global = true)]
    portal_url: Option<String>,

    /// Records requested per page
    #[arg(long, global = true)]
    batch_size: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    request_timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the feature layer behind an ArcGIS Online item
    Item(cmd::extract::ItemArgs),
    /// Extract a feature layer by URL
    Url(cmd::extract::UrlArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = featline_core::ProgressContext::new();

    // Logging:
    //   TTY:     quiet (warn) unless --debug, the spinner shows activity
    //   non-TTY: info unless --debug, logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    featline_core::init_logging(quiet, cli.debug, multi);

    // Load configuration
    let mut config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    // CLI overrides config file
    if let Some(url) = cli.portal_url {
        config.arcgis.portal_url = url;
    }
    if let Some(n) = cli.batch_size {
        config.fetch.batch_size = n;
    }
    if let Some(secs) = cli.request_timeout {
        config.http.request_timeout = secs;
    }
    let runtime = config.runtime();

    match cli.command {
        Command::Item(args) => cmd::extract::run_item(args, &runtime, &progress)?,
        Command::Url(args) => cmd::extract::run_url(args, &runtime, &progress)?,
        Command::Config => {
            show_config(&runtime);
            return Ok(());
        }
    }

    progress.println("Done");
    Ok(())
}

fn show_config(config: &featline_arcgis::Config) {
    use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

    let env_state = |name: &str| {
        if std::env::var_os(name).is_some_and(|v| !v.is_empty()) {
            "configured"
        } else {
            "not set"
        }
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Setting").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec!["Portal URL", &config.portal_url]);
    table.add_row(vec!["Referer", &config.referer]);
    table.add_row(vec![
        "Token expiration",
        &format!("{} min", config.token_expiration),
    ]);
    table.add_row(vec!["Batch size", &config.batch_size.to_string()]);
    table.add_row(vec![
        "Connect timeout",
        &format!("{}s", config.http.connect_timeout.as_secs()),
    ]);
    table.add_row(vec![
        "Request timeout",
        &format!("{}s", config.http.request_timeout.as_secs()),
    ]);
    table.add_row(vec![
        "Verify TLS",
        if config.http.accept_invalid_certs {
            "no"
        } else {
            "yes"
        },
    ]);
    table.add_row(vec![
        featline_arcgis::USER_VAR,
        env_state(featline_arcgis::USER_VAR),
    ]);
    table.add_row(vec![
        featline_arcgis::PASSWORD_VAR,
        env_state(featline_arcgis::PASSWORD_VAR),
    ]);

    eprintln!("\n{table}");
}
