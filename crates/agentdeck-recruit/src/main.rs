//! Terminal console for the recruiting agents.
//!
//! Three remote agents do the real work (screening, posting, outreach);
//! this binary is the cockpit that feeds them forms and shows what came
//! back, with a shared activity feed as the audit trail.

mod config;
mod tui;

use anyhow::Context;
use clap::Parser;
use config::{AppConfig, ConfigLayer};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "agentdeck-recruit",
    version,
    about = "Recruiting console: screening, postings, outreach"
)]
struct Args {
    /// Agent platform base URL.
    #[arg(long)]
    endpoint: Option<String>,

    /// User id sent with every inference call.
    #[arg(long)]
    user_id: Option<String>,

    /// API key for the agent platform.
    #[arg(long)]
    api_key: Option<String>,

    /// Resume screening agent id.
    #[arg(long)]
    screening: Option<String>,

    /// Posting optimizer/broadcast agent id.
    #[arg(long)]
    posting: Option<String>,

    /// Candidate outreach agent id.
    #[arg(long)]
    outreach: Option<String>,

    /// Config file path (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file. Without it, logging is off.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let file = config::load(args.config.as_deref())?;
    let flags = ConfigLayer {
        endpoint: args.endpoint,
        user_id: args.user_id,
        api_key: args.api_key,
        screening: args.screening,
        posting: args.posting,
        outreach: args.outreach,
    };
    let config = AppConfig::resolve(flags, file);

    tracing::info!(
        endpoint = %config.endpoint,
        screening = %config.screening,
        posting = %config.posting,
        outreach = %config.outreach,
        "Starting recruiting console"
    );
    tui::run(config);
    Ok(())
}

/// Logging goes to a file so it never fights the terminal UI. Without
/// `--log-file` no subscriber is installed and tracing calls are no-ops.
fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = tracing_subscriber::EnvFilter::try_from_env("AGENTDECK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
