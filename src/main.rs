// src/main.rs

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use strum::IntoEnumIterator;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use vanguard_orchestrator::core::scanner;
use vanguard_orchestrator::logging::initialize_logging;
use vanguard_orchestrator::{Category, ScanContext, ScanToggles, ScannerConfig, SecurityScanner};

#[derive(Debug, Parser)]
#[command(name = "vanguard-orchestrator", version, about = "Runs security scans through the Vanguard scanning service")]
struct Cli {
    /// Scanning service root, e.g. http://localhost:3001/
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-probe timeout in seconds (0 disables it)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Maximum probes in flight per category
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Mirror debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the default scans of every selected category
    Full {
        target: String,
        #[arg(long)]
        network: bool,
        #[arg(long)]
        vulnerability: bool,
        #[arg(long)]
        recon: bool,
    },
    /// Run specific scans of one category
    Run {
        category: Category,
        target: String,
        #[arg(required = true)]
        scans: Vec<String>,
    },
    /// List the scans each category offers
    Catalog { category: Option<Category> },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    initialize_logging(cli.verbose)?;

    let mut config = ScannerConfig::load()?;
    if let Some(base_url) = &cli.base_url {
        config.set_base_url(base_url)?;
    }
    if let Some(timeout) = cli.timeout {
        config.probe_timeout_secs = timeout;
    }
    if let Some(concurrency) = cli.concurrency {
        config.max_concurrency = concurrency;
    }
    config.validate()?;

    match cli.command {
        Command::Catalog { category } => print_catalog(category),
        Command::Full { target, network, vulnerability, recon } => {
            let toggles = ScanToggles { network, vulnerability, recon };
            let orchestrator = SecurityScanner::new(&config)?;
            let ctx = cancel_on_ctrl_c(&config);
            let report = orchestrator.perform_full_scan_with(&target, toggles, &ctx).await?;
            print_json(&report)
        }
        Command::Run { category, target, scans } => {
            let orchestrator = SecurityScanner::new(&config)?;
            let scanner = orchestrator
                .scanner(category)
                .ok_or_else(|| eyre!("no scanner for the {category} category"))?;
            let ctx = cancel_on_ctrl_c(&config);
            let report = scanner.run_selected_scans_with(&target, &scans, &ctx).await;
            print_json(&report)
        }
    }
}

/// A batch context that cancels in-flight probes on Ctrl-C.
fn cancel_on_ctrl_c(config: &ScannerConfig) -> ScanContext {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling in-flight probes.");
            trigger.cancel();
        }
    });
    ScanContext::with_token(token, config.probe_timeout())
}

fn print_catalog(category: Option<Category>) -> Result<()> {
    let categories: Vec<Category> = match category {
        Some(c) => vec![c],
        None => Category::iter().collect(),
    };
    for category in categories {
        println!("{}:", category.title());
        let defaults = scanner::default_scans(category);
        for spec in scanner::probe_table(category) {
            let marker = if defaults.contains(&spec.id) { "*" } else { " " };
            println!("  {marker} {:<22} {}", spec.id, spec.name);
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).wrap_err("failed to render report")?;
    println!("{rendered}");
    info!("Report written to stdout.");
    Ok(())
}
