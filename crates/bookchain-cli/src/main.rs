//! `bookchain` — run a polling bookchain node.
//!
//! Registers with the queue router, then polls on a fixed interval: new
//! blocks are validated and appended to the selected sink, chain requests
//! are answered with a full snapshot.

mod config;

use anyhow::Result;
use bookchain_client::RouterClient;
use bookchain_core::ChainValidator;
use bookchain_node::sink::{BlockSink, MemorySink, PrinterSink, RawDevice, SqliteSink};
use bookchain_node::{NodeConfig, NodeController};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bookchain", version, about = "Polling bookchain node")]
struct Cli {
    /// Config file path (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Queue router base URL (overrides the config file)
    #[arg(long, value_name = "URL", env = "BOOKCHAIN_ROUTER_URL")]
    router_url: Option<String>,

    /// Seconds between poll cycles (overrides the config file)
    #[arg(long, value_name = "SECS")]
    interval: Option<u64>,

    /// Accept every block without checking its hash link (consume-only mode)
    #[arg(long)]
    no_validate: bool,

    /// Storage backend for accepted blocks
    #[arg(long, value_enum, default_value_t = SinkKind::Memory)]
    sink: SinkKind,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SinkKind {
    /// In-process list, lost on exit
    Memory,
    /// SQLite database
    Sqlite,
    /// ESC/POS receipt printer (plus an in-process view)
    Printer,
}

fn build_config(cli: &Cli) -> Result<NodeConfig> {
    let mut config = config::load(cli.config.as_deref())?
        .unwrap_or_else(|| NodeConfig::with_router_url(""));

    if let Some(url) = &cli.router_url {
        config.router_url = url.clone();
    }
    if let Some(interval) = cli.interval {
        config.dequeue_interval_secs = interval;
    }
    if cli.no_validate {
        config.validate_hashes = false;
    }

    if config.router_url.is_empty() {
        anyhow::bail!("no router URL; pass --router-url or set router_url in the config file");
    }
    Ok(config)
}

fn build_sink(kind: SinkKind, config: &NodeConfig) -> Result<Box<dyn BlockSink>> {
    Ok(match kind {
        SinkKind::Memory => Box::new(MemorySink::new()),
        SinkKind::Sqlite => Box::new(SqliteSink::open(&config.database.path)?),
        SinkKind::Printer => {
            let device = RawDevice::open(&config.printer.device_path)?;
            Box::new(PrinterSink::new(device, &config.printer))
        }
    })
}

async fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;

    let client = RouterClient::builder(&config.router_url)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    let sink = build_sink(cli.sink, &config)?;
    let validator = ChainValidator::new(config.validate_hashes);

    let mut node = NodeController::new(client, sink, validator);
    node.start().await;
    info!(
        router = %config.router_url,
        interval_secs = config.dequeue_interval_secs,
        validate = config.validate_hashes,
        sink = ?cli.sink,
        "node started"
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(config.dequeue_interval_secs));
    // A slow cycle delays the next tick instead of stacking invocations;
    // cycles never run concurrently.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Consume the immediate tick; the first poll happens one interval after
    // startup.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if let Err(e) = node.poll().await {
            // Cycle-local failure; the next tick retries naturally.
            error!(error = %e, "poll cycle failed");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    run(Cli::parse()).await
}
