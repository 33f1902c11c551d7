//! Order contract client.
//!
//! Connects to a NEAR-style ledger, binds the deployed order contract, and
//! drives orders through it.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──▶ config ──┐
//!   dev-account ─────────────┤
//!   key store ──▶ wallet ────┤
//!                            ▼
//!                    lifecycle::startup ──▶ OrderClient
//!                                              │
//!                         change calls         │        view calls
//!                 ┌────────────────────────────┴──────────────────┐
//!                 ▼                                               ▼
//!     transaction (borsh, sign) ──▶ broadcast_tx_commit     query call_function
//!                 └──────────────▶ blockchain::client ◀───────────┘
//!                                   (JSON-RPC, reqwest)
//! ```

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use order_client::blockchain::BlockchainClient;
use order_client::config::{load_config, ClientConfig};
use order_client::lifecycle;
use order_client::observability::logging::init_logging;
use order_client::orders::{Order, OrderClient, OrderStatus};

#[derive(Parser)]
#[command(name = "order-client")]
#[command(about = "Create, read and update orders on a deployed order contract", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (overrides the configured level).
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, read, update and re-read a fresh order (default)
    Run,
    /// Create a new order
    Create {
        #[arg(short, long, default_value = lifecycle::startup::INITIAL_DESCRIPTION)]
        description: String,
        #[arg(short, long, default_value = "Pending")]
        status: OrderStatus,
    },
    /// Fetch an order by id
    Get { order_id: String },
    /// Update the description and optionally the status of an order
    Update {
        order_id: String,
        #[arg(short, long)]
        description: String,
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Show the status of the configured RPC node
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (config, base_dir) = match &cli.config {
        Some(path) => {
            let config = load_config(path)?;
            let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (config, base_dir)
        }
        None => (ClientConfig::default(), PathBuf::from(".")),
    };

    let level = cli.log_level.as_deref().unwrap_or(config.observability.log_level.as_str());
    init_logging(level);

    tracing::info!(
        network_id = %config.network.network_id,
        node_url = %config.network.node_url,
        "order-client v0.1.0 starting"
    );

    let result = execute(cli.command.unwrap_or(Commands::Run), &config, &base_dir).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Order client failed");
    }
    result
}

async fn execute(
    command: Commands,
    config: &ClientConfig,
    base_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Run => {
            let report = lifecycle::run(config, base_dir).await?;
            print_json(&report)?;
        }
        Commands::Create { description, status } => {
            let client = lifecycle::connect(config, base_dir).await?;
            let order = Order::new(description, status);
            let outcome = client.submit_create(&order).await?;
            print_json(&serde_json::json!({ "order": order, "outcome": outcome }))?;
        }
        Commands::Get { order_id } => {
            let client = lifecycle::connect(config, base_dir).await?;
            print_json(&client.fetch(&order_id).await?)?;
        }
        Commands::Update {
            order_id,
            description,
            status,
        } => {
            let client = lifecycle::connect(config, base_dir).await?;
            let order = overlay(&client, &order_id, &description, status).await?;
            let outcome = client.submit_update(&order).await?;
            print_json(&serde_json::json!({ "order": order, "outcome": outcome }))?;
        }
        Commands::Status => {
            let client = BlockchainClient::without_probe(config.network.clone())?;
            let status = client.status().await?;
            print_json(&serde_json::json!({
                "chain_id": status.chain_id,
                "latest_block_height": status.sync_info.latest_block_height,
                "latest_block_hash": status.sync_info.latest_block_hash,
            }))?;
        }
    }

    Ok(())
}

/// Current remote order with the requested fields overlaid.
async fn overlay(
    client: &OrderClient,
    order_id: &str,
    description: &str,
    status: Option<OrderStatus>,
) -> Result<Order, Box<dyn std::error::Error>> {
    let current = client.fetch(order_id).await?;
    let changed = current.with_description(description);
    Ok(match status {
        Some(status) => changed.with_status(status),
        None => changed,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
