//! Buho Suite Vectors CLI
//!
//! Minimal host for running the node outside a workflow engine.

use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use buho_vectors_node::{
    description, BuhoVectors, ExecutionContext, NodeConfig, NodeHandle, NodeItem, ReqwestClient,
    Result, TrackedNode, NODE_DISPLAY_NAME,
};

#[derive(Parser)]
#[command(name = "buho-vectors")]
#[command(author, version, about = "Buho Suite Vectors node", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config.toml")]
        output: String,
    },

    /// Print the node description as JSON
    Describe,

    /// Run the node over a batch of items
    Run {
        /// JSON file holding an array of items; each item's fields override
        /// the parameters below
        #[arg(short, long)]
        input: Option<String>,

        #[arg(long)]
        account_id: Option<String>,

        #[arg(long)]
        kb_id: Option<String>,

        #[arg(long)]
        query_text: Option<String>,

        #[arg(long)]
        top_k: Option<i64>,

        /// Record item failures in the output instead of aborting
        #[arg(long)]
        continue_on_fail: bool,
    },
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    // Logs go to stderr so stdout carries only JSON output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Read input items. A JSON array is a batch, any other value one item.
fn load_items(path: Option<&str>) -> Result<Vec<NodeItem>> {
    let Some(path) = path else {
        return Ok(vec![NodeItem::new(JsonValue::Object(Default::default()))]);
    };

    let content = std::fs::read_to_string(path)?;
    let items = match serde_json::from_str::<JsonValue>(&content)? {
        JsonValue::Array(values) => values.into_iter().map(NodeItem::new).collect(),
        value => vec![NodeItem::new(value)],
    };
    Ok(items)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if Path::new(&cli.config).exists() {
        NodeConfig::load(&cli.config)?
    } else {
        NodeConfig::default()
    };

    init_logging(cli.verbose, &config.logging.level);

    match cli.command {
        Commands::Init { output } => {
            info!("Writing default configuration to: {}", output);
            NodeConfig::default().save(&output)?;
            info!("Configuration saved successfully");
        }

        Commands::Describe => {
            println!("{}", serde_json::to_string_pretty(&description())?);
        }

        Commands::Run {
            input,
            account_id,
            kb_id,
            query_text,
            top_k,
            continue_on_fail,
        } => {
            let items = load_items(input.as_deref())?;
            info!("Loaded {} input items", items.len());

            let client = Arc::new(ReqwestClient::from_config(&config.http)?);
            let node = TrackedNode::new(Arc::new(BuhoVectors::new(client)));

            let mut ctx = ExecutionContext::new(&description(), items)
                .with_node(NodeHandle::new(config.node.name.clone(), NODE_DISPLAY_NAME))
                .with_continue_on_fail(continue_on_fail || config.node.continue_on_fail);

            let overrides = [
                ("account_id", account_id.map(JsonValue::from)),
                ("kb_id", kb_id.map(JsonValue::from)),
                ("query_text", query_text.map(JsonValue::from)),
                ("top_k", top_k.map(JsonValue::from)),
            ];
            for (name, value) in overrides {
                if let Some(value) = value {
                    ctx = ctx.with_parameter(name, value);
                }
            }

            match node.execute_tracked(&ctx).await {
                Ok(output) => {
                    println!("{}", serde_json::to_string_pretty(&output)?);
                    let stats = node.stats().await;
                    info!(
                        "Done: {} records in {}ms",
                        stats.items_processed, stats.average_duration_ms
                    );
                }
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
