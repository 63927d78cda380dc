use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use slot_sync::apis::SourceEmulator;
use slot_sync::config::Config;
use slot_sync::pipeline::processing::normalize::{normalize_with_report, validate_normalized_data};
use slot_sync::server::{start_server, AppState};
use slot_sync::{logging, metrics};

#[derive(Parser)]
#[command(name = "slot_sync")]
#[command(about = "Normalizes appointment slots from a messy scheduling API")]
#[command(version = "1.0.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Path to the config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Normalize raw upstream records from a JSON file and print unified slots
    Normalize {
        /// JSON array of records, or a full mock API response
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the emulator's raw, mixed-format records
    Emit {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Accepts either a bare array of records or an envelope with a `data` array
fn read_records(path: &Path) -> anyhow::Result<Vec<Value>> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))?;

    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Array(records)) => Ok(records),
            _ => anyhow::bail!("{} has no `data` array", path.display()),
        },
        _ => anyhow::bail!("{} must contain a JSON array of records", path.display()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, config } => {
            metrics::init_metrics();

            let mut config = Config::load(config.as_deref())?;
            if let Some(port) = port {
                config.server.port = port;
            }
            let port = config.server.port;
            info!("Starting {} in {} mode", slot_sync::constants::SERVICE_NAME, config.server.environment);

            let state = AppState::from_config(config)?;
            start_server(state, port).await?;
        }
        Commands::Normalize { input, config } => {
            Config::load(config.as_deref())?;
            let records = read_records(&input)?;

            let (slots, report) = normalize_with_report(&records);
            if !validate_normalized_data(&slots) {
                warn!("Normalized output contains slots with empty fields");
            }

            println!("{}", serde_json::to_string_pretty(&slots)?);
            eprintln!(
                "📋 {} records, {} skipped, {} slots",
                report.records_seen, report.records_skipped, report.slots_produced
            );
        }
        Commands::Emit { config } => {
            let config = Config::load(config.as_deref())?;
            let emulator = SourceEmulator::load(Path::new(&config.mock_api.appointments_path));
            let records = emulator.generate_messy_response()?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}
