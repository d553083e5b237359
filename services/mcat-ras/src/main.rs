//! HEC-RAS model catalog tool.
//!
//! Reads a model from object storage by the key of its project file and
//! prints the requested metadata as JSON.

mod config;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::AppConfig;
use ras_model::{is_a_model, ExtractionConfig, RasModel};
use storage::{ModelStore, ObjectStorage};

#[derive(Parser, Debug)]
#[command(name = "mcat-ras")]
#[command(about = "Model catalog for HEC-RAS models in object storage")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Whether the key is the project file of a valid model
    IsAModel { definition_file: String },
    /// Model type
    ModelType { definition_file: String },
    /// Program versions of the model's files
    ModelVersion { definition_file: String },
    /// Whether every geometry file carries georeferenced coordinates
    IsGeospatial { definition_file: String },
    /// Summary of the model's files
    Index { definition_file: String },
    /// Vector features of every geometry file
    GeospatialData {
        definition_file: String,
        /// Destination EPSG code (default: DESTINATION_CRS or 4326)
        #[arg(long)]
        epsg: Option<String>,
    },
    /// Boundary conditions of every flow file
    ForcingData { definition_file: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = AppConfig::from_env()?;
    let store: Arc<dyn ModelStore> = Arc::new(ObjectStorage::new(&config.storage)?);
    info!(command = ?args.command, "Running");

    match args.command {
        Command::IsAModel { definition_file } => {
            print_json(&is_a_model(store, &definition_file).await)
        }
        Command::ModelType { definition_file } => {
            let model = RasModel::assemble(store, &definition_file).await?;
            print_json(&model.model_type())
        }
        Command::ModelVersion { definition_file } => {
            let model = RasModel::assemble(store, &definition_file).await?;
            print_json(&model.version())
        }
        Command::IsGeospatial { definition_file } => {
            let model = RasModel::assemble(store, &definition_file).await?;
            print_json(&model.is_geospatial())
        }
        Command::Index { definition_file } => {
            let model = RasModel::assemble(store, &definition_file).await?;
            print_json(&model.index()?)
        }
        Command::GeospatialData {
            definition_file,
            epsg,
        } => {
            let destination_epsg = match epsg {
                Some(raw) => config::parse_epsg(&raw)?,
                None => config.destination_epsg,
            };
            let model = RasModel::assemble(store, &definition_file).await?;
            let data = model
                .geospatial_data(&ExtractionConfig { destination_epsg })
                .await?;
            print_json(&data)
        }
        Command::ForcingData { definition_file } => {
            let model = RasModel::assemble(store, &definition_file).await?;
            print_json(&model.forcing_data().await?)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
