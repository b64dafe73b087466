//! menu-portal: command-line front end for the menu projection engine
//!
//! Reads institution and plan records from a data directory and prints
//! institution-scoped projections, placeholder weeks and registries as JSON.
//! Also refreshes the institution snapshot frozen into a published week.

mod cli;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use menu_projection::{
    FileStore, ProjectionEngine, RegistryCache, RegistrySource, StaticRegistrySource,
    YamlRegistrySource,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{execute_command, Portal, PortalCommands};
use config::PortalConfig;

#[derive(Parser)]
#[command(name = "menu-portal")]
#[command(about = "Institution-scoped projections of weekly canteen menus")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "menu-portal.yaml", env = "MENU_PORTAL_CONFIG")]
    config: PathBuf,

    /// Data directory (overrides config file)
    #[arg(short, long, env = "MENU_PORTAL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Registry file (overrides config file)
    #[arg(long, env = "MENU_PORTAL_REGISTRY")]
    registry: Option<PathBuf>,

    /// Default log level (overrides config file)
    #[arg(long, env = "MENU_PORTAL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "MENU_PORTAL_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: PortalCommands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load or create default config
    let (mut config, found) = PortalConfig::load_or_default(&cli.config)?;

    // Apply CLI overrides
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(registry) = cli.registry {
        config.registry_file = Some(registry);
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }
    if cli.json_logs {
        config.json_logs = true;
    }

    init_tracing(&config)?;

    if !found {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }
    info!(data_dir = %config.data_dir.display(), "Opening record store");

    let source: Arc<dyn RegistrySource> = match &config.registry_file {
        Some(path) => Arc::new(YamlRegistrySource::new(path.clone())),
        None => Arc::new(StaticRegistrySource::builtin()),
    };
    info!(source = %source.describe(), "Registry source");

    let store = Arc::new(FileStore::new(config.data_dir.clone()));
    let registries = Arc::new(RegistryCache::new(source));
    let engine = ProjectionEngine::new(store.clone(), registries.clone())
        .with_config(config.engine.clone());
    let portal = Portal::new(store, registries, engine);

    match execute_command(&portal, cli.command).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(config: &PortalConfig) -> anyhow::Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::try_new(format!("menu_portal={0},menu_projection={0}", config.log_level))?,
    };

    // Logs go to stderr so stdout stays a clean JSON document
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
