use std::fs::{self, File};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use simflow::config::{Config, Settings};
use simflow::ui::App;
use simflow_core::flow::HttpFlowApi;
use simflow_core::store::{FileStore, KeyValueStore, MemoryStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging (the terminal belongs to the UI, so logs go to a file)
    if let Some(log_path) = cli.log_path() {
        if let Err(e) = setup_logging(cli.debug, &log_path) {
            eprintln!("Logging disabled: {:#}", e);
        }
    }

    // Load settings
    let mut settings = Settings::load(cli.config.as_ref())?;
    settings.merge_cli(&cli);
    settings.validate();

    let store = build_store(&settings);
    let api = Arc::new(HttpFlowApi::new(
        &settings.api.base_url,
        Duration::from_secs(settings.api.timeout_secs),
    ));
    info!("Using flow service at {}", api.base_url());

    // Run the application
    let mut app = App::new(settings, api, store);
    app.run(cli.card).await
}

fn build_store(settings: &Settings) -> Arc<dyn KeyValueStore> {
    if settings.store.disabled {
        info!("Card number persistence disabled");
        return Arc::new(MemoryStore::new());
    }

    match settings.store.path.clone().or_else(FileStore::default_path) {
        Some(path) => {
            info!("Persisting card number in {:?}", path);
            Arc::new(FileStore::new(path))
        }
        None => {
            warn!("No data directory available, card number will not be remembered");
            Arc::new(MemoryStore::new())
        }
    }
}

fn setup_logging(debug: bool, log_path: &Path) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("simflow=debug,simflow_core=debug")
    } else {
        EnvFilter::new("simflow=info,simflow_core=info")
    };

    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {:?}", dir))?;
    }
    let file = File::create(log_path)
        .with_context(|| format!("Failed to create log file: {:?}", log_path))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}
