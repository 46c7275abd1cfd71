use anyhow::{Context, Result};
use minutes_studio::config::{AppConfig, BackendKind};
use minutes_studio::gateway::{AiGateway, GeminiGateway};
use minutes_studio::store::{FileBackend, LocalStore, MemoryBackend};
use minutes_studio::ui::{self, AppState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minutes_studio=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Minutes Studio");

    let config = AppConfig::from_env().context("Invalid configuration")?;
    if config.backend == BackendKind::Gemini && config.gemini.api_key.is_none() {
        warn!("No API key configured; gateway calls will fail until GEMINI_API_KEY is set");
    }

    let store = open_store(&config);
    let gateway = connect(&config)?;
    let state = AppState::new(store, gateway).context("Failed to start gateway worker")?;

    ui::run(state).map_err(|e| anyhow::anyhow!("UI error: {e}"))
}

/// File-backed store, or an in-memory one if the data directory is unusable
fn open_store(config: &AppConfig) -> LocalStore {
    match FileBackend::open(&config.data_dir) {
        Ok(backend) => {
            info!("Data directory: {}", backend.dir().display());
            LocalStore::new(backend)
        }
        Err(e) => {
            warn!(
                "Cannot use {} ({}), data will not be kept after exit",
                config.data_dir.display(),
                e
            );
            LocalStore::new(MemoryBackend::new())
        }
    }
}

fn connect(config: &AppConfig) -> Result<Arc<dyn AiGateway>> {
    match config.backend {
        BackendKind::Gemini => Ok(Arc::new(GeminiGateway::new(config.gemini.clone())?)),
        #[cfg(feature = "local-models")]
        BackendKind::Local => Ok(Arc::new(minutes_studio::gateway::LocalGateway::new(
            config.local.clone(),
        )?)),
        #[cfg(not(feature = "local-models"))]
        BackendKind::Local => anyhow::bail!("the local backend requires the `local-models` feature"),
    }
}
