use std::fs::File;
use std::sync::Arc;

use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::{FHVConfig, FHVError};

// The terminal is owned by the TUI, logs go to a file or nowhere
pub fn init(config: &FHVConfig) -> Result<(), FHVError> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fhv=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| FHVError::LoggingFailed(e.to_string()))?;
    info!("Logging to {}", path.display());
    Ok(())
}
