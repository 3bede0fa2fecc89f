use anyhow::{Context, Result};
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = match &config.file_path {
        Some(file_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)
                .with_context(|| format!("Failed to open log file {}", file_path))?;
            BoxMakeWriter::new(std::sync::Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_target(false).with_writer(writer))
            .try_init(),
        _ => registry
            .with(fmt::layer().with_target(false).with_writer(writer))
            .try_init(),
    }
    .context("Failed to install tracing subscriber")?;

    tracing::debug!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(())
}
