//! Tracing subscriber setup
//!
//! Logs go to stderr (and optionally a file) so stdout stays usable for
//! exports. `RUST_LOG` takes precedence over the configured level.

use a11y_core::{LogFormat, LoggingConfig};
use anyhow::Context;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Filter directive for `config`, unless `RUST_LOG` is set
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

fn format_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

/// Open `path` for appending, creating its directory
fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))
}

/// Install the global subscriber
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let mut layers: Vec<BoxedLayer<Registry>> = Vec::new();

    if config.stderr {
        layers.push(format_layer(config.format, std::io::stderr, true));
    }

    if let Some(path) = config.file_path() {
        let file = open_log_file(&path)?;
        layers.push(format_layer(config.format, Mutex::new(file), false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter(config))
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}
