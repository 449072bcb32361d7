//! Tracing subscriber setup from the `logger` configuration section

use anyhow::{bail, Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use swxsoc_config::LoggerSettings;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// `log_file_format` value selecting JSON lines
pub const JSON_FORMAT: &str = "json";

/// Map a configured level name to a filter
///
/// Accepts Rust level names and the `WARNING`/`CRITICAL` spellings used by
/// existing configuration files, in any case.
///
/// # Errors
/// Fails for unknown names.
pub fn level_filter(level: &str) -> Result<LevelFilter> {
    let filter = match level.to_ascii_uppercase().as_str() {
        "TRACE" => LevelFilter::TRACE,
        "DEBUG" => LevelFilter::DEBUG,
        "INFO" => LevelFilter::INFO,
        "WARN" | "WARNING" => LevelFilter::WARN,
        "ERROR" | "CRITICAL" => LevelFilter::ERROR,
        "OFF" => LevelFilter::OFF,
        other => bail!("unknown log level '{other}'"),
    };
    Ok(filter)
}

/// Install the global subscriber
///
/// Console output goes to stderr at `log_level`, overridable with
/// `RUST_LOG`. With `log_to_file`, records at `log_file_level` are also
/// appended to `log_file_path`.
///
/// # Errors
/// Fails on unknown levels, an unwritable log file, or when a subscriber
/// is already installed.
pub fn init(settings: &LoggerSettings) -> Result<()> {
    let console_level = level_filter(&settings.log_level)?;
    let console_filter = EnvFilter::builder()
        .with_default_directive(console_level.into())
        .from_env_lossy();
    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(settings.use_color)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer(settings)?)
        .with(console)
        .try_init()
        .context("cannot install tracing subscriber")?;
    Ok(())
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn file_layer(settings: &LoggerSettings) -> Result<Option<BoxedLayer>> {
    if !settings.log_to_file {
        return Ok(None);
    }

    let path = PathBuf::from(&settings.log_file_path);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    let level = level_filter(&settings.log_file_level)?;

    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file));
    let layer: BoxedLayer = if settings.log_file_format.eq_ignore_ascii_case(JSON_FORMAT) {
        layer.json().with_filter(level).boxed()
    } else {
        layer.with_filter(level).boxed()
    };
    Ok(Some(layer))
}
