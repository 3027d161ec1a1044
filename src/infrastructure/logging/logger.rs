use super::config::{LogConfig, LogFormat, LogStream};
use anyhow::{Context, Result};
use std::io;
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logger implementation using tracing
pub struct LoggerImpl;

impl LoggerImpl {
    /// Install the global subscriber described by `config`
    ///
    /// # Errors
    /// Returns an error if the level is unknown or a global subscriber is
    /// already installed
    pub fn init(config: &LogConfig) -> Result<Self> {
        let default_level = parse_log_level(&config.level)?;

        let env_filter = EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy();

        let layer = match config.format {
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer(config.stream))
                .with_current_span(true)
                .with_target(true)
                .with_filter(env_filter)
                .boxed(),
            LogFormat::Pretty => tracing_subscriber::fmt::layer()
                .with_writer(make_writer(config.stream))
                .with_target(true)
                .with_filter(env_filter)
                .boxed(),
        };

        tracing_subscriber::registry()
            .with(layer)
            .try_init()
            .context("Failed to install global tracing subscriber")?;

        tracing::info!(
            level = %config.level,
            format = ?config.format,
            stream = ?config.stream,
            "logger initialized"
        );

        Ok(Self)
    }
}

fn make_writer(stream: LogStream) -> BoxMakeWriter {
    match stream {
        LogStream::Stdout => BoxMakeWriter::new(io::stdout),
        LogStream::Stderr => BoxMakeWriter::new(io::stderr),
    }
}

/// Parse log level string to Level
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}
