use std::path::PathBuf;

pub use crate::logging::error::LogError;
use crate::logging::opentelemetry::init_tracer;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

mod error;
mod opentelemetry;

pub const DEFAULT_OTLP_TRACES_ENDPOINT: &str = "http://localhost:8318/v1/traces";

/// Filter used when neither the config nor `RUST_LOG` provides one.
pub const DEFAULT_FILTER: &str = "revocation_core=info";

pub struct LoggingConfig {
    pub log_file: Option<PathBuf>,
    pub stderr: bool,
    /// OTLP/HTTP traces endpoint; `None` disables OpenTelemetry export.
    pub opentelemetry: Option<String>,
    /// `EnvFilter` directives for the file and stderr layers.
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn new(log_file: Option<PathBuf>, stderr: bool, opentelemetry: Option<String>) -> Self {
        Self {
            log_file,
            stderr,
            opentelemetry,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, LogError> {
        let directives = match &self.filter {
            Some(filter) => filter.clone(),
            None => std::env::var(EnvFilter::DEFAULT_ENV)
                .unwrap_or_else(|_| DEFAULT_FILTER.to_string()),
        };
        EnvFilter::try_new(&directives)
            .map_err(|e| LogError::InitError(format!("invalid filter '{directives}': {e}")))
    }
}

struct EmptyLayer;

impl Layer<Registry> for EmptyLayer {}

/// Installs the global subscriber described by `config`.
pub fn init(config: LoggingConfig) -> Result<(), LogError> {
    init_logging::<EmptyLayer>(config, None)
}

/// Like [`init`], with one caller-provided layer closest to the registry.
pub fn init_logging<L>(config: LoggingConfig, extra_layer: Option<L>) -> Result<(), LogError>
where
    L: Layer<Registry> + Send + Sync,
{
    let subscriber = Registry::default().with(extra_layer);

    let file_layer = match &config.log_file {
        Some(log_file) => {
            let log_file =
                std::fs::File::create(log_file).map_err(|e| LogError::InitError(e.to_string()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(log_file)
                    .with_ansi(false)
                    .with_filter(config.env_filter()?),
            )
        }
        None => None,
    };
    let subscriber = subscriber.with(file_layer);

    let opentelemetry_layer = match config.opentelemetry.as_deref() {
        Some(endpoint) => Some(OpenTelemetryLayer::new(init_tracer(endpoint)?)),
        None => None,
    };
    let subscriber = subscriber.with(opentelemetry_layer);

    let stderr_layer = if config.stderr {
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(config.env_filter()?),
        )
    } else {
        None
    };
    let subscriber = subscriber.with(stderr_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LogError::InitError(e.to_string()))
}
