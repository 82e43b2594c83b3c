use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::{log::SetLoggerError, LogTracer};
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

/// Name attached to every bunyan record the service emits.
pub const SERVICE_NAME: &str = "newsletter-api";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to redirect `log` records into tracing")]
    LogTracer(#[from] SetLoggerError),
    #[error("a global tracing subscriber is already installed")]
    GlobalDefault(#[from] SetGlobalDefaultError),
}

/// Installs bunyan-formatted JSON logging for the whole process, writing to
/// `sink`. `RUST_LOG` takes precedence over `default_filter`.
///
/// Can only succeed once per process.
pub fn init<Sink>(name: &str, default_filter: &str, sink: Sink) -> Result<(), TelemetryError>
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    LogTracer::init()?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = Registry::default()
        .with(filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name.to_owned(), sink));
    set_global_default(registry)?;
    Ok(())
}
