use tracing::{subscriber::SetGlobalDefaultError, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::{log::SetLoggerError, LogTracer};
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("{0}")]
    LoggerError(#[from] SetLoggerError),
    #[error("{0}")]
    SubscriberError(#[from] SetGlobalDefaultError),
}

pub fn get_subscriber<S>(
    app_name: &str,
    log_level: &str,
    sink: S,
) -> impl Subscriber + Send + Sync
where
    S: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let formatting_layer = BunyanFormattingLayer::new(app_name.into(), sink);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Installs `sub` as the global default. Fails if a logger or subscriber is already set.
pub fn init_subscriber(sub: impl Subscriber + Send + Sync) -> Result<(), TelemetryError> {
    LogTracer::init()?;
    tracing::subscriber::set_global_default(sub)?;

    Ok(())
}
