use crate::config::LogFormat;
use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Installs the global tracing subscriber. `RUST_LOG` overrides the filter.
pub fn init_tracing(app_name: &str, format: LogFormat) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match format {
        LogFormat::Json => {
            let subscriber = Registry::default()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(app_name.to_string(), std::io::stdout));
            set_global_default(subscriber)?;
        }
        LogFormat::Pretty => {
            let subscriber = Registry::default()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_target(true));
            set_global_default(subscriber)?;
        }
    }

    Ok(())
}
