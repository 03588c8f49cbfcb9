// ChatRelay Backend Entry Point
// Rule-based pre-processing in front of an ordered list of LLM providers

mod api;
mod assistant;
mod brain;
mod config;
mod database;
mod error;
mod models;
mod preflight;
mod providers;
mod rate_limiter;
mod response;
mod telemetry;

#[cfg(test)]
mod tests;

use anyhow::Context;
use assistant::{Assistant, AssistantSettings};
use config::AppConfig;
use providers::ProviderRouter;
use rate_limiter::RateLimiter;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal in production.
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    telemetry::init_tracing(env!("CARGO_PKG_NAME"), config.log_format)?;

    info!(
        bind_addr = %config.bind_addr,
        assistant = %config.assistant_name,
        providers = ?config.providers,
        "Starting chatrelay"
    );
    if config.providers.is_empty() {
        warn!("No provider has an API key; routed messages will get the fallback reply");
    }

    let pool = database::init_db(&config.database_url)
        .await
        .context("Failed to initialize database")?;

    let client = reqwest::Client::builder()
        .connect_timeout(config.provider_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let router = ProviderRouter::new(
        providers::build_providers(&config.providers, client, &config.assistant_name),
        config.provider_timeout,
    );
    let assistant = Assistant::new(pool.clone(), router, AssistantSettings::from(&config));
    let state = api::AppState::new(
        assistant,
        RateLimiter::per_minute(config.rate_limit_per_minute),
    );

    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
