//! Quote Desk server binary.

use std::sync::Arc;

use axum::Router;
use tokio::sync::watch;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use quote_desk::adapters::ai::provider_from_config;
use quote_desk::adapters::email::{SendGridConfig, SendGridDelivery};
use quote_desk::adapters::http::api_router;
use quote_desk::application::{HandleTurnHandler, IdleSweeper, IdleSweeperConfig, SessionRegistry};
use quote_desk::config::{AppConfig, ServerConfig};
use quote_desk::domain::form::ExtractionEngine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let engine = Arc::new(ExtractionEngine::new()?);
    tracing::info!(rules = engine.rules().len(), "extraction rules compiled");

    let dialogue = provider_from_config(&config.ai)?;
    let delivery = Arc::new(SendGridDelivery::new(SendGridConfig::new(
        config.email.base_url.clone(),
        config.email.timeout(),
    ))?);

    if !config.email.has_api_key() || !config.email.has_from_email() {
        tracing::warn!(
            api_key_configured = config.email.has_api_key(),
            sender_configured = config.email.has_from_email(),
            "email settings incomplete; dispatch requests will report the missing value"
        );
    }

    let handler = HandleTurnHandler::new(engine, dialogue, delivery, config.email.clone())
        .with_generation(config.ai.generation());
    let registry = Arc::new(SessionRegistry::new(handler));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = match config.server.session_idle_timeout() {
        Some(max_idle) => {
            let sweeper = IdleSweeper::new(
                Arc::clone(&registry),
                IdleSweeperConfig {
                    sweep_interval: config.server.session_sweep_interval(),
                    max_idle,
                },
            );
            Some(tokio::spawn(async move { sweeper.run(shutdown_rx).await }))
        }
        None => {
            tracing::info!("idle session eviction disabled");
            None
        }
    };

    let app = with_layers(api_router(registry), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, provider = config.ai.provider.as_str(), "quote desk listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // receiver may already be gone when eviction is disabled
    let _ = shutdown_tx.send(true);
    if let Some(sweeper) = sweeper {
        sweeper.await?;
    }

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if server.json_logs() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn with_layers(router: Router, server: &ServerConfig) -> Router {
    router
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
