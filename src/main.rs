//! TrueMeter API Server
//!
//! Loads the mileage regressor and fraud classifier once, then serves
//! fraud checks over HTTP. A missing or broken model aborts startup.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use truemeter_api::config::{self, CorsOrigins};
use truemeter_api::detection::FraudDetector;
use truemeter_api::inference::GbdtModels;
use truemeter_api::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "truemeter_api=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // Load configuration
    let config = config::Config::from_env();

    tracing::info!("{} v{} starting...", config::API_TITLE, env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.environment);
    if config.is_production() && config.cors.origins == CorsOrigins::Any {
        tracing::warn!("CORS_ORIGINS allows any origin in production");
    }

    // Load models
    let models = GbdtModels::load(
        &config.regressor_path,
        &config.classifier_path,
        config.detection.default_fraud_threshold,
    )
    .context("Failed to load models")?;

    let detector = FraudDetector::new(Arc::new(models), config.detection.clone());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.host, config.port))?;

    // Build router
    let app = create_router(AppState::new(detector, config));

    // Start server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Application shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
