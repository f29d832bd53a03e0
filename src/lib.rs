//! TrueMeter API
//!
//! Odometer fraud detection for used-car listings.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       TRUEMETER API                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌────────────────────┐ │
//! │  │  HTTP     │   │  Fraud       │   │  GBDT Models       │ │
//! │  │  Gateway  │──▶│  Detector    │──▶│  regressor +       │ │
//! │  │  (Axum)   │   │  (features)  │   │  classifier        │ │
//! │  └───────────┘   └──────────────┘   └─────────┬──────────┘ │
//! │                                               ▼             │
//! │                                     ┌──────────────────┐   │
//! │                                     │ JSON artifacts   │   │
//! │                                     └──────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod detection;
pub mod error;
pub mod extract;
pub mod gbdt;
pub mod handlers;
pub mod inference;
pub mod models;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

use config::{Config, CorsConfig, CorsOrigins};
use detection::FraudDetector;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<FraudDetector>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(detector: FraudDetector, config: Config) -> Self {
        Self {
            detector: Arc::new(detector),
            config: Arc::new(config),
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs.max(1));

    Router::new()
        // Health
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::check))

        // Fraud detection
        .route("/api/check", post(handlers::check::check))

        // Documentation
        .route(handlers::docs::OPENAPI_PATH, get(handlers::docs::openapi))
        .route("/docs", get(handlers::docs::swagger_ui))
        .route("/redoc", get(handlers::docs::redoc))

        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors))
        .with_state(state)
}

/// Build the CORS layer from the allow-list
///
/// Browsers refuse a literal `*` on credentialed requests, so with
/// credentials enabled the request's own origin, method and headers are
/// echoed back instead.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.origins == CorsOrigins::Any && !cors.allow_credentials {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origin = match &cors.origins {
        CorsOrigins::Any => AllowOrigin::mirror_request(),
        CorsOrigins::List(list) => AllowOrigin::list(list.iter().filter_map(|o| {
            HeaderValue::from_str(o)
                .map_err(|_| tracing::warn!("Ignoring invalid CORS origin: {}", o))
                .ok()
        })),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cors.allow_credentials)
}
