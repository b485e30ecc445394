//! # Cosmos HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /` - Service root (empty body)
//! - `GET /health` - Health check
//! - `GET /scientists` - List scientists
//! - `POST /scientists` - Create a scientist
//! - `GET /scientists/{id}` - Scientist with its missions
//! - `PATCH /scientists/{id}` - Update name and/or field of study
//! - `DELETE /scientists/{id}` - Delete a scientist and its missions
//! - `GET /planets` - List planets
//! - `POST /missions` - Create a mission
//!
//! CORS origins, rate limit and body limit come from `HttpSettings`.

mod error;
mod handlers;
mod middleware;
mod types;

pub use error::ApiError;
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    CreateMissionRequest, CreateScientistRequest, ErrorResponse, HealthResponse,
    VALIDATION_ERRORS, ValidationErrorResponse, field_assignments,
};

use crate::config::HttpSettings;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use cosmos_core::Catalog;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the catalog.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RwLock<Catalog>>,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const CORS_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build the CORS layer.
///
/// - `["*"]`: all origins
/// - empty: localhost only
/// - otherwise: the listed origins; unparseable entries are skipped
fn build_cors_layer(settings: &HttpSettings) -> CorsLayer {
    match settings.cors_origins.as_slice() {
        [wildcard] if wildcard == "*" => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        [] => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
        origins => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => {
                        tracing::info!("CORS: Allowing origin: {}", origin);
                        Some(value)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!("CORS: No valid origins, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed)
                    .allow_methods(CORS_METHODS)
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
    }
}

fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5555",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5555",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the router with default HTTP settings.
pub fn create_router(state: AppState) -> Router {
    create_router_with(state, &HttpSettings::default())
}

/// Create the router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate limiting (if enabled)
pub fn create_router_with(state: AppState, settings: &HttpSettings) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::home_handler))
        .route("/health", get(handlers::health_handler))
        .route(
            "/scientists",
            get(handlers::list_scientists_handler).post(handlers::create_scientist_handler),
        )
        .route(
            "/scientists/{id}",
            get(handlers::get_scientist_handler)
                .patch(handlers::patch_scientist_handler)
                .delete(handlers::delete_scientist_handler),
        )
        .route("/planets", get(handlers::list_planets_handler))
        .route("/missions", post(handlers::create_mission_handler));

    if settings.rate_limit > 0 {
        tracing::info!(
            "Rate limiting enabled: {} requests/second",
            settings.rate_limit
        );
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(settings.rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(settings))
                .layer(axum::extract::DefaultBodyLimit::max(settings.body_limit)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Serve the catalog on `addr` until Ctrl-C.
pub async fn run_server(
    addr: &str,
    catalog: Catalog,
    settings: &HttpSettings,
) -> std::io::Result<()> {
    let router = create_router_with(AppState::new(catalog), settings);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Cosmos HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
