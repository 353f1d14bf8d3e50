//! # CoachSync API
//!
//! The web server for the CoachSync scheduling service: coaches publish
//! availability slots, students book them and coaches leave feedback.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Validate requests and drive the slot store
//! - **Middleware**: Error-to-HTTP mapping
//! - **Config**: Environment configuration
//!
//! Persistence is reached only through [`SlotStore`], so the router can be
//! served against PostgreSQL or the in-memory store.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Cross-cutting request/response concerns
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use coachsync_core::store::SlotStore;
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use coachsync_api::ApiState;
/// use coachsync_db::MemoryStore;
///
/// let state = Arc::new(ApiState::new(Arc::new(MemoryStore::new())));
/// ```
pub struct ApiState {
    /// Store holding persons and slots
    pub store: Arc<dyn SlotStore>,
}

impl ApiState {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }
}

/// Builds the application router with every route and middleware layer.
///
/// # Errors
///
/// Fails if a configured CORS origin is not a valid header value.
pub fn build_router(state: Arc<ApiState>, config: &config::ApiConfig) -> Result<Router> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin '{}'", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(origins);

    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Slot scheduling endpoints
        .merge(routes::slot::routes())
        // Person directory endpoints
        .merge(routes::person::routes())
        // Attach shared state to all routes
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
                .layer(cors),
        );

    Ok(app)
}

/// Starts the API server with the provided configuration and store
///
/// Installs the tracing subscriber, builds the router and serves it until the
/// listener fails.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use coachsync_api::config::ApiConfig;
/// use coachsync_db::{create_pool, PgSlotStore};
///
/// # async fn run() -> eyre::Result<()> {
/// let config = ApiConfig::from_env()?;
/// let pool = create_pool(&config.database_url).await?;
/// coachsync_api::start_server(config, Arc::new(PgSlotStore::new(pool))).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn SlotStore>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(store));
    let app = build_router(state, &config)?;

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
