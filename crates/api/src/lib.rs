//! # SlotShare API
//!
//! The API crate provides the web server for shared schedules: the operator
//! endpoints behind the creation wizard and schedule editor, and the public
//! endpoints patients use through a share link.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Operator identification and error mapping
//! - **Config**: Handle environment and application configuration
//!
//! Handlers only talk to a [`ScheduleStore`], so the router runs the same over
//! PostgreSQL in production and an in-memory store in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Operator identification and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
};
use eyre::{Result, WrapErr};
use slotshare_core::store::ScheduleStore;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::middleware::auth::PROFESSIONAL_ID_HEADER;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Backend holding options, appointments and shared schedules
    pub store: Arc<dyn ScheduleStore>,
    /// Origin that share links are built on
    pub public_base_url: String,
}

impl ApiState {
    pub fn new(store: Arc<dyn ScheduleStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into(),
        }
    }
}

/// Builds the router with every endpoint and request tracing, without CORS
/// or timeouts. Tests serve this directly.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Options for the wizard pickers
        .merge(routes::options::routes())
        // Conflict checks and token availability
        .merge(routes::conflicts::routes())
        // Operator schedule management
        .merge(routes::shared_schedule::routes())
        // Patient-facing share link endpoints
        .merge(routes::public::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(PROFESSIONAL_ID_HEADER),
        ])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Starts the API server with the provided configuration and store
///
/// Sets up logging, applies CORS and the request timeout, and serves until
/// the process is stopped.
///
/// # Example
///
/// ```rust,ignore
/// let config = ApiConfig::from_env()?;
/// let pool = slotshare_db::create_pool(&config.database_url).await?;
/// start_server(config, Arc::new(PgScheduleStore::new(pool))).await?;
/// ```
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn ScheduleStore>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(store, config.public_base_url.clone()));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(axum::error_handling::HandleErrorLayer::new(
                middleware::error_handling::handle_timeout,
            ))
            .timeout(config.request_timeout)
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    info!("Share links use {}", config.public_base_url);
    axum::serve(listener, app).await?;

    Ok(())
}
