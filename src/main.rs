mod advisor;
mod config;
mod errors;
mod extractor;
mod gemini;
mod handlers;
mod models;
mod prompts;
mod schemes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::advisor::AdvisorService;
use crate::config::Config;
use crate::gemini::GeminiClient;
use crate::schemes::SchemeCatalog;

/// Main entry point for the application.
///
/// Initializes logging, configuration, the scheme catalog, and the Gemini
/// client (when a usable key is configured), then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "financial_suitability_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // The catalog is fixed at startup and shared read-only
    let catalog = SchemeCatalog::new();
    tracing::info!("Scheme catalog loaded ({} schemes)", catalog.schemes().len());

    // Initialize the AI orchestrator only when a usable key exists; an
    // unconfigured deployment still serves /health and /api/schemes.
    let advisor = match config.gemini_api_key() {
        Some(key) => match GeminiClient::new(&config, key.to_string()) {
            Ok(client) => {
                tracing::info!("✓ Gemini client initialized: {}", config.gemini_model);
                Some(AdvisorService::new(client))
            }
            Err(e) => {
                tracing::error!("Failed to initialize Gemini client: {}", e);
                None
            }
        },
        None => {
            tracing::warn!("GEMINI_API_KEY not configured; analysis endpoints will return 503");
            None
        }
    };

    // Build application state
    let app_state = Arc::new(handlers::AppState {
        config: config.clone(),
        catalog,
        advisor,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/schemes", get(handlers::get_schemes))
        .route("/api/analyze-profile", post(handlers::analyze_profile))
        .route(
            "/api/get-recommendations",
            post(handlers::get_recommendations),
        )
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload (profiles are tiny)
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
