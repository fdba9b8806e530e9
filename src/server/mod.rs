mod handlers;
mod state;

pub use state::AppState;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{ConfigError, Settings};

fn cors_layer(settings: &Settings) -> Result<CorsLayer, ConfigError> {
    let origins = settings
        .cors_origins()
        .into_iter()
        .map(|o| HeaderValue::from_str(&o).map_err(|_| ConfigError::InvalidOrigin(o)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
        .allow_headers(Any))
}

pub fn build_router(state: Arc<AppState>) -> Result<Router, ConfigError> {
    let cors = cors_layer(&state.settings)?;

    Ok(Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/weather/current", get(handlers::current_weather))
        .route("/api/weather/charlotte", get(handlers::charlotte_weather))
        .route("/api/events/search", get(handlers::search_events))
        .route("/api/attractions/search", get(handlers::search_attractions_handler))
        .route("/api/distance", get(handlers::distance))
        .layer(cors)
        .with_state(state))
}

pub async fn start(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", settings.host, settings.port);
    let state = Arc::new(AppState::new(settings)?);
    let app = build_router(state)?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Cannot bind to {}: {}", addr, e))?;

    tracing::info!("Charlotte Guide API listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
