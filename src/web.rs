use std::sync::Arc;

use anyhow::Result;
use axum::{Router, http::StatusCode, response::Json, routing::get};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, AppState};

/// Assemble the full application router
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(state))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(cors)
}

async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "OK",
            "message": "AQI display gateway is running",
        })),
    )
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "message": "Please use /api/aqi?city=CityName or /api/aqi?lat=40&lon=-73",
        })),
    )
}

pub async fn run(port: u16, state: Arc<AppState>) -> Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("AQI gateway running at http://localhost:{}", port);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
