//! HTTP routes
//!
//! Every endpoint lives under `/api`; `/health` sits at the root.

pub mod dashboard_routes;
pub mod locality_routes;
pub mod mis_report_routes;
pub mod vehicle_routes;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::cors_middleware_with_origins;
use crate::state::AppState;

/// Full application router
pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.environment.max_upload_bytes;
    let request_timeout = state.config.environment.request_timeout;
    let cors = cors_middleware_with_origins(&state.config.secrets.cors_origins);

    let api = Router::new()
        .merge(dashboard_routes::create_dashboard_router())
        .merge(mis_report_routes::create_mis_report_router())
        .merge(locality_routes::create_locality_router())
        .merge(vehicle_routes::create_vehicle_router(max_upload_bytes));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "billing_tracker",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
