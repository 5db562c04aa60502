//! Automotive marketplace API
//!
//! Layered as routes → controllers → repositories, with models and DTOs
//! shared across the layers.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{http::StatusCode, middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::{cors::cors_layer, rate_limit::rate_limit_middleware, security::with_security_headers};
use crate::state::AppState;
use crate::utils::errors::ErrorResponse;

/// Builds the complete HTTP application around `state`.
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let rate_limit = state.rate_limit.clone();

    let router = Router::new()
        .route("/health", get(health))
        .nest("/auth", routes::auth_routes::create_auth_router())
        .nest("/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest("/users", routes::user_routes::create_user_router())
        .nest("/contact", routes::contact_routes::create_contact_router())
        .fallback(route_not_found)
        .layer(from_fn_with_state(rate_limit, rate_limit_middleware))
        .with_state(state);

    with_security_headers(router)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }
    }))
}

async fn route_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            message: "Route not found".to_string(),
            errors: None,
        }),
    )
}
