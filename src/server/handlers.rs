//! HTTP route handlers

use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde_json::json;

/// Health check endpoint handler
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": crate::VERSION,
        "models": state.registry.len(),
    }))
}
