//! AI API endpoints (OpenAI compatible)
//!
//! Inference endpoints are forwarded verbatim to the caller's upstream; the
//! model endpoints are answered from the local registry.

mod models;
mod passthrough;

pub use models::{get_model, list_models, register_model};
pub use passthrough::{chat_completions, completions, embeddings};

use actix_web::web;

/// Configure AI API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .route("/chat/completions", web::post().to(chat_completions))
            .route("/completions", web::post().to(completions))
            .route("/embeddings", web::post().to(embeddings))
            .route("/models", web::get().to(list_models))
            .route("/models", web::post().to(register_model))
            // Model ids may themselves contain '/'
            .route(
                "/models/{provider_id}/{model_id:.+}",
                web::get().to(get_model),
            ),
    );
}
