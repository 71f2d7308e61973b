//! Model listing, retrieval and runtime registration endpoints

use crate::core::registry::{ModelEntry, ModelType, NotFoundError};
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One model in OpenAI list format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// `provider_id/model_id`
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
    pub model_type: ModelType,
}

impl Model {
    fn from_entry(entry: &ModelEntry, created: i64) -> Self {
        Self {
            id: entry.identifier(),
            object: "model".to_string(),
            created,
            owned_by: entry.provider_id.clone(),
            model_type: entry.model_type,
        }
    }
}

/// Model list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelListResponse {
    pub object: String,
    pub data: Vec<Model>,
}

/// Runtime registration body
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterModelRequest {
    pub provider_id: String,
    pub model_id: String,
    #[serde(default)]
    pub model_type: ModelType,
}

/// List registered models
pub async fn list_models(state: web::Data<AppState>) -> HttpResponse {
    let created = chrono::Utc::now().timestamp();
    let data: Vec<Model> = state
        .registry
        .list_models()
        .iter()
        .map(|entry| Model::from_entry(entry, created))
        .collect();

    debug!("Listing {} registered models", data.len());
    HttpResponse::Ok().json(ModelListResponse {
        object: "list".to_string(),
        data,
    })
}

/// Get one registered model
pub async fn get_model(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, GatewayError> {
    let (provider_id, model_id) = path.into_inner();

    let entry = state
        .registry
        .get_model(&provider_id, &model_id)
        .ok_or(NotFoundError::Model {
            provider_id,
            model_id,
        })?;

    Ok(HttpResponse::Ok().json(Model::from_entry(&entry, chrono::Utc::now().timestamp())))
}

/// Register a model while running. Disabled unless `registration.allow_runtime`.
pub async fn register_model(
    state: web::Data<AppState>,
    request: web::Json<RegisterModelRequest>,
) -> Result<HttpResponse, GatewayError> {
    if !state.config.registration().allow_runtime {
        return Err(GatewayError::forbidden("runtime model registration is disabled"));
    }

    let request = request.into_inner();
    if request.provider_id.trim().is_empty() || request.model_id.trim().is_empty() {
        return Err(GatewayError::bad_request(
            "provider_id and model_id must be non-empty",
        ));
    }

    // A model under an unknown provider could never be routed
    if state.registry.snapshot().provider(&request.provider_id).is_none() {
        return Err(NotFoundError::Provider {
            provider_id: request.provider_id,
            model_id: request.model_id,
        }
        .into());
    }

    let entry = ModelEntry::new(request.provider_id, request.model_id, request.model_type);
    state.registry.register(entry.clone())?;
    info!(model = %entry.identifier(), "Registered model at runtime");

    Ok(HttpResponse::Created().json(Model::from_entry(&entry, chrono::Utc::now().timestamp())))
}
