use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use crate::api::{VerifyRequest, VerifyResponse};
use crate::error::Result;
use crate::gateway::Gateway;

pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/verify", post(verify))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(gateway)
}

async fn verify(
    State(gateway): State<Arc<Gateway>>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>> {
    let response = gateway.verify(&request).await?;
    Ok(Json(response))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "LLM Verification Backend"
    }))
}
