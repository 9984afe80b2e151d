//! Health check endpoints
//!
//! Reports whether the storage root is still a reachable directory, so a
//! deleted or unmounted root shows up before the first upload fails.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub storage_reachable: bool,
    pub encryption_at_rest: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage_reachable = tokio::fs::metadata(state.store().root())
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);

    Json(HealthResponse {
        status: if storage_reachable { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        service: "uploader-server",
        storage_reachable,
        encryption_at_rest: state.cipher().is_some(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}
