use axum::{extract::State, Json};
use serde::Serialize;

use crate::version::{GIT_VERSION, PKG_VERSION};
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    ok: bool,
    port: u16,
    version: &'static str,
    git_version: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        port: state.config.server_port,
        version: PKG_VERSION,
        git_version: GIT_VERSION,
    })
}
