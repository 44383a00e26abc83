use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::metadata::{self, Metadata};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MetadataQuery {
    #[serde(default)]
    pub url: String,
}

pub async fn fetch_metadata(
    State(state): State<AppState>,
    Query(query): Query<MetadataQuery>,
) -> AppResult<Json<Metadata>> {
    let url = metadata::normalize_target_url(&query.url)?;

    let meta = metadata::fetch_metadata(
        &url,
        &state.config.user_agent,
        state.config.metadata_timeout,
    )
    .await;

    Ok(Json(meta))
}
