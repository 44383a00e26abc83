use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::bookmark::{self, Bookmark, BookmarkUpdate, NewBookmark};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListBookmarksQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
}

/// Parse a JSON request body whatever its content type.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body).map_err(|e| {
        debug!("Rejected request body: {}", e);
        AppError::InvalidJson
    })
}

pub async fn list_bookmarks(
    State(state): State<AppState>,
    Query(query): Query<ListBookmarksQuery>,
) -> AppResult<Json<Vec<Bookmark>>> {
    let bookmarks = match query.q {
        Some(q) => state.store.run(move |file| bookmark::search(file, &q)).await??,
        None => state.store.run(bookmark::list).await??,
    };

    Ok(Json(bookmarks))
}

pub async fn get_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Bookmark>> {
    let found = state
        .store
        .run(move |file| bookmark::find_by_id(file, &id))
        .await??
        .ok_or(AppError::BookmarkNotFound)?;

    Ok(Json(found))
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<Bookmark>)> {
    let req: NewBookmark = parse_body(&body)?;

    let created = state
        .store
        .run(move |file| bookmark::create(file, req))
        .await??;
    info!("Created bookmark {} ({})", created.id, created.url);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<Bookmark>> {
    let req: BookmarkUpdate = parse_body(&body)?;

    let updated = state
        .store
        .run(move |file| bookmark::update(file, &id, req))
        .await??;
    info!("Updated bookmark {}", updated.id);

    Ok(Json(updated))
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    let target = id.clone();
    let removed = state
        .store
        .run(move |file| bookmark::delete(file, &target))
        .await??;

    if !removed {
        return Err(AppError::BookmarkNotFound);
    }
    info!("Deleted bookmark {}", id);

    Ok(Json(DeleteResponse { ok: true }))
}
