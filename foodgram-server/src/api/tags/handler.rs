//! Tag API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, tag};
use crate::utils::validation::validate_tag_create;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Tag, TagCreate};

/// GET /api/tags - all tags, ordered by slug
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Tag>>> {
    let tags = tag::find_all(&state.pool).await?;
    Ok(Json(tags))
}

/// GET /api/tags/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Tag>> {
    let t = tag::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Tag {}", id)))?;
    Ok(Json(t))
}

/// POST /api/tags - admin only
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<TagCreate>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    validate_tag_create(&payload)?;

    let t = tag::create(&state.pool, payload).await.map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::TagExists, msg),
        other => other.into(),
    })?;

    tracing::info!(tag_id = t.id, slug = %t.slug, admin = %current_user.username, "Tag created");
    Ok((StatusCode::CREATED, Json(t)))
}
