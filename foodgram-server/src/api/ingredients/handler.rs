//! Ingredient API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, ingredient};
use crate::utils::validation::validate_ingredient_create;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Ingredient, IngredientCreate};

#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    /// Case-insensitive name prefix
    pub name: Option<String>,
}

/// GET /api/ingredients?name= - unpaginated, ordered by name
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<IngredientQuery>,
) -> AppResult<Json<Vec<Ingredient>>> {
    let rows = ingredient::find_all(&state.pool, query.name.as_deref()).await?;
    Ok(Json(rows))
}

/// GET /api/ingredients/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Ingredient>> {
    let row = ingredient::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Ingredient {}", id)))?;
    Ok(Json(row))
}

/// POST /api/ingredients - admin only
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<IngredientCreate>,
) -> AppResult<(StatusCode, Json<Ingredient>)> {
    validate_ingredient_create(&payload)?;

    let row = ingredient::create(&state.pool, payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::IngredientExists, msg),
            other => other.into(),
        })?;

    tracing::info!(ingredient_id = row.id, name = %row.name, admin = %current_user.username, "Ingredient created");
    Ok((StatusCode::CREATED, Json(row)))
}
