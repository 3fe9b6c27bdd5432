//! Recipe API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{MembershipKind, recipe};
use crate::db::repository::recipe::RecipeFilter;
use crate::security_log;
use crate::services::{membership, shopping_list, views};
use crate::utils::types::RecipeListQuery;
use crate::utils::validation::{validate_recipe_payload, validate_recipe_update};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    Paginated, Recipe, RecipeCreate, RecipeSummary, RecipeUpdate, RecipeView,
};

/// GET /api/recipes - newest first, with author / tags / membership filters
///
/// Membership filters only apply to authenticated viewers.
pub async fn list(
    State(state): State<ServerState>,
    viewer: Option<CurrentUser>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<Paginated<RecipeView>>> {
    let query = RecipeListQuery::from_pairs(&pairs)?;
    let window = query.pagination.resolve(&state.config);

    let viewer_id = viewer.as_ref().map(|v| v.id);
    let filter = RecipeFilter {
        author_id: query.author,
        tag_slugs: query.tags,
        favorited: viewer_id.zip(query.is_favorited),
        in_cart: viewer_id.zip(query.is_in_shopping_cart),
    };

    let recipes = recipe::find_page(&state.pool, &filter, window.limit(), window.offset()).await?;
    let count = recipe::count(&state.pool, &filter).await?;
    let results = views::recipe_views(&state.pool, recipes, viewer.as_ref()).await?;

    Ok(Json(Paginated::new(results, count, window.page, window.limit)))
}

/// GET /api/recipes/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    viewer: Option<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<RecipeView>> {
    let found = find_recipe(&state, id).await?;
    Ok(Json(views::recipe_view(&state.pool, found, viewer.as_ref()).await?))
}

/// POST /api/recipes
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<RecipeCreate>,
) -> AppResult<(StatusCode, Json<RecipeView>)> {
    validate_recipe_payload(&payload)?;

    let id = recipe::create(&state.pool, current_user.id, &payload).await?;
    let created = find_recipe(&state, id).await?;

    tracing::info!(recipe_id = id, author_id = current_user.id, "Recipe created");
    let view = views::recipe_view(&state.pool, created, Some(&current_user)).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /api/recipes/{id} - full payload, overwrites every field
pub async fn replace(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<RecipeCreate>,
) -> AppResult<Json<RecipeView>> {
    authorize_author(&state, &current_user, id).await?;
    validate_recipe_payload(&payload)?;
    recipe::replace(&state.pool, id, &payload).await?;
    updated_view(&state, &current_user, id).await
}

/// PATCH /api/recipes/{id} - any subset of fields
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<RecipeUpdate>,
) -> AppResult<Json<RecipeView>> {
    authorize_author(&state, &current_user, id).await?;
    validate_recipe_update(&payload)?;
    recipe::update(&state.pool, id, &payload).await?;
    updated_view(&state, &current_user, id).await
}

/// DELETE /api/recipes/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    authorize_author(&state, &current_user, id).await?;
    if !recipe::delete(&state.pool, id).await? {
        return Err(recipe_not_found(id));
    }
    tracing::info!(recipe_id = id, author_id = current_user.id, "Recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/{id}/favorite
pub async fn add_favorite(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<RecipeSummary>)> {
    let summary =
        membership::add_recipe(&state.pool, MembershipKind::Favorite, &current_user, id).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// DELETE /api/recipes/{id}/favorite
pub async fn remove_favorite(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    membership::remove(&state.pool, MembershipKind::Favorite, &current_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/{id}/shopping_cart
pub async fn add_to_cart(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<RecipeSummary>)> {
    let summary =
        membership::add_recipe(&state.pool, MembershipKind::ShoppingCart, &current_user, id)
            .await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// DELETE /api/recipes/{id}/shopping_cart
pub async fn remove_from_cart(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    membership::remove(&state.pool, MembershipKind::ShoppingCart, &current_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/recipes/download_shopping_cart - plain-text attachment
pub async fn download_shopping_cart(
    State(state): State<ServerState>,
    viewer: Option<CurrentUser>,
) -> AppResult<impl IntoResponse> {
    let text = shopping_list::download(&state.pool, viewer.as_ref()).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", shopping_list::FILE_NAME),
            ),
        ],
        text,
    ))
}

async fn find_recipe(state: &ServerState, id: i64) -> AppResult<Recipe> {
    recipe::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| recipe_not_found(id))
}

fn recipe_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::RecipeNotFound).with_detail("id", id)
}

/// Only the author may change or delete a recipe
async fn authorize_author(state: &ServerState, user: &CurrentUser, id: i64) -> AppResult<Recipe> {
    let found = find_recipe(state, id).await?;
    if found.author_id != user.id {
        security_log!(
            "WARN",
            "not_recipe_author",
            user_id = user.id,
            recipe_id = id,
            author_id = found.author_id
        );
        return Err(AppError::new(ErrorCode::NotRecipeAuthor));
    }
    Ok(found)
}

async fn updated_view(
    state: &ServerState,
    user: &CurrentUser,
    id: i64,
) -> AppResult<Json<RecipeView>> {
    let updated = find_recipe(state, id).await?;

    tracing::info!(recipe_id = id, author_id = user.id, "Recipe updated");
    Ok(Json(views::recipe_view(&state.pool, updated, Some(user)).await?))
}
