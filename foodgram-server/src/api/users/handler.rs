//! User API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::{MembershipKind, RepoError, user};
use crate::services::{membership, views};
use crate::utils::types::{
    PaginationQuery, RecipesLimitQuery, SubscriptionsQuery, check_recipes_limit,
};
use crate::utils::validation::validate_user_create;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Paginated, ROLE_USER, SubscriptionView, UserCreate, UserView};

/// GET /api/users - paginated, ordered by username
pub async fn list(
    State(state): State<ServerState>,
    viewer: Option<CurrentUser>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<Json<Paginated<UserView>>> {
    let window = query.resolve(&state.config);
    let users = user::find_page(&state.pool, window.limit(), window.offset()).await?;
    let count = user::count(&state.pool).await?;

    let mut results = Vec::with_capacity(users.len());
    for u in users {
        results.push(views::user_view(&state.pool, u, viewer.as_ref()).await?);
    }
    Ok(Json(Paginated::new(results, count, window.page, window.limit)))
}

/// POST /api/users - registration
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<UserView>)> {
    validate_user_create(&payload)?;

    let hash = password::hash_password(&payload.password)?;
    let created = user::create(&state.pool, &payload, &hash, ROLE_USER)
        .await
        .map_err(|e| match e {
            e if e.is_duplicate_of("user.username") => {
                AppError::new(ErrorCode::UsernameExists).with_detail("field", "username")
            }
            e if e.is_duplicate_of("user.email") => {
                AppError::new(ErrorCode::EmailExists).with_detail("field", "email")
            }
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            other => other.into(),
        })?;

    tracing::info!(user_id = created.id, username = %created.username, "User registered");
    Ok((StatusCode::CREATED, Json(UserView::project(created, false))))
}

/// GET /api/users/me
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserView>> {
    let me = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(views::user_view(&state.pool, me, Some(&current_user)).await?))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    viewer: Option<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserView>> {
    let found = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("id", id))?;
    Ok(Json(views::user_view(&state.pool, found, viewer.as_ref()).await?))
}

/// GET /api/users/subscriptions - authors the viewer follows
pub async fn subscriptions(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<SubscriptionsQuery>,
) -> AppResult<Json<Paginated<SubscriptionView>>> {
    let recipes_limit = check_recipes_limit(query.recipes_limit)?;
    let window = query.pagination().resolve(&state.config);

    let authors =
        user::find_followed(&state.pool, current_user.id, window.limit(), window.offset()).await?;
    let count = user::count_followed(&state.pool, current_user.id).await?;

    let mut results = Vec::with_capacity(authors.len());
    for author in authors {
        results.push(
            views::subscription_view(&state.pool, author, Some(&current_user), recipes_limit)
                .await?,
        );
    }
    Ok(Json(Paginated::new(results, count, window.page, window.limit)))
}

/// POST /api/users/{id}/subscribe
pub async fn subscribe(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Query(query): Query<RecipesLimitQuery>,
) -> AppResult<(StatusCode, Json<SubscriptionView>)> {
    let recipes_limit = check_recipes_limit(query.recipes_limit)?;
    let view = membership::subscribe(&state.pool, &current_user, id, recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// DELETE /api/users/{id}/subscribe
pub async fn unsubscribe(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    membership::remove(&state.pool, MembershipKind::Subscription, &current_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
