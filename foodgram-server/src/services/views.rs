//! Read-model projection
//!
//! Entities become API views here; every derived field depends on who is
//! asking and is `false` for anonymous viewers.

use sqlx::SqlitePool;

use shared::models::{Recipe, RecipeView, SubscriptionView, User, UserView};

use crate::auth::CurrentUser;
use crate::db::repository::{MembershipKind, ingredient, recipe, tag, user};
use crate::services::membership::is_member;
use crate::utils::{AppError, AppResult, ErrorCode};

pub async fn user_view(
    pool: &SqlitePool,
    author: User,
    viewer: Option<&CurrentUser>,
) -> AppResult<UserView> {
    let is_subscribed = is_member(pool, MembershipKind::Subscription, viewer, author.id).await?;
    Ok(UserView::project(author, is_subscribed))
}

pub async fn recipe_view(
    pool: &SqlitePool,
    recipe: Recipe,
    viewer: Option<&CurrentUser>,
) -> AppResult<RecipeView> {
    let author = user::find_by_id(pool, recipe.author_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    Ok(RecipeView {
        id: recipe.id,
        tags: tag::find_by_recipe(pool, recipe.id).await?,
        author: user_view(pool, author, viewer).await?,
        ingredients: ingredient::find_by_recipe(pool, recipe.id).await?,
        is_favorited: is_member(pool, MembershipKind::Favorite, viewer, recipe.id).await?,
        is_in_shopping_cart: is_member(pool, MembershipKind::ShoppingCart, viewer, recipe.id)
            .await?,
        name: recipe.name,
        image: recipe.image,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        pub_date: recipe.pub_date,
    })
}

/// Project a page of recipes, preserving order
pub async fn recipe_views(
    pool: &SqlitePool,
    recipes: Vec<Recipe>,
    viewer: Option<&CurrentUser>,
) -> AppResult<Vec<RecipeView>> {
    let mut views = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        views.push(recipe_view(pool, recipe, viewer).await?);
    }
    Ok(views)
}

/// An author as seen from the subscriptions list; `recipes_limit` truncates
/// the embedded recipes, `recipes_count` always counts all of them
pub async fn subscription_view(
    pool: &SqlitePool,
    author: User,
    viewer: Option<&CurrentUser>,
    recipes_limit: Option<i64>,
) -> AppResult<SubscriptionView> {
    let recipes = recipe::summaries_by_author(pool, author.id, recipes_limit).await?;
    let recipes_count = recipe::count_by_author(pool, author.id).await?;
    Ok(SubscriptionView {
        user: user_view(pool, author, viewer).await?,
        recipes,
        recipes_count,
    })
}
