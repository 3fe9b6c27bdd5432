//! Membership toggles
//!
//! Favorites, shopping-cart entries and subscriptions share one flow:
//! check the target exists, then insert or delete the `(viewer, target)` pair.
//! The UNIQUE constraint decides duplicates, so two concurrent adds leave one
//! row and the loser gets the ordinary duplicate error.

use sqlx::SqlitePool;

use shared::models::{RecipeSummary, SubscriptionView};

use crate::auth::CurrentUser;
use crate::db::repository::{MembershipKind, RepoError, membership, recipe, user};
use crate::services::views;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Derived membership flag; always `false` for anonymous viewers
pub async fn is_member(
    pool: &SqlitePool,
    kind: MembershipKind,
    viewer: Option<&CurrentUser>,
    target_id: i64,
) -> AppResult<bool> {
    match viewer {
        Some(viewer) => Ok(membership::exists(pool, kind, viewer.id, target_id).await?),
        None => Ok(false),
    }
}

/// Put a recipe into the viewer's favorites or shopping cart
pub async fn add_recipe(
    pool: &SqlitePool,
    kind: MembershipKind,
    viewer: &CurrentUser,
    recipe_id: i64,
) -> AppResult<RecipeSummary> {
    let summary = recipe::find_summary(pool, recipe_id)
        .await?
        .ok_or_else(|| missing_target(kind, recipe_id))?;
    insert(pool, kind, viewer, recipe_id).await?;
    Ok(summary)
}

/// Subscribe the viewer to an author
///
/// Self-subscription is rejected before anything else is looked at.
pub async fn subscribe(
    pool: &SqlitePool,
    viewer: &CurrentUser,
    author_id: i64,
    recipes_limit: Option<i64>,
) -> AppResult<SubscriptionView> {
    if viewer.id == author_id {
        return Err(AppError::new(ErrorCode::SelfSubscription).with_detail("author_id", author_id));
    }
    let author = user::find_by_id(pool, author_id)
        .await?
        .ok_or_else(|| missing_target(MembershipKind::Subscription, author_id))?;
    insert(pool, MembershipKind::Subscription, viewer, author_id).await?;
    views::subscription_view(pool, author, Some(viewer), recipes_limit).await
}

/// Remove the `(viewer, target)` pair
///
/// A missing target is 404; a pair that was never there is the kind's
/// "not a member" error and changes nothing.
pub async fn remove(
    pool: &SqlitePool,
    kind: MembershipKind,
    viewer: &CurrentUser,
    target_id: i64,
) -> AppResult<()> {
    let target_exists = match kind {
        MembershipKind::Favorite | MembershipKind::ShoppingCart => {
            recipe::find_summary(pool, target_id).await?.is_some()
        }
        MembershipKind::Subscription => user::exists(pool, target_id).await?,
    };
    if !target_exists {
        return Err(missing_target(kind, target_id));
    }

    if !membership::remove(pool, kind, viewer.id, target_id).await? {
        return Err(AppError::new(kind.missing_code()).with_detail("id", target_id));
    }
    tracing::debug!(kind = kind.table(), user_id = viewer.id, target_id, "Membership removed");
    Ok(())
}

async fn insert(
    pool: &SqlitePool,
    kind: MembershipKind,
    viewer: &CurrentUser,
    target_id: i64,
) -> AppResult<()> {
    match membership::add(pool, kind, viewer.id, target_id).await {
        Ok(()) => {
            tracing::debug!(kind = kind.table(), user_id = viewer.id, target_id, "Membership added");
            Ok(())
        }
        Err(RepoError::Duplicate(_)) => {
            Err(AppError::new(kind.duplicate_code()).with_detail("id", target_id))
        }
        Err(e) => Err(e.into()),
    }
}

fn missing_target(kind: MembershipKind, target_id: i64) -> AppError {
    AppError::new(kind.target_missing_code()).with_detail("id", target_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;
    use shared::models::User;

    fn viewer(user: &User) -> CurrentUser {
        CurrentUser {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }

    async fn recipe_fixture(pool: &SqlitePool, author: &User) -> i64 {
        let tag = test_support::tag(pool, "snack").await.id;
        let salt = test_support::ingredient(pool, "salt", "g").await.id;
        test_support::recipe(pool, author.id, "Chips", &[tag], &[(salt, 5)]).await
    }

    #[tokio::test]
    async fn test_favorite_twice_keeps_one_row() {
        let pool = test_support::pool().await;
        let chef = test_support::user(&pool, "chef").await;
        let reader = viewer(&test_support::user(&pool, "reader").await);
        let id = recipe_fixture(&pool, &chef).await;

        let summary = add_recipe(&pool, MembershipKind::Favorite, &reader, id)
            .await
            .unwrap();
        assert_eq!(summary.id, id);
        assert_eq!(summary.name, "Chips");

        let err = add_recipe(&pool, MembershipKind::Favorite, &reader, id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyFavorited);
        assert_eq!(
            membership::count(&pool, MembershipKind::Favorite, reader.id)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_remove_missing_membership_changes_nothing() {
        let pool = test_support::pool().await;
        let chef = test_support::user(&pool, "chef").await;
        let reader = viewer(&test_support::user(&pool, "reader").await);
        let id = recipe_fixture(&pool, &chef).await;
        add_recipe(&pool, MembershipKind::ShoppingCart, &reader, id)
            .await
            .unwrap();

        let err = remove(&pool, MembershipKind::Favorite, &reader, id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFavorited);
        assert_eq!(
            membership::count(&pool, MembershipKind::ShoppingCart, reader.id)
                .await
                .unwrap(),
            1
        );

        remove(&pool, MembershipKind::ShoppingCart, &reader, id)
            .await
            .unwrap();
        let err = remove(&pool, MembershipKind::ShoppingCart, &reader, id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotInCart);
    }

    #[tokio::test]
    async fn test_missing_recipe_is_not_found() {
        let pool = test_support::pool().await;
        let reader = viewer(&test_support::user(&pool, "reader").await);

        let err = add_recipe(&pool, MembershipKind::Favorite, &reader, 999)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RecipeNotFound);

        let err = remove(&pool, MembershipKind::ShoppingCart, &reader, 999)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RecipeNotFound);
    }

    #[tokio::test]
    async fn test_self_subscription_rejected_regardless_of_state() {
        let pool = test_support::pool().await;
        let chef = viewer(&test_support::user(&pool, "chef").await);

        let err = subscribe(&pool, &chef, chef.id, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SelfSubscription);

        // A self row inserted behind the service's back changes nothing
        sqlx::query("PRAGMA ignore_check_constraints = ON")
            .execute(&pool)
            .await
            .unwrap();
        membership::add(&pool, MembershipKind::Subscription, chef.id, chef.id)
            .await
            .unwrap();
        let err = subscribe(&pool, &chef, chef.id, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SelfSubscription);
    }

    #[tokio::test]
    async fn test_subscribe_and_unsubscribe() {
        let pool = test_support::pool().await;
        let chef = test_support::user(&pool, "chef").await;
        let reader = viewer(&test_support::user(&pool, "reader").await);
        recipe_fixture(&pool, &chef).await;

        let view = subscribe(&pool, &reader, chef.id, None).await.unwrap();
        assert!(view.user.is_subscribed);
        assert_eq!(view.recipes_count, 1);

        let err = subscribe(&pool, &reader, chef.id, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadySubscribed);

        remove(&pool, MembershipKind::Subscription, &reader, chef.id)
            .await
            .unwrap();
        let err = remove(&pool, MembershipKind::Subscription, &reader, chef.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotSubscribed);

        let err = subscribe(&pool, &reader, 999, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[tokio::test]
    async fn test_anonymous_is_never_member() {
        let pool = test_support::pool().await;
        assert!(
            !is_member(&pool, MembershipKind::Favorite, None, 1)
                .await
                .unwrap()
        );
    }
}
