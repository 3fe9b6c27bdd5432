//! Membership Repository
//!
//! Favorites, shopping carts and subscriptions are the same shape: a
//! `(user_id, target)` pair that is unique per pair. One set of queries
//! serves all three, parameterised by [`MembershipKind`].

use super::RepoResult;
use shared::error::ErrorCode;
use sqlx::SqlitePool;

/// Which membership table an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipKind {
    /// user -> recipe
    Favorite,
    /// user -> recipe
    ShoppingCart,
    /// user -> author
    Subscription,
}

impl MembershipKind {
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::ShoppingCart => "shopping_cart",
            Self::Subscription => "subscription",
        }
    }

    pub const fn target_column(&self) -> &'static str {
        match self {
            Self::Favorite | Self::ShoppingCart => "recipe_id",
            Self::Subscription => "author_id",
        }
    }

    /// Error returned when the pair already exists
    pub const fn duplicate_code(&self) -> ErrorCode {
        match self {
            Self::Favorite => ErrorCode::AlreadyFavorited,
            Self::ShoppingCart => ErrorCode::AlreadyInCart,
            Self::Subscription => ErrorCode::AlreadySubscribed,
        }
    }

    /// Error returned when removing a pair that does not exist
    pub const fn missing_code(&self) -> ErrorCode {
        match self {
            Self::Favorite => ErrorCode::NotFavorited,
            Self::ShoppingCart => ErrorCode::NotInCart,
            Self::Subscription => ErrorCode::NotSubscribed,
        }
    }

    /// Error returned when the target row does not exist
    pub const fn target_missing_code(&self) -> ErrorCode {
        match self {
            Self::Favorite | Self::ShoppingCart => ErrorCode::RecipeNotFound,
            Self::Subscription => ErrorCode::UserNotFound,
        }
    }
}

/// Insert the pair. An existing pair (including the loser of a concurrent
/// insert) is reported by SQLite and surfaces as `RepoError::Duplicate`.
pub async fn add(
    pool: &SqlitePool,
    kind: MembershipKind,
    user_id: i64,
    target_id: i64,
) -> RepoResult<()> {
    let sql = format!(
        "INSERT INTO {} (user_id, {}) VALUES (?, ?)",
        kind.table(),
        kind.target_column()
    );
    sqlx::query(&sql)
        .bind(user_id)
        .bind(target_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete the pair, returning whether a row was removed
pub async fn remove(
    pool: &SqlitePool,
    kind: MembershipKind,
    user_id: i64,
    target_id: i64,
) -> RepoResult<bool> {
    let sql = format!(
        "DELETE FROM {} WHERE user_id = ? AND {} = ?",
        kind.table(),
        kind.target_column()
    );
    let result = sqlx::query(&sql)
        .bind(user_id)
        .bind(target_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn exists(
    pool: &SqlitePool,
    kind: MembershipKind,
    user_id: i64,
    target_id: i64,
) -> RepoResult<bool> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE user_id = ? AND {} = ?)",
        kind.table(),
        kind.target_column()
    );
    let found: bool = sqlx::query_scalar(&sql)
        .bind(user_id)
        .bind(target_id)
        .fetch_one(pool)
        .await?;
    Ok(found)
}

pub async fn count(pool: &SqlitePool, kind: MembershipKind, user_id: i64) -> RepoResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id = ?", kind.table());
    let n = sqlx::query_scalar(&sql)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(n)
}
