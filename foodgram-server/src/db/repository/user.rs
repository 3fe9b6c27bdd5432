//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{User, UserCreate};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, username, email, first_name, last_name, password_hash, role, created_at FROM user";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn exists(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM user WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// One page of users ordered by username
pub async fn find_page(pool: &SqlitePool, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY username LIMIT ? OFFSET ?");
    let users = sqlx::query_as::<_, User>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n = sqlx::query_scalar("SELECT COUNT(*) FROM user")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

/// Authors followed by `follower_id`, ordered by username
pub async fn find_followed(
    pool: &SqlitePool,
    follower_id: i64,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT u.id, u.username, u.email, u.first_name, u.last_name, u.password_hash, u.role, u.created_at FROM user u JOIN subscription s ON s.author_id = u.id WHERE s.user_id = ? ORDER BY u.username LIMIT ? OFFSET ?",
    )
    .bind(follower_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn count_followed(pool: &SqlitePool, follower_id: i64) -> RepoResult<i64> {
    let n = sqlx::query_scalar("SELECT COUNT(*) FROM subscription WHERE user_id = ?")
        .bind(follower_id)
        .fetch_one(pool)
        .await?;
    Ok(n)
}

/// Insert a user with an already hashed password.
///
/// A taken username or email surfaces as [`RepoError::Duplicate`]; use
/// [`RepoError::is_duplicate_of`] with `user.username` / `user.email` to tell them apart.
pub async fn create(
    pool: &SqlitePool,
    data: &UserCreate,
    password_hash: &str,
    role: &str,
) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO user (username, email, first_name, last_name, password_hash, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id",
    )
    .bind(&data.username)
    .bind(&data.email)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(password_hash)
    .bind(role)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}
