//! Tag Repository

use super::{RepoError, RepoResult};
use shared::models::{Tag, TagCreate};
use sqlx::{SqliteConnection, SqlitePool};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Tag>> {
    let tags = sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tag ORDER BY slug")
        .fetch_all(pool)
        .await?;
    Ok(tags)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Tag>> {
    let tag = sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tag WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(tag)
}

/// Tags attached to a recipe, ordered by slug
pub async fn find_by_recipe(pool: &SqlitePool, recipe_id: i64) -> RepoResult<Vec<Tag>> {
    let tags = sqlx::query_as::<_, Tag>(
        "SELECT t.id, t.name, t.color, t.slug FROM tag t JOIN recipe_tag rt ON rt.tag_id = t.id WHERE rt.recipe_id = ? ORDER BY t.slug",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;
    Ok(tags)
}

/// Existence check usable inside a transaction
pub async fn exists(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM tag WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

/// Create a tag; a taken slug or (name, color) pair is [`RepoError::Duplicate`]
pub async fn create(pool: &SqlitePool, data: TagCreate) -> RepoResult<Tag> {
    let id: i64 =
        sqlx::query_scalar("INSERT INTO tag (name, color, slug) VALUES (?1, ?2, ?3) RETURNING id")
            .bind(&data.name)
            .bind(&data.color)
            .bind(&data.slug)
            .fetch_one(pool)
            .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create tag".into()))
}
