//! Ingredient Repository

use super::{RepoError, RepoResult};
use shared::models::{Ingredient, IngredientCreate, RecipeIngredientView, ShoppingListLine};
use sqlx::{SqliteConnection, SqlitePool};

/// All ingredients ordered by name, optionally narrowed to a case-insensitive name prefix
pub async fn find_all(pool: &SqlitePool, name_prefix: Option<&str>) -> RepoResult<Vec<Ingredient>> {
    let rows = match name_prefix.map(str::trim).filter(|p| !p.is_empty()) {
        Some(prefix) => {
            // SQLite LIKE is case-insensitive for ASCII
            let pattern = format!("{}%", escape_like(prefix));
            sqlx::query_as::<_, Ingredient>(
                "SELECT id, name, measurement_unit FROM ingredient WHERE name LIKE ? ESCAPE '\\' ORDER BY name COLLATE NOCASE, measurement_unit",
            )
            .bind(pattern)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Ingredient>(
                "SELECT id, name, measurement_unit FROM ingredient ORDER BY name COLLATE NOCASE, measurement_unit",
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Ingredient>> {
    let row = sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, measurement_unit FROM ingredient WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Ingredients of a recipe with their amounts, ordered by name
pub async fn find_by_recipe(
    pool: &SqlitePool,
    recipe_id: i64,
) -> RepoResult<Vec<RecipeIngredientView>> {
    let rows = sqlx::query_as::<_, RecipeIngredientView>(
        "SELECT i.id, i.name, i.measurement_unit, ri.amount FROM recipe_ingredient ri JOIN ingredient i ON i.id = ri.ingredient_id WHERE ri.recipe_id = ? ORDER BY i.name, i.measurement_unit",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Ingredient totals over every recipe in `user_id`'s shopping cart,
/// one line per (name, unit), ordered by name then unit
pub async fn cart_totals(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<ShoppingListLine>> {
    let lines = sqlx::query_as::<_, ShoppingListLine>(
        "SELECT i.name, i.measurement_unit, SUM(ri.amount) AS total_amount FROM shopping_cart c JOIN recipe_ingredient ri ON ri.recipe_id = c.recipe_id JOIN ingredient i ON i.id = ri.ingredient_id WHERE c.user_id = ? GROUP BY i.name, i.measurement_unit ORDER BY i.name, i.measurement_unit",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(lines)
}

/// Existence check usable inside a transaction
pub async fn exists(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM ingredient WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

/// Create an ingredient; an existing (name, unit) pair is [`RepoError::Duplicate`]
pub async fn create(pool: &SqlitePool, data: IngredientCreate) -> RepoResult<Ingredient> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO ingredient (name, measurement_unit) VALUES (?1, ?2) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.measurement_unit)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create ingredient".into()))
}

fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
