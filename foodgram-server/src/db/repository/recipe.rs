//! Recipe Repository
//!
//! Writes touch three tables (recipe, recipe_tag, recipe_ingredient) and
//! always run in a single transaction: any error drops `tx` and rolls the
//! whole write back.

use super::{RepoError, RepoResult, ingredient, tag};
use shared::error::{AppError, ErrorCode};
use shared::models::{Recipe, RecipeCreate, RecipeIngredientInput, RecipeSummary, RecipeUpdate};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};
use thiserror::Error;

const RECIPE_SELECT: &str =
    "SELECT r.id, r.author_id, r.name, r.image, r.text, r.cooking_time, r.pub_date FROM recipe r";

/// Errors of the create/update path
#[derive(Debug, Error)]
pub enum RecipeWriteError {
    #[error("Tag {0} not found")]
    UnknownTag(i64),

    #[error("Ingredient {0} not found")]
    UnknownIngredient(i64),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<sqlx::Error> for RecipeWriteError {
    fn from(err: sqlx::Error) -> Self {
        RecipeWriteError::Repo(err.into())
    }
}

impl From<RecipeWriteError> for AppError {
    fn from(err: RecipeWriteError) -> Self {
        match err {
            RecipeWriteError::UnknownTag(id) => AppError::with_message(
                ErrorCode::TagNotFound,
                format!("Tag {id} does not exist"),
            )
            .with_detail("field", "tags")
            .with_detail("id", id),
            RecipeWriteError::UnknownIngredient(id) => AppError::with_message(
                ErrorCode::IngredientNotFound,
                format!("Ingredient {id} does not exist"),
            )
            .with_detail("field", "ingredients")
            .with_detail("id", id),
            RecipeWriteError::Repo(RepoError::NotFound(msg)) => {
                AppError::with_message(ErrorCode::RecipeNotFound, msg)
            }
            RecipeWriteError::Repo(e) => e.into(),
        }
    }
}

pub type WriteResult<T> = Result<T, RecipeWriteError>;

/// List filters. Membership filters carry the viewer id and whether
/// membership is wanted (`true`) or excluded (`false`).
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author_id: Option<i64>,
    /// Any-match on tag slugs
    pub tag_slugs: Vec<String>,
    pub favorited: Option<(i64, bool)>,
    pub in_cart: Option<(i64, bool)>,
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &RecipeFilter) {
    qb.push(" WHERE 1 = 1");

    if let Some(author_id) = filter.author_id {
        qb.push(" AND r.author_id = ").push_bind(author_id);
    }

    if !filter.tag_slugs.is_empty() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM recipe_tag rt JOIN tag t ON t.id = rt.tag_id WHERE rt.recipe_id = r.id AND t.slug IN (",
        );
        let mut slugs = qb.separated(", ");
        for slug in &filter.tag_slugs {
            slugs.push_bind(slug.clone());
        }
        slugs.push_unseparated("))");
    }

    for (table, wanted) in [("favorite", filter.favorited), ("shopping_cart", filter.in_cart)] {
        if let Some((user_id, wanted)) = wanted {
            qb.push(if wanted { " AND EXISTS" } else { " AND NOT EXISTS" });
            qb.push(format!(
                " (SELECT 1 FROM {table} m WHERE m.recipe_id = r.id AND m.user_id = "
            ))
            .push_bind(user_id)
            .push(")");
        }
    }
}

/// One page of recipes, newest first
pub async fn find_page(
    pool: &SqlitePool,
    filter: &RecipeFilter,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Recipe>> {
    let mut qb = QueryBuilder::<Sqlite>::new(RECIPE_SELECT);
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY r.pub_date DESC, r.id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let recipes = qb.build_query_as::<Recipe>().fetch_all(pool).await?;
    Ok(recipes)
}

pub async fn count(pool: &SqlitePool, filter: &RecipeFilter) -> RepoResult<i64> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM recipe r");
    push_filters(&mut qb, filter);
    let n = qb.build_query_scalar::<i64>().fetch_one(pool).await?;
    Ok(n)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Recipe>> {
    let sql = format!("{RECIPE_SELECT} WHERE r.id = ?");
    let recipe = sqlx::query_as::<_, Recipe>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(recipe)
}

pub async fn find_summary(pool: &SqlitePool, id: i64) -> RepoResult<Option<RecipeSummary>> {
    let summary = sqlx::query_as::<_, RecipeSummary>(
        "SELECT id, name, image, cooking_time FROM recipe WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(summary)
}

/// An author's recipes in short form, newest first; `limit = None` returns all
pub async fn summaries_by_author(
    pool: &SqlitePool,
    author_id: i64,
    limit: Option<i64>,
) -> RepoResult<Vec<RecipeSummary>> {
    // SQLite treats a negative LIMIT as "no limit"
    let summaries = sqlx::query_as::<_, RecipeSummary>(
        "SELECT id, name, image, cooking_time FROM recipe WHERE author_id = ? ORDER BY pub_date DESC, id DESC LIMIT ?",
    )
    .bind(author_id)
    .bind(limit.unwrap_or(-1))
    .fetch_all(pool)
    .await?;
    Ok(summaries)
}

pub async fn count_by_author(pool: &SqlitePool, author_id: i64) -> RepoResult<i64> {
    let n = sqlx::query_scalar("SELECT COUNT(*) FROM recipe WHERE author_id = ?")
        .bind(author_id)
        .fetch_one(pool)
        .await?;
    Ok(n)
}

/// Insert a recipe with its tags and ingredient amounts.
///
/// The payload is expected to be validated already; unknown tag or
/// ingredient ids abort the transaction.
pub async fn create(pool: &SqlitePool, author_id: i64, data: &RecipeCreate) -> WriteResult<i64> {
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO recipe (author_id, name, image, text, cooking_time, pub_date) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
    )
    .bind(author_id)
    .bind(&data.name)
    .bind(&data.image)
    .bind(&data.text)
    .bind(data.cooking_time)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    replace_tags(&mut tx, id, &data.tags).await?;
    replace_ingredients(&mut tx, id, &data.ingredients).await?;

    tx.commit().await?;

    tracing::debug!(recipe_id = id, author_id, "Recipe created");
    Ok(id)
}

/// Update scalar fields and, when given, replace the tag set and the whole
/// ingredient set. Nothing changes unless every step succeeds.
pub async fn update(pool: &SqlitePool, id: i64, data: &RecipeUpdate) -> WriteResult<()> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE recipe SET name = COALESCE(?1, name), image = COALESCE(?2, image), text = COALESCE(?3, text), cooking_time = COALESCE(?4, cooking_time) WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.image)
    .bind(&data.text)
    .bind(data.cooking_time)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Recipe {id} not found")).into());
    }

    if let Some(ref tags) = data.tags {
        replace_tags(&mut tx, id, tags).await?;
    }
    if let Some(ref ingredients) = data.ingredients {
        replace_ingredients(&mut tx, id, ingredients).await?;
    }

    tx.commit().await?;

    tracing::debug!(recipe_id = id, "Recipe updated");
    Ok(())
}

/// Full replacement (PUT): every column is overwritten, including clearing
/// the image when none is given
pub async fn replace(pool: &SqlitePool, id: i64, data: &RecipeCreate) -> WriteResult<()> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE recipe SET name = ?1, image = ?2, text = ?3, cooking_time = ?4 WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.image)
    .bind(&data.text)
    .bind(data.cooking_time)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Recipe {id} not found")).into());
    }

    replace_tags(&mut tx, id, &data.tags).await?;
    replace_ingredients(&mut tx, id, &data.ingredients).await?;

    tx.commit().await?;

    tracing::debug!(recipe_id = id, "Recipe replaced");
    Ok(())
}

/// Delete a recipe; join and membership rows cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM recipe WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

async fn replace_tags(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: i64,
    tag_ids: &[i64],
) -> WriteResult<()> {
    sqlx::query("DELETE FROM recipe_tag WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut **tx)
        .await?;
    for &tag_id in tag_ids {
        if !tag::exists(&mut **tx, tag_id).await? {
            return Err(RecipeWriteError::UnknownTag(tag_id));
        }
        sqlx::query("INSERT INTO recipe_tag (recipe_id, tag_id) VALUES (?1, ?2)")
            .bind(recipe_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn replace_ingredients(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: i64,
    items: &[RecipeIngredientInput],
) -> WriteResult<()> {
    sqlx::query("DELETE FROM recipe_ingredient WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut **tx)
        .await?;
    for item in items {
        if !ingredient::exists(&mut **tx, item.id).await? {
            return Err(RecipeWriteError::UnknownIngredient(item.id));
        }
        sqlx::query(
            "INSERT INTO recipe_ingredient (recipe_id, ingredient_id, amount) VALUES (?1, ?2, ?3)",
        )
        .bind(recipe_id)
        .bind(item.id)
        .bind(item.amount)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{MembershipKind, membership, test_support};

    struct Fixture {
        pool: SqlitePool,
        author: i64,
        breakfast: i64,
        dinner: i64,
        flour: i64,
        sugar: i64,
    }

    async fn fixture() -> Fixture {
        let pool = test_support::pool().await;
        let author = test_support::user(&pool, "chef").await.id;
        let breakfast = test_support::tag(&pool, "breakfast").await.id;
        let dinner = test_support::tag(&pool, "dinner").await.id;
        let flour = test_support::ingredient(&pool, "flour", "g").await.id;
        let sugar = test_support::ingredient(&pool, "sugar", "g").await.id;
        Fixture {
            pool,
            author,
            breakfast,
            dinner,
            flour,
            sugar,
        }
    }

    fn payload(tags: Vec<i64>, ingredients: Vec<(i64, i64)>) -> RecipeCreate {
        RecipeCreate {
            tags,
            ingredients: ingredients
                .into_iter()
                .map(|(id, amount)| RecipeIngredientInput { id, amount })
                .collect(),
            name: "Pancakes".into(),
            image: Some("recipes/images/pancakes.png".into()),
            text: "Mix and fry".into(),
            cooking_time: 20,
        }
    }

    async fn row_count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_writes_all_rows() {
        let f = fixture().await;
        let id = create(
            &f.pool,
            f.author,
            &payload(vec![f.breakfast], vec![(f.flour, 200), (f.sugar, 50)]),
        )
        .await
        .unwrap();

        let recipe = find_by_id(&f.pool, id).await.unwrap().unwrap();
        assert_eq!(recipe.author_id, f.author);
        assert_eq!(recipe.cooking_time, 20);

        let ingredients = ingredient::find_by_recipe(&f.pool, id).await.unwrap();
        assert_eq!(ingredients.len(), 2);
        assert_eq!(ingredients[0].name, "flour");
        assert_eq!(ingredients[0].amount, 200);

        let tags = tag::find_by_recipe(&f.pool, id).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].slug, "breakfast");
    }

    #[tokio::test]
    async fn test_unknown_ingredient_persists_nothing() {
        let f = fixture().await;
        let err = create(
            &f.pool,
            f.author,
            &payload(vec![f.breakfast], vec![(f.flour, 200), (9999, 1)]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RecipeWriteError::UnknownIngredient(9999)));
        assert_eq!(row_count(&f.pool, "recipe").await, 0);
        assert_eq!(row_count(&f.pool, "recipe_tag").await, 0);
        assert_eq!(row_count(&f.pool, "recipe_ingredient").await, 0);

        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::IngredientNotFound);
        assert_eq!(app.field(), Some("ingredients"));
    }

    #[tokio::test]
    async fn test_unknown_tag_persists_nothing() {
        let f = fixture().await;
        let err = create(&f.pool, f.author, &payload(vec![777], vec![(f.flour, 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, RecipeWriteError::UnknownTag(777)));
        assert_eq!(row_count(&f.pool, "recipe").await, 0);
    }

    #[tokio::test]
    async fn test_update_replaces_ingredient_set() {
        let f = fixture().await;
        let id = create(
            &f.pool,
            f.author,
            &payload(vec![f.breakfast], vec![(f.flour, 200), (f.sugar, 50)]),
        )
        .await
        .unwrap();

        update(
            &f.pool,
            id,
            &RecipeUpdate {
                ingredients: Some(vec![RecipeIngredientInput {
                    id: f.sugar,
                    amount: 10,
                }]),
                tags: Some(vec![f.dinner]),
                name: Some("Sweet water".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let ingredients = ingredient::find_by_recipe(&f.pool, id).await.unwrap();
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].name, "sugar");
        assert_eq!(ingredients[0].amount, 10);

        let recipe = find_by_id(&f.pool, id).await.unwrap().unwrap();
        assert_eq!(recipe.name, "Sweet water");
        assert_eq!(recipe.text, "Mix and fry");

        let tags = tag::find_by_recipe(&f.pool, id).await.unwrap();
        assert_eq!(tags[0].id, f.dinner);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_state() {
        let f = fixture().await;
        let id = create(
            &f.pool,
            f.author,
            &payload(vec![f.breakfast], vec![(f.flour, 200)]),
        )
        .await
        .unwrap();

        let err = update(
            &f.pool,
            id,
            &RecipeUpdate {
                name: Some("Renamed".into()),
                ingredients: Some(vec![RecipeIngredientInput { id: 4242, amount: 3 }]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RecipeWriteError::UnknownIngredient(4242)));

        let recipe = find_by_id(&f.pool, id).await.unwrap().unwrap();
        assert_eq!(recipe.name, "Pancakes");
        let ingredients = ingredient::find_by_recipe(&f.pool, id).await.unwrap();
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].amount, 200);
    }

    #[tokio::test]
    async fn test_replace_clears_image() {
        let f = fixture().await;
        let id = create(&f.pool, f.author, &payload(vec![f.breakfast], vec![(f.flour, 200)]))
            .await
            .unwrap();

        let mut full = payload(vec![f.dinner], vec![(f.sugar, 5)]);
        full.image = None;
        full.name = "Plain".into();
        replace(&f.pool, id, &full).await.unwrap();

        let recipe = find_by_id(&f.pool, id).await.unwrap().unwrap();
        assert_eq!(recipe.image, None);
        assert_eq!(recipe.name, "Plain");
        let tags = tag::find_by_recipe(&f.pool, id).await.unwrap();
        assert_eq!(tags[0].slug, "dinner");
        let ingredients = ingredient::find_by_recipe(&f.pool, id).await.unwrap();
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].amount, 5);
    }

    #[tokio::test]
    async fn test_patch_without_image_keeps_it() {
        let f = fixture().await;
        let id = create(&f.pool, f.author, &payload(vec![f.breakfast], vec![(f.flour, 200)]))
            .await
            .unwrap();

        update(
            &f.pool,
            id,
            &RecipeUpdate {
                name: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let recipe = find_by_id(&f.pool, id).await.unwrap().unwrap();
        assert_eq!(recipe.image.as_deref(), Some("recipes/images/pancakes.png"));
    }

    #[tokio::test]
    async fn test_replace_missing_recipe() {
        let f = fixture().await;
        let err = replace(&f.pool, 31337, &payload(vec![f.breakfast], vec![(f.flour, 1)]))
            .await
            .unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::RecipeNotFound);
    }

    #[tokio::test]
    async fn test_update_missing_recipe() {
        let f = fixture().await;
        let err = update(&f.pool, 31337, &RecipeUpdate::default())
            .await
            .unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::RecipeNotFound);
    }

    #[tokio::test]
    async fn test_filters() {
        let f = fixture().await;
        let reader = test_support::user(&f.pool, "reader").await.id;
        let morning = create(
            &f.pool,
            f.author,
            &payload(vec![f.breakfast], vec![(f.flour, 1)]),
        )
        .await
        .unwrap();
        let evening = create(&f.pool, reader, &payload(vec![f.dinner], vec![(f.sugar, 1)]))
            .await
            .unwrap();
        membership::add(&f.pool, MembershipKind::Favorite, reader, morning)
            .await
            .unwrap();

        let all = find_page(&f.pool, &RecipeFilter::default(), 10, 0)
            .await
            .unwrap();
        assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), [evening, morning]);

        let by_author = RecipeFilter {
            author_id: Some(f.author),
            ..Default::default()
        };
        assert_eq!(count(&f.pool, &by_author).await.unwrap(), 1);

        let by_tags = RecipeFilter {
            tag_slugs: vec!["dinner".into(), "brunch".into()],
            ..Default::default()
        };
        let found = find_page(&f.pool, &by_tags, 10, 0).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, evening);

        let favorited = RecipeFilter {
            favorited: Some((reader, true)),
            ..Default::default()
        };
        let found = find_page(&f.pool, &favorited, 10, 0).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, morning);

        let not_favorited = RecipeFilter {
            favorited: Some((reader, false)),
            ..Default::default()
        };
        let found = find_page(&f.pool, &not_favorited, 10, 0).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, evening);

        let in_cart = RecipeFilter {
            in_cart: Some((reader, true)),
            ..Default::default()
        };
        assert_eq!(count(&f.pool, &in_cart).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_summaries_respect_limit() {
        let f = fixture().await;
        for _ in 0..3 {
            create(
                &f.pool,
                f.author,
                &payload(vec![f.breakfast], vec![(f.flour, 1)]),
            )
            .await
            .unwrap();
        }

        assert_eq!(
            summaries_by_author(&f.pool, f.author, Some(2))
                .await
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            summaries_by_author(&f.pool, f.author, None)
                .await
                .unwrap()
                .len(),
            3
        );
        assert_eq!(count_by_author(&f.pool, f.author).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete_cascades_join_rows() {
        let f = fixture().await;
        let id = create(
            &f.pool,
            f.author,
            &payload(vec![f.breakfast], vec![(f.flour, 1)]),
        )
        .await
        .unwrap();

        assert!(delete(&f.pool, id).await.unwrap());
        assert!(!delete(&f.pool, id).await.unwrap());
        assert_eq!(row_count(&f.pool, "recipe_tag").await, 0);
        assert_eq!(row_count(&f.pool, "recipe_ingredient").await, 0);
    }
}
