//! Shopping list
//!
//! Sums ingredient amounts over every recipe in a user's cart and renders
//! the result as a plain-text download.

use sqlx::SqlitePool;

use shared::models::ShoppingListLine;
use shared::util::{format_date_millis, now_millis};

use crate::auth::CurrentUser;
use crate::db::repository::ingredient;
use crate::utils::{AppError, AppResult};

/// Download file name
pub const FILE_NAME: &str = "shopping_cart.txt";

/// Consolidated cart lines; anonymous viewers are rejected, never given an empty list
pub async fn aggregate(
    pool: &SqlitePool,
    viewer: Option<&CurrentUser>,
) -> AppResult<Vec<ShoppingListLine>> {
    let viewer = viewer.ok_or_else(AppError::not_authenticated)?;
    Ok(ingredient::cart_totals(pool, viewer.id).await?)
}

/// `Shopping list (DD.MM.YYYY)` followed by one `name (unit): total` line per ingredient
pub fn render(lines: &[ShoppingListLine], date: &str) -> String {
    let body: String = lines
        .iter()
        .map(|line| format!("{} ({}): {}\n", line.name, line.measurement_unit, line.total_amount))
        .collect();
    format!("Shopping list ({date})\n{body}")
}

/// Aggregate and render with today's date
pub async fn download(pool: &SqlitePool, viewer: Option<&CurrentUser>) -> AppResult<String> {
    let lines = aggregate(pool, viewer).await?;
    Ok(render(&lines, &format_date_millis(now_millis())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{MembershipKind, membership, test_support};
    use crate::utils::ErrorCode;

    fn line(name: &str, unit: &str, total: i64) -> ShoppingListLine {
        ShoppingListLine {
            name: name.into(),
            measurement_unit: unit.into(),
            total_amount: total,
        }
    }

    fn viewer(id: i64) -> CurrentUser {
        CurrentUser {
            id,
            username: "shopper".into(),
            role: "user".into(),
        }
    }

    #[tokio::test]
    async fn test_two_recipes_consolidate() {
        let pool = test_support::pool().await;
        let chef = test_support::user(&pool, "chef").await.id;
        let shopper = test_support::user(&pool, "shopper").await.id;
        let tag = test_support::tag(&pool, "baking").await.id;
        let flour = test_support::ingredient(&pool, "flour", "g").await.id;
        let sugar = test_support::ingredient(&pool, "sugar", "g").await.id;

        let x = test_support::recipe(&pool, chef, "X", &[tag], &[(flour, 200), (sugar, 50)]).await;
        let y = test_support::recipe(&pool, chef, "Y", &[tag], &[(flour, 100)]).await;
        for id in [x, y] {
            membership::add(&pool, MembershipKind::ShoppingCart, shopper, id)
                .await
                .unwrap();
        }

        let lines = aggregate(&pool, Some(&viewer(shopper))).await.unwrap();
        assert_eq!(lines, vec![line("flour", "g", 300), line("sugar", "g", 50)]);

        let text = render(&lines, "05.03.2024");
        assert_eq!(
            text,
            "Shopping list (05.03.2024)\nflour (g): 300\nsugar (g): 50\n"
        );
    }

    #[tokio::test]
    async fn test_single_recipe_per_cart_reports_its_amounts() {
        let pool = test_support::pool().await;
        let chef = test_support::user(&pool, "chef").await.id;
        let tag = test_support::tag(&pool, "soup").await.id;
        let water = test_support::ingredient(&pool, "water", "ml").await.id;
        let salt = test_support::ingredient(&pool, "salt", "g").await.id;
        let soup = test_support::recipe(&pool, chef, "Soup", &[tag], &[(water, 750), (salt, 3)]).await;

        for name in ["a", "b", "c"] {
            let user = test_support::user(&pool, name).await.id;
            membership::add(&pool, MembershipKind::ShoppingCart, user, soup)
                .await
                .unwrap();
            let lines = aggregate(&pool, Some(&viewer(user))).await.unwrap();
            assert_eq!(lines, vec![line("salt", "g", 3), line("water", "ml", 750)]);
        }
    }

    #[tokio::test]
    async fn test_units_are_not_merged() {
        let pool = test_support::pool().await;
        let chef = test_support::user(&pool, "chef").await.id;
        let tag = test_support::tag(&pool, "drinks").await.id;
        let milk_ml = test_support::ingredient(&pool, "milk", "ml").await.id;
        let milk_cup = test_support::ingredient(&pool, "milk", "cup").await.id;
        let id = test_support::recipe(&pool, chef, "Latte", &[tag], &[(milk_ml, 200), (milk_cup, 1)]).await;
        membership::add(&pool, MembershipKind::ShoppingCart, chef, id)
            .await
            .unwrap();

        let lines = aggregate(&pool, Some(&viewer(chef))).await.unwrap();
        assert_eq!(lines, vec![line("milk", "cup", 1), line("milk", "ml", 200)]);
    }

    #[tokio::test]
    async fn test_capped_amounts_still_sum() {
        use crate::utils::validation::MAX_AMOUNT;

        let pool = test_support::pool().await;
        let chef = test_support::user(&pool, "chef").await.id;
        let tag = test_support::tag(&pool, "bulk").await.id;
        let flour = test_support::ingredient(&pool, "flour", "g").await.id;
        for name in ["Bread", "Cake", "Pasta"] {
            let id = test_support::recipe(&pool, chef, name, &[tag], &[(flour, MAX_AMOUNT)]).await;
            membership::add(&pool, MembershipKind::ShoppingCart, chef, id)
                .await
                .unwrap();
        }

        let lines = aggregate(&pool, Some(&viewer(chef))).await.unwrap();
        assert_eq!(lines, vec![line("flour", "g", 3 * MAX_AMOUNT)]);
    }

    #[tokio::test]
    async fn test_out_of_range_amount_rejected_by_storage() {
        let pool = test_support::pool().await;
        let chef = test_support::user(&pool, "chef").await.id;
        let tag = test_support::tag(&pool, "bulk").await.id;
        let flour = test_support::ingredient(&pool, "flour", "g").await.id;
        let id = test_support::recipe(&pool, chef, "Bread", &[tag], &[(flour, 1)]).await;

        let result = sqlx::query("UPDATE recipe_ingredient SET amount = ? WHERE recipe_id = ?")
            .bind(i64::MAX)
            .bind(id)
            .execute(&pool)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_cart_renders_header_only() {
        let pool = test_support::pool().await;
        let user = test_support::user(&pool, "shopper").await.id;

        let lines = aggregate(&pool, Some(&viewer(user))).await.unwrap();
        assert!(lines.is_empty());
        assert_eq!(render(&lines, "01.01.2025"), "Shopping list (01.01.2025)\n");
    }

    #[tokio::test]
    async fn test_anonymous_is_rejected() {
        let pool = test_support::pool().await;
        let err = aggregate(&pool, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }
}
