//! Query Types
//!
//! Query-string shapes shared by list endpoints

use serde::Deserialize;

use crate::core::Config;
use crate::utils::{AppError, AppResult};

/// Pagination query parameters (`?page=2&limit=10`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Resolved pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
}

impl PageWindow {
    /// Offset for SQL queries
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }

    /// Limit for SQL queries
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

impl PaginationQuery {
    /// Apply defaults: page 1, `PAGE_SIZE` rows, capped by `MAX_PAGE_SIZE`
    pub fn resolve(&self, config: &Config) -> PageWindow {
        let limit = self
            .limit
            .filter(|&l| l > 0)
            .unwrap_or(config.page_size)
            .min(config.max_page_size);
        PageWindow {
            page: self.page.filter(|&p| p > 0).unwrap_or(1),
            limit,
        }
    }
}

/// Query parameters of the subscriptions list
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SubscriptionsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Truncates each author's embedded recipe list
    pub recipes_limit: Option<i64>,
}

impl SubscriptionsQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// `?recipes_limit=` on subscribe
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<i64>,
}

/// Reject negative `recipes_limit` values
pub fn check_recipes_limit(limit: Option<i64>) -> AppResult<Option<i64>> {
    match limit {
        Some(n) if n < 0 => Err(AppError::invalid_field(
            "recipes_limit",
            "recipes_limit must not be negative",
        )),
        other => Ok(other),
    }
}

/// Filters of the recipe list.
///
/// `tags` may repeat, so the raw query is read as key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeListQuery {
    pub pagination: PaginationQuery,
    pub author: Option<i64>,
    pub tags: Vec<String>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

impl RecipeListQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> AppResult<Self> {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" => query.pagination.page = Some(parse_number(key, value)?),
                "limit" => query.pagination.limit = Some(parse_number(key, value)?),
                "author" => query.author = Some(parse_number(key, value)?),
                "tags" => {
                    if !value.is_empty() {
                        query.tags.push(value.clone());
                    }
                }
                "is_favorited" => query.is_favorited = Some(parse_flag(key, value)?),
                "is_in_shopping_cart" => query.is_in_shopping_cart = Some(parse_flag(key, value)?),
                _ => {}
            }
        }
        Ok(query)
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|_| AppError::invalid_field(field, format!("{field} must be a number")))
}

fn parse_flag(field: &str, value: &str) -> AppResult<bool> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(AppError::invalid_field(field, format!("{field} must be 0 or 1"))),
    }
}
