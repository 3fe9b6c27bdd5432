//! Recipe Model

use serde::{Deserialize, Serialize};

use super::tag::Tag;
use super::user::UserView;

/// Recipe entity (DB row)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Recipe {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    /// Opaque image reference
    pub image: Option<String>,
    pub text: String,
    /// Minutes, at least 1
    pub cooking_time: i64,
    pub pub_date: i64,
}

/// Ingredient line of a recipe payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredientInput {
    /// Ingredient id
    pub id: i64,
    pub amount: i64,
}

/// Create recipe payload (also the full-replacement body of PUT)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    /// Tag ids
    pub tags: Vec<i64>,
    pub ingredients: Vec<RecipeIngredientInput>,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i64,
}

/// Partial update payload (PATCH); an absent or null image keeps the current one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<RecipeIngredientInput>>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

/// Ingredient of a recipe together with its amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RecipeIngredientView {
    /// Ingredient id
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Short recipe form used by favorites, cart and subscriptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i64,
}

/// Full recipe representation for a given viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeView {
    pub id: i64,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i64,
    pub pub_date: i64,
}
