//! Shopping List Model

use serde::{Deserialize, Serialize};

/// One consolidated line: an ingredient with its amount summed over the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}
