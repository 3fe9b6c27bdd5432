//! Data models
//!
//! Shared between the server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod ingredient;
pub mod page;
pub mod recipe;
pub mod shopping_list;
pub mod tag;
pub mod user;

// Re-exports
pub use ingredient::*;
pub use page::*;
pub use recipe::*;
pub use shopping_list::*;
pub use tag::*;
pub use user::*;
