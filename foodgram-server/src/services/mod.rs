//! Service layer
//!
//! - [`membership`] - favorite / cart / subscription toggles
//! - [`shopping_list`] - cart aggregation and text rendering
//! - [`views`] - entity to API view projection

pub mod membership;
pub mod shopping_list;
pub mod views;
