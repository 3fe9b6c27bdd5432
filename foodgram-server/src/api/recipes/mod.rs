//! Recipe API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/recipes | GET | optional |
//! | /api/recipes | POST | required |
//! | /api/recipes/download_shopping_cart | GET | required |
//! | /api/recipes/{id} | GET | optional |
//! | /api/recipes/{id} | PUT, PATCH, DELETE | author |
//! | /api/recipes/{id}/favorite | POST, DELETE | required |
//! | /api/recipes/{id}/shopping_cart | POST, DELETE | required |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/recipes", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/download_shopping_cart",
            get(handler::download_shopping_cart),
        )
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::replace)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/favorite",
            post(handler::add_favorite).delete(handler::remove_favorite),
        )
        .route(
            "/{id}/shopping_cart",
            post(handler::add_to_cart).delete(handler::remove_from_cart),
        )
}
