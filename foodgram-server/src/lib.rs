//! Foodgram Server - recipe sharing backend
//!
//! # Overview
//!
//! - **Recipes** (`api/recipes`): CRUD with tags and ingredient amounts,
//!   written atomically
//! - **Memberships** (`services/membership`): favorites, shopping cart,
//!   subscriptions
//! - **Shopping list** (`services/shopping_list`): summed ingredients of the
//!   cart as a text download
//! - **Auth** (`auth`): JWT validation + Argon2 password hashing
//! - **Database** (`db`): SQLite via sqlx with embedded migrations
//!
//! # Module layout
//!
//! ```text
//! foodgram-server/src/
//! ├── core/          # config, state, server lifecycle
//! ├── auth/          # JWT, extractors, admin guard, passwords
//! ├── services/      # memberships, shopping list, view projection
//! ├── api/           # HTTP routes and handlers
//! ├── utils/         # logging, validation, query types
//! └── db/            # pool, migrations, repositories
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Security event logging under the `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ______                __
   / ____/___  ____  ____/ /___ __________ _____ ___
  / /_  / __ \/ __ \/ __  / __ `/ ___/ __ `/ __ `__ \
 / __/ / /_/ / /_/ / /_/ / /_/ / /  / /_/ / / / / / /
/_/    \____/\____/\__,_/\__, /_/   \__,_/_/ /_/ /_/
                        /____/
    "#
    );
}
