//! User Model

use serde::{Deserialize, Serialize};

use super::recipe::RecipeSummary;

/// Role stored for ordinary accounts
pub const ROLE_USER: &str = "user";
/// Role allowed to manage reference data (tags, ingredients)
pub const ROLE_ADMIN: &str = "admin";

/// User entity (DB row)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string, never sent to clients
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub created_at: i64,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
}

/// Public user representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the viewer follows this user (false for anonymous viewers)
    pub is_subscribed: bool,
}

impl UserView {
    pub fn project(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// An author as seen from the subscriptions page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub user: UserView,
    pub recipes: Vec<RecipeSummary>,
    /// Total recipes of the author, independent of `recipes_limit`
    pub recipes_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 3,
            username: "chef".into(),
            email: "chef@example.com".into(),
            first_name: "Julia".into(),
            last_name: "Child".into(),
            password_hash: "$argon2id$secret".into(),
            role: ROLE_USER.into(),
            created_at: 0,
        }
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_project_user_view() {
        let view = UserView::project(sample_user(), true);
        assert_eq!(view.id, 3);
        assert_eq!(view.username, "chef");
        assert!(view.is_subscribed);
    }

    #[test]
    fn test_subscription_view_flattens_user() {
        let view = SubscriptionView {
            user: UserView::project(sample_user(), true),
            recipes: vec![],
            recipes_count: 4,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["username"], "chef");
        assert_eq!(json["is_subscribed"], true);
        assert_eq!(json["recipes_count"], 4);
    }
}
