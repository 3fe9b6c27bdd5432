//! Unified error codes for Foodgram
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Recipe errors (recipes, tags, ingredients)
//! - 4xxx: Membership errors (favorites, shopping cart, subscriptions)
//! - 5xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can switch on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Administrator role is required
    AdminRequired = 2003,
    /// Only the recipe author may change the recipe
    NotRecipeAuthor = 2101,

    // ==================== 3xxx: Recipe ====================
    /// Recipe not found
    RecipeNotFound = 3001,
    /// Tag not found
    TagNotFound = 3002,
    /// Ingredient not found
    IngredientNotFound = 3003,
    /// Same tag listed twice in one recipe
    DuplicateTag = 3101,
    /// Same ingredient listed twice in one recipe
    DuplicateIngredient = 3102,
    /// Ingredient amount below 1
    InvalidAmount = 3103,
    /// Cooking time below 1 minute
    InvalidCookingTime = 3104,
    /// Recipe has no tags
    TagsRequired = 3105,
    /// Recipe has no ingredients
    IngredientsRequired = 3106,
    /// Tag slug or (name, color) already taken
    TagExists = 3201,
    /// Ingredient (name, unit) already exists
    IngredientExists = 3202,

    // ==================== 4xxx: Membership ====================
    /// Recipe is already in favorites
    AlreadyFavorited = 4001,
    /// Recipe is not in favorites
    NotFavorited = 4002,
    /// Recipe is already in the shopping cart
    AlreadyInCart = 4003,
    /// Recipe is not in the shopping cart
    NotInCart = 4004,
    /// Already subscribed to this author
    AlreadySubscribed = 4005,
    /// Not subscribed to this author
    NotSubscribed = 4006,
    /// Users cannot subscribe to themselves
    SelfSubscription = 4007,

    // ==================== 5xxx: User ====================
    /// User not found
    UserNotFound = 5001,
    /// Username already taken
    UsernameExists = 5002,
    /// Email already registered
    EmailExists = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication credentials were not provided",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::NotRecipeAuthor => "Only the author can change this recipe",

            // Recipe
            ErrorCode::RecipeNotFound => "Recipe not found",
            ErrorCode::TagNotFound => "Tag not found",
            ErrorCode::IngredientNotFound => "Ingredient not found",
            ErrorCode::DuplicateTag => "Tags must not repeat",
            ErrorCode::DuplicateIngredient => "An ingredient cannot be used twice",
            ErrorCode::InvalidAmount => "Ingredient amount must be between 1 and 32767",
            ErrorCode::InvalidCookingTime => "Cooking time must be between 1 and 32767 minutes",
            ErrorCode::TagsRequired => "At least one tag is required",
            ErrorCode::IngredientsRequired => "At least one ingredient is required",
            ErrorCode::TagExists => "Tag already exists",
            ErrorCode::IngredientExists => "Ingredient already exists",

            // Membership
            ErrorCode::AlreadyFavorited => "Recipe is already in favorites",
            ErrorCode::NotFavorited => "Recipe was not in favorites",
            ErrorCode::AlreadyInCart => "Recipe is already in the shopping cart",
            ErrorCode::NotInCart => "Recipe was not in the shopping cart",
            ErrorCode::AlreadySubscribed => "Already subscribed to this author",
            ErrorCode::NotSubscribed => "Not subscribed to this author",
            ErrorCode::SelfSubscription => "Subscribing to yourself is not allowed",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username is already taken",
            ErrorCode::EmailExists => "Email is already registered",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2101 => Ok(ErrorCode::NotRecipeAuthor),

            // Recipe
            3001 => Ok(ErrorCode::RecipeNotFound),
            3002 => Ok(ErrorCode::TagNotFound),
            3003 => Ok(ErrorCode::IngredientNotFound),
            3101 => Ok(ErrorCode::DuplicateTag),
            3102 => Ok(ErrorCode::DuplicateIngredient),
            3103 => Ok(ErrorCode::InvalidAmount),
            3104 => Ok(ErrorCode::InvalidCookingTime),
            3105 => Ok(ErrorCode::TagsRequired),
            3106 => Ok(ErrorCode::IngredientsRequired),
            3201 => Ok(ErrorCode::TagExists),
            3202 => Ok(ErrorCode::IngredientExists),

            // Membership
            4001 => Ok(ErrorCode::AlreadyFavorited),
            4002 => Ok(ErrorCode::NotFavorited),
            4003 => Ok(ErrorCode::AlreadyInCart),
            4004 => Ok(ErrorCode::NotInCart),
            4005 => Ok(ErrorCode::AlreadySubscribed),
            4006 => Ok(ErrorCode::NotSubscribed),
            4007 => Ok(ErrorCode::SelfSubscription),

            // User
            5001 => Ok(ErrorCode::UserNotFound),
            5002 => Ok(ErrorCode::UsernameExists),
            5003 => Ok(ErrorCode::EmailExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);

        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::NotRecipeAuthor.code(), 2101);
        assert_eq!(ErrorCode::RecipeNotFound.code(), 3001);
        assert_eq!(ErrorCode::AlreadyFavorited.code(), 4001);
        assert_eq!(ErrorCode::SelfSubscription.code(), 4007);
        assert_eq!(ErrorCode::UserNotFound.code(), 5001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::Unknown,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::InvalidRequest,
            ErrorCode::NotAuthenticated,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::PermissionDenied,
            ErrorCode::AdminRequired,
            ErrorCode::NotRecipeAuthor,
            ErrorCode::RecipeNotFound,
            ErrorCode::TagNotFound,
            ErrorCode::IngredientNotFound,
            ErrorCode::DuplicateTag,
            ErrorCode::DuplicateIngredient,
            ErrorCode::InvalidAmount,
            ErrorCode::InvalidCookingTime,
            ErrorCode::TagsRequired,
            ErrorCode::IngredientsRequired,
            ErrorCode::TagExists,
            ErrorCode::IngredientExists,
            ErrorCode::AlreadyFavorited,
            ErrorCode::NotFavorited,
            ErrorCode::AlreadyInCart,
            ErrorCode::NotInCart,
            ErrorCode::AlreadySubscribed,
            ErrorCode::NotSubscribed,
            ErrorCode::SelfSubscription,
            ErrorCode::UserNotFound,
            ErrorCode::UsernameExists,
            ErrorCode::EmailExists,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::ConfigError,
        ];

        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ErrorCode::AlreadyInCart).unwrap(),
            "4003"
        );
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("4005").unwrap();
        assert_eq!(code, ErrorCode::AlreadySubscribed);

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::RecipeNotFound), "3001");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
