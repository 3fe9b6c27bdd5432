//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are checked here.
//! Every error names the offending payload field in `details.field`.

use std::collections::HashSet;

use shared::models::{
    IngredientCreate, RecipeCreate, RecipeIngredientInput, RecipeUpdate, TagCreate, UserCreate,
};

use crate::utils::{AppError, AppResult, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: recipe, ingredient, tag
pub const MAX_NAME_LEN: usize = 200;

/// Usernames, first and last names
pub const MAX_USER_NAME_LEN: usize = 150;

/// Ingredient measurement units
pub const MAX_UNIT_LEN: usize = 50;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image references
pub const MAX_URL_LEN: usize = 2048;

/// Recipe description
pub const MAX_TEXT_LEN: usize = 10_000;

// ── Numeric limits ──────────────────────────────────────────────────

/// Upper bound for ingredient amounts, mirrored by a storage CHECK
pub const MAX_AMOUNT: i64 = 32_767;

/// Upper bound for cooking time in minutes, mirrored by a storage CHECK
pub const MAX_COOKING_TIME: i64 = 32_767;

// ── Generic helpers ─────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid_field(
            field,
            format!("{field} must not be empty"),
        ));
    }
    validate_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    match value {
        Some(v) => validate_len(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_len(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::invalid_field(
            field,
            format!("{field} is too long ({len} chars, max {max_len})"),
        ));
    }
    Ok(())
}

// ── Users ───────────────────────────────────────────────────────────

/// Letters, digits and `.@+-_`; `me` is reserved for the own-profile route
pub fn validate_username(username: &str) -> AppResult<()> {
    validate_required_text(username, "username", MAX_USER_NAME_LEN)?;
    let allowed = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'));
    if !allowed {
        return Err(AppError::invalid_field(
            "username",
            "username may contain only letters, digits and .@+-_",
        ));
    }
    if username.eq_ignore_ascii_case("me") {
        return Err(AppError::invalid_field("username", "username 'me' is reserved"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> AppResult<()> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !well_formed {
        return Err(AppError::invalid_field("email", "email address is malformed"));
    }
    Ok(())
}

pub fn validate_user_create(data: &UserCreate) -> AppResult<()> {
    validate_email(&data.email)?;
    validate_username(&data.username)?;
    validate_len(&data.first_name, "first_name", MAX_USER_NAME_LEN)?;
    validate_len(&data.last_name, "last_name", MAX_USER_NAME_LEN)?;
    if data.password.is_empty() {
        return Err(AppError::invalid_field("password", "password must not be empty"));
    }
    validate_len(&data.password, "password", MAX_PASSWORD_LEN)
}

// ── Reference data ──────────────────────────────────────────────────

/// `#RRGGBB`
pub fn validate_color(color: &str) -> AppResult<()> {
    let ok = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !ok {
        return Err(AppError::invalid_field("color", "color must look like #RRGGBB"));
    }
    Ok(())
}

/// `[-a-zA-Z0-9_]+`
pub fn validate_slug(slug: &str) -> AppResult<()> {
    validate_required_text(slug, "slug", MAX_NAME_LEN)?;
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::invalid_field(
            "slug",
            "slug may contain only latin letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}

pub fn validate_tag_create(data: &TagCreate) -> AppResult<()> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_color(&data.color)?;
    validate_slug(&data.slug)
}

pub fn validate_ingredient_create(data: &IngredientCreate) -> AppResult<()> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&data.measurement_unit, "measurement_unit", MAX_UNIT_LEN)
}

// ── Recipes ─────────────────────────────────────────────────────────

/// At least one tag, no tag twice
pub fn validate_tags(tags: &[i64]) -> AppResult<()> {
    if tags.is_empty() {
        return Err(AppError::new(ErrorCode::TagsRequired).with_detail("field", "tags"));
    }
    let mut seen = HashSet::with_capacity(tags.len());
    for &id in tags {
        if !seen.insert(id) {
            return Err(AppError::new(ErrorCode::DuplicateTag)
                .with_detail("field", "tags")
                .with_detail("id", id));
        }
    }
    Ok(())
}

/// At least one ingredient, no ingredient twice, every amount in 1..=MAX_AMOUNT
pub fn validate_ingredients(items: &[RecipeIngredientInput]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::IngredientsRequired).with_detail("field", "ingredients"));
    }
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id) {
            return Err(AppError::new(ErrorCode::DuplicateIngredient)
                .with_detail("field", "ingredients")
                .with_detail("id", item.id));
        }
        if !(1..=MAX_AMOUNT).contains(&item.amount) {
            return Err(AppError::new(ErrorCode::InvalidAmount)
                .with_detail("field", "amount")
                .with_detail("id", item.id)
                .with_detail("max", MAX_AMOUNT));
        }
    }
    Ok(())
}

pub fn validate_cooking_time(minutes: i64) -> AppResult<()> {
    if !(1..=MAX_COOKING_TIME).contains(&minutes) {
        return Err(AppError::new(ErrorCode::InvalidCookingTime)
            .with_detail("field", "cooking_time")
            .with_detail("max", MAX_COOKING_TIME));
    }
    Ok(())
}

/// Full recipe payload (POST, PUT)
pub fn validate_recipe_payload(data: &RecipeCreate) -> AppResult<()> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&data.text, "text", MAX_TEXT_LEN)?;
    validate_optional_text(&data.image, "image", MAX_URL_LEN)?;
    validate_cooking_time(data.cooking_time)?;
    validate_tags(&data.tags)?;
    validate_ingredients(&data.ingredients)
}

/// Partial recipe payload (PATCH): only the supplied fields are checked,
/// with the same rules as a full payload
pub fn validate_recipe_update(data: &RecipeUpdate) -> AppResult<()> {
    if let Some(ref name) = data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(ref text) = data.text {
        validate_required_text(text, "text", MAX_TEXT_LEN)?;
    }
    validate_optional_text(&data.image, "image", MAX_URL_LEN)?;
    if let Some(minutes) = data.cooking_time {
        validate_cooking_time(minutes)?;
    }
    if let Some(ref tags) = data.tags {
        validate_tags(tags)?;
    }
    if let Some(ref ingredients) = data.ingredients {
        validate_ingredients(ingredients)?;
    }
    Ok(())
}
