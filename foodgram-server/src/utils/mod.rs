//! Utilities: logging setup, input validation, query types
//!
//! Error types are re-exported from `shared::error` so handlers can use
//! `crate::utils::{AppError, AppResult}`.

pub mod logger;
pub mod types;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
