//! Authentication and authorization
//!
//! - [`JwtService`] - token validation
//! - [`CurrentUser`] - the acting user, as an extractor
//! - [`authenticate`] - optional-auth middleware
//! - [`require_admin`] - admin guard middleware
//! - [`password`] - argon2 hashing

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{authenticate, require_admin};
