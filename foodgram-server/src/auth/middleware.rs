//! Authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::auth::extractor::resolve_user;
use crate::core::ServerState;
use crate::security_log;

/// Optional authentication for every route
///
/// A valid `Authorization: Bearer <token>` puts [`CurrentUser`] into the
/// request extensions; no header leaves the request anonymous.
///
/// | Case | Result |
/// |------|--------|
/// | no Authorization header | anonymous, handler decides |
/// | malformed header / bad token | 401 TokenInvalid |
/// | expired token | 401 TokenExpired |
pub async fn authenticate(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight never carries credentials
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();
    resolve_user(&mut parts, &state.jwt_service)?;
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Require the `admin` role
///
/// Runs after [`authenticate`]: a missing user is 401, a non-admin 403.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id,
            username = user.username.clone(),
            user_role = user.role.clone()
        );
        return Err(AppError::new(shared::ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}
