/// Bearer-token authentication middleware
///
/// This layer guards every task route: it extracts the bearer token from
/// the Authorization header, verifies it, and injects the authenticated
/// user id into request extensions before any handler logic runs. A
/// missing or invalid token is rejected with 401 here, so handlers never
/// see an unauthenticated request.
///
/// Unlike handler errors (which render `{"message": ...}`), rejections
/// from this layer render `{"msg": ...}`, the shape existing clients of
/// the API already handle.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::jwt;
use crate::app::AppState;

/// Authenticated user identity added to request extensions
///
/// Handlers extract it with Axum's `Extension` extractor:
///
/// ```ignore
/// async fn handler(Extension(user): Extension<CurrentUser>) { ... }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    /// Verified user id from the token's subject claim
    pub id: i64,
}

/// Rejection produced by the authentication layer
///
/// Renders as 401 with a `{"msg": ...}` body.
#[derive(Debug, Serialize)]
pub struct AuthRejection {
    msg: String,
}

impl AuthRejection {
    fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// Bearer-token middleware for protected routes
///
/// Verifies the Authorization header and inserts [`CurrentUser`] into the
/// request. Applied with `axum::middleware::from_fn_with_state`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AuthRejection::new("Missing Authorization Header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthRejection::new("Invalid Authorization Header"))?;

    let user_id = jwt::verify_token(token, state.jwt_secret())
        .map_err(|_| AuthRejection::new("Invalid or expired token"))?;

    req.extensions_mut().insert(CurrentUser { id: user_id });

    Ok(next.run(req).await)
}
