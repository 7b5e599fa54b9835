//! Session gate: admits requests carrying a valid session token.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::{claims::CallerIdentity, jwt::JwtKeys};
use crate::error::AppError;

/// Token is the second whitespace-separated field; the scheme is not checked.
pub fn token_from_header(value: &str) -> Option<&str> {
    value.split_whitespace().nth(1)
}

/// Decides whether a request with this `Authorization` header is admitted.
pub fn admit(header: Option<&HeaderValue>, keys: &JwtKeys) -> Result<CallerIdentity, AppError> {
    let Some(header) = header else {
        warn!("missing Authorization header");
        return Err(AppError::Forbidden);
    };

    let token = header
        .to_str()
        .ok()
        .and_then(token_from_header)
        .ok_or_else(|| {
            warn!("malformed Authorization header");
            AppError::Forbidden
        })?;

    match keys.verify(token) {
        Ok(claims) => Ok(claims.into()),
        Err(e) => {
            warn!(error = %e, "session token rejected");
            Err(AppError::Forbidden)
        }
    }
}

/// Middleware for protected routes. Rejected requests never reach the handler;
/// admitted ones carry an `Extension<CallerIdentity>`.
pub async fn require_session(
    State(keys): State<JwtKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = admit(request.headers().get(header::AUTHORIZATION), &keys)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
