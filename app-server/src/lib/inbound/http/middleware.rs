use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use super::errors::method_not_allowed_response;
use super::errors::ApiError;
use super::errors::RenderedError;
use crate::domain::errors::AppError;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extension type to store the authenticated caller in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Middleware that validates access tokens and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let claims = state
        .authenticator
        .token_provider()
        .parse_claims(token)
        .map_err(|e| {
            tracing::warn!(error = %e, "Access token rejected");
            ApiError::from(e)
        })?;

    let user_id = claims
        .user_id()
        .ok()
        .filter(|id| *id > 0)
        .map(UserId)
        .ok_or_else(|| {
            tracing::warn!(subject = %claims.sub, "Token subject is not a user id");
            ApiError::from(AppError::unauthorized().with_message("Invalid token"))
        })?;
    let email = claims.email().unwrap_or_default().to_string();

    req.extensions_mut()
        .insert(AuthenticatedUser { user_id, email });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized().with_message("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::unauthorized().with_message("Invalid Authorization header"))?;

    match auth_str.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AppError::unauthorized()
            .with_message("Invalid Authorization header format. Expected: Bearer <token>")
            .into()),
    }
}

/// Replaces the router's empty 405 with an error body.
pub async fn translate_method_not_allowed(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let response = next.run(req).await;

    if response.status() == StatusCode::METHOD_NOT_ALLOWED
        && response.extensions().get::<RenderedError>().is_none()
    {
        return method_not_allowed_response(method, &response);
    }

    response
}
