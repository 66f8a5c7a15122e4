use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use validator::Validate;

use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::errors::ApiError;
use crate::inbound::http::extract::not_blank;
use crate::inbound::http::extract::trimmed;
use crate::inbound::http::extract::ValidatedJson;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    // An unknown or malformed email must look exactly like a wrong password.
    let email = EmailAddress::new(body.email).map_err(|_| UserError::InvalidCredentials)?;

    let user = state
        .user_service
        .get_user_by_email(&email)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByEmail(_) => UserError::InvalidCredentials,
            other => other,
        })?;

    let tokens = state.authenticator.authenticate(
        &body.password,
        &user.password_hash,
        user.id.value(),
        user.email.as_str(),
    )?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenResponseData::new(&user, tokens),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(custom(function = "not_blank"))]
    email: String,
    #[validate(custom(function = "not_blank"))]
    password: String,
}
