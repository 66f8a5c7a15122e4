use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use validator::Validate;

use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::errors::AppError;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::UserId;
use crate::inbound::http::errors::ApiError;
use crate::inbound::http::extract::not_blank;
use crate::inbound::http::extract::ValidatedJson;
use crate::inbound::http::router::AppState;

/// Exchange a refresh token for a new token pair.
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RefreshRequest>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let claims = state
        .authenticator
        .token_provider()
        .parse_refresh_claims(&body.refresh_token)?;
    let user_id = UserId(claims.user_id()?);

    // The account may have disappeared since the token was issued.
    let user = state
        .user_service
        .get_user(&user_id)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => {
                ApiError::from(AppError::unauthorized().with_message("Invalid token"))
            }
            other => ApiError::from(other),
        })?;

    let tokens = state
        .authenticator
        .issue_tokens(user.id.value(), user.email.as_str())?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenResponseData::new(&user, tokens),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(custom(function = "not_blank"))]
    refresh_token: String,
}
