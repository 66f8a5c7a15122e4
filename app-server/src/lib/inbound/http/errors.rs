//! Translation of every failure into a uniform JSON error body.
//!
//! Handlers, extractors and middleware all fail with [`ApiError`]. Its
//! `IntoResponse` implementation is the only place an error body is built,
//! so every failed request yields exactly one [`ErrorResponse`].

use std::any::Any;
use std::fmt;

use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::http::Method;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use validator::ValidationErrors;

use crate::domain::errors::AppError;
use crate::domain::errors::AppErrorKind;
use crate::domain::errors::ErrorCode;
use crate::domain::user::errors::UserError;

/// Error body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message: String,
    /// Reason phrase of the status
    pub error: String,
    pub status_code: u16,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: code.reason_phrase().to_string(),
            status_code: code.status().as_u16(),
            timestamp: Utc::now(),
        }
    }
}

/// Message of a rendered error, attached to the response extensions so the
/// request trace can report why a request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedError {
    pub message: String,
}

/// One failed field of a validated request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Typed application error, rendered with its bound code
    Application(AppError),
    Validation(Vec<FieldViolation>),
    MethodNotAllowed(Method),
    RouteNotFound(String),
    /// Anything unanticipated; the detail is logged, never rendered
    Internal(String),
}

impl ApiError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ApiError::Application(error) => error.error_code(),
            ApiError::Validation(_) => ErrorCode::BadRequest,
            ApiError::MethodNotAllowed(_) => ErrorCode::MethodNotAllowed,
            ApiError::RouteNotFound(_) => ErrorCode::NotFound,
            ApiError::Internal(_) => ErrorCode::InternalServerError,
        }
    }

    /// Message shown to the caller.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Application(error) => error.message().to_string(),
            ApiError::Validation(violations) => {
                let details = violations
                    .iter()
                    .map(FieldViolation::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                format!("Validation failed: {}", details)
            }
            ApiError::MethodNotAllowed(method) => {
                format!("Request method '{}' is not supported", method)
            }
            ApiError::RouteNotFound(_) => ErrorCode::NotFound.default_message().to_string(),
            ApiError::Internal(_) => ErrorCode::InternalServerError.default_message().to_string(),
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.client_message())
    }

    fn log(&self) {
        match self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Unexpected error while handling request");
            }
            ApiError::Application(error) => {
                tracing::warn!(
                    code = %error.error_code(),
                    kind = ?error.kind(),
                    message = error.message(),
                    "Application error"
                );
            }
            other => {
                tracing::warn!(
                    code = %other.error_code(),
                    message = %other.client_message(),
                    "Request rejected"
                );
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let body = self.to_error_response();
        let status = self.error_code().status();
        let rendered = RenderedError {
            message: body.message.clone(),
        };

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(rendered);
        response
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        ApiError::Application(error)
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::NotFoundByEmail(_) => {
                AppError::resource_not_found().with_message(err.to_string()).into()
            }
            UserError::EmailAlreadyExists(_) => {
                AppError::with_code(AppErrorKind::InvalidInput, ErrorCode::Conflict)
                    .with_message(err.to_string())
                    .into()
            }
            UserError::InvalidCredentials => {
                AppError::unauthorized().with_message(err.to_string()).into()
            }
            UserError::InvalidEmail(_) | UserError::InvalidUserId(_) => {
                AppError::invalid_input().with_message(err.to_string()).into()
            }
            UserError::PasswordHashing(_) | UserError::DatabaseError(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<auth::JwtError> for ApiError {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::EncodingFailed(_) => ApiError::Internal(err.to_string()),
            auth::JwtError::TokenExpired => {
                AppError::unauthorized().with_message("Token is expired").into()
            }
            _ => AppError::unauthorized()
                .with_message("Invalid token")
                .into(),
        }
    }
}

impl From<auth::AuthenticationError> for ApiError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => UserError::InvalidCredentials.into(),
            auth::AuthenticationError::PasswordError(e) => {
                ApiError::Internal(format!("Password verification failed: {}", e))
            }
            auth::AuthenticationError::JwtError(e) => {
                ApiError::Internal(format!("Token generation failed: {}", e))
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let error = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                AppError::with_code(AppErrorKind::InvalidInput, ErrorCode::UnsupportedMediaType)
            }
            _ => AppError::invalid_input(),
        };

        error.with_message(rejection.body_text()).into()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let violations = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value ({})", e.code));
                    FieldViolation::new(field.to_string(), message)
                })
            })
            .collect();

        ApiError::Validation(violations)
    }
}

/// Router fallback for paths no route matches.
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

/// Render a handler panic as a generic internal error.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}

/// Rebuild a bare 405 from the router as an [`ErrorResponse`], keeping `Allow`.
pub(crate) fn method_not_allowed_response(method: Method, original: &Response) -> Response {
    let mut response = ApiError::MethodNotAllowed(method).into_response();
    if let Some(allow) = original.headers().get(header::ALLOW) {
        response.headers_mut().insert(header::ALLOW, allow.clone());
    }
    response
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use validator::Validate;

    use super::*;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_typed_errors_render_bound_status() {
        let cases = [
            (AppError::forbidden(), 403, "Forbidden"),
            (AppError::invalid_input(), 400, "Bad Request"),
            (AppError::resource_not_found(), 404, "Not Found"),
            (AppError::unauthorized(), 401, "Unauthorized"),
            (
                AppError::with_code(AppErrorKind::InvalidInput, ErrorCode::Conflict),
                409,
                "Conflict",
            ),
        ];

        for (error, status, reason) in cases {
            let message = error.message().to_string();
            let response = ApiError::from(error).into_response();
            assert_eq!(response.status().as_u16(), status);

            let body = body_of(response).await;
            assert_eq!(body.status_code, status);
            assert_eq!(body.error, reason);
            assert_eq!(body.message, message);
        }
    }

    #[tokio::test]
    async fn test_body_uses_camel_case_fields() {
        let response = ApiError::from(AppError::forbidden()).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["statusCode"], 403);
        assert!(json["timestamp"].is_string());
        assert!(json["message"].is_string());
        assert_eq!(json["error"], "Forbidden");
    }

    #[tokio::test]
    async fn test_validation_errors_are_aggregated() {
        let error = ApiError::Validation(vec![FieldViolation::new("email", "must not be blank")]);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_of(response).await;
        assert_eq!(body.status_code, 400);
        assert!(body.message.contains("email"));
        assert!(body.message.contains("must not be blank"));
    }

    #[derive(Validate)]
    struct Signup {
        #[validate(length(min = 1, message = "must not be blank"))]
        email: String,
        #[validate(length(min = 8, message = "must be at least 8 characters"))]
        password: String,
    }

    #[test]
    fn test_from_validation_errors_sorts_fields() {
        let errors = Signup {
            email: String::new(),
            password: "short".to_string(),
        }
        .validate()
        .unwrap_err();

        let ApiError::Validation(violations) = ApiError::from(errors) else {
            panic!("expected validation error");
        };
        assert_eq!(
            violations,
            vec![
                FieldViolation::new("email", "must not be blank"),
                FieldViolation::new("password", "must be at least 8 characters"),
            ]
        );
    }

    #[tokio::test]
    async fn test_internal_detail_is_never_rendered() {
        let response =
            ApiError::Internal("NullPointerException at UserService.java:42".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.message, "An internal server error occurred");
        assert!(!body.message.contains("NullPointer"));
    }

    #[tokio::test]
    async fn test_panic_renders_generic_message() {
        let response = handle_panic(Box::new("index out of bounds".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.message, "An internal server error occurred");
    }

    #[tokio::test]
    async fn test_method_not_allowed_names_method() {
        let response = ApiError::MethodNotAllowed(Method::DELETE).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let body = body_of(response).await;
        assert!(body.message.contains("DELETE"));
        assert_eq!(body.error, "Method Not Allowed");
    }

    #[test]
    fn test_user_error_mapping() {
        let conflict = ApiError::from(UserError::EmailAlreadyExists("a@b.io".to_string()));
        assert_eq!(conflict.error_code(), ErrorCode::Conflict);

        let missing = ApiError::from(UserError::NotFound("3".to_string()));
        assert_eq!(missing.error_code(), ErrorCode::NotFound);

        let credentials = ApiError::from(UserError::InvalidCredentials);
        assert_eq!(credentials.error_code(), ErrorCode::Unauthorized);

        let database = ApiError::from(UserError::DatabaseError("relation missing".to_string()));
        assert_eq!(database.error_code(), ErrorCode::InternalServerError);
        assert!(!database.client_message().contains("relation"));
    }

    #[test]
    fn test_jwt_error_mapping() {
        let expired = ApiError::from(auth::JwtError::TokenExpired);
        assert_eq!(expired.error_code(), ErrorCode::Unauthorized);
        assert_eq!(expired.client_message(), "Token is expired");

        let forged = ApiError::from(auth::JwtError::InvalidSignature);
        assert_eq!(forged.client_message(), "Invalid token");

        let encoding = ApiError::from(auth::JwtError::EncodingFailed("key".to_string()));
        assert_eq!(encoding.error_code(), ErrorCode::InternalServerError);
    }

    #[tokio::test]
    async fn test_rendered_error_is_attached() {
        let response = ApiError::from(AppError::unauthorized().with_message("no token")).into_response();
        let rendered = response.extensions().get::<RenderedError>().cloned();
        assert_eq!(
            rendered,
            Some(RenderedError {
                message: "no token".to_string()
            })
        );
    }
}
