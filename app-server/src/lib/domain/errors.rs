//! Application error taxonomy.
//!
//! Every typed application error is an [`AppError`]: a kind, the [`ErrorCode`]
//! it is bound to and a human readable message. Each kind has a default code
//! but can carry any other code when a case calls for a different status.

use std::fmt;

use http::StatusCode;
use thiserror::Error;

/// Named pairing of an HTTP status, its reason phrase and a default message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    Conflict,
    UnsupportedMediaType,
    InternalServerError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 8] = [
        ErrorCode::BadRequest,
        ErrorCode::Unauthorized,
        ErrorCode::Forbidden,
        ErrorCode::NotFound,
        ErrorCode::MethodNotAllowed,
        ErrorCode::Conflict,
        ErrorCode::UnsupportedMediaType,
        ErrorCode::InternalServerError,
    ];

    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Standard reason phrase of the bound status ("Not Found", ...).
    pub fn reason_phrase(self) -> &'static str {
        self.status().canonical_reason().unwrap_or("Unknown")
    }

    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "The request is invalid",
            ErrorCode::Unauthorized => "Authentication is required",
            ErrorCode::Forbidden => "Access to this resource is denied",
            ErrorCode::NotFound => "The requested resource was not found",
            ErrorCode::MethodNotAllowed => "The request method is not supported",
            ErrorCode::Conflict => "The resource already exists",
            ErrorCode::UnsupportedMediaType => "The request content type is not supported",
            ErrorCode::InternalServerError => "An internal server error occurred",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of a typed application error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppErrorKind {
    Forbidden,
    InvalidInput,
    ResourceNotFound,
    Unauthorized,
}

impl AppErrorKind {
    pub fn default_code(self) -> ErrorCode {
        match self {
            AppErrorKind::Forbidden => ErrorCode::Forbidden,
            AppErrorKind::InvalidInput => ErrorCode::BadRequest,
            AppErrorKind::ResourceNotFound => ErrorCode::NotFound,
            AppErrorKind::Unauthorized => ErrorCode::Unauthorized,
        }
    }
}

/// Typed application error carrying an [`ErrorCode`] and a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AppError {
    kind: AppErrorKind,
    code: ErrorCode,
    message: String,
}

impl AppError {
    /// Error of `kind` bound to the kind's default code.
    pub fn new(kind: AppErrorKind) -> Self {
        Self::with_code(kind, kind.default_code())
    }

    /// Error of `kind` bound to an explicit code instead of the default.
    pub fn with_code(kind: AppErrorKind, code: ErrorCode) -> Self {
        Self {
            kind,
            code,
            message: code.default_message().to_string(),
        }
    }

    pub fn forbidden() -> Self {
        Self::new(AppErrorKind::Forbidden)
    }

    pub fn invalid_input() -> Self {
        Self::new(AppErrorKind::InvalidInput)
    }

    pub fn resource_not_found() -> Self {
        Self::new(AppErrorKind::ResourceNotFound)
    }

    pub fn unauthorized() -> Self {
        Self::new(AppErrorKind::Unauthorized)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> AppErrorKind {
        self.kind
    }

    pub fn error_code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
