use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Purpose of a token, carried in the `typ` claim.
///
/// Keeps refresh tokens from being accepted where an access token is expected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Access => f.write_str("access"),
            TokenType::Refresh => f.write_str("refresh"),
        }
    }
}

/// JWT claims issued by [`TokenProvider`](super::TokenProvider).
///
/// `sub` holds the numeric user id as a string, `email` is only present on
/// access tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Email of the subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Token purpose
    pub typ: TokenType,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create access token claims.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `email` - Email of the user (stored in the `email` claim)
    /// * `issued_at` - Issue instant
    /// * `validity` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with sub, email, typ, iat and exp set
    pub fn access(
        user_id: impl ToString,
        email: impl Into<String>,
        issued_at: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            email: Some(email.into()),
            typ: TokenType::Access,
            iat: issued_at.timestamp(),
            exp: (issued_at + validity).timestamp(),
        }
    }

    /// Create refresh token claims.
    pub fn refresh(user_id: impl ToString, issued_at: DateTime<Utc>, validity: Duration) -> Self {
        Self {
            sub: user_id.to_string(),
            email: None,
            typ: TokenType::Refresh,
            iat: issued_at.timestamp(),
            exp: (issued_at + validity).timestamp(),
        }
    }

    /// Convert the subject back into a user id.
    ///
    /// # Errors
    /// * `InvalidToken` - Subject is not a numeric id
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidToken(format!("subject is not a user id: {}", self.sub)))
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
