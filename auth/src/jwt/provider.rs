use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenType;
use super::errors::JwtError;
use super::key::SigningKey;

/// Token lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenConfig {
    pub access_token_validity: Duration,
    pub refresh_token_validity: Duration,
}

impl TokenConfig {
    pub const DEFAULT_ACCESS_TOKEN_VALIDITY_SECS: i64 = 24 * 60 * 60;
    pub const DEFAULT_REFRESH_TOKEN_VALIDITY_SECS: i64 = 7 * 24 * 60 * 60;
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_token_validity: Duration::seconds(Self::DEFAULT_ACCESS_TOKEN_VALIDITY_SECS),
            refresh_token_validity: Duration::seconds(Self::DEFAULT_REFRESH_TOKEN_VALIDITY_SECS),
        }
    }
}

/// Issues and verifies signed access and refresh tokens.
///
/// The algorithm is pinned to the one the [`SigningKey`] was derived for; a
/// token whose header names any other algorithm is rejected. Expiration is
/// checked without leeway.
pub struct TokenProvider {
    key: SigningKey,
    config: TokenConfig,
}

impl TokenProvider {
    pub fn new(key: SigningKey, config: TokenConfig) -> Self {
        Self { key, config }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Issue an access token for a user.
    ///
    /// # Arguments
    /// * `user_id` - Identifier stored as the token subject
    /// * `email` - Stored in the `email` claim
    ///
    /// # Returns
    /// Compact JWS string
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_access_token(&self, user_id: i64, email: &str) -> Result<String, JwtError> {
        let claims = Claims::access(
            user_id,
            email,
            Utc::now(),
            self.config.access_token_validity,
        );
        self.encode(&claims)
    }

    /// Issue a refresh token for a user.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_refresh_token(&self, user_id: i64) -> Result<String, JwtError> {
        let claims = Claims::refresh(user_id, Utc::now(), self.config.refresh_token_validity);
        self.encode(&claims)
    }

    /// Verify an access token and return its claims.
    ///
    /// # Errors
    /// * `Malformed` - Token is not a well-formed JWS or its payload is not decodable
    /// * `InvalidSignature` - Signature does not verify with this key
    /// * `TokenExpired` - `exp` is in the past
    /// * `WrongTokenType` - Token is a refresh token
    /// * `MissingClaim` - A required claim is absent
    pub fn parse_claims(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.decode(token, TokenType::Access)?;
        if claims.email.is_none() {
            return Err(JwtError::MissingClaim("email".to_string()));
        }
        Ok(claims)
    }

    /// Verify a refresh token and return its claims.
    ///
    /// Same failure kinds as [`parse_claims`](Self::parse_claims).
    pub fn parse_refresh_claims(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode(token, TokenType::Refresh)
    }

    /// Returns true iff `token` is a valid, unexpired access token.
    pub fn validate_token(&self, token: &str) -> bool {
        self.parse_claims(token).is_ok()
    }

    fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.key.algorithm());

        encode(&header, claims, self.key.encoding_key())
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    fn decode(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.key.algorithm());
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, self.key.decoding_key(), &validation)
            .map_err(map_decode_error)?
            .claims;

        if claims.typ != expected {
            return Err(JwtError::WrongTokenType {
                expected: expected.to_string(),
                actual: claims.typ.to_string(),
            });
        }

        Ok(claims)
    }
}

fn map_decode_error(error: jsonwebtoken::errors::Error) -> JwtError {
    match error.kind() {
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::MissingRequiredClaim(claim) => JwtError::MissingClaim(claim.clone()),
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => JwtError::Malformed(error.to_string()),
        _ => JwtError::InvalidToken(error.to_string()),
    }
}
