use crate::jwt::JwtError;
use crate::jwt::TokenProvider;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_provider: TokenProvider,
}

/// Tokens handed to a client after successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    pub fn new(token_provider: TokenProvider) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_provider,
        }
    }

    pub fn token_provider(&self) -> &TokenProvider {
        &self.token_provider
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue an access/refresh token pair.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Subject of the issued tokens
    /// * `email` - Email claim of the access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unreadable
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: i64,
        email: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_tokens(user_id, email)?)
    }

    /// Issue a token pair without password verification.
    ///
    /// Used by the refresh flow, where the caller already proved its identity
    /// with a refresh token.
    pub fn issue_tokens(&self, user_id: i64, email: &str) -> Result<AuthenticationResult, JwtError> {
        Ok(AuthenticationResult {
            access_token: self.token_provider.issue_access_token(user_id, email)?,
            refresh_token: self.token_provider.issue_refresh_token(user_id)?,
            expires_in: self
                .token_provider
                .config()
                .access_token_validity
                .num_seconds(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::SigningKey;
    use crate::jwt::TokenConfig;

    fn authenticator() -> Authenticator {
        let key = SigningKey::from_base64(
            "dGVzdC1zZWNyZXQta2V5LWZvci1qd3Qtc2lnbmluZy1hdC1sZWFzdC02NC1ieXRlcy1sb25nLTAxMjM0NTY3ODk=",
            "HmacSHA512",
        )
        .expect("Failed to derive key");
        Authenticator::new(TokenProvider::new(key, TokenConfig::default()))
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();
        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate("my_password", &hash, 12, "user@example.com")
            .expect("Authentication failed");

        assert_eq!(result.expires_in, 24 * 60 * 60);

        let claims = authenticator
            .token_provider()
            .parse_claims(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(claims.user_id(), Ok(12));
        assert_eq!(claims.email(), Some("user@example.com"));

        let refresh = authenticator
            .token_provider()
            .parse_refresh_claims(&result.refresh_token)
            .expect("Refresh token validation failed");
        assert_eq!(refresh.user_id(), Ok(12));
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("my_password").unwrap();

        let result = authenticator.authenticate("wrong_password", &hash, 12, "user@example.com");
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_with_unreadable_hash() {
        let authenticator = authenticator();

        let result = authenticator.authenticate("pw", "not-a-hash", 1, "user@example.com");
        assert!(matches!(result, Err(AuthenticationError::PasswordError(_))));
    }
}
