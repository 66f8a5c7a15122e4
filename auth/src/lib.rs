//! Authentication utilities library
//!
//! Provides the authentication infrastructure of the app server:
//! - Signing key derivation from a base64 secret
//! - Access/refresh token issuance and verification (HMAC signed JWTs)
//! - Password hashing (Argon2id)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Tokens
//! ```
//! use auth::{SigningKey, TokenConfig, TokenProvider};
//!
//! let key = SigningKey::from_base64("c2VjcmV0LWtleS1hdC1sZWFzdC02NC1ieXRlcw==", "HmacSHA512").unwrap();
//! let provider = TokenProvider::new(key, TokenConfig::default());
//! let token = provider.issue_access_token(42, "alice@example.com").unwrap();
//! let claims = provider.parse_claims(&token).unwrap();
//! assert_eq!(claims.user_id().unwrap(), 42);
//! assert!(provider.validate_token(&token));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, SigningKey, TokenConfig, TokenProvider};
//!
//! let key = SigningKey::from_base64("c2VjcmV0LWtleS1hdC1sZWFzdC02NC1ieXRlcw==", "HS512").unwrap();
//! let auth = Authenticator::new(TokenProvider::new(key, TokenConfig::default()));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue tokens
//! let result = auth.authenticate("password123", &hash, 42, "alice@example.com").unwrap();
//! assert!(auth.token_provider().validate_token(&result.access_token));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::KeyError;
pub use jwt::SigningKey;
pub use jwt::TokenConfig;
pub use jwt::TokenProvider;
pub use jwt::TokenType;
pub use password::PasswordError;
pub use password::PasswordHasher;
