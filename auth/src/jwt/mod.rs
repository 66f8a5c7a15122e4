pub mod claims;
pub mod errors;
pub mod key;
pub mod provider;

pub use claims::Claims;
pub use claims::TokenType;
pub use errors::JwtError;
pub use errors::KeyError;
pub use key::hash_secret;
pub use key::SigningKey;
pub use provider::TokenConfig;
pub use provider::TokenProvider;
