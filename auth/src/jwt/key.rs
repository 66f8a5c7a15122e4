use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::digest::KeyInit;
use hmac::Hmac;
use hmac::Mac;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use sha2::Sha256;
use sha2::Sha384;
use sha2::Sha512;

use super::errors::KeyError;

/// Message signed by [`hash_secret`] to fingerprint a secret.
const FINGERPRINT_MESSAGE: &[u8] = b"jwt-secret";

/// Symmetric signing key bound to one HMAC algorithm.
///
/// Derived once from the configured base64 secret and then shared read-only,
/// so tokens signed by any holder of the same secret verify with any other.
#[derive(Clone)]
pub struct SigningKey {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SigningKey {
    /// Derive a signing key from a base64 encoded secret.
    ///
    /// # Arguments
    /// * `base64_secret` - Standard base64 encoding of the raw key bytes
    /// * `algorithm` - HMAC algorithm name (`HmacSHA512`, `HS512`, ...)
    ///
    /// # Returns
    /// SigningKey usable for both signing and verification
    ///
    /// # Errors
    /// * `EmptySecret` - Secret is blank or decodes to zero bytes
    /// * `InvalidBase64` - Secret is not valid standard base64
    /// * `UnsupportedAlgorithm` - Algorithm is not an HMAC algorithm
    pub fn from_base64(base64_secret: &str, algorithm: &str) -> Result<Self, KeyError> {
        let algorithm = parse_hmac_algorithm(algorithm)?;
        let secret = decode_secret(base64_secret)?;

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Resolve an HMAC algorithm name.
///
/// Accepts both the JCA style names (`HmacSHA256`) and the JWS names (`HS256`),
/// case-insensitively.
pub fn parse_hmac_algorithm(name: &str) -> Result<Algorithm, KeyError> {
    match name.trim().to_ascii_uppercase().as_str() {
        "HMACSHA256" | "HS256" => Ok(Algorithm::HS256),
        "HMACSHA384" | "HS384" => Ok(Algorithm::HS384),
        "HMACSHA512" | "HS512" => Ok(Algorithm::HS512),
        _ => Err(KeyError::UnsupportedAlgorithm(name.to_string())),
    }
}

/// Compute a base64 HMAC fingerprint of a raw secret.
///
/// The fingerprint identifies which secret a process runs with without
/// revealing it.
///
/// # Errors
/// * `UnsupportedAlgorithm` - Algorithm is not an HMAC algorithm
/// * `InvalidKeyLength` - The MAC rejected the key
pub fn hash_secret(secret: &[u8], algorithm: &str) -> Result<String, KeyError> {
    let digest = match parse_hmac_algorithm(algorithm)? {
        Algorithm::HS256 => hmac_digest::<Hmac<Sha256>>(secret)?,
        Algorithm::HS384 => hmac_digest::<Hmac<Sha384>>(secret)?,
        _ => hmac_digest::<Hmac<Sha512>>(secret)?,
    };

    Ok(STANDARD.encode(digest))
}

fn decode_secret(base64_secret: &str) -> Result<Vec<u8>, KeyError> {
    let trimmed = base64_secret.trim();
    if trimmed.is_empty() {
        return Err(KeyError::EmptySecret);
    }

    let secret = STANDARD
        .decode(trimmed)
        .map_err(|e| KeyError::InvalidBase64(e.to_string()))?;

    if secret.is_empty() {
        return Err(KeyError::EmptySecret);
    }

    Ok(secret)
}

fn hmac_digest<M: Mac + KeyInit>(secret: &[u8]) -> Result<Vec<u8>, KeyError> {
    let mut mac = <M as Mac>::new_from_slice(secret)
        .map_err(|e| KeyError::InvalidKeyLength(e.to_string()))?;
    mac.update(FINGERPRINT_MESSAGE);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "c2VjcmV0LWtleS1mb3ItdGVzdHMtYXQtbGVhc3QtNjQtYnl0ZXMtbG9uZy0xMjM0NTY3ODkwYWJjZGVm";

    #[test]
    fn test_from_base64_binds_algorithm() {
        let key = SigningKey::from_base64(SECRET, "HmacSHA512").expect("Failed to derive key");
        assert_eq!(key.algorithm(), Algorithm::HS512);

        let key = SigningKey::from_base64(SECRET, "hs256").expect("Failed to derive key");
        assert_eq!(key.algorithm(), Algorithm::HS256);
    }

    #[test]
    fn test_from_base64_rejects_invalid_base64() {
        let result = SigningKey::from_base64("not base64 at all!", "HmacSHA512");
        assert!(matches!(result, Err(KeyError::InvalidBase64(_))));
    }

    #[test]
    fn test_from_base64_rejects_empty_secret() {
        let result = SigningKey::from_base64("   ", "HmacSHA512");
        assert!(matches!(result, Err(KeyError::EmptySecret)));
    }

    #[test]
    fn test_from_base64_rejects_unknown_algorithm() {
        let result = SigningKey::from_base64(SECRET, "RS256");
        assert!(matches!(result, Err(KeyError::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_hash_secret_is_deterministic() {
        let first = hash_secret(b"secret", "HmacSHA512").unwrap();
        let second = hash_secret(b"secret", "HmacSHA512").unwrap();
        let other = hash_secret(b"other", "HmacSHA512").unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        // 64 byte digest, padded base64
        assert_eq!(first.len(), 88);
    }

    #[test]
    fn test_hash_secret_depends_on_algorithm() {
        let sha256 = hash_secret(b"secret", "HmacSHA256").unwrap();
        let sha512 = hash_secret(b"secret", "HmacSHA512").unwrap();
        assert_ne!(sha256, sha512);
        assert_eq!(sha256.len(), 44);
    }

    #[test]
    fn test_debug_hides_key_material() {
        let key = SigningKey::from_base64(SECRET, "HS512").unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("HS512"));
        assert!(!debug.contains(SECRET));
    }
}
