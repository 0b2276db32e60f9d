//! Signed claim encoding and decoding

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, TokenError};

/// HMAC-signed JWT codec
///
/// Pure: no I/O and no clock access. Expiry is checked against the instant
/// passed to `decode`, with zero leeway.
pub struct ClaimCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl ClaimCodec {
    /// Creates a codec for a symmetric secret
    ///
    /// # Returns
    ///
    /// * `Ok(ClaimCodec)` - Ready to use
    /// * `Err(DomainError::Configuration)` - Empty secret or a non-HMAC algorithm
    pub fn new(secret: &str, algorithm: Algorithm) -> Result<Self, DomainError> {
        if secret.is_empty() {
            return Err(DomainError::Configuration {
                message: "signing secret must not be empty".to_string(),
            });
        }
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(DomainError::Configuration {
                message: format!("algorithm {:?} is not an HMAC algorithm", algorithm),
            });
        }

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Serialize and sign claims
    pub fn encode(&self, claims: &Claims) -> Result<String, DomainError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key).map_err(|e| {
            DomainError::Encoding {
                message: e.to_string(),
            }
        })
    }

    /// Verify the signature and expiry of a token and return its claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Signature valid and `now < exp`
    /// * `Err(TokenError::BadSignature)` - Signature mismatch or unexpected header algorithm
    /// * `Err(TokenError::Expired)` - `now >= exp`
    /// * `Err(TokenError::MalformedToken)` - Anything else that fails to parse
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, DomainError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::BadSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::MalformedToken,
            }
        })?;

        if data.claims.is_expired_at(now) {
            return Err(TokenError::Expired.into());
        }

        Ok(data.claims)
    }
}
