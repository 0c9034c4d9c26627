//! Session credential: a JWT issued by the credential endpoint.
//!
//! The console normally does not hold the signing key, so it only decodes
//! the claims to learn the subject and expiry. When a secret is configured
//! the signature is verified as well.

use chrono::{DateTime, TimeZone, Utc};
use fmconsole_core::ConsoleError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims the console reads from the credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the account id.
    pub sub: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Expiration (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    #[serde(default)]
    pub iat: i64,
    /// Tenant the account is scoped to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

/// A raw token together with its decoded claims.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    token: String,
    claims: Claims,
}

impl Credential {
    /// Decode without checking the signature. Expiry is NOT enforced here;
    /// use [`is_expired`](Self::is_expired).
    pub fn decode(token: &str) -> Result<Self, ConsoleError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        Self::decode_with(token, &DecodingKey::from_secret(&[]), &validation)
    }

    /// Decode and verify an HMAC-SHA256 signature and the expiry.
    pub fn verify(token: &str, secret: &str) -> Result<Self, ConsoleError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        Self::decode_with(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
    }

    fn decode_with(
        token: &str,
        key: &DecodingKey,
        validation: &Validation,
    ) -> Result<Self, ConsoleError> {
        let data = jsonwebtoken::decode::<Claims>(token, key, validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => ConsoleError::Unauthorized("credential expired".into()),
                ErrorKind::InvalidSignature => {
                    ConsoleError::Unauthorized("credential signature mismatch".into())
                }
                _ => ConsoleError::Decode(format!("credential: {}", e)),
            }
        })?;
        Ok(Self { token: token.to_string(), claims: data.claims })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.claims.exp, 0).single()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.claims.exp
    }
}
