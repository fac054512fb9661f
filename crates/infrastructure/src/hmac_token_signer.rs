//! HMAC-SHA256 signed bearer tokens.
//!
//! A token is `base64url(claims-json) "." base64url(hmac-sha256(payload))`.
//! Verification recomputes the tag over the presented payload and compares
//! in constant time before the payload is parsed at all.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use constant_time_eq::constant_time_eq;
use gatherly_application::{AccessTokenClaims, TokenSigner};
use gatherly_core::{AppError, AppResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Minimum secret length accepted for token signing.
pub const TOKEN_SECRET_MIN_LENGTH: usize = 32;

/// Token signer backed by a single shared HMAC-SHA256 secret.
#[derive(Clone)]
pub struct HmacTokenSigner {
    secret: Vec<u8>,
}

impl HmacTokenSigner {
    /// Creates a signer from a shared secret.
    pub fn new(secret: &str) -> AppResult<Self> {
        if secret.len() < TOKEN_SECRET_MIN_LENGTH {
            return Err(AppError::Validation(format!(
                "token secret must be at least {TOKEN_SECRET_MIN_LENGTH} characters"
            )));
        }

        Ok(Self {
            secret: secret.as_bytes().to_vec(),
        })
    }

    fn tag(&self, payload: &[u8]) -> AppResult<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|error| AppError::Internal(format!("invalid hmac key: {error}")))?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl TokenSigner for HmacTokenSigner {
    fn sign(&self, claims: &AccessTokenClaims) -> AppResult<String> {
        let payload = serde_json::to_vec(claims)
            .map_err(|error| AppError::Internal(format!("failed to encode claims: {error}")))?;

        let payload_b64 = URL_SAFE_NO_PAD.encode(&payload);
        let tag = self.tag(payload_b64.as_bytes())?;

        Ok(format!("{payload_b64}.{}", URL_SAFE_NO_PAD.encode(tag)))
    }

    fn verify(&self, token: &str) -> AppResult<AccessTokenClaims> {
        let Some((payload_b64, tag_b64)) = token.split_once('.') else {
            return Err(malformed());
        };

        let presented_tag = URL_SAFE_NO_PAD.decode(tag_b64).map_err(|_| malformed())?;
        let expected_tag = self.tag(payload_b64.as_bytes())?;

        if !constant_time_eq(&presented_tag, &expected_tag) {
            return Err(AppError::Unauthorized(
                "token signature verification failed".to_owned(),
            ));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| malformed())?;
        let claims: AccessTokenClaims =
            serde_json::from_slice(&payload).map_err(|_| malformed())?;

        if claims.is_expired_at(Utc::now()) {
            return Err(AppError::Unauthorized(
                "token has expired, please log in again".to_owned(),
            ));
        }

        Ok(claims)
    }
}

fn malformed() -> AppError {
    AppError::Unauthorized("invalid token, please log in again".to_owned())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use gatherly_application::{AccessTokenClaims, TokenSigner};
    use gatherly_core::{AppError, AppResult, Role};
    use gatherly_domain::UserId;

    use super::HmacTokenSigner;

    const SECRET: &str = "a-test-secret-that-is-long-enough!!";

    fn claims(ttl: Duration) -> AccessTokenClaims {
        AccessTokenClaims::new(UserId::new(), Role::User, Utc::now() + ttl)
    }

    #[test]
    fn rejects_short_secret() {
        assert!(HmacTokenSigner::new("short").is_err());
    }

    #[test]
    fn sign_then_verify_returns_claims() -> AppResult<()> {
        let signer = HmacTokenSigner::new(SECRET)?;
        let claims = claims(Duration::hours(1));

        let token = signer.sign(&claims)?;
        let verified = signer.verify(&token)?;

        assert_eq!(verified, claims);
        Ok(())
    }

    #[test]
    fn verify_rejects_tampered_payload() -> AppResult<()> {
        let signer = HmacTokenSigner::new(SECRET)?;
        let token = signer.sign(&claims(Duration::hours(1)))?;

        let Some((_, tag)) = token.split_once('.') else {
            panic!("token must contain a tag separator");
        };
        let forged = format!("eyJmb3JnZWQiOnRydWV9.{tag}");

        assert!(matches!(
            signer.verify(&forged),
            Err(AppError::Unauthorized(_))
        ));
        Ok(())
    }

    #[test]
    fn verify_rejects_token_signed_with_other_secret() -> AppResult<()> {
        let signer = HmacTokenSigner::new(SECRET)?;
        let other = HmacTokenSigner::new("another-secret-that-is-long-enough!")?;

        let token = other.sign(&claims(Duration::hours(1)))?;

        assert!(matches!(
            signer.verify(&token),
            Err(AppError::Unauthorized(_))
        ));
        Ok(())
    }

    #[test]
    fn verify_rejects_expired_token() -> AppResult<()> {
        let signer = HmacTokenSigner::new(SECRET)?;
        let token = signer.sign(&claims(Duration::seconds(-1)))?;

        assert!(matches!(
            signer.verify(&token),
            Err(AppError::Unauthorized(_))
        ));
        Ok(())
    }

    #[test]
    fn verify_rejects_garbage() -> AppResult<()> {
        let signer = HmacTokenSigner::new(SECRET)?;

        for garbage in ["", "no-separator", "a.b.c", "!!!.???"] {
            assert!(signer.verify(garbage).is_err(), "accepted: {garbage:?}");
        }
        Ok(())
    }
}
