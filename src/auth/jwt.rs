use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::settings::AuthConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Issues and validates the HS256 bearer tokens this gateway hands out.
/// One instance per process, built from config at startup.
pub struct JwtAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_days: u64,
}

impl JwtAuthority {
    pub fn new(cfg: &AuthConfig) -> Result<Self> {
        let secret = decode_secret(&cfg.jwt_secret)?;
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            validation,
            ttl_days: cfg.token_ttl_days,
        })
    }

    pub fn ttl_days(&self) -> u64 {
        self.ttl_days
    }

    /// Sign a token for the (already lowercased) e-mail.
    pub fn issue(&self, email: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::days(self.ttl_days as i64);
        let claims = Claims {
            sub: email.to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .context("failed to sign token")
    }

    /// Signature and expiry are both verified. The original service decoded
    /// without verification and leaned on the store check alone; tokens
    /// signed under another secret are rejected here.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| anyhow!("invalid token: {}", e))
    }
}

/// Secrets may be provided raw or as `base64:<encoded>`.
fn decode_secret(raw: &str) -> Result<Vec<u8>> {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("base64:") {
        Some(encoded) => BASE64
            .decode(encoded)
            .context("auth.jwt_secret is not valid base64"),
        None => Ok(trimmed.as_bytes().to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority(secret: &str) -> JwtAuthority {
        JwtAuthority::new(&AuthConfig {
            jwt_secret: secret.to_string(),
            token_ttl_days: 1,
            store_path: None,
        })
        .unwrap()
    }

    #[test]
    fn issued_token_validates_and_carries_email() {
        let auth = authority("test-secret");
        let token = auth.issue("user@example.com").unwrap();
        let claims = auth.validate(&token).unwrap();
        assert_eq!(claims.sub, "user@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = authority("secret-a").issue("user@example.com").unwrap();
        assert!(authority("secret-b").validate(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(authority("test-secret").validate("not.a.jwt").is_err());
    }

    #[test]
    fn base64_prefixed_secret_decodes() {
        // "test-secret" base64-encoded
        let auth = authority("base64:dGVzdC1zZWNyZXQ=");
        let token = auth.issue("user@example.com").unwrap();
        assert!(authority("test-secret").validate(&token).is_ok());
    }
}
