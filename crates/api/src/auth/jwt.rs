//! Access and refresh tokens.
//!
//! Access tokens are HS256 JWTs carrying the user, their organization and
//! role. Refresh tokens are opaque UUIDs; only their SHA-256 digest is
//! stored in `user_sessions`.

use adops_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{parse_var, ConfigError};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    /// Organization the user belongs to. Every query is scoped by it.
    pub org: DbId,
    pub role: String,
    /// Always [`ISSUER`]; tokens minted by other services are refused.
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

pub const ISSUER: &str = "adops-api";

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `7`     |
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            secret,
            access_token_expiry_mins: parse_var(
                "JWT_ACCESS_EXPIRY_MINS",
                DEFAULT_ACCESS_EXPIRY_MINS,
            )?,
            refresh_token_expiry_days: parse_var(
                "JWT_REFRESH_EXPIRY_DAYS",
                DEFAULT_REFRESH_EXPIRY_DAYS,
            )?,
        })
    }
}

pub fn generate_access_token(
    user_id: DbId,
    organization_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        org: organization_id,
        role: role.to_string(),
        iss: ISSUER.to_string(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature, expiry and issuer, returning the embedded claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[ISSUER]);
    let key = DecodingKey::from_secret(config.secret.as_bytes());
    decode::<Claims>(token, &key, &validation).map(|data| data.claims)
}

/// Returns `(plaintext, sha256_hex)`. Only the hash is persisted.
pub fn generate_refresh_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let hash = hash_refresh_token(&plaintext);
    (plaintext, hash)
}

pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn token_round_trip_keeps_org_and_role() {
        let config = test_config("unit-test-secret");
        let token = generate_access_token(42, 3, "finance", &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.org, 3);
        assert_eq!(claims.role, "finance");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config("unit-test-secret");
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            org: 1,
            role: "sales".to_string(),
            iss: ISSUER.to_string(),
            // Well past the default 60 second leeway.
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let config = test_config("unit-test-secret");
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            org: 1,
            role: "admin".to_string(),
            iss: "someone-else".to_string(),
            exp: now + 600,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(1, 1, "admin", &test_config("alpha")).unwrap();
        assert!(validate_token(&token, &test_config("bravo")).is_err());
    }

    #[test]
    fn refresh_hash_is_stable_hex() {
        let (plaintext, hash) = generate_refresh_token();
        assert_eq!(hash, hash_refresh_token(&plaintext));
        assert_eq!(hash.len(), 64);
    }
}
