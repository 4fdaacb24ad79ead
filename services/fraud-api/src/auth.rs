//! Admin credential checks and bearer token handling

use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::errors::{ApiError, ApiResult};
use crate::models::AdminAccount;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Admin id
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

/// Issues and validates HS256 admin tokens
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, Duration::hours(config.token_ttl_hours))
    }

    /// Sign a token for the admin, returning it with its expiry
    pub fn issue(&self, admin: &AdminAccount) -> ApiResult<(String, DateTime<Utc>)> {
        let expires_at = Utc::now() + self.ttl;
        let claims = Claims {
            sub: admin.id,
            username: admin.username.clone(),
            exp: expires_at.timestamp() as usize,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("token signing failed: {}", e)))?;

        Ok((token, expires_at))
    }

    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::warn!("JWT validation failed: {:?}", err);
                ApiError::InvalidToken
            })
    }
}

/// Check a plaintext password against the admin's Argon2 hash.
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(admin: &AdminAccount, password: &str) -> bool {
    match PasswordHash::new(&admin.password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!("Stored hash for admin {} is unreadable: {}", admin.username, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHasher, SaltString};

    fn admin(password: &str) -> AdminAccount {
        let salt = SaltString::encode_b64(b"fraud-api-salt!!").unwrap();
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string();

        AdminAccount {
            id: Uuid::new_v4(),
            username: "ops".to_string(),
            password_hash: hash,
            full_name: Some("Ops".to_string()),
        }
    }

    #[test]
    fn test_password_verification() {
        let account = admin("correct horse");

        assert!(verify_password(&account, "correct horse"));
        assert!(!verify_password(&account, "battery staple"));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        let mut account = admin("pw");
        account.password_hash = "not-a-hash".to_string();

        assert!(!verify_password(&account, "pw"));
    }

    #[test]
    fn test_token_round_trip() {
        let tokens = TokenService::new("secret", Duration::hours(8));
        let account = admin("pw");

        let (token, expires_at) = tokens.issue(&account).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.username, "ops");
        assert_eq!(claims.exp, expires_at.timestamp() as usize);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let (token, _) = TokenService::new("one", Duration::hours(1))
            .issue(&admin("pw"))
            .unwrap();

        let err = TokenService::new("two", Duration::hours(1))
            .verify(&token)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s leeway
        let tokens = TokenService::new("secret", Duration::minutes(-5));
        let (token, _) = tokens.issue(&admin("pw")).unwrap();

        assert!(tokens.verify(&token).is_err());
    }
}
