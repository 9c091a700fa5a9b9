//! Session tokens
//!
//! HS256 tokens carry the user id in `sub` plus `iat`/`exp`. The same token is handed
//! out in the login body and in the session cookie.

use canvas_core::Snowflake;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<Snowflake, AppError> {
        Snowflake::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }
}

/// A freshly signed token
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    pub token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: i64,
}

impl JwtService {
    #[must_use]
    pub fn new(secret: &str, expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        }
    }

    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    pub fn issue(&self, user_id: Snowflake) -> Result<SessionToken, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.expires_in)).timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Token encoding failed: {e}")))?;

        Ok(SessionToken {
            token,
            expires_in: self.expires_in,
        })
    }

    /// Check signature and expiry
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-long-enough";

    #[test]
    fn test_issue_and_verify() {
        let service = JwtService::new(SECRET, 3600);
        let issued = service.issue(Snowflake::new(4242)).unwrap();
        assert_eq!(issued.expires_in, 3600);

        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.user_id().unwrap(), Snowflake::new(4242));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issued = JwtService::new(SECRET, 3600).issue(Snowflake::new(1)).unwrap();
        let other = JwtService::new("another-secret", 3600);
        assert!(matches!(other.verify(&issued.token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_expired_token() {
        // Beyond the default 60s leeway
        let service = JwtService::new(SECRET, -120);
        let issued = service.issue(Snowflake::new(1)).unwrap();
        assert!(matches!(service.verify(&issued.token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_garbage_token() {
        let service = JwtService::new(SECRET, 3600);
        assert!(matches!(service.verify("not.a.jwt"), Err(AppError::InvalidToken)));
    }
}
