//! JWT token service
//!
//! Token generation, validation and parsing. The store has no login
//! endpoint of its own; tokens are minted by the identity provider with
//! the same secret and carry the customer's contact snapshot.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: load_jwt_secret(),
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "store-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "store-clients".to_string()),
        }
    }
}

/// Claims carried by every store token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (numeric, as a string per RFC 7519)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Contact email, snapshotted into orders at creation
    pub email: String,
    /// `"customer"` or `"admin"`
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),

    #[error("key generation failed: {0}")]
    KeyGenerationFailed(String),
}

/// Generate a printable 64-character secret for development use
pub fn generate_printable_jwt_secret() -> String {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

    let rng = SystemRandom::new();
    let mut key = String::new();
    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            return "StoreServerDevelopmentSecureKey2026!".to_string();
        }
        let idx = (byte[0] as usize) % allowed_chars.len();
        key.push(allowed_chars.as_bytes()[idx] as char);
    }
    key
}

fn load_jwt_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret,
        Ok(_) => {
            tracing::warn!("JWT_SECRET shorter than 32 bytes, generating temporary key");
            generate_printable_jwt_secret()
        }
        Err(_) => {
            tracing::warn!("JWT_SECRET not set, generating temporary key for development");
            generate_printable_jwt_secret()
        }
    }
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Mint a token for a user. Mostly used by tests and local tooling;
    /// production tokens come from the identity provider.
    #[allow(clippy::too_many_arguments)]
    pub fn generate_token(
        &self,
        user_id: i64,
        name: &str,
        email: &str,
        role: &str,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            phone: phone.map(str::to_string),
            address: address.map(str::to_string),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Role carried by a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

/// Authenticated user context parsed from JWT claims
///
/// Created by the auth middleware and injected into request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidToken(format!("non-numeric sub: {}", claims.sub)))?;
        let role = match claims.role.as_str() {
            "admin" => Role::Admin,
            _ => Role::Customer,
        };
        Ok(Self {
            id,
            name: claims.name,
            email: claims.email,
            role,
            phone: claims.phone,
            address: claims.address,
        })
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-key-at-least-32-bytes-long!".to_string(),
            expiration_minutes: 60,
            issuer: "store-server".to_string(),
            audience: "store-clients".to_string(),
        })
    }

    #[test]
    fn generation_and_validation_round_trip() {
        let service = test_service();
        let token = service
            .generate_token(
                42,
                "Ada",
                "ada@example.com",
                "customer",
                Some("+3412345678"),
                Some("1 Calle Mayor"),
            )
            .expect("generate");

        let claims = service.validate_token(&token).expect("validate");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "ada@example.com");

        let user = CurrentUser::try_from(claims).expect("parse claims");
        assert_eq!(user.id, 42);
        assert_eq!(user.role, Role::Customer);
        assert!(!user.is_admin());
        assert_eq!(user.phone.as_deref(), Some("+3412345678"));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = test_service()
            .generate_token(1, "A", "a@b.c", "admin", None, None)
            .expect("generate");

        let other = JwtService::with_config(JwtConfig {
            secret: "another-secret-key-at-least-32-bytes!!!!".to_string(),
            ..test_service().config
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn non_numeric_sub_is_rejected() {
        let service = test_service();
        let token = service
            .generate_token(7, "X", "x@y.z", "customer", None, None)
            .expect("generate");
        let mut claims = service.validate_token(&token).expect("validate");
        claims.sub = "not-a-number".to_string();
        assert!(CurrentUser::try_from(claims).is_err());
    }
}
