// JWT token creation and verification
// Admin API tokens, signed with JWT_SECRET_KEY using the configured ALGORITHM

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthSettings;

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (admin username)
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Admin username (subject)
    pub sub: String,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

/// Signing material and token lifetime
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, algorithm: Algorithm, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(
            &settings.jwt_secret,
            settings.algorithm,
            settings.token_ttl_minutes,
        )
    }

    /// Token lifetime in seconds
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Creates a token for `subject`
    ///
    /// # Example
    /// ```
    /// use cooking_assistant_api::auth::jwt::JwtKeys;
    /// use jsonwebtoken::Algorithm;
    ///
    /// let keys = JwtKeys::new("your-secret-key", Algorithm::HS256, 60);
    /// let token = keys.create_token("admin").expect("valid token");
    /// assert_eq!(keys.verify_token(&token).unwrap().sub, "admin");
    /// ```
    pub fn create_token(&self, subject: &str) -> Result<String, String> {
        let expiry = Utc::now() + self.ttl;
        let claims = Claims {
            sub: subject.to_string(),
            exp: expiry.timestamp() as usize,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding).map_err(|e| e.to_string())
    }

    /// Verifies and decodes a token
    ///
    /// # Returns
    /// * `Ok(Claims)` - The decoded claims if token is valid
    /// * `Err(String)` - If token is invalid, expired, or signed with another algorithm
    pub fn verify_token(&self, token: &str) -> Result<Claims, String> {
        decode::<Claims>(token, &self.decoding, &Validation::new(self.algorithm))
            .map(|data| data.claims)
            .map_err(|e| e.to_string())
    }
}
