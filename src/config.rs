// Application settings
// Read once at start-up from the process environment (after `.env` is loaded)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use thiserror::Error;

/// Errors raised while reading settings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Twilio (messaging gateway) settings
#[derive(Debug, Clone)]
pub struct TwilioSettings {
    pub account_sid: String,
    pub auth_token: String,
    /// Sending number without the `whatsapp:` prefix
    pub whatsapp_number: String,
    pub api_base: String,
    pub validate_signature: bool,
    /// Public URL the gateway calls (the tunnel URL); used to rebuild the signed URL
    pub public_base_url: Option<String>,
}

/// OpenAI (LLM provider) settings
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub model: String,
    pub vision_model: String,
    pub api_base: String,
}

/// Token signing and admin login settings
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub algorithm: Algorithm,
    pub token_ttl_minutes: i64,
    pub admin_username: Option<String>,
    pub admin_password_hash: Option<String>,
}

/// Complete application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_url: String,
    pub database_name: String,
    pub twilio: TwilioSettings,
    pub openai: OpenAiSettings,
    pub auth: AuthSettings,
    pub bind_addr: SocketAddr,
    pub max_stored_history: usize,
}

const DEFAULT_MONGODB_URL: &str = "mongodb://localhost:27017";

impl Settings {
    /// Reads settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let mongodb_url = get("MONGODB_URL").unwrap_or_else(|| {
            tracing::warn!("MONGODB_URL not set, using default");
            DEFAULT_MONGODB_URL.to_string()
        });

        let twilio = TwilioSettings {
            account_sid: required("TWILIO_ACCOUNT_SID")?,
            auth_token: required("TWILIO_AUTH_TOKEN")?,
            whatsapp_number: required("WHATSAPP_NUMBER")?
                .trim()
                .trim_start_matches("whatsapp:")
                .to_string(),
            api_base: get("TWILIO_API_BASE")
                .unwrap_or_else(|| "https://api.twilio.com".to_string()),
            validate_signature: parse_or(
                "VALIDATE_TWILIO_SIGNATURE",
                get("VALIDATE_TWILIO_SIGNATURE"),
                true,
                parse_bool,
            )?,
            public_base_url: get("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
        };

        let openai = OpenAiSettings {
            api_key: required("OPENAI_API_KEY")?,
            model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            vision_model: get("OPENAI_VISION_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            api_base: get("OPENAI_API_BASE")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
        };

        let auth = AuthSettings {
            jwt_secret: required("JWT_SECRET_KEY")?,
            algorithm: parse_or("ALGORITHM", get("ALGORITHM"), Algorithm::HS256, parse_algorithm)?,
            token_ttl_minutes: parse_or(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                get("ACCESS_TOKEN_EXPIRE_MINUTES"),
                480,
                |v| v.parse::<i64>().ok().filter(|m| *m > 0),
            )?,
            admin_username: get("ADMIN_USERNAME"),
            admin_password_hash: get("ADMIN_PASSWORD_HASH"),
        };

        let host = parse_or("HOST", get("HOST"), IpAddr::from([0, 0, 0, 0]), |v| v.parse().ok())?;
        let port = parse_or("PORT", get("PORT"), 8000u16, |v| v.parse().ok())?;

        Ok(Self {
            mongodb_url,
            database_name: get("DATABASE_NAME")
                .unwrap_or_else(|| "cooking-assistant-bot".to_string()),
            twilio,
            openai,
            auth,
            bind_addr: SocketAddr::new(host, port),
            max_stored_history: parse_or(
                "MAX_STORED_HISTORY",
                get("MAX_STORED_HISTORY"),
                50usize,
                |v| v.parse().ok(),
            )?,
        })
    }
}

fn parse_or<T>(
    key: &'static str,
    raw: Option<String>,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => parse(value.trim()).ok_or(ConfigError::Invalid { key, value }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Only HMAC algorithms make sense with a shared `JWT_SECRET_KEY`
fn parse_algorithm(value: &str) -> Option<Algorithm> {
    match Algorithm::from_str(&value.to_ascii_uppercase()).ok()? {
        alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) => Some(alg),
        _ => None,
    }
}
