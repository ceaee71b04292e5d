use std::sync::Arc;

use axum::extract::FromRef;

use crate::assistant::MessageDispatcher;
use crate::auth::jwt::JwtKeys;
use crate::config::Settings;
use crate::domain::repositories::UserRepository;

/// Admin login; disabled unless both username and hash are configured
#[derive(Clone, Debug)]
pub struct AdminCredentials {
    pub username: String,
    pub password_hash: String,
}

/// What the webhook needs to authenticate Twilio
#[derive(Clone, Debug)]
pub struct WebhookSettings {
    pub auth_token: String,
    pub validate_signature: bool,
    pub public_base_url: Option<String>,
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub dispatcher: Arc<MessageDispatcher>,
    pub jwt: JwtKeys,
    pub admin: Option<AdminCredentials>,
    pub webhook: WebhookSettings,
}

impl AppState {
    pub fn new(
        settings: &Settings,
        users: Arc<dyn UserRepository>,
        dispatcher: Arc<MessageDispatcher>,
    ) -> Self {
        let admin = match (
            &settings.auth.admin_username,
            &settings.auth.admin_password_hash,
        ) {
            (Some(username), Some(password_hash)) => Some(AdminCredentials {
                username: username.clone(),
                password_hash: password_hash.clone(),
            }),
            _ => {
                tracing::warn!("ADMIN_USERNAME or ADMIN_PASSWORD_HASH not set, admin login disabled");
                None
            }
        };

        Self {
            users,
            dispatcher,
            jwt: JwtKeys::from_settings(&settings.auth),
            admin,
            webhook: WebhookSettings {
                auth_token: settings.twilio.auth_token.clone(),
                validate_signature: settings.twilio.validate_signature,
                public_base_url: settings.twilio.public_base_url.clone(),
            },
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
