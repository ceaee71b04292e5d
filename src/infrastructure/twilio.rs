// Twilio API client for WhatsApp

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::assistant::chef::shorten;
use crate::config::TwilioSettings;
use crate::domain::messaging::{GatewayError, GatewayResult, Media, MessagingGateway};
use crate::domain::user::PhoneNumber;

/// WhatsApp message bodies longer than this are rejected by Twilio
pub const MAX_BODY_CHARS: usize = 1600;

type HmacSha1 = Hmac<Sha1>;

/// Twilio API client
#[derive(Debug, Clone)]
pub struct TwilioClient {
    client: Client,
    account_sid: String,
    auth_token: String,
    from: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendMessagePayload<'a> {
    from: &'a str,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_url: Option<&'a str>,
}

#[derive(Deserialize)]
struct SendMessageResponse {
    sid: String,
}

impl TwilioClient {
    pub fn new(settings: &TwilioSettings) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            account_sid: settings.account_sid.clone(),
            auth_token: settings.auth_token.clone(),
            from: channel_address(&settings.whatsapp_number),
            base_url: settings.api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn post_message(&self, payload: &SendMessagePayload<'_>) -> GatewayResult<String> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Twilio rejected message");
            return Err(GatewayError::Api(format!(
                "Failed to send message: {} - {}",
                status, text
            )));
        }

        let result: SendMessageResponse = response.json().await?;
        Ok(result.sid)
    }
}

fn channel_address(number: &str) -> String {
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{}", number)
    }
}

#[async_trait]
impl MessagingGateway for TwilioClient {
    async fn send_text(&self, to: &PhoneNumber, body: &str) -> GatewayResult<String> {
        tracing::info!(to = %to, chars = body.chars().count(), "Sending WhatsApp message");
        let body = shorten(body, MAX_BODY_CHARS);
        let to = to.to_channel_address();

        self.post_message(&SendMessagePayload {
            from: &self.from,
            to: &to,
            body: Some(&body),
            media_url: None,
        })
        .await
    }

    async fn send_image(
        &self,
        to: &PhoneNumber,
        media_url: &str,
        caption: Option<&str>,
    ) -> GatewayResult<String> {
        tracing::info!(to = %to, "Sending WhatsApp image");
        let caption = caption.map(|c| shorten(c, MAX_BODY_CHARS));
        let to = to.to_channel_address();

        self.post_message(&SendMessagePayload {
            from: &self.from,
            to: &to,
            body: caption.as_deref(),
            media_url: Some(media_url),
        })
        .await
    }

    async fn fetch_media(&self, url: &str) -> GatewayResult<Media> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Media(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .unwrap_or_else(|| "image/jpeg".to_string());
        let bytes = response.bytes().await?.to_vec();

        Ok(Media {
            bytes,
            content_type,
        })
    }
}

fn signed_mac(auth_token: &str, url: &str, params: &BTreeMap<String, String>) -> Option<HmacSha1> {
    let mut mac = HmacSha1::new_from_slice(auth_token.as_bytes()).ok()?;
    mac.update(url.as_bytes());
    for (key, value) in params {
        mac.update(key.as_bytes());
        mac.update(value.as_bytes());
    }
    Some(mac)
}

/// Signature Twilio sends in `X-Twilio-Signature` for a form POST
///
/// HMAC-SHA1 keyed with the auth token over the full URL followed by every
/// form key and value, keys in sorted order, base64 encoded.
pub fn expected_signature(auth_token: &str, url: &str, params: &BTreeMap<String, String>) -> String {
    signed_mac(auth_token, url, params)
        .map(|mac| base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
        .unwrap_or_default()
}

/// Constant-time check of a request signature
pub fn verify_signature(
    auth_token: &str,
    url: &str,
    params: &BTreeMap<String, String>,
    signature: &str,
) -> bool {
    let Ok(provided) = base64::engine::general_purpose::STANDARD.decode(signature.trim()) else {
        return false;
    };
    signed_mac(auth_token, url, params).map_or(false, |mac| mac.verify_slice(&provided).is_ok())
}
