// Messaging gateway port
// The assistant talks to WhatsApp users only through this interface

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::user::PhoneNumber;

/// Errors from the messaging gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("media download failed: {0}")]
    Media(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Http(err.to_string())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Downloaded media with its reported content type
#[derive(Debug, Clone)]
pub struct Media {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Outbound side of the WhatsApp channel
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Send a text message; returns the gateway's message id
    async fn send_text(&self, to: &PhoneNumber, body: &str) -> GatewayResult<String>;

    /// Send an image by public URL with an optional caption
    async fn send_image(
        &self,
        to: &PhoneNumber,
        media_url: &str,
        caption: Option<&str>,
    ) -> GatewayResult<String>;

    /// Download media attached to an inbound message
    async fn fetch_media(&self, url: &str) -> GatewayResult<Media>;
}

/// What an inbound message carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Image { url: String, content_type: String },
    Unsupported { content_type: String },
}

/// A parsed inbound webhook payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub message_sid: String,
    pub from: PhoneNumber,
    pub body: String,
    pub kind: MessageKind,
}

impl InboundMessage {
    /// Builds a message from the gateway's form fields
    ///
    /// Media is taken from `MediaUrl0`/`MediaContentType0`; a `MessageType`
    /// of `image` with a media URL but no content type is treated as JPEG.
    pub fn from_form(form: &BTreeMap<String, String>) -> Result<Self, String> {
        let field = |key: &str| form.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let from = PhoneNumber::parse(field("From").ok_or("Missing From field")?)?;
        let message_type = field("MessageType").unwrap_or("text").to_lowercase();
        let media_url = field("MediaUrl0");
        let content_type = field("MediaContentType0").map(str::to_lowercase);

        let kind = match (media_url, content_type) {
            (Some(url), Some(ct)) if ct.starts_with("image/") => MessageKind::Image {
                url: url.to_string(),
                content_type: ct,
            },
            (Some(url), None) if message_type == "image" => MessageKind::Image {
                url: url.to_string(),
                content_type: "image/jpeg".to_string(),
            },
            (Some(_), ct) => MessageKind::Unsupported {
                content_type: ct.unwrap_or(message_type),
            },
            (None, _) => MessageKind::Text,
        };

        Ok(Self {
            message_sid: field("MessageSid").unwrap_or_default().to_string(),
            from,
            body: form.get("Body").cloned().unwrap_or_default(),
            kind,
        })
    }
}
