use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    Form, Json,
};
use serde::Serialize;

use crate::api::errors::ApiError;
use crate::api::state::{AppState, WebhookSettings};
use crate::assistant::DispatchStatus;
use crate::domain::messaging::InboundMessage;
use crate::infrastructure::twilio::verify_signature;

const SIGNATURE_HEADER: &str = "x-twilio-signature";

/// Webhook acknowledgement
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: DispatchStatus,
}

/// Inbound WhatsApp messages from Twilio
///
/// POST /whatsapp
pub async fn receive_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Form(form): Form<BTreeMap<String, String>>,
) -> Result<Json<WebhookResponse>, ApiError> {
    if state.webhook.validate_signature {
        let url = signed_url(&state.webhook, &headers, &uri);
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if !verify_signature(&state.webhook.auth_token, &url, &form, signature) {
            tracing::warn!(url = %url, "Rejected webhook with invalid signature");
            return Err(ApiError::forbidden("Invalid Twilio signature"));
        }
    }

    let message = InboundMessage::from_form(&form).map_err(|e| {
        tracing::warn!(error = %e, "Malformed webhook payload");
        ApiError::bad_request(e)
    })?;

    tracing::info!(
        message_sid = %message.message_sid,
        phone = %message.from,
        "Received WhatsApp message"
    );

    let status = state
        .dispatcher
        .dispatch(message)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Failed to process message: {}", e)))?;

    Ok(Json(WebhookResponse { status }))
}

/// The URL Twilio signed: the configured public base when set, otherwise
/// rebuilt from the proxy headers the tunnel forwards.
fn signed_url(settings: &WebhookSettings, headers: &HeaderMap, uri: &Uri) -> String {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    if let Some(base) = &settings.public_base_url {
        return format!("{}{}", base, path);
    }

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let scheme = header("x-forwarded-proto").unwrap_or_else(|| "https".to_string());
    let host = header("x-forwarded-host")
        .or_else(|| header("host"))
        .unwrap_or_default();

    format!("{}://{}{}", scheme, host, path)
}
