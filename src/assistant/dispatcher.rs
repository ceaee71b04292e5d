use std::sync::Arc;

use serde::Serialize;

use super::chef::CookingAssistant;
use super::commands::Command;
use super::errors::AssistantResult;
use super::locks::UserLocks;
use crate::domain::messaging::{InboundMessage, MessageKind, MessagingGateway};
use crate::domain::repositories::UserRepository;
use crate::domain::user::User;

pub const BUSY_REPLY: &str = "⏳ I'm still processing your previous message. Please wait for my response before sending another message.";
pub const FAILURE_REPLY: &str = "❌ Sorry, something went wrong. Please try again.";
const UNSUPPORTED_MEDIA_REPLY: &str =
    "📎 Sorry, I can only read text messages and photos of food right now.";

/// How an inbound message was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    Success,
    Busy,
    Ignored,
}

/// Runs inbound messages through the assistant and sends the replies
pub struct MessageDispatcher {
    assistant: Arc<CookingAssistant>,
    users: Arc<dyn UserRepository>,
    gateway: Arc<dyn MessagingGateway>,
    locks: UserLocks,
}

impl MessageDispatcher {
    pub fn new(
        assistant: Arc<CookingAssistant>,
        users: Arc<dyn UserRepository>,
        gateway: Arc<dyn MessagingGateway>,
    ) -> Self {
        Self {
            assistant,
            users,
            gateway,
            locks: UserLocks::new(),
        }
    }

    /// Handle one message end to end
    ///
    /// On a processing error the user is told something went wrong and the
    /// error is returned to the caller.
    pub async fn dispatch(&self, message: InboundMessage) -> AssistantResult<DispatchStatus> {
        let from = &message.from;

        let Some(_guard) = self.locks.try_acquire(from.as_str()) else {
            tracing::info!(phone = %from, "Message arrived while previous one is in flight");
            if let Err(e) = self.gateway.send_text(from, BUSY_REPLY).await {
                tracing::warn!(error = %e, phone = %from, "Failed to send busy notice");
            }
            return Ok(DispatchStatus::Busy);
        };

        match self.handle(&message).await {
            Ok(status) => Ok(status),
            Err(e) => {
                tracing::error!(error = %e, phone = %from, "Failed to process message");
                if let Err(send_err) = self.gateway.send_text(from, FAILURE_REPLY).await {
                    tracing::warn!(error = %send_err, phone = %from, "Failed to send failure notice");
                }
                Err(e)
            }
        }
    }

    async fn handle(&self, message: &InboundMessage) -> AssistantResult<DispatchStatus> {
        let from = &message.from;
        let mut user = self.users.get_or_create(from).await?;
        if !user.is_active {
            tracing::info!(user_id = %user.user_id, "Ignoring message from inactive user");
            return Ok(DispatchStatus::Ignored);
        }

        let Some(reply) = self.reply_for(&mut user, message).await? else {
            return Ok(DispatchStatus::Ignored);
        };

        let sid = self.gateway.send_text(from, &reply).await?;
        tracing::info!(user_id = %user.user_id, message_sid = %sid, "Reply sent");
        Ok(DispatchStatus::Success)
    }

    async fn reply_for(
        &self,
        user: &mut User,
        message: &InboundMessage,
    ) -> AssistantResult<Option<String>> {
        match &message.kind {
            MessageKind::Image { url, .. } => {
                let media = self.gateway.fetch_media(url).await?;
                tracing::debug!(bytes = media.bytes.len(), content_type = %media.content_type, "Downloaded photo");
                self.assistant.respond_to_image(user, &media).await.map(Some)
            }
            MessageKind::Unsupported { content_type } => {
                tracing::info!(user_id = %user.user_id, content_type = %content_type, "Unsupported media");
                Ok(Some(UNSUPPORTED_MEDIA_REPLY.to_string()))
            }
            MessageKind::Text => {
                let text = message.body.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                match Command::parse(text) {
                    Some(command) => self.assistant.run_command(user, command).await.map(Some),
                    None => self.assistant.respond_to_text(user, text).await.map(Some),
                }
            }
        }
    }
}
