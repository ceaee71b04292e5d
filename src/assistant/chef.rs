// The cooking assistant: routes a classified message to the matching
// action. Action bodies live in sibling modules (inventory, recipes,
// conversation, vision).

use std::sync::Arc;

use chrono::Utc;

use super::classifier::MessageClassifier;
use super::errors::AssistantResult;
use super::llm::ChatModel;
use super::normalizer::NameNormalizer;
use super::types::{Action, Classification};
use crate::domain::repositories::UserRepository;
use crate::domain::user::User;

pub struct CookingAssistant {
    pub(super) llm: Arc<dyn ChatModel>,
    pub(super) users: Arc<dyn UserRepository>,
    pub(super) classifier: MessageClassifier,
    pub(super) normalizer: NameNormalizer,
    pub(super) vision_model: String,
    pub(super) max_stored_history: usize,
}

impl CookingAssistant {
    pub fn new(
        llm: Arc<dyn ChatModel>,
        users: Arc<dyn UserRepository>,
        vision_model: impl Into<String>,
        max_stored_history: usize,
    ) -> Self {
        Self {
            classifier: MessageClassifier::new(llm.clone()),
            normalizer: NameNormalizer::new(llm.clone()),
            llm,
            users,
            vision_model: vision_model.into(),
            max_stored_history,
        }
    }

    /// Classify a text message and act on it
    pub async fn respond_to_text(&self, user: &mut User, message: &str) -> AssistantResult<String> {
        let classification = self.classifier.classify(message, &user.preferences).await;
        tracing::info!(
            user_id = %user.user_id,
            action = %classification.action,
            "Processing message"
        );
        self.process(user, message, classification).await
    }

    /// Run the action chosen for a message
    pub async fn process(
        &self,
        user: &mut User,
        message: &str,
        classification: Classification,
    ) -> AssistantResult<String> {
        match classification.action {
            Action::UpdateInventory => Ok(self.update_inventory(user, &classification.items).await),
            Action::RemoveInventory => Ok(self
                .remove_inventory(user, &classification.items, classification.remove_all)
                .await),
            Action::GetInventory => Ok(self.show_inventory(user, message).await),
            Action::GetRecipes => self.suggest_recipes(user, message).await,
            Action::GeneralConversation => self.converse(user, message).await,
        }
    }

    /// Append the exchange to the user's history and persist it
    pub(super) async fn remember(
        &self,
        user: &mut User,
        message: &str,
        reply: &str,
    ) -> AssistantResult<()> {
        user.record_exchange(message, reply, Utc::now(), self.max_stored_history);
        self.users
            .save_conversation(&user.user_id, &user.conversation_history, user.updated_at)
            .await?;
        Ok(())
    }
}

/// Cuts `text` to at most `limit` characters, ending in `...` when cut
pub(crate) fn shorten(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit.saturating_sub(3)).collect();
    format!("{}...", kept)
}
