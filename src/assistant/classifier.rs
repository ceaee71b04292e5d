use std::sync::Arc;

use super::errors::{AssistantError, AssistantResult};
use super::llm::{ChatMessage, ChatModel, ChatRequest};
use super::prompts::library;
use super::types::{Action, Classification};
use crate::domain::user::UserPreferences;

/// Decides which action a message asks for
pub struct MessageClassifier {
    llm: Arc<dyn ChatModel>,
}

impl MessageClassifier {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }

    /// Classify a message; any failure degrades to general conversation
    pub async fn classify(&self, message: &str, preferences: &UserPreferences) -> Classification {
        match self.try_classify(message, preferences).await {
            Ok(classification) => {
                tracing::debug!(action = %classification.action, items = classification.items.len(), "Classified message");
                classification
            }
            Err(e) => {
                tracing::warn!(error = %e, "Classification failed, falling back to general conversation");
                Classification::general()
            }
        }
    }

    async fn try_classify(
        &self,
        message: &str,
        preferences: &UserPreferences,
    ) -> AssistantResult<Classification> {
        let template = library::classification();
        let preferences_json = serde_json::to_string(preferences)?;
        let request = ChatRequest::new(vec![
            ChatMessage::system(template.system),
            ChatMessage::user(template.render(&[
                ("preferences", &preferences_json),
                ("message", message),
            ])),
        ])
        .temperature(0.3)
        .max_tokens(150)
        .json();

        let raw = self.llm.complete(request).await?;
        parse_classification(&raw)
    }
}

/// Parses and validates the classifier's JSON answer
pub fn parse_classification(raw: &str) -> AssistantResult<Classification> {
    let value: serde_json::Value = serde_json::from_str(raw.trim())?;

    let mutates = matches!(
        value.get("action").and_then(|a| a.as_str()),
        Some("update_inventory") | Some("remove_inventory")
    );
    let remove_all = value
        .get("remove_all")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if mutates && !remove_all && !value.get("items").map_or(false, |i| i.is_array()) {
        return Err(AssistantError::InvalidOutput(
            "inventory action without items array".to_string(),
        ));
    }
    let missing_amount = value
        .get("items")
        .and_then(|i| i.as_array())
        .map_or(false, |items| items.iter().any(|i| i.get("amount").is_none()));
    if mutates && missing_amount {
        return Err(AssistantError::InvalidOutput(
            "inventory item without an amount".to_string(),
        ));
    }

    let classification: Classification = serde_json::from_value(value)?;
    if classification.action == Action::UpdateInventory
        && classification.items.iter().any(|i| i.name.trim().is_empty())
    {
        return Err(AssistantError::InvalidOutput(
            "inventory item without a name".to_string(),
        ));
    }

    Ok(classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::testing::ScriptedModel;
    use crate::domain::inventory::RequestedItem;

    #[test]
    fn parses_update_with_numeric_amounts() {
        let c = parse_classification(
            r#"{"action": "update_inventory", "items": [{"name": "tomatoes", "amount": 5}]}"#,
        )
        .unwrap();

        assert_eq!(c.action, Action::UpdateInventory);
        assert_eq!(c.items, vec![RequestedItem::new("tomatoes", "5")]);
    }

    #[test]
    fn remove_all_without_items_is_valid() {
        let c = parse_classification(r#"{"action": "remove_inventory", "remove_all": true}"#).unwrap();
        assert!(c.remove_all);
    }

    #[test]
    fn inventory_action_needs_items() {
        assert!(parse_classification(r#"{"action": "update_inventory"}"#).is_err());
        assert!(parse_classification(r#"{"action": "remove_inventory", "items": "x"}"#).is_err());
    }

    #[test]
    fn item_without_name_is_rejected() {
        assert!(parse_classification(r#"{"action": "update_inventory", "items": [{"amount": "1"}]}"#).is_err());
    }

    #[test]
    fn item_without_amount_is_rejected() {
        assert!(parse_classification(r#"{"action": "update_inventory", "items": [{"name": "garlic"}]}"#).is_err());
        assert!(parse_classification(r#"{"action": "remove_inventory", "items": [{"name": "garlic"}]}"#).is_err());

        let c = parse_classification(r#"{"action": "remove_inventory", "items": [{"name": "garlic", "amount": ""}]}"#).unwrap();
        assert_eq!(c.items, vec![RequestedItem::new("garlic", "")]);
    }

    #[tokio::test]
    async fn classify_falls_back_when_amount_missing() {
        let llm = ScriptedModel::new(vec![r#"{"action": "update_inventory", "items": [{"name": "garlic"}]}"#]);
        let classifier = MessageClassifier::new(llm);

        let c = classifier.classify("I bought garlic", &UserPreferences::default()).await;
        assert_eq!(c, Classification::general());
    }

    #[tokio::test]
    async fn classify_sends_json_request() {
        let llm = ScriptedModel::new(vec![r#"{"action": "get_recipes"}"#]);
        let classifier = MessageClassifier::new(llm.clone());

        let c = classifier
            .classify("what can I cook?", &UserPreferences::default())
            .await;

        assert_eq!(c.action, Action::GetRecipes);
        let request = llm.requests().remove(0);
        assert!(request.json_mode);
        assert_eq!(request.max_tokens, 150);
        assert_eq!(request.temperature, Some(0.3));
    }

    #[tokio::test]
    async fn classify_falls_back_on_garbage() {
        let llm = ScriptedModel::new(vec!["not json"]);
        let classifier = MessageClassifier::new(llm);

        let c = classifier.classify("hello", &UserPreferences::default()).await;
        assert_eq!(c, Classification::general());
    }

    #[tokio::test]
    async fn classify_falls_back_on_provider_error() {
        let llm = ScriptedModel::failing();
        let classifier = MessageClassifier::new(llm);

        let c = classifier.classify("hello", &UserPreferences::default()).await;
        assert_eq!(c.action, Action::GeneralConversation);
    }
}
