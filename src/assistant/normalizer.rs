use std::sync::Arc;

use dashmap::DashMap;

use super::errors::AssistantResult;
use super::llm::{ChatMessage, ChatModel, ChatRequest};
use super::prompts::library;

/// Maps ingredient names to a canonical singular form
///
/// Answers are cached for the life of the process, keyed by the
/// lower-cased input.
pub struct NameNormalizer {
    llm: Arc<dyn ChatModel>,
    cache: DashMap<String, String>,
}

impl NameNormalizer {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self {
            llm,
            cache: DashMap::new(),
        }
    }

    pub async fn normalize(&self, name: &str) -> String {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return key;
        }
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        let normalized = match self.ask(&key).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, item = %key, "Name normalization failed, using lowercase name");
                return key;
            }
        };

        self.cache.insert(key, normalized.clone());
        normalized
    }

    async fn ask(&self, name: &str) -> AssistantResult<String> {
        let template = library::normalize_item();
        let request = ChatRequest::new(vec![
            ChatMessage::system(template.system),
            ChatMessage::user(template.render(&[("item", name)])),
        ])
        .temperature(0.1)
        .max_tokens(50);

        let answer = self.llm.complete(request).await?;
        let cleaned = answer
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '.')
            .trim()
            .to_lowercase();

        if cleaned.is_empty() {
            Ok(name.to_string())
        } else {
            Ok(cleaned)
        }
    }

    #[cfg(test)]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::testing::ScriptedModel;

    #[tokio::test]
    async fn normalizes_and_caches() {
        let llm = ScriptedModel::new(vec!["\"Tomato\"\n"]);
        let normalizer = NameNormalizer::new(llm.clone());

        assert_eq!(normalizer.normalize("Fresh Tomatoes").await, "tomato");
        assert_eq!(normalizer.normalize("fresh tomatoes ").await, "tomato");
        assert_eq!(llm.requests().len(), 1);
        assert_eq!(normalizer.cached(), 1);
    }

    #[tokio::test]
    async fn failure_falls_back_to_lowercase_and_is_not_cached() {
        let llm = ScriptedModel::failing();
        let normalizer = NameNormalizer::new(llm);

        assert_eq!(normalizer.normalize("Onions").await, "onions");
        assert_eq!(normalizer.cached(), 0);
    }

    #[tokio::test]
    async fn request_is_low_temperature_plain_text() {
        let llm = ScriptedModel::new(vec!["garlic"]);
        let normalizer = NameNormalizer::new(llm.clone());
        normalizer.normalize("minced garlic").await;

        let request = llm.requests().remove(0);
        assert_eq!(request.temperature, Some(0.1));
        assert_eq!(request.max_tokens, 50);
        assert!(!request.json_mode);
        assert_eq!(
            request.messages[1].text(),
            Some("Normalize this food item name: minced garlic")
        );
    }
}
