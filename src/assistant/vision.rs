use base64::Engine;

use super::chef::CookingAssistant;
use super::errors::AssistantResult;
use super::llm::{ChatMessage, ChatRequest};
use super::prompts::library;
use super::types::{Classification, DetectedItems};
use crate::domain::messaging::Media;
use crate::domain::user::User;

const NO_FOOD_FOUND: &str =
    "🔍 I couldn't spot any food items in that photo. Try another picture or tell me what you have!";

impl CookingAssistant {
    /// Add the food items visible in a photo to the user's inventory
    pub async fn respond_to_image(&self, user: &mut User, media: &Media) -> AssistantResult<String> {
        let answer = self.describe_image(media).await?;
        let request_text = format!("Add in my inventory {}", answer.trim());

        let classification = match serde_json::from_str::<DetectedItems>(answer.trim()) {
            Ok(detected) if detected.items.is_empty() => return Ok(NO_FOOD_FOUND.to_string()),
            Ok(detected) => Classification::update(detected.items),
            Err(e) => {
                tracing::debug!(error = %e, "Vision answer was not item JSON, classifying as text");
                self.classifier
                    .classify(&request_text, &user.preferences)
                    .await
            }
        };

        tracing::info!(
            user_id = %user.user_id,
            items = classification.items.len(),
            "Processing items detected in photo"
        );
        self.process(user, &request_text, classification).await
    }

    async fn describe_image(&self, media: &Media) -> AssistantResult<String> {
        let content_type = if media.content_type.starts_with("image/") {
            media.content_type.as_str()
        } else {
            "image/jpeg"
        };
        let data_url = format!(
            "data:{};base64,{}",
            content_type,
            base64::engine::general_purpose::STANDARD.encode(&media.bytes)
        );

        let template = library::image_items();
        let request = ChatRequest::new(vec![ChatMessage::user_with_image(
            template.user_template,
            data_url,
        )])
        .model(self.vision_model.as_str())
        .max_tokens(300)
        .json();

        self.llm.complete(request).await
    }
}
