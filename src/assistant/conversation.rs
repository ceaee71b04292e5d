use super::chef::{shorten, CookingAssistant};
use super::errors::AssistantResult;
use super::llm::{ChatMessage, ChatRequest};
use super::prompts::{chef_system_prompt, REPLY_CHAR_LIMIT};
use crate::domain::user::{Role, User};

const CONTEXT_TURNS: usize = 5;

impl CookingAssistant {
    /// Free-form chat in the user's chosen chef personality
    pub async fn converse(&self, user: &mut User, message: &str) -> AssistantResult<String> {
        let request = ChatRequest::new(build_messages(user, message))
            .temperature(0.7)
            .max_tokens(500);

        let answer = self.llm.complete(request).await?;
        let reply = shorten(answer.trim(), REPLY_CHAR_LIMIT);

        self.remember(user, message, &reply).await?;
        Ok(reply)
    }
}

fn build_messages(user: &User, message: &str) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(chef_system_prompt(&user.preferences))];

    for turn in user.recent_turns(CONTEXT_TURNS) {
        messages.push(match turn.role {
            Role::User => ChatMessage::user(turn.content.as_str()),
            Role::Assistant => ChatMessage::assistant(turn.content.as_str()),
        });
    }
    messages.push(ChatMessage::user(message));

    let ingredients = &user.kitchen_inventory.ingredients;
    if !ingredients.is_empty() {
        let listing = ingredients
            .iter()
            .map(|item| format!("{} , {}", item.name, item.amount))
            .collect::<Vec<_>>()
            .join(", ");
        messages.push(ChatMessage::system(format!(
            "Available ingredients: {}",
            listing
        )));
    }

    messages
}
