use std::fmt::Write;

use super::chef::{shorten, CookingAssistant};
use super::errors::{AssistantError, AssistantResult};
use super::llm::{ChatMessage, ChatRequest};
use super::prompts::library;
use super::types::{Recipe, RecipeBook};
use crate::domain::user::User;

const REPLY_BUDGET: usize = 1400;
const DESCRIPTION_LIMIT: usize = 100;
const STEP_LIMIT: usize = 150;

impl CookingAssistant {
    /// Suggest recipes from the user's kitchen and record the exchange
    pub async fn suggest_recipes(&self, user: &mut User, message: &str) -> AssistantResult<String> {
        let recipes = match self.generate_recipes(user, message).await {
            Ok(recipes) => recipes,
            Err(e) => {
                tracing::error!(error = %e, user_id = %user.user_id, "Recipe generation failed");
                vec![Recipe::placeholder()]
            }
        };

        let reply = format_recipes(&recipes);
        self.remember(user, message, &reply).await?;
        Ok(reply)
    }

    async fn generate_recipes(&self, user: &User, message: &str) -> AssistantResult<Vec<Recipe>> {
        let ingredients: Vec<&str> = user
            .kitchen_inventory
            .ingredients
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        let history: Vec<serde_json::Value> = user
            .conversation_history
            .iter()
            .map(|turn| serde_json::json!({"role": turn.role.as_str(), "content": turn.content}))
            .collect();

        let template = library::recipes();
        let ingredients_json = serde_json::to_string(&ingredients)?;
        let preferences_json = serde_json::to_string(&user.preferences)?;
        let history_json = serde_json::to_string(&history)?;
        let request = ChatRequest::new(vec![
            ChatMessage::system(template.system),
            ChatMessage::user(template.render(&[
                ("ingredients", &ingredients_json),
                ("preferences", &preferences_json),
                ("message", message),
                ("history", &history_json),
            ])),
        ])
        .temperature(0.7)
        .max_tokens(1000)
        .json();

        let raw = self.llm.complete(request).await?;
        parse_recipes(&raw)
    }
}

/// Parses the recipe JSON and clamps description and step lengths
pub fn parse_recipes(raw: &str) -> AssistantResult<Vec<Recipe>> {
    let book: RecipeBook = serde_json::from_str(raw.trim())?;
    if book.recipes.is_empty() {
        return Err(AssistantError::InvalidOutput("no recipes returned".to_string()));
    }

    Ok(book
        .recipes
        .into_iter()
        .map(|mut recipe| {
            recipe.description = shorten(&recipe.description, DESCRIPTION_LIMIT);
            recipe.steps = recipe
                .steps
                .iter()
                .map(|step| shorten(step, STEP_LIMIT))
                .collect();
            recipe
        })
        .collect())
}

fn bullet_list(items: &[String]) -> String {
    items.iter().map(|item| format!("\n    • {}", item)).collect()
}

fn format_recipe(recipe: &Recipe) -> String {
    let steps = recipe
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect::<Vec<_>>()
        .join("\n    ");

    let mut text = String::new();
    let _ = write!(
        text,
        "📌 {}\n📝 {}\n\n🛒 Ingredients:\n  Available:{}\n  Needed:{}\n\n⏱️  Time: {}\n⭐ Difficulty: {}\n\n📋 Steps:\n    {}\n\n{}\n\n",
        recipe.name,
        recipe.description,
        bullet_list(&recipe.ingredients.available),
        bullet_list(&recipe.ingredients.needed),
        recipe.cooking_time,
        recipe.difficulty,
        steps,
        "─".repeat(30),
    );
    text
}

/// WhatsApp-sized recipe reply; recipes that would overflow are announced instead
pub fn format_recipes(recipes: &[Recipe]) -> String {
    let mut reply = "🍳 Recipe suggestions:\n\n".to_string();
    let mut length = reply.chars().count();
    let mut shown = 0;

    for recipe in recipes {
        let block = format_recipe(recipe);
        let block_len = block.chars().count();
        if length + block_len > REPLY_BUDGET {
            break;
        }
        reply.push_str(&block);
        length += block_len;
        shown += 1;
    }

    let remaining = recipes.len() - shown;
    if remaining > 0 {
        let _ = write!(
            reply,
            "\n...and {} more recipe{} available. Ask for more!",
            remaining,
            if remaining > 1 { "s" } else { "" }
        );
    }

    reply
}
