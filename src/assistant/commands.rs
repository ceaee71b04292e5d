use std::fmt::Write;

use chrono::Utc;

use super::chef::CookingAssistant;
use super::errors::AssistantResult;
use crate::domain::user::{ChefPersonality, User};

/// Slash commands understood before any classification happens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Clear,
    Chef(Option<String>),
    Unknown(String),
}

impl Command {
    /// Returns `None` for anything that is not a slash command
    pub fn parse(text: &str) -> Option<Command> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (rest, None),
        };

        Some(match name.to_lowercase().as_str() {
            "help" | "start" => Command::Help,
            "clear" | "reset" => Command::Clear,
            "chef" => Command::Chef(arg.map(str::to_string)),
            other => Command::Unknown(other.to_string()),
        })
    }
}

pub fn help_text() -> String {
    let mut text = "👋 I'm your cooking assistant! Here's what I can do:\n\n\
        • Tell me what you have: \"I have 2 kg of tomatoes\"\n\
        • Tell me what you used: \"I used 500g of rice\"\n\
        • Ask to see your kitchen: \"Show my inventory\"\n\
        • Ask for ideas: \"What can I cook tonight?\"\n\
        • Send a photo of your groceries to add them\n\n\
        Commands:\n\
        /help - show this message\n\
        /clear - forget our conversation\n\
        /chef <name> - switch chef personality\n\nChefs:\n"
        .to_string();
    for personality in ChefPersonality::ALL {
        let _ = writeln!(
            text,
            "• {} ({}): {}",
            personality.display_name(),
            personality.key(),
            personality.description()
        );
    }
    text
}

impl CookingAssistant {
    pub async fn run_command(&self, user: &mut User, command: Command) -> AssistantResult<String> {
        match command {
            Command::Help => Ok(help_text()),
            Command::Clear => {
                user.conversation_history.clear();
                user.updated_at = Utc::now();
                self.users
                    .save_conversation(&user.user_id, &[], user.updated_at)
                    .await?;
                tracing::info!(user_id = %user.user_id, "Conversation history cleared");
                Ok("🧹 Our conversation history has been cleared. Let's start fresh!".to_string())
            }
            Command::Chef(None) => Ok(format!(
                "👨‍🍳 Your current chef is {}.\n\n{}",
                user.preferences.chef_personality.display_name(),
                personality_menu()
            )),
            Command::Chef(Some(choice)) => match choice.parse::<ChefPersonality>() {
                Ok(personality) => {
                    user.preferences.chef_personality = personality;
                    self.users
                        .update_preferences(&user.user_id, &user.preferences)
                        .await?;
                    tracing::info!(user_id = %user.user_id, personality = %personality, "Chef personality changed");
                    Ok(format!(
                        "👨‍🍳 {} is now in your kitchen! {}",
                        personality.display_name(),
                        personality.description()
                    ))
                }
                Err(_) => Ok(format!(
                    "I don't know a chef called \"{}\".\n\n{}",
                    choice,
                    personality_menu()
                )),
            },
            Command::Unknown(name) => Ok(format!(
                "Unknown command /{}. Send /help to see what I can do.",
                name
            )),
        }
    }
}

fn personality_menu() -> String {
    let mut menu = "Choose one with /chef <name>:\n".to_string();
    for personality in ChefPersonality::ALL {
        let _ = writeln!(menu, "• {} - {}", personality.key(), personality.display_name());
    }
    menu
}
