// Cooking assistant
// Classification, inventory keeping, recipes and chat on top of a ChatModel

pub mod chef;
pub mod classifier;
pub mod commands;
pub mod conversation;
pub mod dispatcher;
pub mod errors;
pub mod inventory;
pub mod llm;
pub mod locks;
pub mod normalizer;
pub mod prompts;
pub mod recipes;
pub mod types;
pub mod vision;

#[cfg(test)]
pub(crate) mod testing;

pub use chef::CookingAssistant;
pub use dispatcher::{DispatchStatus, MessageDispatcher};
pub use errors::{AssistantError, AssistantResult};
pub use llm::{ChatMessage, ChatModel, ChatRequest};
