// User domain module
// Contains the user aggregate, preferences, and value objects

#![allow(clippy::module_inception)]

pub mod preferences;
pub mod user;
pub mod value_objects;

pub use preferences::{PreferencesUpdate, UserPreferences};
pub use user::{ConversationTurn, Role, User};
pub use value_objects::{ChefPersonality, Email, PhoneNumber};
