use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::inventory::InventoryItem;
use crate::domain::user::{ConversationTurn, Email, PhoneNumber, User, UserPreferences};

/// Errors surfaced by user persistence
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("user already exists: {0}")]
    Duplicate(String),

    #[error("user not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("invalid stored document: {0}")]
    Corrupt(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Profile fields editable through the admin API
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub is_active: Option<bool>,
}

/// Repository trait for the User aggregate
///
/// Every mutating method targets a user by `user_id` and fails with
/// `RepositoryError::NotFound` when no such user exists.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; fails with `Duplicate` if the phone number is taken
    async fn create(&self, user: &User) -> RepositoryResult<()>;

    /// Find a user by WhatsApp number
    async fn find_by_phone(&self, phone: &PhoneNumber) -> RepositoryResult<Option<User>>;

    /// Find a user by id
    async fn find_by_id(&self, user_id: &str) -> RepositoryResult<Option<User>>;

    /// List users, newest first
    async fn list(&self, limit: usize, offset: usize) -> RepositoryResult<Vec<User>>;

    /// Update name, email or activity flag
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> RepositoryResult<()>;

    /// Replace the stored preferences
    async fn update_preferences(
        &self,
        user_id: &str,
        preferences: &UserPreferences,
    ) -> RepositoryResult<()>;

    /// Replace the kitchen inventory
    async fn save_inventory(
        &self,
        user_id: &str,
        ingredients: &[InventoryItem],
        last_updated: DateTime<Utc>,
    ) -> RepositoryResult<()>;

    /// Replace the conversation history
    async fn save_conversation(
        &self,
        user_id: &str,
        history: &[ConversationTurn],
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()>;

    /// Delete a user
    async fn delete(&self, user_id: &str) -> RepositoryResult<()>;

    /// Fetch the user for a phone number, creating one on first contact
    ///
    /// Two webhooks racing on a brand-new number both end up with the row
    /// that won the unique index.
    async fn get_or_create(&self, phone: &PhoneNumber) -> RepositoryResult<User> {
        if let Some(user) = self.find_by_phone(phone).await? {
            return Ok(user);
        }

        let user = User::new(phone.clone(), Utc::now());
        match self.create(&user).await {
            Ok(()) => {
                tracing::info!(user_id = %user.user_id, phone = %phone, "Created new user");
                Ok(user)
            }
            Err(RepositoryError::Duplicate(_)) => self
                .find_by_phone(phone)
                .await?
                .ok_or_else(|| RepositoryError::NotFound(phone.to_string())),
            Err(e) => Err(e),
        }
    }
}
