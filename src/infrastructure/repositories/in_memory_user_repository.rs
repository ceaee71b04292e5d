use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::inventory::InventoryItem;
use crate::domain::repositories::{
    ProfileUpdate, RepositoryError, RepositoryResult, UserRepository,
};
use crate::domain::user::{ConversationTurn, PhoneNumber, User, UserPreferences};

/// Process-local UserRepository keyed by phone number
///
/// Enforces the same phone-number uniqueness the MongoDB index does. User
/// ids are not unique, so id lookups return the first match. Used by tests
/// and for running without a database.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify<F>(&self, user_id: &str, f: F) -> RepositoryResult<()>
    where
        F: FnOnce(&mut User) + Send,
    {
        let mut users = self.users.write().await;
        let user = users
            .values_mut()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| RepositoryError::NotFound(user_id.to_string()))?;
        f(user);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(user.phone_number.as_str()) {
            return Err(RepositoryError::Duplicate(user.phone_number.to_string()));
        }
        users.insert(user.phone_number.to_string(), user.clone());
        Ok(())
    }

    async fn find_by_phone(&self, phone: &PhoneNumber) -> RepositoryResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(phone.as_str()).cloned())
    }

    async fn find_by_id(&self, user_id: &str) -> RepositoryResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.user_id == user_id).cloned())
    }

    async fn list(&self, limit: usize, offset: usize) -> RepositoryResult<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<&User> = users.values().collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(all.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> RepositoryResult<()> {
        let update = update.clone();
        self.modify(user_id, move |user| {
            if let Some(name) = update.name {
                user.name = Some(name);
            }
            if let Some(email) = update.email {
                user.email = Some(email);
            }
            if let Some(active) = update.is_active {
                user.is_active = active;
            }
            user.updated_at = Utc::now();
        })
        .await
    }

    async fn update_preferences(
        &self,
        user_id: &str,
        preferences: &UserPreferences,
    ) -> RepositoryResult<()> {
        self.modify(user_id, |user| {
            user.preferences = preferences.clone();
            user.updated_at = Utc::now();
        })
        .await
    }

    async fn save_inventory(
        &self,
        user_id: &str,
        ingredients: &[InventoryItem],
        last_updated: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        self.modify(user_id, |user| {
            user.kitchen_inventory.ingredients = ingredients.to_vec();
            user.kitchen_inventory.last_updated = last_updated;
        })
        .await
    }

    async fn save_conversation(
        &self,
        user_id: &str,
        history: &[ConversationTurn],
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        self.modify(user_id, |user| {
            user.conversation_history = history.to_vec();
            user.updated_at = updated_at;
        })
        .await
    }

    async fn delete(&self, user_id: &str) -> RepositoryResult<()> {
        let mut users = self.users.write().await;
        let key = users
            .iter()
            .find(|(_, u)| u.user_id == user_id)
            .map(|(key, _)| key.clone())
            .ok_or_else(|| RepositoryError::NotFound(user_id.to_string()))?;
        users.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn phone(n: u32) -> PhoneNumber {
        PhoneNumber::parse(&format!("+1555000{:04}", n)).unwrap()
    }

    #[tokio::test]
    async fn duplicate_phone_is_rejected() {
        let repo = InMemoryUserRepository::new();
        let user = User::new(phone(1), Utc::now());
        repo.create(&user).await.unwrap();

        let mut again = User::new(phone(1), Utc::now() + Duration::seconds(5));
        again.user_id = "USER_other".into();
        assert!(matches!(
            repo.create(&again).await,
            Err(RepositoryError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let repo = InMemoryUserRepository::new();
        let first = repo.get_or_create(&phone(2)).await.unwrap();
        let second = repo.get_or_create(&phone(2)).await.unwrap();
        assert_eq!(first.user_id, second.user_id);
    }

    #[tokio::test]
    async fn phones_sharing_last_digits_get_separate_users() {
        let repo = InMemoryUserRepository::new();
        let now = Utc::now();
        let first = User::new(PhoneNumber::parse("+15550001234").unwrap(), now);
        let second = User::new(PhoneNumber::parse("+16660001234").unwrap(), now);
        assert_eq!(first.user_id, second.user_id);

        repo.create(&first).await.unwrap();
        repo.create(&second).await.unwrap();

        let a = repo.get_or_create(&first.phone_number).await.unwrap();
        let b = repo.get_or_create(&second.phone_number).await.unwrap();
        assert_eq!(a.phone_number.as_str(), "+15550001234");
        assert_eq!(b.phone_number.as_str(), "+16660001234");
        assert_eq!(repo.list(10, 0).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn list_newest_first_with_paging() {
        let repo = InMemoryUserRepository::new();
        let base = Utc::now();
        for i in 0..3 {
            repo.create(&User::new(phone(i), base + Duration::seconds(i as i64)))
                .await
                .unwrap();
        }

        let page = repo.list(2, 0).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].phone_number, phone(2));

        let rest = repo.list(2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].phone_number, phone(0));
    }

    #[tokio::test]
    async fn updates_on_missing_user_fail() {
        let repo = InMemoryUserRepository::new();
        let err = repo
            .save_inventory("USER_missing", &[], Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
        assert!(repo.delete("USER_missing").await.is_err());
    }
}
