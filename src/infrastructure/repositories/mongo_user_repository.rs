use async_trait::async_trait;
use bson::{doc, Bson, Document};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use serde::Serialize;

use crate::domain::inventory::InventoryItem;
use crate::domain::repositories::{
    ProfileUpdate, RepositoryError, RepositoryResult, UserRepository,
};
use crate::domain::user::{ConversationTurn, PhoneNumber, User, UserPreferences};
use crate::infrastructure::database::USERS_COLLECTION;

const DUPLICATE_KEY: i32 = 11000;

/// MongoDB implementation of UserRepository
pub struct MongoUserRepository {
    users: Collection<User>,
}

impl MongoUserRepository {
    /// Creates a repository over the `users` collection of `db`
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection(USERS_COLLECTION),
        }
    }

    async fn set_fields(&self, user_id: &str, fields: Document) -> RepositoryResult<()> {
        let result = self
            .users
            .update_one(doc! { "user_id": user_id }, doc! { "$set": fields }, None)
            .await
            .map_err(|e| database_error("Failed to update user", e))?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound(user_id.to_string()));
        }
        Ok(())
    }
}

fn database_error(context: &str, err: mongodb::error::Error) -> RepositoryError {
    RepositoryError::Database(format!("{}: {}", context, err))
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

fn to_bson<T: Serialize>(value: &T) -> RepositoryResult<Bson> {
    bson::to_bson(value).map_err(|e| RepositoryError::Corrupt(e.to_string()))
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        match self.users.insert_one(user, None).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => {
                Err(RepositoryError::Duplicate(user.phone_number.to_string()))
            }
            Err(e) => Err(database_error("Failed to create user", e)),
        }
    }

    async fn find_by_phone(&self, phone: &PhoneNumber) -> RepositoryResult<Option<User>> {
        self.users
            .find_one(doc! { "phone_number": phone.as_str() }, None)
            .await
            .map_err(|e| database_error("Failed to find user by phone", e))
    }

    async fn find_by_id(&self, user_id: &str) -> RepositoryResult<Option<User>> {
        self.users
            .find_one(doc! { "user_id": user_id }, None)
            .await
            .map_err(|e| database_error("Failed to find user by id", e))
    }

    async fn list(&self, limit: usize, offset: usize) -> RepositoryResult<Vec<User>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1, "user_id": 1 })
            .skip(offset as u64)
            .limit(limit as i64)
            .build();

        let cursor = self
            .users
            .find(doc! {}, options)
            .await
            .map_err(|e| database_error("Failed to list users", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| database_error("Failed to read users", e))
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> RepositoryResult<()> {
        let mut fields = doc! { "updated_at": bson::DateTime::from_chrono(Utc::now()) };
        if let Some(name) = &update.name {
            fields.insert("name", name.as_str());
        }
        if let Some(email) = &update.email {
            fields.insert("email", email.as_str());
        }
        if let Some(active) = update.is_active {
            fields.insert("is_active", active);
        }
        self.set_fields(user_id, fields).await
    }

    async fn update_preferences(
        &self,
        user_id: &str,
        preferences: &UserPreferences,
    ) -> RepositoryResult<()> {
        self.set_fields(
            user_id,
            doc! {
                "preferences": to_bson(preferences)?,
                "updated_at": bson::DateTime::from_chrono(Utc::now()),
            },
        )
        .await
    }

    async fn save_inventory(
        &self,
        user_id: &str,
        ingredients: &[InventoryItem],
        last_updated: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        self.set_fields(
            user_id,
            doc! {
                "kitchen_inventory.ingredients": to_bson(&ingredients)?,
                "kitchen_inventory.last_updated": bson::DateTime::from_chrono(last_updated),
            },
        )
        .await
    }

    async fn save_conversation(
        &self,
        user_id: &str,
        history: &[ConversationTurn],
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        self.set_fields(
            user_id,
            doc! {
                "conversation_history": to_bson(&history)?,
                "updated_at": bson::DateTime::from_chrono(updated_at),
            },
        )
        .await
    }

    async fn delete(&self, user_id: &str) -> RepositoryResult<()> {
        let result = self
            .users
            .delete_one(doc! { "user_id": user_id }, None)
            .await
            .map_err(|e| database_error("Failed to delete user", e))?;

        if result.deleted_count == 0 {
            return Err(RepositoryError::NotFound(user_id.to_string()));
        }
        Ok(())
    }
}
