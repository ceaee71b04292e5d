use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::preferences::UserPreferences;
use super::value_objects::{Email, PhoneNumber};
use crate::domain::inventory::KitchenInventory;

/// Who said a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One stored message of the chat with the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

/// A WhatsApp user of the assistant
///
/// # Invariants
/// - `user_id` is `USER_<%Y%m%d%H%M%S>_<last four digits>` fixed at creation
/// - `phone_number` is unique across users
/// - `conversation_history` is ordered oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub phone_number: PhoneNumber,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub preferences: UserPreferences,
    #[serde(default)]
    pub kitchen_inventory: KitchenInventory,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Creates a fresh user with default preferences and an empty kitchen
    ///
    /// # Example
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use cooking_assistant_api::domain::user::{PhoneNumber, User};
    ///
    /// let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 34, 56).unwrap();
    /// let user = User::new(PhoneNumber::parse("+1234567890").unwrap(), now);
    /// assert_eq!(user.user_id, "USER_20240101123456_7890");
    /// ```
    pub fn new(phone_number: PhoneNumber, now: DateTime<Utc>) -> Self {
        let user_id = format!(
            "USER_{}_{}",
            now.format("%Y%m%d%H%M%S"),
            phone_number.last_four()
        );

        Self {
            user_id,
            phone_number,
            name: None,
            email: None,
            preferences: UserPreferences::default(),
            kitchen_inventory: KitchenInventory {
                ingredients: Vec::new(),
                last_updated: now,
            },
            conversation_history: Vec::new(),
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    /// Appends a user message and the assistant's reply, keeping at most `max_turns`
    pub fn record_exchange(
        &mut self,
        message: &str,
        reply: &str,
        now: DateTime<Utc>,
        max_turns: usize,
    ) {
        self.conversation_history.push(ConversationTurn {
            role: Role::User,
            content: message.to_string(),
            timestamp: now,
        });
        self.conversation_history.push(ConversationTurn {
            role: Role::Assistant,
            content: reply.to_string(),
            timestamp: now,
        });

        let excess = self.conversation_history.len().saturating_sub(max_turns);
        self.conversation_history.drain(..excess);
        self.updated_at = now;
    }

    /// The most recent `n` turns, oldest first
    pub fn recent_turns(&self, n: usize) -> &[ConversationTurn] {
        let start = self.conversation_history.len().saturating_sub(n);
        &self.conversation_history[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user() -> User {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 8, 5, 1).unwrap();
        User::new(PhoneNumber::parse("whatsapp:+15551234567").unwrap(), now)
    }

    #[test]
    fn user_id_format() {
        assert_eq!(user().user_id, "USER_20240309080501_4567");
    }

    #[test]
    fn new_user_defaults() {
        let u = user();
        assert!(u.is_active);
        assert!(u.kitchen_inventory.ingredients.is_empty());
        assert!(u.conversation_history.is_empty());
        assert_eq!(u.created_at, u.updated_at);
    }

    #[test]
    fn record_exchange_appends_both_turns() {
        let mut u = user();
        u.record_exchange("hi", "hello!", Utc::now(), 50);

        assert_eq!(u.conversation_history.len(), 2);
        assert_eq!(u.conversation_history[0].role, Role::User);
        assert_eq!(u.conversation_history[1].content, "hello!");
    }

    #[test]
    fn record_exchange_trims_oldest() {
        let mut u = user();
        for i in 0..4 {
            u.record_exchange(&format!("q{}", i), &format!("a{}", i), Utc::now(), 5);
        }

        assert_eq!(u.conversation_history.len(), 5);
        assert_eq!(u.conversation_history[0].content, "a1");
        assert_eq!(u.conversation_history[4].content, "a3");
    }

    #[test]
    fn recent_turns_bounded() {
        let mut u = user();
        u.record_exchange("q", "a", Utc::now(), 50);

        assert_eq!(u.recent_turns(5).len(), 2);
        assert_eq!(u.recent_turns(1)[0].content, "a");
    }

    #[test]
    fn bson_round_trip_ignores_object_id() {
        let u = user();
        let mut doc = bson::to_document(&u).unwrap();
        doc.insert("_id", bson::oid::ObjectId::new());

        let back: User = bson::from_document(doc).unwrap();
        assert_eq!(back.user_id, u.user_id);
        assert_eq!(back.phone_number, u.phone_number);
    }
}
