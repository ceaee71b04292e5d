use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::chef::CookingAssistant;
use super::errors::AssistantResult;
use super::llm::{ChatMessage, ChatRequest};
use super::prompts::library;
use super::types::InventoryQuery;
use crate::domain::inventory::pantry::{has_failures, render_removal_reply, render_update_reply};
use crate::domain::inventory::{InventoryItem, KitchenInventory, Pantry, RequestedItem};
use crate::domain::user::User;

pub const EMPTY_INVENTORY: &str =
    "Your kitchen inventory is empty. Add some ingredients to get started!";
pub const NOTHING_MATCHED: &str = "❌ None of the requested items were found in your inventory.";
const UPDATE_FAILED: &str = "❌ Sorry, there was an error updating your inventory. Please try again.";

impl CookingAssistant {
    async fn pantry_for(&self, user: &User) -> Pantry {
        let mut entries = Vec::with_capacity(user.kitchen_inventory.ingredients.len());
        for item in &user.kitchen_inventory.ingredients {
            entries.push((self.normalizer.normalize(&item.name).await, item.clone()));
        }
        Pantry::new(entries)
    }

    async fn store_pantry(&self, user: &mut User, pantry: Pantry) -> AssistantResult<()> {
        let now = Utc::now();
        let ingredients = pantry.into_items();
        self.users
            .save_inventory(&user.user_id, &ingredients, now)
            .await?;
        user.kitchen_inventory = KitchenInventory {
            ingredients,
            last_updated: now,
        };
        Ok(())
    }

    /// Add requested items; nothing is stored if any item fails
    pub async fn update_inventory(&self, user: &mut User, items: &[RequestedItem]) -> String {
        let mut pantry = self.pantry_for(user).await;
        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            let key = self.normalizer.normalize(&item.name).await;
            outcomes.push(pantry.add(&key, item));
        }

        let total = pantry.len();
        if !outcomes.is_empty() && !has_failures(&outcomes) {
            if let Err(e) = self.store_pantry(user, pantry).await {
                tracing::error!(error = %e, user_id = %user.user_id, "Failed to save inventory");
                return UPDATE_FAILED.to_string();
            }
            tracing::info!(user_id = %user.user_id, items = outcomes.len(), "Inventory updated");
        }

        render_update_reply(&outcomes, total)
    }

    /// Remove requested items (or everything) and store the result
    pub async fn remove_inventory(
        &self,
        user: &mut User,
        items: &[RequestedItem],
        remove_all: bool,
    ) -> String {
        let mut pantry = self.pantry_for(user).await;
        let outcomes = if remove_all {
            pantry.clear()
        } else {
            let mut outcomes = Vec::with_capacity(items.len());
            for item in items {
                let key = self.normalizer.normalize(&item.name).await;
                outcomes.push(pantry.remove(&key, item));
            }
            outcomes
        };

        let remaining = pantry.len();
        if !outcomes.is_empty() {
            if let Err(e) = self.store_pantry(user, pantry).await {
                tracing::error!(error = %e, user_id = %user.user_id, "Failed to save inventory");
                return UPDATE_FAILED.to_string();
            }
        }

        render_removal_reply(&outcomes, remaining)
    }

    /// Show all of the inventory or the part the message asks about
    pub async fn show_inventory(&self, user: &User, message: &str) -> String {
        let inventory = &user.kitchen_inventory;
        if inventory.ingredients.is_empty() {
            return EMPTY_INVENTORY.to_string();
        }

        let query = self.analyze_query(message).await;

        let mut groups: BTreeMap<String, Vec<InventoryItem>> = BTreeMap::new();
        for item in &inventory.ingredients {
            let key = self.normalizer.normalize(&item.name).await;
            groups.entry(key).or_default().push(item.clone());
        }
        let total_groups = groups.len();

        let shown: Vec<(String, Vec<InventoryItem>)> = match &query {
            InventoryQuery::All => groups.into_iter().collect(),
            InventoryQuery::Specific { items } => {
                let mut wanted = Vec::with_capacity(items.len());
                for item in items {
                    wanted.push(self.normalizer.normalize(item).await);
                }
                groups
                    .into_iter()
                    .filter(|(key, _)| wanted.contains(key))
                    .collect()
            }
            InventoryQuery::Category { categories } => {
                let wanted: Vec<String> = categories.iter().map(|c| category_key(c)).collect();
                let mut kept = Vec::new();
                for (key, entries) in groups {
                    let item_categories = self.categorize(&key).await;
                    if item_categories.iter().any(|c| wanted.contains(c)) {
                        kept.push((key, entries));
                    }
                }
                kept
            }
        };

        if shown.is_empty() {
            return match query {
                InventoryQuery::Specific { .. } => NOTHING_MATCHED.to_string(),
                InventoryQuery::Category { categories } => format!(
                    "❌ No items found in the requested categories: {}",
                    categories.join(", ")
                ),
                InventoryQuery::All => EMPTY_INVENTORY.to_string(),
            };
        }

        format_inventory(&shown, total_groups, inventory.last_updated)
    }

    async fn analyze_query(&self, message: &str) -> InventoryQuery {
        self.try_analyze_query(message).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Inventory query analysis failed, showing everything");
            InventoryQuery::All
        })
    }

    async fn try_analyze_query(&self, message: &str) -> AssistantResult<InventoryQuery> {
        let template = library::inventory_query();
        let request = ChatRequest::new(vec![
            ChatMessage::system(template.system),
            ChatMessage::user(template.render(&[("message", message)])),
        ])
        .temperature(0.1)
        .max_tokens(100)
        .json();

        let raw = self.llm.complete(request).await?;
        Ok(serde_json::from_str(raw.trim())?)
    }

    async fn categorize(&self, item: &str) -> Vec<String> {
        let template = library::categorize_item();
        let request = ChatRequest::new(vec![
            ChatMessage::system(template.system),
            ChatMessage::user(template.render(&[("item", item)])),
        ])
        .temperature(0.1)
        .max_tokens(50)
        .json();

        match self.llm.complete(request).await {
            Ok(raw) => parse_categories(&raw),
            Err(e) => {
                tracing::warn!(error = %e, item, "Categorization failed");
                vec!["other".to_string()]
            }
        }
    }
}

/// Canonical form of a category name ("Vegetables" -> "vegetable")
fn category_key(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    match lower.strip_suffix('s') {
        Some(stem) if stem.len() >= 3 => stem.to_string(),
        _ => lower,
    }
}

/// Accepts `{"categories": [..]}`, `{"category": ".."}` or a bare array
fn parse_categories(raw: &str) -> Vec<String> {
    let value: serde_json::Value = match serde_json::from_str(raw.trim()) {
        Ok(value) => value,
        Err(_) => return vec!["other".to_string()],
    };

    let list = match &value {
        serde_json::Value::Array(list) => list.clone(),
        serde_json::Value::Object(map) => match (map.get("categories"), map.get("category")) {
            (Some(serde_json::Value::Array(list)), _) => list.clone(),
            (_, Some(single)) => vec![single.clone()],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    list.iter()
        .filter_map(|c| c.as_str())
        .map(category_key)
        .collect()
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inventory listing; multi-entry groups are nested under a title-cased header
pub fn format_inventory(
    groups: &[(String, Vec<InventoryItem>)],
    total_groups: usize,
    last_updated: DateTime<Utc>,
) -> String {
    let mut reply = "📋 Your Kitchen Inventory:\n\n".to_string();
    for (key, items) in groups {
        match items.as_slice() {
            [only] => {
                let _ = writeln!(reply, "• {} ({})", only.name, only.amount);
            }
            many => {
                let _ = writeln!(reply, "• {}:", title_case(key));
                for item in many {
                    let _ = writeln!(reply, "  - {} ({})", item.name, item.amount);
                }
            }
        }
    }

    let _ = write!(reply, "\nTotal items shown: {}", groups.len());
    if groups.len() < total_groups {
        let _ = write!(reply, " (of {} total items)", total_groups);
    }
    let _ = write!(
        reply,
        "\n\nLast updated: {}",
        last_updated.format("%Y-%m-%d %H:%M")
    );
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::TimeZone;

    use crate::assistant::testing::ScriptedModel;
    use crate::domain::repositories::UserRepository;
    use crate::domain::user::PhoneNumber;
    use crate::infrastructure::repositories::InMemoryUserRepository;

    async fn setup(
        replies: Vec<&str>,
        ingredients: &[(&str, &str)],
    ) -> (CookingAssistant, Arc<InMemoryUserRepository>, Arc<ScriptedModel>, User) {
        let llm = ScriptedModel::new(replies);
        let repo = Arc::new(InMemoryUserRepository::new());
        let mut user = User::new(PhoneNumber::parse("+15550001111").unwrap(), Utc::now());
        user.kitchen_inventory.ingredients = ingredients
            .iter()
            .map(|(n, a)| InventoryItem::new(*n, *a))
            .collect();
        repo.create(&user).await.unwrap();

        let assistant = CookingAssistant::new(llm.clone(), repo.clone(), "gpt-4o", 50);
        (assistant, repo, llm, user)
    }

    #[tokio::test]
    async fn update_merges_into_existing_entry_and_persists() {
        // normalizer: stored "tomatoes", then requested "tomatoes" (cached)
        let (assistant, repo, _, mut user) = setup(vec!["tomato"], &[("tomatoes", "1 kg")]).await;

        let reply = assistant
            .update_inventory(&mut user, &[RequestedItem::new("tomatoes", "500g")])
            .await;

        assert!(reply.starts_with("✅ Updated your kitchen inventory!"));
        assert!(reply.contains("• tomatoes (1.5 kg) [+0.5 kg]"));
        let stored = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert_eq!(stored.kitchen_inventory.ingredients[0].amount, "1.5 kg");
    }

    #[tokio::test]
    async fn update_with_failure_is_not_persisted() {
        let (assistant, repo, _, mut user) = setup(vec!["rice", "milk"], &[]).await;

        let reply = assistant
            .update_inventory(
                &mut user,
                &[
                    RequestedItem::new("rice", "1 kg"),
                    RequestedItem::new("milk", "2 cups"),
                ],
            )
            .await;

        assert!(reply.starts_with("⚠️ Some items couldn't be added"));
        let stored = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert!(stored.kitchen_inventory.ingredients.is_empty());
    }

    #[tokio::test]
    async fn remove_all_clears_inventory() {
        let (assistant, repo, _, mut user) =
            setup(vec!["egg", "flour"], &[("eggs", "6"), ("flour", "1 kg")]).await;

        let reply = assistant.remove_inventory(&mut user, &[], true).await;

        assert!(reply.contains("Remaining items: 0"));
        let stored = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert!(stored.kitchen_inventory.ingredients.is_empty());
    }

    #[tokio::test]
    async fn show_empty_inventory() {
        let (assistant, _, llm, user) = setup(vec![], &[]).await;
        assert_eq!(assistant.show_inventory(&user, "show").await, EMPTY_INVENTORY);
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn show_specific_items() {
        let (assistant, _, _, user) = setup(
            vec![r#"{"type": "specific", "items": ["tomatoes"]}"#, "tomato", "garlic"],
            &[("tomatoes", "2 kg"), ("garlic", "100 g")],
        )
        .await;

        let reply = assistant.show_inventory(&user, "do I have tomatoes?").await;
        assert!(reply.contains("• tomatoes (2 kg)"));
        assert!(!reply.contains("garlic"));
        assert!(reply.contains("Total items shown: 1 (of 2 total items)"));
    }

    #[tokio::test]
    async fn show_category_without_matches() {
        let (assistant, _, _, user) = setup(
            vec![
                r#"{"type": "category", "categories": ["spices"]}"#,
                "apple",
                r#"{"categories": ["fruit"]}"#,
            ],
            &[("apples", "3")],
        )
        .await;

        let reply = assistant.show_inventory(&user, "my spices").await;
        assert_eq!(reply, "❌ No items found in the requested categories: spices");
    }

    #[tokio::test]
    async fn show_falls_back_to_all_when_analysis_fails() {
        // analysis reply is garbage; normalizer replies follow
        let (assistant, _, _, user) =
            setup(vec!["???", "onion", "onion"], &[("onions", "2"), ("red onion", "1")]).await;

        let reply = assistant.show_inventory(&user, "inventory").await;
        assert!(reply.contains("• Onion:\n  - onions (2)\n  - red onion (1)\n"));
        assert!(reply.contains("Total items shown: 1\n"));
    }

    #[test]
    fn format_inventory_footer() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let groups = vec![("rice".to_string(), vec![InventoryItem::new("rice", "1 kg")])];

        assert_eq!(
            format_inventory(&groups, 1, when),
            "📋 Your Kitchen Inventory:\n\n• rice (1 kg)\n\nTotal items shown: 1\n\nLast updated: 2024-05-01 09:30"
        );
    }

    #[test]
    fn categories_parse_loosely() {
        assert_eq!(parse_categories(r#"{"categories": ["Vegetables"]}"#), vec!["vegetable"]);
        assert_eq!(parse_categories(r#"["herb", "spice"]"#), vec!["herb", "spice"]);
        assert_eq!(parse_categories(r#"{"category": "dairy"}"#), vec!["dairy"]);
        assert_eq!(parse_categories("nope"), vec!["other"]);
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("bell pepper"), "Bell Pepper");
    }
}
