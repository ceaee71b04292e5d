use serde::{Deserialize, Serialize};

use crate::domain::inventory::RequestedItem;

/// What the assistant should do with a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    GeneralConversation,
    GetRecipes,
    UpdateInventory,
    GetInventory,
    RemoveInventory,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::GeneralConversation => write!(f, "general_conversation"),
            Action::GetRecipes => write!(f, "get_recipes"),
            Action::UpdateInventory => write!(f, "update_inventory"),
            Action::GetInventory => write!(f, "get_inventory"),
            Action::RemoveInventory => write!(f, "remove_inventory"),
        }
    }
}

/// Classifier verdict for a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub action: Action,
    #[serde(default)]
    pub items: Vec<RequestedItem>,
    #[serde(default)]
    pub remove_all: bool,
}

impl Classification {
    pub fn general() -> Self {
        Self {
            action: Action::GeneralConversation,
            items: Vec::new(),
            remove_all: false,
        }
    }

    pub fn update(items: Vec<RequestedItem>) -> Self {
        Self {
            action: Action::UpdateInventory,
            items,
            remove_all: false,
        }
    }
}

/// Which part of the inventory a user asked to see
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InventoryQuery {
    All,
    Specific {
        #[serde(default)]
        items: Vec<String>,
    },
    Category {
        #[serde(default)]
        categories: Vec<String>,
    },
}

/// Ingredients of a suggested recipe split by availability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredients {
    pub available: Vec<String>,
    pub needed: Vec<String>,
}

/// A suggested recipe as returned by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub description: String,
    pub ingredients: RecipeIngredients,
    pub difficulty: String,
    pub cooking_time: String,
    pub steps: Vec<String>,
}

impl Recipe {
    /// Stand-in returned when recipe generation fails
    pub fn placeholder() -> Self {
        Self {
            name: "Error generating recipes".to_string(),
            description: "Please try again later".to_string(),
            ingredients: RecipeIngredients::default(),
            difficulty: "beginner".to_string(),
            cooking_time: "0 minutes".to_string(),
            steps: vec!["Try again later".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeBook {
    pub recipes: Vec<Recipe>,
}

/// Food items the vision model found in a photo
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectedItems {
    #[serde(default)]
    pub items: Vec<RequestedItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_defaults_optional_fields() {
        let c: Classification = serde_json::from_str(r#"{"action": "get_inventory"}"#).unwrap();
        assert_eq!(c.action, Action::GetInventory);
        assert!(c.items.is_empty());
        assert!(!c.remove_all);
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(serde_json::from_str::<Classification>(r#"{"action": "dance"}"#).is_err());
    }

    #[test]
    fn inventory_query_variants() {
        let all: InventoryQuery = serde_json::from_str(r#"{"type": "all"}"#).unwrap();
        assert_eq!(all, InventoryQuery::All);

        let specific: InventoryQuery =
            serde_json::from_str(r#"{"type": "specific", "items": ["tomato"]}"#).unwrap();
        assert_eq!(
            specific,
            InventoryQuery::Specific {
                items: vec!["tomato".into()]
            }
        );

        let category: InventoryQuery =
            serde_json::from_str(r#"{"type": "category", "categories": ["spice"], "items": []}"#)
                .unwrap();
        assert_eq!(
            category,
            InventoryQuery::Category {
                categories: vec!["spice".into()]
            }
        );
    }

    #[test]
    fn recipe_requires_nested_ingredients() {
        let raw = r#"{"recipes": [{"name": "Soup", "description": "d", "ingredients": {"available": [], "needed": []},
            "difficulty": "beginner", "cooking_time": "10 minutes", "steps": ["boil"]}]}"#;
        let book: RecipeBook = serde_json::from_str(raw).unwrap();
        assert_eq!(book.recipes[0].name, "Soup");

        let missing = r#"{"recipes": [{"name": "Soup"}]}"#;
        assert!(serde_json::from_str::<RecipeBook>(missing).is_err());
    }
}
