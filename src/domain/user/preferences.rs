use serde::{Deserialize, Serialize};

use super::value_objects::ChefPersonality;

/// Cooking preferences that shape every prompt sent on the user's behalf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub chef_personality: ChefPersonality,
    pub dietary_restrictions: Vec<String>,
    pub favorite_cuisines: Vec<String>,
    pub cooking_skill_level: String,
    pub spice_preference: String,
    pub allergies: Vec<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            chef_personality: ChefPersonality::Warm,
            dietary_restrictions: Vec::new(),
            favorite_cuisines: Vec::new(),
            cooking_skill_level: "beginner".to_string(),
            spice_preference: "medium".to_string(),
            allergies: Vec::new(),
        }
    }
}

/// Partial preference update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PreferencesUpdate {
    pub chef_personality: Option<ChefPersonality>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub favorite_cuisines: Option<Vec<String>>,
    pub cooking_skill_level: Option<String>,
    pub spice_preference: Option<String>,
    pub allergies: Option<Vec<String>>,
}

impl PreferencesUpdate {
    pub fn is_empty(&self) -> bool {
        self == &PreferencesUpdate::default()
    }
}

impl UserPreferences {
    /// Applies a partial update in place
    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(personality) = update.chef_personality {
            self.chef_personality = personality;
        }
        if let Some(restrictions) = update.dietary_restrictions {
            self.dietary_restrictions = restrictions;
        }
        if let Some(cuisines) = update.favorite_cuisines {
            self.favorite_cuisines = cuisines;
        }
        if let Some(level) = update.cooking_skill_level {
            self.cooking_skill_level = level;
        }
        if let Some(spice) = update.spice_preference {
            self.spice_preference = spice;
        }
        if let Some(allergies) = update.allergies {
            self.allergies = allergies;
        }
    }
}
