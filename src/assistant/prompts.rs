// Prompt templates for LLM interactions
//
// Templates use `{{name}}` placeholders; single braces are left alone so
// JSON examples can be written verbatim.

use crate::domain::user::UserPreferences;

/// Prompt template structure
pub struct PromptTemplate {
    pub name: &'static str,
    pub version: &'static str,
    pub system: &'static str,
    pub user_template: &'static str,
}

impl PromptTemplate {
    /// Render the user template with variables
    ///
    /// Placeholders without a matching variable are left in place.
    ///
    /// # Example
    /// ```
    /// use cooking_assistant_api::assistant::prompts::library;
    ///
    /// let prompt = library::normalize_item().render(&[("item", "Fresh Tomatoes")]);
    /// assert!(prompt.ends_with("Fresh Tomatoes"));
    /// ```
    pub fn render(&self, variables: &[(&str, &str)]) -> String {
        tracing::debug!(template = self.name, version = self.version, "Rendering prompt");
        variables
            .iter()
            .fold(self.user_template.to_string(), |acc, (key, value)| {
                acc.replace(&format!("{{{{{}}}}}", key), value)
            })
    }
}

/// Character budget the general chat reply is asked to respect
pub const REPLY_CHAR_LIMIT: usize = 1500;

/// System prompt for open conversation: persona, preferences, and length limit
pub fn chef_system_prompt(preferences: &UserPreferences) -> String {
    let personality = preferences.chef_personality;
    format!(
        "{}\n\nUser Preferences:\n\
         - Cooking Skill Level: {}\n\
         - Dietary Restrictions: {}\n\
         - Favorite Cuisines: {}\n\
         - Spice Preference: {}\n\
         - Allergies: {}\n\n\
         Please adapt your responses according to these preferences while maintaining your {} personality.\n\n\
         IMPORTANT: Keep your response under {} characters. Be concise and clear.",
        personality.system_prompt(),
        preferences.cooking_skill_level,
        preferences.dietary_restrictions.join(", "),
        preferences.favorite_cuisines.join(", "),
        preferences.spice_preference,
        preferences.allergies.join(", "),
        personality.display_name(),
        REPLY_CHAR_LIMIT,
    )
}

pub mod library {
    use super::PromptTemplate;

    pub fn classification() -> PromptTemplate {
        PromptTemplate {
            name: "classification",
            version: "1.0.0",
            system: r#"You are a message classifier for a cooking assistant WhatsApp bot.
Analyze the user's message and determine the appropriate action to take.
You MUST respond in valid JSON format only.

Possible actions are:
1. general_conversation - General cooking-related conversation
2. get_recipes - User wants recipe recommendations
3. update_inventory - User wants to add or update kitchen inventory items, for example, I have 2 kg of tomatoes, I have 5 tomatoes
4. get_inventory - User wants to view their current inventory
5. remove_inventory - User wants to remove items from their inventory, for example, I used 2 kg of tomatoes, I ate 5 tomatoes

Response MUST be a valid JSON object with this exact structure:
{
    "action": "action_type",
    "items": [
        {
            "name": "string",
            "amount": "string (e.g., '2 kg', '500g', '3 pieces', or just '5' for pieces)"
        }
    ],
    "remove_all": false
}
Include "items" for update_inventory and remove_inventory. Set "remove_all" to true if the user wants to remove all items.

For inventory updates:
- If user mentions a number without a unit (e.g., "5 tomatoes"), use "piece" as the default unit
- If user mentions "some" or "a few", use "2 pieces" as the default amount
- If user mentions "many" or "a lot", use "5 pieces" as the default amount
- If user mentions "a couple", use "2 pieces" as the default amount
- If no amount is mentioned, use "1 piece" as the default amount"#,
            user_template: r#"User Preferences: {{preferences}}
User Message: {{message}}

Classify this message and respond with a valid JSON object only.
For update_inventory action, extract the items and their amounts mentioned in the message.
For remove_inventory action, classify messages about removing items and extract the items and amounts to remove.
For get_inventory action, classify messages like "show my inventory", "what ingredients do I have", etc.
If amount is not specified for removal, use "all" as the amount.
If message includes "all" or "everything" for removal, set remove_all to true.

Examples:
- "I have 2 kg of tomatoes" -> {"action": "update_inventory", "items": [{"name": "tomatoes", "amount": "2 kg"}]}
- "I have 5 tomatoes" -> {"action": "update_inventory", "items": [{"name": "tomatoes", "amount": "5"}]}
- "Add some onions" -> {"action": "update_inventory", "items": [{"name": "onions", "amount": "2"}]}
- "Remove 500g of garlic" -> {"action": "remove_inventory", "items": [{"name": "garlic", "amount": "500g"}]}
- "Remove all items" -> {"action": "remove_inventory", "items": [], "remove_all": true}
- "Clear my inventory" -> {"action": "remove_inventory", "items": [], "remove_all": true}
- "Show my inventory" -> {"action": "get_inventory"}"#,
        }
    }

    pub fn normalize_item() -> PromptTemplate {
        PromptTemplate {
            name: "normalize_item",
            version: "1.0.0",
            system: r#"You are a food item name normalizer. Your task is to convert any food item name to its standard singular form.
Rules:
1. Convert plural to singular (e.g., 'apples' -> 'apple')
2. Use standard/common names (e.g., 'taters' -> 'potato')
3. Remove unnecessary words (e.g., 'fresh tomatoes' -> 'tomato')
4. Use consistent spelling (e.g., 'chilli' -> 'chili')
5. Return ONLY the normalized name, nothing else

Examples:
- "apples" -> "apple"
- "fresh red tomatoes" -> "tomato"
- "minced garlic" -> "garlic"
- "green onions" -> "onion"
- "bell peppers" -> "bell pepper"
- "chicken breasts" -> "chicken breast"
- "ground beef" -> "ground beef"
- "olive oil" -> "olive oil""#,
            user_template: "Normalize this food item name: {{item}}",
        }
    }

    pub fn inventory_query() -> PromptTemplate {
        PromptTemplate {
            name: "inventory_query",
            version: "1.0.0",
            system: r#"You are an inventory analyzer. Analyze the user's message to determine what items they want to see.
Rules:
1. If message is general (e.g., "show inventory"), return type "all"
2. If message mentions specific items, return type "specific" with those items
3. If message mentions categories (e.g., "vegetables", "spices"), return type "category" with those categories
4. Categories are: vegetable, fruit, meat, seafood, dairy, grain, spice, herb, oil, other
5. Return a JSON object with this structure:
{
    "type": "all|specific|category",
    "items": ["item1", "item2"],
    "categories": ["category1", "category2"]
}

Examples:
- "show my inventory" -> {"type": "all"}
- "do I have tomatoes?" -> {"type": "specific", "items": ["tomato"]}
- "show my vegetables" -> {"type": "category", "categories": ["vegetable"]}"#,
            user_template: "Analyze this message: {{message}}",
        }
    }

    pub fn categorize_item() -> PromptTemplate {
        PromptTemplate {
            name: "categorize_item",
            version: "1.0.0",
            system: r#"You are a food categorizer. Categorize the food item into one or more categories.
Categories: vegetable, fruit, meat, seafood, dairy, grain, spice, herb, oil, other
Return a JSON object of the form {"categories": ["category"]}.
Example: "apple" -> {"categories": ["fruit"]}"#,
            user_template: "Categorize: {{item}}",
        }
    }

    pub fn recipes() -> PromptTemplate {
        PromptTemplate {
            name: "recipes",
            version: "1.0.0",
            system: r#"You are a culinary expert. Generate recipe recommendations in JSON format.
You MUST respond with a valid JSON object only.

Response MUST follow this exact structure:
{
    "recipes": [
        {
            "name": "string",
            "description": "string (max 100 chars)",
            "ingredients": {
                "available": ["string"],
                "needed": ["string"]
            },
            "difficulty": "beginner/intermediate/advanced",
            "cooking_time": "string (e.g. '30 minutes')",
            "steps": [
                "string (detailed step, max 150 chars each)",
                "string (include measurements and timing)",
                "string (include temperature if applicable)",
                "string (include tips or warnings if needed)"
            ]
        }
    ]
}

Guidelines:
- Keep descriptions under 100 characters
- Make steps detailed but concise (max 150 chars each)
- Include measurements, timing, and temperature in steps
- Add cooking tips or warnings in steps when relevant
- List only essential ingredients
- Separate available and needed ingredients
- Use simple, clear language
- Generate 1-2 recipes maximum"#,
            user_template: r#"Generate detailed recipes based on:
Available Ingredients: {{ingredients}}
User Preferences: {{preferences}}
User Message: {{message}}
Conversation History: {{history}}

Respond with a valid JSON object only."#,
        }
    }

    pub fn image_items() -> PromptTemplate {
        PromptTemplate {
            name: "image_items",
            version: "1.0.0",
            system: "",
            user_template: r#"Analyze this image and extract ONLY food items with their amounts. Follow these rules:
1. List ONLY food items that are clearly visible and identifiable
2. For each item, provide:
   - Name: Use singular form (e.g., 'apple' not 'apples')
   - Amount: If visible, include the quantity (e.g., '2 pieces', '500g', '1 kg')
   - If amount is not visible, use '1 piece' as the amount
3. If no food items are visible, return an empty items list
4. Do not include any other descriptions or analysis

Response MUST be a valid JSON object with this exact structure:
{
    "items": [
        {
            "name": "string",
            "amount": "string (e.g., '2 kg', '500g', '3 pieces', or just '5' for pieces)"
        }
    ]
}"#,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::ChefPersonality;

    #[test]
    fn render_substitutes_all_occurrences() {
        let template = PromptTemplate {
            name: "t",
            version: "0",
            system: "",
            user_template: "{{a}} and {{a}} but not {b}",
        };
        assert_eq!(template.render(&[("a", "x")]), "x and x but not {b}");
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        let rendered = library::inventory_query().render(&[]);
        assert!(rendered.contains("{{message}}"));
    }

    #[test]
    fn classification_examples_keep_json_braces() {
        let rendered = library::classification().render(&[("message", "hi"), ("preferences", "{}")]);
        assert!(rendered.contains(r#"{"action": "get_inventory"}"#));
        assert!(rendered.contains("User Message: hi"));
    }

    #[test]
    fn chef_prompt_mentions_persona_and_preferences() {
        let mut prefs = UserPreferences::default();
        prefs.chef_personality = ChefPersonality::Funny;
        prefs.allergies = vec!["peanuts".into(), "shellfish".into()];

        let prompt = chef_system_prompt(&prefs);
        assert!(prompt.starts_with("You are Chef Chuckles"));
        assert!(prompt.contains("- Allergies: peanuts, shellfish"));
        assert!(prompt.contains("maintaining your Chef Chuckles personality"));
        assert!(prompt.contains("under 1500 characters"));
    }
}
