//! User dinner preferences as collected from the five input fields

use serde::{Deserialize, Serialize};

/// Normalized dinner preferences for one run.
///
/// Every field may be empty. Normalization only trims whitespace and drops
/// empty list tokens; spelling fixes and defaults are left to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceInput {
    pub dietary: String,
    pub cuisine: String,
    pub time: String,
    pub ingredients_to_use: Vec<String>,
    pub ingredients_to_avoid: Vec<String>,
}

impl PreferenceInput {
    /// Build from raw field text; the ingredient fields are comma-separated lists
    pub fn from_raw(
        dietary: &str,
        cuisine: &str,
        time: &str,
        ingredients_to_use: &str,
        ingredients_to_avoid: &str,
    ) -> Self {
        Self {
            dietary: dietary.trim().to_string(),
            cuisine: cuisine.trim().to_string(),
            time: time.trim().to_string(),
            ingredients_to_use: split_list(ingredients_to_use),
            ingredients_to_avoid: split_list(ingredients_to_avoid),
        }
    }

    /// Re-apply normalization to an already structured value
    pub fn normalized(self) -> Self {
        Self {
            dietary: self.dietary.trim().to_string(),
            cuisine: self.cuisine.trim().to_string(),
            time: self.time.trim().to_string(),
            ingredients_to_use: clean_tokens(self.ingredients_to_use),
            ingredients_to_avoid: clean_tokens(self.ingredients_to_avoid),
        }
    }

    /// Render as a one-element JSON list, the shape the parse stage is asked to echo back
    pub fn to_prompt_text(&self) -> String {
        serde_json::to_string(&[self]).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Split a comma-separated list, trimming tokens and dropping empty ones
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn clean_tokens(tokens: Vec<String>) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|token| split_list(token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_trims_and_splits() {
        let prefs = PreferenceInput::from_raw(
            "  Vegetarian ",
            "Italian",
            " <30min",
            "pasta, spinach ,, ",
            " mushrooms",
        );

        assert_eq!(prefs.dietary, "Vegetarian");
        assert_eq!(prefs.time, "<30min");
        assert_eq!(prefs.ingredients_to_use, vec!["pasta", "spinach"]);
        assert_eq!(prefs.ingredients_to_avoid, vec!["mushrooms"]);
    }

    #[test]
    fn test_empty_input() {
        let prefs = PreferenceInput::from_raw("", " ", "", ",", "");
        assert_eq!(prefs, PreferenceInput::default());
    }

    #[test]
    fn test_normalized_structured_value() {
        let prefs = PreferenceInput {
            dietary: " vegan ".to_string(),
            ingredients_to_use: vec![" beans ".to_string(), "".to_string(), "rice, corn".to_string()],
            ..Default::default()
        }
        .normalized();

        assert_eq!(prefs.dietary, "vegan");
        assert_eq!(prefs.ingredients_to_use, vec!["beans", "rice", "corn"]);
    }

    #[test]
    fn test_prompt_text_keeps_every_key() {
        let text = PreferenceInput::from_raw("", "Mexican", "", "beans", "").to_prompt_text();
        assert!(text.starts_with('['));
        for key in ["dietary", "cuisine", "time", "ingredients_to_use", "ingredients_to_avoid"] {
            assert!(text.contains(key), "missing {key} in {text}");
        }
        assert!(text.contains("\"Mexican\""));
    }
}
