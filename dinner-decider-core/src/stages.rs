//! The three prompt stages of a dinner suggestion
//!
//! Each stage pairs a persona with task instructions. Prompts are plain text
//! with named placeholders; whatever the previous stage produced is pasted in
//! verbatim.
//!
//! Stages can be overridden from the config file one field at a time; fields
//! left out keep the built-in text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a stage in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    ParsePreferences,
    Brainstorm,
    SelectAndDetail,
}

impl StageKind {
    pub const ALL: [StageKind; 3] =
        [StageKind::ParsePreferences, StageKind::Brainstorm, StageKind::SelectAndDetail];

    /// Heading used when showing this stage's output
    pub fn title(self) -> &'static str {
        match self {
            StageKind::ParsePreferences => "Analyzed Preferences",
            StageKind::Brainstorm => "Brainstormed Recipes",
            StageKind::SelectAndDetail => "Selected Meal Suggestion",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::ParsePreferences => write!(f, "parse_preferences"),
            StageKind::Brainstorm => write!(f, "brainstorm"),
            StageKind::SelectAndDetail => write!(f, "select_and_detail"),
        }
    }
}

/// Values substituted into a stage template
#[derive(Debug, Clone, Default)]
pub struct PromptContext<'a> {
    /// `{preferences}`: the normalized user input
    pub preferences: &'a str,
    /// `{previous_output}`: raw text of the stage before
    pub previous_output: &'a str,
    /// `{recent_meals}`: names to steer away from
    pub recent_meals: &'a [String],
}

/// Persona plus task for one completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDefinition {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    /// Task text; may reference `{preferences}`, `{previous_output}`, `{recent_meals}`
    pub instructions: String,
    pub expected_output: String,
}

impl StageDefinition {
    /// Build the full prompt: persona first, then the task, then the output contract
    pub fn build_prompt(&self, ctx: &PromptContext<'_>) -> String {
        let task = regex_utils::template::render(&self.instructions, |name| match name {
            "preferences" => Some(ctx.preferences.to_string()),
            "previous_output" => Some(ctx.previous_output.to_string()),
            "recent_meals" => Some(recent_meals_clause(ctx.recent_meals)),
            _ => None,
        });

        format!(
            "You are a {}. {}\nYour goal: {}\n\n{}\n\nExpected output: {}",
            self.role,
            self.backstory,
            self.goal,
            task.trim(),
            self.expected_output
        )
    }
}

fn recent_meals_clause(recent_meals: &[String]) -> String {
    if recent_meals.is_empty() {
        return String::new();
    }
    format!(
        "These meals were suggested recently, so do not suggest any of them again: {}.",
        recent_meals.join(", ")
    )
}

/// The three stages, in execution order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StageSetOverrides")]
pub struct StageSet {
    pub parse_preferences: StageDefinition,
    pub brainstorm: StageDefinition,
    pub select_and_detail: StageDefinition,
}

impl StageSet {
    pub fn get(&self, kind: StageKind) -> &StageDefinition {
        match kind {
            StageKind::ParsePreferences => &self.parse_preferences,
            StageKind::Brainstorm => &self.brainstorm,
            StageKind::SelectAndDetail => &self.select_and_detail,
        }
    }
}

impl Default for StageSet {
    fn default() -> Self {
        Self {
            parse_preferences: parse_preferences_stage(),
            brainstorm: brainstorm_stage(),
            select_and_detail: select_and_detail_stage(),
        }
    }
}

/// A stage as written in the config file, any field may be omitted
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StageOverride {
    role: Option<String>,
    goal: Option<String>,
    backstory: Option<String>,
    instructions: Option<String>,
    expected_output: Option<String>,
}

impl StageOverride {
    fn apply(self, base: StageDefinition) -> StageDefinition {
        StageDefinition {
            role: self.role.unwrap_or(base.role),
            goal: self.goal.unwrap_or(base.goal),
            backstory: self.backstory.unwrap_or(base.backstory),
            instructions: self.instructions.unwrap_or(base.instructions),
            expected_output: self.expected_output.unwrap_or(base.expected_output),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StageSetOverrides {
    parse_preferences: StageOverride,
    brainstorm: StageOverride,
    select_and_detail: StageOverride,
}

impl From<StageSetOverrides> for StageSet {
    fn from(overrides: StageSetOverrides) -> Self {
        Self {
            parse_preferences: overrides.parse_preferences.apply(parse_preferences_stage()),
            brainstorm: overrides.brainstorm.apply(brainstorm_stage()),
            select_and_detail: overrides.select_and_detail.apply(select_and_detail_stage()),
        }
    }
}

fn parse_preferences_stage() -> StageDefinition {
    StageDefinition {
        role: "Dietary and Preference Analyst".to_string(),
        goal: "Summarize the user's dietary needs, cuisine preference, cooking time and \
               ingredient constraints for meal planning, even when the input is sparse or unclear."
            .to_string(),
        backstory: "You are a food science and nutrition expert who infers preferences from vague \
                    input, fills gaps with sensible defaults, and never returns an empty answer."
            .to_string(),
        instructions: "The user's dinner preferences are given as a JSON list of objects:\n\
                       {preferences}\n\n\
                       Review every entry. Correct spelling mistakes, clarify vague terms and \
                       replace missing or nonsensical values with reasonable defaults. If the \
                       input is empty you must still produce a complete record.\n\
                       Answer with a list of objects using exactly the keys 'dietary', 'cuisine', \
                       'time', 'ingredients_to_use' and 'ingredients_to_avoid'. Example: \
                       [{'dietary': 'Vegetarian', 'cuisine': 'Italian', 'time': '<30min', \
                       'ingredients_to_use': ['pasta', 'spinach'], 'ingredients_to_avoid': ['mushrooms']}]"
            .to_string(),
        expected_output: "A list of objects with keys 'dietary', 'cuisine', 'time', \
                          'ingredients_to_use', 'ingredients_to_avoid', corrected and \
                          default-filled. Never blank."
            .to_string(),
    }
}

fn brainstorm_stage() -> StageDefinition {
    StageDefinition {
        role: "Creative Recipe Brainstormer".to_string(),
        goal: "Propose 3-5 diverse, appealing dinner ideas that respect the analyzed preferences, \
               even when those preferences are incomplete or oddly formatted."
            .to_string(),
        backstory: "You are a chef with a global culinary background. You always deliver a list \
                    of ideas, inventing sensible ones when the brief is thin."
            .to_string(),
        instructions: "Analyzed preferences from the previous step:\n\
                       {previous_output}\n\n\
                       {recent_meals}\n\
                       Brainstorm 3-5 dinner recipes that fit these preferences. For each give a \
                       catchy 'name', a one or two sentence 'description' and a list of 'tags' \
                       (dietary, cuisine, time). If the preferences are empty or malformed, infer \
                       reasonable defaults. Example: [{'name': 'Speedy Spinach & Tomato Pasta', \
                       'description': 'Quick pasta with fresh spinach and cherry tomatoes.', \
                       'tags': ['Vegetarian', 'Italian', '<30min']}]"
            .to_string(),
        expected_output: "A list of 3-5 objects, each with keys 'name', 'description' and 'tags'. \
                          Never blank."
            .to_string(),
    }
}

fn select_and_detail_stage() -> StageDefinition {
    StageDefinition {
        role: "Daily Meal Planner and Instruction Provider".to_string(),
        goal: "Choose one dinner and turn it into a concise, practical cooking plan.".to_string(),
        backstory: "You are an organized meal prep specialist who makes recipes simple for home \
                    cooks and always produces a usable plan, filling in details when needed."
            .to_string(),
        instructions: "Recipe ideas from the previous step, each with 'name', 'description' and \
                       'tags':\n\
                       {previous_output}\n\n\
                       Pick the best idea for tonight. Use its name as the recipe name and its \
                       tags for dietary, cuisine and time context. Write it up with \
                       'Meal Suggestion' (the recipe name), 'Ingredients' (bulleted, with \
                       approximate quantities for 4 servings) and 'Instructions' (numbered \
                       steps). If the ideas are empty or unclear, invent a fitting recipe."
            .to_string(),
        expected_output: "Meal Suggestion: [Recipe Name]\nIngredients: [bulleted list with \
                          quantities]\nInstructions: [numbered steps]\nNever blank."
            .to_string(),
    }
}
