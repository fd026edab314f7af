//! Regex utilities for dinner-decider
//! Extracted to a separate crate for compilation optimization

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Patterns for pulling the chosen meal out of a detailed suggestion
pub mod meal_suggestion {
    use super::*;

    /// `Meal Suggestion: <name>` up to the end of the line
    pub static MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"Meal Suggestion:[^\S\n]*([^\n]*)").expect("Invalid regex pattern")
    });

    /// Extract the meal name following the first `Meal Suggestion:` marker.
    ///
    /// Markdown emphasis around the name (`**Meal Suggestion:** Foo`) is
    /// stripped. When nothing follows the marker on its line, the first
    /// non-blank line below it is used unless that line is another labelled
    /// section (`Ingredients: ...`). Returns `None` when the marker is absent
    /// or names nothing.
    pub fn extract(text: &str) -> Option<String> {
        let caps = MARKER_PATTERN.captures(text)?;
        let inline = caps.get(1)?;

        let name = inline.as_str().trim_matches(|c: char| c == '*' || c.is_whitespace());
        if !name.is_empty() {
            return Some(name.to_string());
        }

        let next = text[inline.end()..]
            .lines()
            .map(|line| line.trim_matches(|c: char| c == '*' || c == '#' || c.is_whitespace()))
            .find(|line| !line.is_empty())?;
        if next.contains(':') { None } else { Some(next.to_string()) }
    }

    /// Extract the meal name, falling back to the whole trimmed text
    pub fn extract_or_whole(text: &str) -> String {
        extract(text).unwrap_or_else(|| text.trim().to_string())
    }
}

/// Whitespace normalization
pub mod whitespace {
    use super::*;

    pub static RUN_PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

    /// Collapse every whitespace run (newlines included) into one space and trim
    pub fn collapse(text: &str) -> String {
        RUN_PATTERN.replace_all(text.trim(), " ").into_owned()
    }
}

/// Named `{placeholder}` substitution for prompt templates
pub mod template {
    use super::*;

    pub static PLACEHOLDER_PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("Invalid regex pattern"));

    /// Replace every `{name}` in `template` in a single left-to-right pass.
    ///
    /// Substituted values are never scanned again, so placeholder-like text
    /// inside them is kept as is. Names `lookup` does not know stay literal.
    pub fn render(template: &str, mut lookup: impl FnMut(&str) -> Option<String>) -> String {
        PLACEHOLDER_PATTERN
            .replace_all(template, |caps: &Captures<'_>| {
                lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}
