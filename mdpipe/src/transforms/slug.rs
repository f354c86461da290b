//! GitHub-style heading slugs

use std::collections::HashMap;

/// Slug of `value` without duplicate tracking.
///
/// Lowercases, removes everything but letters, digits, spaces, hyphens and
/// underscores, then turns spaces into hyphens.
pub fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// Generates unique slugs across one document.
///
/// Repeated slugs get a numeric suffix: `intro`, `intro-1`, `intro-2`.
#[derive(Debug, Default, Clone)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slug(&mut self, value: &str) -> String {
        let original = slugify(value);
        let mut result = original.clone();
        while self.occurrences.contains_key(&result) {
            let count = self.occurrences.entry(original.clone()).or_insert(0);
            *count += 1;
            result = format!("{original}-{count}");
        }
        self.occurrences.insert(result.clone(), 0);
        result
    }
}
