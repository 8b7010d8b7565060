//! Append-only set of previously used free-text values.
//!
//! Backs the food suggestions/filter choices and the saved-notes picker.

use serde::Serialize;

/// Deduplicated, insertion-ordered values that are never pruned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HistoryValues {
    values: Vec<String>,
}

impl HistoryValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores history from stored values, dropping blanks and repeats.
    pub fn from_values(values: Vec<String>) -> Self {
        let mut history = Self::new();
        for value in values {
            history.push(value);
        }
        history
    }

    /// Adds a trimmed value; returns `false` when blank or already known.
    pub fn push(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || self.contains(trimmed) {
            return false;
        }
        self.values.push(trimmed.to_string());
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|known| known == value)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::HistoryValues;

    #[test]
    fn push_dedupes_and_keeps_insertion_order() {
        let mut history = HistoryValues::new();
        assert!(history.push("kibble"));
        assert!(history.push(" chicken "));
        assert!(!history.push("kibble"));
        assert!(!history.push("   "));
        assert_eq!(history.values(), ["kibble", "chicken"]);
    }

    #[test]
    fn from_values_drops_blanks_and_repeats() {
        let history = HistoryValues::from_values(vec![
            "rice".to_string(),
            String::new(),
            "rice".to_string(),
            "fish".to_string(),
        ]);
        assert_eq!(history.values(), ["rice", "fish"]);
    }
}
