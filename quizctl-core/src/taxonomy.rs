//! Taxonomy derivation: the distinct themes and (theme, subtheme) pairs a
//! batch of records will create, in first-seen order.
//!
//! First-seen order makes generated ids reproducible across runs over the
//! same input, which the unordered-set approach cannot guarantee.

use std::collections::{HashMap, HashSet};

use crate::record::QuestionRecord;

/// A single theme and the distinct subthemes observed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeEntry {
    pub name: String,
    pub subthemes: Vec<String>,
}

/// The ordered, deduplicated set of taxonomy rows a record batch implies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyPlan {
    pub themes: Vec<ThemeEntry>,
}

impl TaxonomyPlan {
    /// Scan records once, collecting distinct non-empty theme names and, per
    /// theme, distinct non-empty subtheme names. A subtheme paired with an
    /// empty theme contributes nothing.
    pub fn from_records(records: &[QuestionRecord]) -> Self {
        let mut themes: Vec<ThemeEntry> = Vec::new();
        let mut theme_slots: HashMap<String, usize> = HashMap::new();
        let mut seen_pairs: HashSet<(String, String)> = HashSet::new();

        for record in records {
            if record.theme.is_empty() {
                continue;
            }
            let slot = match theme_slots.get(&record.theme) {
                Some(&slot) => slot,
                None => {
                    theme_slots.insert(record.theme.clone(), themes.len());
                    themes.push(ThemeEntry {
                        name: record.theme.clone(),
                        subthemes: Vec::new(),
                    });
                    themes.len() - 1
                }
            };

            if record.subtheme.is_empty() {
                continue;
            }
            if seen_pairs.insert((record.theme.clone(), record.subtheme.clone())) {
                themes[slot].subthemes.push(record.subtheme.clone());
            }
        }

        Self { themes }
    }

    pub fn theme_count(&self) -> usize {
        self.themes.len()
    }

    pub fn subtheme_count(&self) -> usize {
        self.themes.iter().map(|t| t.subthemes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(theme: &str, subtheme: &str) -> QuestionRecord {
        QuestionRecord {
            theme: theme.to_owned(),
            subtheme: subtheme.to_owned(),
            question: String::new(),
            question_type: "text".to_owned(),
            answer: String::new(),
        }
    }

    #[test]
    fn preserves_first_seen_order() {
        let records = vec![
            record("Science", "Physics"),
            record("History", "Rome"),
            record("Science", "Chemistry"),
            record("History", "Rome"),
        ];

        let plan = TaxonomyPlan::from_records(&records);
        let names: Vec<&str> = plan.themes.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Science", "History"]);
        assert_eq!(plan.themes[0].subthemes, vec!["Physics", "Chemistry"]);
        assert_eq!(plan.themes[1].subthemes, vec!["Rome"]);
        assert_eq!(plan.subtheme_count(), 3);
    }

    #[test]
    fn deduplicates_pairs() {
        let records = vec![
            record("Science", "Physics"),
            record("Science", "Physics"),
            record("Science", "Physics"),
        ];

        let plan = TaxonomyPlan::from_records(&records);
        assert_eq!(plan.theme_count(), 1);
        assert_eq!(plan.subtheme_count(), 1);
    }

    #[test]
    fn empty_theme_contributes_nothing() {
        let records = vec![record("", "Physics"), record("", "")];
        let plan = TaxonomyPlan::from_records(&records);
        assert!(plan.is_empty());
    }

    #[test]
    fn empty_subtheme_creates_theme_only() {
        let records = vec![record("Science", "")];
        let plan = TaxonomyPlan::from_records(&records);
        assert_eq!(plan.theme_count(), 1);
        assert_eq!(plan.subtheme_count(), 0);
    }

    #[test]
    fn same_subtheme_name_under_two_themes_is_two_pairs() {
        let records = vec![record("Science", "Ancient"), record("History", "Ancient")];
        let plan = TaxonomyPlan::from_records(&records);
        assert_eq!(plan.theme_count(), 2);
        assert_eq!(plan.subtheme_count(), 2);
    }
}
