//! Fixed category taxonomy for suggestions.
//!
//! A taxonomy is an ordered list of categories, each with an ordered list of
//! subcategories. The built-in default can be replaced at startup from a
//! JSON file (see [`Taxonomy::from_json`]).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One category and its allowed subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub subcategories: Vec<String>,
}

/// Ordered mapping from category name to subcategory names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

const DEFAULT_TAXONOMY: &[(&str, &[&str])] = &[
    ("Workplace", &["Safety", "Facilities", "Equipment", "Cleanliness"]),
    ("Management", &["Communication", "Leadership", "Policies", "Recognition"]),
    ("Compensation & Benefits", &["Salary", "Benefits", "Leave", "Bonuses"]),
    ("Culture", &["Diversity & Inclusion", "Team Building", "Work-Life Balance", "Events"]),
    ("Technology", &["Software", "Hardware", "IT Support", "Security"]),
    ("Training & Development", &["Onboarding", "Skills Training", "Career Growth", "Mentorship"]),
    ("Other", &["General"]),
];

impl Default for Taxonomy {
    fn default() -> Self {
        let categories = DEFAULT_TAXONOMY
            .iter()
            .map(|(name, subs)| Category {
                name: (*name).to_string(),
                subcategories: subs.iter().map(|s| (*s).to_string()).collect(),
            })
            .collect();
        Self { categories }
    }
}

impl Taxonomy {
    /// Build a taxonomy, rejecting empty or duplicate names.
    pub fn new(categories: Vec<Category>) -> Result<Self, CoreError> {
        if categories.is_empty() {
            return Err(CoreError::Validation("Taxonomy must contain at least one category".into()));
        }
        let mut seen = std::collections::HashSet::new();
        for cat in &categories {
            if cat.name.trim().is_empty() {
                return Err(CoreError::Validation("Category names must not be empty".into()));
            }
            if !seen.insert(cat.name.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Duplicate category '{}'",
                    cat.name
                )));
            }
            if cat.subcategories.is_empty() {
                return Err(CoreError::Validation(format!(
                    "Category '{}' has no subcategories",
                    cat.name
                )));
            }
        }
        Ok(Self { categories })
    }

    /// Parse a JSON array of `{ "name": ..., "subcategories": [...] }`.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let categories: Vec<Category> = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid taxonomy JSON: {e}")))?;
        Self::new(categories)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn subcategories_of(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.subcategories.as_slice())
    }

    /// Check that `category` exists and `subcategory` belongs to it.
    pub fn validate(&self, category: &str, subcategory: &str) -> Result<(), CoreError> {
        let subs = self
            .subcategories_of(category)
            .ok_or_else(|| CoreError::Validation(format!("Unknown category '{category}'")))?;
        if subs.iter().any(|s| s == subcategory) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Subcategory '{subcategory}' does not belong to category '{category}'"
            )))
        }
    }

    /// JSON object `{ category: [subcategories] }` preserving taxonomy order.
    pub fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.categories
            .iter()
            .map(|c| {
                let subs = c
                    .subcategories
                    .iter()
                    .map(|s| serde_json::Value::String(s.clone()))
                    .collect();
                (c.name.clone(), serde_json::Value::Array(subs))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn default_contains_workplace_safety() {
        let tax = Taxonomy::default();
        assert!(tax.validate("Workplace", "Safety").is_ok());
        assert_eq!(tax.categories()[0].name, "Workplace");
    }

    #[test]
    fn subcategory_from_other_category_is_rejected() {
        let tax = Taxonomy::default();
        assert_matches!(tax.validate("Workplace", "Salary"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let tax = Taxonomy::default();
        let err = tax.validate("Nope", "Safety").unwrap_err();
        assert!(err.to_string().contains("Unknown category"));
    }

    #[test]
    fn from_json_round_trips_order() {
        let tax = Taxonomy::from_json(
            r#"[{"name":"B","subcategories":["x"]},{"name":"A","subcategories":["y","z"]}]"#,
        )
        .expect("valid taxonomy");
        let names: Vec<_> = tax.to_json_map().keys().cloned().collect();
        assert_eq!(names, vec!["B".to_string(), "A".to_string()]);
        assert_eq!(tax.subcategories_of("A").map(<[String]>::len), Some(2));
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let result = Taxonomy::from_json(
            r#"[{"name":"A","subcategories":["x"]},{"name":"A","subcategories":["y"]}]"#,
        );
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_subcategories_are_rejected() {
        let result = Taxonomy::from_json(r#"[{"name":"A","subcategories":[]}]"#);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }
}
