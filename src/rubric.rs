//! The grading rubric: a fixed, versioned set of marketing categories and
//! criteria bundled with the binary.
//!
//! The definition lives in `rubric.json` next to this file and is embedded at
//! compile time. It is still parsed and validated at runtime rather than
//! hard-coded as Rust values: the validation path is exactly what a future
//! user-supplied rubric file would go through, and a malformed definition
//! fails loudly at startup — before any network call — instead of producing a
//! half-graded report.

use crate::error::AuditError;
use serde::{Deserialize, Serialize};

/// The bundled rubric definition.
const RUBRIC_JSON: &str = include_str!("rubric.json");

/// One rubric dimension: a category name and its grading criteria.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricCategory {
    /// Category name, e.g. "Brand". Used verbatim as the JSON key the model
    /// must return.
    pub name: String,
    /// Ordered grading criteria embedded into the prompt.
    pub criteria: Vec<String>,
}

/// The full rubric: an ordered sequence of categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rubric {
    /// Definition version, bumped whenever the categories or criteria change.
    pub version: u32,
    pub categories: Vec<RubricCategory>,
}

impl Rubric {
    /// Category names in rubric order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    fn validate(&self) -> Result<(), AuditError> {
        if self.categories.is_empty() {
            return Err(AuditError::InvalidRubric {
                detail: "rubric has no categories".into(),
            });
        }
        let mut seen: Vec<&str> = Vec::with_capacity(self.categories.len());
        for cat in &self.categories {
            if cat.name.trim().is_empty() {
                return Err(AuditError::InvalidRubric {
                    detail: "category with empty name".into(),
                });
            }
            if seen.contains(&cat.name.as_str()) {
                return Err(AuditError::InvalidRubric {
                    detail: format!("duplicate category '{}'", cat.name),
                });
            }
            seen.push(&cat.name);
            if cat.criteria.is_empty() {
                return Err(AuditError::InvalidRubric {
                    detail: format!("category '{}' has no criteria", cat.name),
                });
            }
            if cat.criteria.iter().any(|c| c.trim().is_empty()) {
                return Err(AuditError::InvalidRubric {
                    detail: format!("category '{}' has an empty criterion", cat.name),
                });
            }
        }
        Ok(())
    }
}

/// Load and validate the bundled rubric.
pub fn load() -> Result<Rubric, AuditError> {
    parse(RUBRIC_JSON)
}

/// Parse and validate a rubric definition from JSON text.
fn parse(json: &str) -> Result<Rubric, AuditError> {
    let rubric: Rubric = serde_json::from_str(json).map_err(|e| AuditError::InvalidRubric {
        detail: e.to_string(),
    })?;
    rubric.validate()?;
    Ok(rubric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_rubric_loads() {
        let rubric = load().expect("bundled rubric must be valid");
        let names: Vec<&str> = rubric.category_names().collect();
        assert_eq!(names, vec!["Brand", "Content", "Website", "Marketing"]);
        assert!(rubric.categories.iter().all(|c| !c.criteria.is_empty()));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = parse("{not json").unwrap_err();
        assert!(matches!(err, AuditError::InvalidRubric { .. }));
    }

    #[test]
    fn empty_categories_rejected() {
        let err = parse(r#"{"version": 1, "categories": []}"#).unwrap_err();
        assert!(matches!(err, AuditError::InvalidRubric { .. }));
    }

    #[test]
    fn empty_criteria_rejected() {
        let err = parse(
            r#"{"version": 1, "categories": [{"name": "Brand", "criteria": []}]}"#,
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Brand"), "got: {msg}");
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = parse(
            r#"{"version": 1, "categories": [
                {"name": "Brand", "criteria": ["a"]},
                {"name": "Brand", "criteria": ["b"]}
            ]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn missing_fields_rejected() {
        // `criteria` absent entirely, not just empty.
        let err = parse(r#"{"version": 1, "categories": [{"name": "Brand"}]}"#).unwrap_err();
        assert!(matches!(err, AuditError::InvalidRubric { .. }));
    }
}
