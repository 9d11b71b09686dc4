//! Grading: one model call, then strict validation of the reply.
//!
//! The module is intentionally thin on the request side — all prompt
//! engineering lives in [`crate::prompts`] — and deliberately strict on the
//! response side. The model is asked for JSON keyed by the rubric's category
//! names; anything that deviates (missing category, unknown category, grade
//! outside A–F, empty rationale or quick-win list) aborts the audit with an
//! error carrying an excerpt of the raw reply. No repair prompt, no fuzzy
//! matching: a single authoritative attempt keeps the failure path
//! deterministic and testable.

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::llm::LlmClient;
use crate::prompts::{build_user_prompt, DEFAULT_SYSTEM_PROMPT};
use crate::report::{Grade, GradeResult};
use crate::rubric::Rubric;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

/// Cap on the raw-response excerpt embedded in grading errors.
const EXCERPT_CHARS: usize = 600;

/// The grading stage's output: rubric-ordered results plus token usage.
#[derive(Debug)]
pub struct GradedOutcome {
    pub results: Vec<GradeResult>,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Grade the extracted page text against the rubric with one model call.
pub async fn grade(
    client: &LlmClient,
    page_text: &str,
    rubric: &Rubric,
    config: &AuditConfig,
) -> Result<GradedOutcome, AuditError> {
    let system = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let user = build_user_prompt(rubric, page_text);

    let outcome = client
        .chat(
            &config.model,
            system,
            &user,
            config.temperature,
            config.max_tokens,
        )
        .await?;

    debug!("model replied with {} chars", outcome.content.len());
    let results = parse_report(&outcome.content, rubric)?;

    Ok(GradedOutcome {
        results,
        prompt_tokens: outcome.prompt_tokens,
        completion_tokens: outcome.completion_tokens,
    })
}

/// One category entry as the model returns it, before validation.
/// `reasoning` is accepted as an alias because models asked for a rationale
/// frequently echo that older field name back.
#[derive(Debug, Deserialize)]
struct RawEntry {
    grade: String,
    #[serde(alias = "reasoning")]
    rationale: String,
    quick_wins: Vec<String>,
}

/// Matches the outermost JSON object in a reply that wraps it in prose.
static RE_JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Parse and validate the model's reply into rubric-ordered results.
///
/// Contract enforced here:
/// * exactly the rubric's category names as top-level keys — a missing key
///   is [`AuditError::MissingCategory`], an extra one
///   [`AuditError::UnknownCategory`];
/// * each entry has a grade from {A, B, C, D, F}, a non-empty rationale, and
///   a non-empty list of non-empty quick wins.
pub fn parse_report(raw: &str, rubric: &Rubric) -> Result<Vec<GradeResult>, AuditError> {
    let candidate = strip_fences(raw);
    let candidate = RE_JSON_OBJECT
        .find(candidate)
        .map(|m| m.as_str())
        .ok_or_else(|| AuditError::MalformedReport {
            detail: "no JSON object found in response".into(),
            raw: excerpt(raw),
        })?;

    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(candidate)
        .map_err(|e| AuditError::MalformedReport {
            detail: e.to_string(),
            raw: excerpt(raw),
        })?;

    // Reject unrecognized keys before checking for missing ones: an unknown
    // name is often a misspelt known one, and that message diagnoses both.
    for key in object.keys() {
        if !rubric.category_names().any(|n| n == key) {
            return Err(AuditError::UnknownCategory {
                category: key.clone(),
                raw: excerpt(raw),
            });
        }
    }

    let mut results = Vec::with_capacity(rubric.categories.len());
    for category in rubric.category_names() {
        let value = object
            .get(category)
            .ok_or_else(|| AuditError::MissingCategory {
                category: category.to_string(),
                raw: excerpt(raw),
            })?;

        let entry: RawEntry =
            serde_json::from_value(value.clone()).map_err(|e| AuditError::MalformedReport {
                detail: format!("category '{category}': {e}"),
                raw: excerpt(raw),
            })?;

        let grade =
            Grade::from_letter(&entry.grade).ok_or_else(|| AuditError::InvalidGrade {
                category: category.to_string(),
                value: entry.grade.clone(),
                raw: excerpt(raw),
            })?;

        if entry.rationale.trim().is_empty() {
            return Err(AuditError::EmptyField {
                category: category.to_string(),
                field: "rationale",
                raw: excerpt(raw),
            });
        }

        let quick_wins: Vec<String> = entry
            .quick_wins
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        if quick_wins.is_empty() {
            return Err(AuditError::EmptyField {
                category: category.to_string(),
                field: "quick-win list",
                raw: excerpt(raw),
            });
        }

        results.push(GradeResult {
            category: category.to_string(),
            grade,
            rationale: entry.rationale.trim().to_string(),
            quick_wins,
        });
    }

    Ok(results)
}

/// Strip ```json ... ``` or ``` ... ``` fences the model may wrap around
/// its reply despite the prompt saying not to.
fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let stripped = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match stripped {
        Some(inner) => inner
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or_else(|| inner.trim_start()),
        None => text,
    }
}

/// First [`EXCERPT_CHARS`] characters of the raw reply, char-safe.
fn excerpt(raw: &str) -> String {
    if raw.chars().count() <= EXCERPT_CHARS {
        raw.to_string()
    } else {
        let cut: String = raw.chars().take(EXCERPT_CHARS).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric;

    fn valid_entry(grade: &str) -> String {
        format!(
            r#"{{"grade": "{grade}", "rationale": "Detailed critique of this area.",
                "quick_wins": ["Do the thing", "Do the other thing"]}}"#
        )
    }

    fn full_response() -> String {
        format!(
            r#"{{"Brand": {}, "Content": {}, "Website": {}, "Marketing": {}}}"#,
            valid_entry("A"),
            valid_entry("B"),
            valid_entry("C"),
            valid_entry("F"),
        )
    }

    #[test]
    fn valid_response_parses_in_rubric_order() {
        let rubric = rubric::load().unwrap();
        let results = parse_report(&full_response(), &rubric).unwrap();
        let categories: Vec<&str> = results.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["Brand", "Content", "Website", "Marketing"]);
        assert_eq!(results[0].grade, Grade::A);
        assert_eq!(results[3].grade, Grade::F);
        assert_eq!(results[0].quick_wins.len(), 2);
    }

    #[test]
    fn fenced_response_parses() {
        let rubric = rubric::load().unwrap();
        let fenced = format!("```json\n{}\n```", full_response());
        assert!(parse_report(&fenced, &rubric).is_ok());
    }

    #[test]
    fn prose_wrapped_response_parses() {
        let rubric = rubric::load().unwrap();
        let chatty = format!("Here is your audit:\n\n{}\n\nHope this helps!", full_response());
        assert!(parse_report(&chatty, &rubric).is_ok());
    }

    #[test]
    fn missing_category_is_error() {
        let rubric = rubric::load().unwrap();
        let partial = format!(
            r#"{{"Brand": {}, "Content": {}, "Marketing": {}}}"#,
            valid_entry("A"),
            valid_entry("B"),
            valid_entry("C"),
        );
        let err = parse_report(&partial, &rubric).unwrap_err();
        match err {
            AuditError::MissingCategory { category, .. } => assert_eq!(category, "Website"),
            other => panic!("expected MissingCategory, got {other:?}"),
        }
    }

    #[test]
    fn unknown_category_is_error_not_fuzzy_matched() {
        let rubric = rubric::load().unwrap();
        let renamed = full_response().replace("\"Website\"", "\"Web site\"");
        let err = parse_report(&renamed, &rubric).unwrap_err();
        match err {
            AuditError::UnknownCategory { category, .. } => assert_eq!(category, "Web site"),
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
    }

    #[test]
    fn modifier_grade_is_error_not_coerced() {
        let rubric = rubric::load().unwrap();
        let plus = full_response().replace(r#""grade": "A""#, r#""grade": "A+""#);
        let err = parse_report(&plus, &rubric).unwrap_err();
        match err {
            AuditError::InvalidGrade { value, .. } => assert_eq!(value, "A+"),
            other => panic!("expected InvalidGrade, got {other:?}"),
        }
    }

    #[test]
    fn empty_rationale_is_error() {
        let rubric = rubric::load().unwrap();
        let empty = full_response().replace("Detailed critique of this area.", "  ");
        let err = parse_report(&empty, &rubric).unwrap_err();
        assert!(matches!(
            err,
            AuditError::EmptyField {
                field: "rationale",
                ..
            }
        ));
    }

    #[test]
    fn empty_quick_wins_is_error() {
        let rubric = rubric::load().unwrap();
        let empty = full_response().replace(
            r#"["Do the thing", "Do the other thing"]"#,
            "[]",
        );
        let err = parse_report(&empty, &rubric).unwrap_err();
        assert!(matches!(err, AuditError::EmptyField { .. }));
    }

    #[test]
    fn reasoning_alias_accepted() {
        let rubric = rubric::load().unwrap();
        let aliased = full_response().replace("\"rationale\"", "\"reasoning\"");
        assert!(parse_report(&aliased, &rubric).is_ok());
    }

    #[test]
    fn non_json_reply_is_malformed() {
        let rubric = rubric::load().unwrap();
        let err = parse_report("I cannot audit this website.", &rubric).unwrap_err();
        assert!(matches!(err, AuditError::MalformedReport { .. }));
    }

    #[test]
    fn errors_carry_raw_excerpt() {
        let rubric = rubric::load().unwrap();
        let err = parse_report("totally not json", &rubric).unwrap_err();
        assert!(err.to_string().contains("totally not json"));
    }

    #[test]
    fn excerpt_truncates_long_replies() {
        let long = "x".repeat(5000);
        let e = excerpt(&long);
        assert!(e.chars().count() <= EXCERPT_CHARS + 1);
        assert!(e.ends_with('…'));
    }
}
