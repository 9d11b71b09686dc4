//! Prompts for rubric-based website grading.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tightening the output contract or the
//!    grading persona requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the prompt text directly
//!    without a live model call, making contract regressions easy to catch.
//!
//! Callers can override the system prompt via
//! [`crate::config::AuditConfig::system_prompt`]; the constant here is used
//! only when no override is provided.

use crate::rubric::Rubric;
use std::fmt::Write;

/// Default system prompt: the grader's persona and the tone of the output.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a senior digital marketing strategist conducting a critical growth \
marketing audit. Do not sugarcoat or give generic advice. Be direct, \
constructive, and specific. Highlight what is NOT working, what is missing, \
and where the business is likely losing opportunities.";

/// Build the user prompt: rubric plus page text plus the strict output
/// contract the parser relies on.
///
/// The category list and the required JSON keys are generated from the
/// rubric so prompt and parser can never disagree about the key set.
pub fn build_user_prompt(rubric: &Rubric, page_text: &str) -> String {
    let names: Vec<&str> = rubric.category_names().collect();
    let mut prompt = String::with_capacity(page_text.len() + 2048);

    let _ = writeln!(
        prompt,
        "Analyze the following website text for {}:\n",
        names.join(", ")
    );
    prompt.push_str(page_text);
    prompt.push_str("\n\nUse this rubric:\n");
    for cat in &rubric.categories {
        let _ = writeln!(prompt, "{}:", cat.name);
        for criterion in &cat.criteria {
            let _ = writeln!(prompt, "- {}", criterion);
        }
    }

    let _ = writeln!(
        prompt,
        "\nReturn STRICT JSON ONLY, with exactly these top-level keys: {}.",
        names.join(", ")
    );
    prompt.push_str(
        "Each key must map to an object with:\n\
         - \"grade\": a single letter, one of \"A\", \"B\", \"C\", \"D\", \"F\" \
           (no plus or minus modifiers)\n\
         - \"rationale\": a thoroughly detailed paragraph explaining the grade\n\
         - \"quick_wins\": a non-empty list of specific, actionable \
           recommendations with examples\n\
         Do not include any other keys, commentary, or markdown fences.",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric;

    #[test]
    fn user_prompt_names_every_category() {
        let rubric = rubric::load().unwrap();
        let prompt = build_user_prompt(&rubric, "Acme sells anvils.");
        for name in rubric.category_names() {
            assert!(prompt.contains(name), "prompt must mention {name}");
        }
        assert!(prompt.contains("Acme sells anvils."));
    }

    #[test]
    fn user_prompt_states_the_contract() {
        let rubric = rubric::load().unwrap();
        let prompt = build_user_prompt(&rubric, "text");
        assert!(prompt.contains("STRICT JSON"));
        assert!(prompt.contains("\"quick_wins\""));
        assert!(prompt.contains("no plus or minus modifiers"));
    }
}
