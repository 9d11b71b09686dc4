//! Output types: grades, per-category results, and the assembled report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A letter grade. The set is closed: modifiers such as `A+` or `B-` are not
/// representable and a model reply using them fails parsing rather than being
/// rounded to the nearest letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Parse a bare letter. Returns None for anything outside the set,
    /// including modifier forms like "A+".
    pub fn from_letter(s: &str) -> Option<Grade> {
        match s.trim() {
            "A" => Some(Grade::A),
            "B" => Some(Grade::B),
            "C" => Some(Grade::C),
            "D" => Some(Grade::D),
            "F" => Some(Grade::F),
            _ => None,
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// The graded outcome for one rubric category. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeResult {
    /// Rubric category name, e.g. "Brand".
    pub category: String,
    pub grade: Grade,
    /// The model's reasoning for the grade.
    pub rationale: String,
    /// Short actionable recommendations, in the order the model gave them.
    pub quick_wins: Vec<String>,
}

/// Timing and size statistics for one audit run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditStats {
    /// Characters of page text actually sent to the model (post-truncation).
    pub fetched_chars: usize,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub fetch_duration_ms: u64,
    pub llm_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The complete audit: exactly one [`GradeResult`] per rubric category, in
/// rubric order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// The audited URL.
    pub url: String,
    pub results: Vec<GradeResult>,
    pub stats: AuditStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_letters_round_trip() {
        for (s, g) in [
            ("A", Grade::A),
            ("B", Grade::B),
            ("C", Grade::C),
            ("D", Grade::D),
            ("F", Grade::F),
        ] {
            assert_eq!(Grade::from_letter(s), Some(g));
            assert_eq!(g.letter(), s);
        }
    }

    #[test]
    fn modifier_grades_rejected() {
        for s in ["A+", "A-", "B+", "E", "a", "", "AA"] {
            assert_eq!(Grade::from_letter(s), None, "'{s}' must not parse");
        }
    }

    #[test]
    fn whitespace_tolerated() {
        assert_eq!(Grade::from_letter(" A "), Some(Grade::A));
    }

    #[test]
    fn grade_serialises_as_bare_letter() {
        assert_eq!(serde_json::to_string(&Grade::F).unwrap(), "\"F\"");
    }
}
