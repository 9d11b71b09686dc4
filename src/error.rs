//! Error types for the sitegrade library.
//!
//! One enum covers the whole run, grouped into the four failure families a
//! user can actually act on:
//!
//! * **Config** — bad startup state (missing API key, malformed rubric).
//!   Surfaces before any network call so a broken setup never consumes quota.
//! * **Fetch** — the target website could not be retrieved.
//! * **Grading** — the language-model call failed, or its reply could not be
//!   validated against the expected structure. Parse-family variants carry an
//!   excerpt of the raw response so the failure can be diagnosed without
//!   re-running the audit.
//! * **I/O** — the PDF could not be written.
//!
//! Every error aborts the run; there is no partial output and no retry.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the sitegrade library.
#[derive(Debug, Error)]
pub enum AuditError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// No OpenAI API key available.
    #[error(
        "No API key configured.\nSet OPENAI_API_KEY in the environment (or a .env file), \
         or pass a key explicitly."
    )]
    MissingApiKey,

    /// The bundled rubric definition failed validation.
    #[error("Invalid rubric definition: {detail}")]
    InvalidRubric { detail: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Fetch errors ──────────────────────────────────────────────────────
    /// The input string is not an HTTP/HTTPS URL.
    #[error("Invalid URL '{input}': expected an http:// or https:// address")]
    InvalidUrl { input: String },

    /// Network-level failure reaching the target website.
    #[error("Failed to fetch '{url}': {reason}\nCheck the address and your internet connection.")]
    FetchFailed { url: String, reason: String },

    /// The fetch exceeded the configured timeout.
    #[error("Fetching '{url}' timed out after {secs}s\nIncrease --fetch-timeout for slow sites.")]
    FetchTimeout { url: String, secs: u64 },

    /// The website answered with a non-success status.
    #[error("'{url}' returned HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    // ── Grading errors ────────────────────────────────────────────────────
    /// The request never reached the model service (DNS, connect, TLS, timeout).
    #[error("Could not reach the model service: {detail}\nCheck your network and --api-base.")]
    ModelUnreachable { detail: String },

    /// The model service replied with a non-success status (auth, rate limit, ...).
    #[error("Model service returned HTTP {status}: {detail}")]
    ModelRejected { status: u16, detail: String },

    /// The service replied 2xx but the completion contained no text.
    #[error("Model returned an empty completion")]
    EmptyCompletion,

    /// The response text is not the expected JSON structure.
    #[error("Could not parse the model response as an audit report: {detail}\nResponse excerpt: {raw}")]
    MalformedReport { detail: String, raw: String },

    /// A rubric category is absent from the response.
    #[error("Model response is missing the '{category}' category.\nResponse excerpt: {raw}")]
    MissingCategory { category: String, raw: String },

    /// The response names a category the rubric does not define.
    #[error("Model response contains unrecognized category '{category}'.\nResponse excerpt: {raw}")]
    UnknownCategory { category: String, raw: String },

    /// A grade outside the A/B/C/D/F set. Never coerced.
    #[error("Invalid grade '{value}' for category '{category}' (expected one of A, B, C, D, F).\nResponse excerpt: {raw}")]
    InvalidGrade {
        category: String,
        value: String,
        raw: String,
    },

    /// A required field was empty (rationale or quick-win list).
    #[error("Category '{category}' has an empty {field}.\nResponse excerpt: {raw}")]
    EmptyField {
        category: String,
        field: &'static str,
        raw: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF.
    #[error("Failed to write report to '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF library rejected the document.
    #[error("Failed to build PDF document: {detail}")]
    PdfBuildFailed { detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_status_display() {
        let e = AuditError::FetchStatus {
            url: "https://example.com".into(),
            status: 503,
        };
        let msg = e.to_string();
        assert!(msg.contains("503"), "got: {msg}");
        assert!(msg.contains("example.com"));
    }

    #[test]
    fn missing_category_display_includes_excerpt() {
        let e = AuditError::MissingCategory {
            category: "Website".into(),
            raw: "{\"Brand\": {}}".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Website"));
        assert!(msg.contains("{\"Brand\""));
    }

    #[test]
    fn invalid_grade_display() {
        let e = AuditError::InvalidGrade {
            category: "Brand".into(),
            value: "A+".into(),
            raw: "...".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("A+"));
        assert!(msg.contains("A, B, C, D, F"));
    }

    #[test]
    fn model_rejected_display() {
        let e = AuditError::ModelRejected {
            status: 401,
            detail: "invalid api key".into(),
        };
        assert!(e.to_string().contains("401"));
        assert!(e.to_string().contains("invalid api key"));
    }
}
