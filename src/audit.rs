//! Audit entry points: run the fetch → grade → render pipeline once.
//!
//! Each stage executes exactly once, sequentially. The first failure aborts
//! the run — there is no partial report and nothing to clean up, because the
//! PDF is only written after grading succeeds.
//!
//! Startup validation runs before any network activity: the bundled rubric
//! is checked and the API key resolved first, so a broken setup never costs
//! a fetch or an API call.

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::llm::LlmClient;
use crate::pipeline::{fetch, grade, render};
use crate::report::{AuditReport, AuditStats};
use crate::rubric;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Audit a website and return the structured report.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// * Config: missing API key, malformed rubric
/// * Fetch: unreachable URL, timeout, non-success status
/// * Grading: model unreachable, service error, or unparseable reply
pub async fn audit(url: &str, config: &AuditConfig) -> Result<AuditReport, AuditError> {
    let total_start = Instant::now();
    info!("Starting audit: {}", url);

    // ── Step 1: Validate startup state ───────────────────────────────────
    let rubric = rubric::load()?;
    let api_key = resolve_api_key(config)?;
    debug!(
        "rubric v{} loaded: {} categories",
        rubric.version,
        rubric.categories.len()
    );

    // ── Step 2: Fetch and extract page text ──────────────────────────────
    let fetch_start = Instant::now();
    let page_text = fetch::fetch_text(url, config).await?;
    let fetch_duration_ms = fetch_start.elapsed().as_millis() as u64;
    info!(
        "fetched {} chars in {}ms",
        page_text.chars().count(),
        fetch_duration_ms
    );

    // ── Step 3: Grade against the rubric ─────────────────────────────────
    let client = LlmClient::new(&config.api_base, api_key, config.api_timeout_secs)?;
    let llm_start = Instant::now();
    let graded = grade::grade(&client, &page_text, &rubric, config).await?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;
    info!(
        "graded {} categories in {}ms ({} tokens in / {} out)",
        graded.results.len(),
        llm_duration_ms,
        graded.prompt_tokens,
        graded.completion_tokens
    );

    Ok(AuditReport {
        url: url.to_string(),
        results: graded.results,
        stats: AuditStats {
            fetched_chars: page_text.chars().count(),
            prompt_tokens: graded.prompt_tokens,
            completion_tokens: graded.completion_tokens,
            fetch_duration_ms,
            llm_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        },
    })
}

/// Audit a website and write the PDF report to `out_path`.
///
/// The file is only created once grading has succeeded, and overwrites any
/// existing file at that path. Returns the report so callers can also show
/// the grades inline.
pub async fn audit_to_file(
    url: &str,
    out_path: impl AsRef<Path>,
    config: &AuditConfig,
) -> Result<AuditReport, AuditError> {
    let report = audit(url, config).await?;
    render::write_pdf(&report, config.logo.as_deref(), out_path.as_ref())?;
    Ok(report)
}

/// Synchronous wrapper around [`audit_to_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn audit_sync(
    url: &str,
    out_path: impl AsRef<Path>,
    config: &AuditConfig,
) -> Result<AuditReport, AuditError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| AuditError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(audit_to_file(url, out_path, config))
}

/// Resolve the API key: explicit config value first, then `OPENAI_API_KEY`.
/// An empty string counts as missing either way.
fn resolve_api_key(config: &AuditConfig) -> Result<String, AuditError> {
    if let Some(ref key) = config.api_key {
        if key.trim().is_empty() {
            return Err(AuditError::MissingApiKey);
        }
        return Ok(key.clone());
    }
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(AuditError::MissingApiKey),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_key_wins() {
        let config = AuditConfig::builder().api_key("sk-test").build().unwrap();
        assert_eq!(resolve_api_key(&config).unwrap(), "sk-test");
    }

    #[test]
    fn explicit_empty_key_is_missing() {
        let config = AuditConfig::builder().api_key("   ").build().unwrap();
        assert!(matches!(
            resolve_api_key(&config),
            Err(AuditError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_network_call() {
        // The URL is unroutable; if key resolution did not run first, this
        // would surface as a fetch error instead.
        let config = AuditConfig::builder().api_key("").build().unwrap();
        let err = audit("http://192.0.2.1/", &config).await.unwrap_err();
        assert!(matches!(err, AuditError::MissingApiKey));
    }
}
