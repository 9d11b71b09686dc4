//! Fetching: retrieve the target page and extract its visible text.
//!
//! One GET, no retries — a site that cannot serve its own homepage within
//! the timeout fails the audit with a clear message. Extraction walks the
//! parsed `<body>` and keeps only text a visitor would read: `script`,
//! `style`, `noscript`, and `template` subtrees are skipped, whitespace is
//! collapsed, and the result is truncated to the configured character budget
//! on a word boundary.

use crate::config::AuditConfig;
use crate::error::AuditError;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("sitegrade/", env!("CARGO_PKG_VERSION"));

/// Elements whose text content is never visible to a visitor.
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Check if the input string looks like a URL we can fetch.
pub fn is_http_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Fetch `url` and return its visible text, at most `config.max_chars` chars.
pub async fn fetch_text(url: &str, config: &AuditConfig) -> Result<String, AuditError> {
    if !is_http_url(url) {
        return Err(AuditError::InvalidUrl {
            input: url.to_string(),
        });
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AuditError::Internal(format!("failed to build HTTP client: {e}")))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            AuditError::FetchTimeout {
                url: url.to_string(),
                secs: config.fetch_timeout_secs,
            }
        } else {
            AuditError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AuditError::FetchStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let html = response.text().await.map_err(|e| AuditError::FetchFailed {
        url: url.to_string(),
        reason: format!("failed to read body: {e}"),
    })?;

    let text = extract_visible_text(&html, config.max_chars);
    if text.is_empty() {
        warn!("'{}' yielded no visible text; the report will be thin", url);
    }
    debug!("extracted {} chars from {}", text.chars().count(), url);
    Ok(text)
}

/// Extract human-readable text from an HTML document, collapse whitespace,
/// and truncate to at most `max_chars` characters.
pub fn extract_visible_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);

    // Selector::parse("body") only fails on an invalid selector literal.
    let body_selector = match Selector::parse("body") {
        Ok(s) => s,
        Err(_) => return String::new(),
    };

    let mut raw = String::new();
    if let Some(body) = document.select(&body_selector).next() {
        collect_visible(body, &mut raw);
    }

    truncate_chars(&clean_text(&raw), max_chars)
}

/// Depth-first walk of an element's children, gathering text nodes and
/// skipping non-visible subtrees.
fn collect_visible(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if SKIPPED_ELEMENTS.contains(&child_el.value().name()) {
                continue;
            }
            collect_visible(child_el, out);
        }
    }
}

/// Collapse all runs of whitespace into single spaces.
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters, preferring a word boundary.
/// Char-based, so multi-byte text never splits a code point.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(last_space) if last_space > 0 => cut[..last_space].to_string(),
        _ => cut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Acme Anvils</title>
            <style>body { color: red; }</style>
        </head>
        <body>
            <script>console.log("tracking pixel");</script>
            <nav>Home   Products   About</nav>
            <main>
                <h1>Acme Anvils</h1>
                <p>The   heaviest anvils
                   on the market.</p>
            </main>
            <noscript>Please enable JavaScript</noscript>
            <footer>© Acme Corp</footer>
        </body>
        </html>
    "#;

    #[test]
    fn strips_scripts_styles_and_noscript() {
        let text = extract_visible_text(SAMPLE_HTML, 10_000);
        assert!(text.contains("Acme Anvils"));
        assert!(text.contains("heaviest anvils"));
        assert!(!text.contains("tracking pixel"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("enable JavaScript"));
    }

    #[test]
    fn collapses_whitespace() {
        let text = extract_visible_text(SAMPLE_HTML, 10_000);
        assert!(!text.contains("  "), "no double spaces in: {text}");
        assert!(!text.contains('\n'));
    }

    #[test]
    fn respects_max_chars() {
        let text = extract_visible_text(SAMPLE_HTML, 20);
        assert!(text.chars().count() <= 20, "got {} chars", text.chars().count());
    }

    #[test]
    fn truncation_is_char_safe() {
        // Multi-byte content must not panic or split a code point.
        let html = format!("<html><body><p>{}</p></body></html>", "é".repeat(50));
        let text = extract_visible_text(&html, 10);
        assert_eq!(text.chars().count(), 10);
        assert!(text.chars().all(|c| c == 'é'));
    }

    #[test]
    fn truncates_on_word_boundary() {
        let out = truncate_chars("alpha beta gamma delta", 12);
        assert_eq!(out, "alpha beta");
    }

    #[test]
    fn short_text_untouched() {
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn url_scheme_check() {
        assert!(is_http_url("https://example.com"));
        assert!(is_http_url("http://example.com"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("example.com"));
        assert!(!is_http_url(""));
    }
}
