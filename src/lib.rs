//! # sitegrade
//!
//! Grade a company's public website against a fixed marketing rubric using a
//! language model, and render the grades into a PDF report.
//!
//! ## What it does
//!
//! A growth-marketing audit by hand means reading a site, judging brand,
//! content, UX, and channel strategy, and writing it up. This crate automates
//! the mechanical part: it extracts the visible text of one page, asks a
//! model to grade it against a fixed four-category rubric, validates the
//! reply against a strict schema, and lays the result out as a shareable PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! URL
//!  │
//!  ├─ 1. Fetch   GET the page, extract visible text, truncate to a budget
//!  ├─ 2. Rubric  load + validate the bundled category definitions
//!  ├─ 3. Grade   one chat-completions call, strict JSON parsing (A–F)
//!  └─ 4. Render  deterministic A4 PDF with one section per category
//! ```
//!
//! Strictly sequential, one pass, no retries: a failed stage aborts the run
//! with an error naming the stage and the underlying cause.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sitegrade::{audit_to_file, AuditConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads OPENAI_API_KEY from the environment.
//!     let config = AuditConfig::default();
//!     let report = audit_to_file("https://example.com", "audit.pdf", &config).await?;
//!     for result in &report.results {
//!         println!("{}: {}", result.category, result.grade);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `sitegrade` binary (clap + anyhow + tracing-subscriber + dotenvy) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! sitegrade = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod audit;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod rubric;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use audit::{audit, audit_sync, audit_to_file};
pub use config::{AuditConfig, AuditConfigBuilder, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use error::AuditError;
pub use report::{AuditReport, AuditStats, Grade, GradeResult};
pub use rubric::{Rubric, RubricCategory};
