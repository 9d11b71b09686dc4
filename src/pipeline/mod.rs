//! Pipeline stages for a website audit.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap an
//! implementation (e.g. a different extraction strategy) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ grade ──▶ render
//! (HTML→text) (LLM+parse) (PDF)
//! ```
//!
//! 1. [`fetch`]  — GET the target URL and extract visible text, truncated to
//!    the configured character budget
//! 2. [`grade`]  — one model call, then strict parsing of the JSON reply into
//!    rubric-ordered grade results; the only stage with model I/O
//! 3. [`render`] — deterministic PDF layout of the assembled report

pub mod fetch;
pub mod grade;
pub mod render;
