//! # pdf2report
//!
//! Summarize PDF documents into structured JSON and Markdown reports using
//! an LLM chat-completion endpoint.
//!
//! ## Why this crate?
//!
//! Dumping a whole PDF into a prompt either blows the context window or
//! loses page structure. This crate extracts text page by page, packs whole
//! pages into token-budgeted chunks (pages are never split, order is never
//! reshuffled), and sends every chunk in one structured-output request. The
//! model's JSON reply — untrusted by definition — is normalized field by
//! field into a stable [`Report`] shape before anything is written to disk.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    resolve local file or download from URL
//!  ├─ 2. Extract  per-page plain text via lopdf (CPU-bound, spawn_blocking)
//!  ├─ 3. Chunk    greedy token-budget packing, whole pages only
//!  ├─ 4. LLM      one chat completion, response_format: json_object
//!  ├─ 5. Report   field-by-field coercion of the untrusted JSON
//!  └─ 6. Output   {stem}.json (canonical) + {stem}.md (optional)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2report::{summarize, ReportConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = ReportConfig::from_env()?; // OPENAI_API_KEY etc.
//!     config.system_prompt = std::fs::read_to_string("prompts/system.md")?;
//!     let (report, stats) = summarize("document.pdf", &config).await?;
//!     println!("{} ({} chunks)", report.doc_title, stats.chunk_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2report` binary (clap + anyhow + dotenvy + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only
//! deps:
//! ```toml
//! pdf2report = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ReportConfig, ReportConfigBuilder, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use error::ReportError;
pub use pipeline::chunk::{pack_pages, pack_pages_with, TokenCounter};
pub use report::{Citation, Report, Section};
pub use summarize::{summarize, summarize_sync, summarize_to_files, RunStats};
