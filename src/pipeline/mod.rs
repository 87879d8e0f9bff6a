//! Pipeline stages for PDF summarization.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap an
//! implementation (e.g. a different extraction backend) without touching the
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ chunk ──▶ llm ──▶ write
//! (URL/path)  (lopdf)   (pack)   (API)   (json/md)
//! ```
//!
//! 1. [`input`]   — canonicalise the user-supplied path or URL to a local file
//! 2. [`extract`] — per-page plain-text extraction; runs in `spawn_blocking`
//!    because lopdf parsing is CPU-bound
//! 3. [`chunk`]   — greedy token-budget packing of whole pages into chunks
//! 4. [`llm`]     — one structured-completion call covering every chunk; the
//!    only stage with network I/O
//! 5. [`write`]   — serialize the normalized report to JSON and Markdown

pub mod chunk;
pub mod extract;
pub mod input;
pub mod llm;
pub mod write;
