//! End-to-end summarization entry points.
//!
//! One run processes one document: resolve the input, extract pages, pack
//! chunks, make the single completion call, and (optionally) write outputs.
//! The run is fully sequential — the only suspension point is the remote
//! call — and holds no state beyond its own locals, so nothing persists
//! between runs.
//!
//! No partial output: files are written only after the remote call has
//! succeeded and its response parsed.

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::pipeline::input::ResolvedInput;
use crate::pipeline::{chunk, extract, input, llm, write};
use crate::report::Report;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Summary counts from a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Pages extracted from the document (including empty ones).
    pub page_count: usize,
    /// Chunks sent to the model.
    pub chunk_count: usize,
}

/// Summarize a PDF (local path or HTTP/HTTPS URL) into a [`Report`].
///
/// This is the primary library entry point. It performs no file output;
/// use [`summarize_to_files`] for the full CLI behaviour.
///
/// # Errors
/// Any [`ReportError`]: unreadable input, unparsable PDF, missing
/// credential/system prompt, a failed remote call, or a non-JSON response
/// body. Field-shape anomalies in the response are not errors.
pub async fn summarize(
    input_str: impl AsRef<str>,
    config: &ReportConfig,
) -> Result<(Report, RunStats), ReportError> {
    let resolved = resolve_checked(input_str.as_ref(), config).await?;
    run(&resolved, config).await
}

/// Summarize a PDF and write `{stem}.json` / `{stem}.md` into `out_dir`.
///
/// The base name is the input's file stem (`report` for stemless URLs).
/// Returns the path of the JSON file plus the run counts. Nothing is
/// written if summarization fails.
pub async fn summarize_to_files(
    input_str: impl AsRef<str>,
    out_dir: impl AsRef<Path>,
    write_markdown: bool,
    config: &ReportConfig,
) -> Result<(PathBuf, RunStats), ReportError> {
    let resolved = resolve_checked(input_str.as_ref(), config).await?;
    let base = resolved.stem();

    let (report, stats) = run(&resolved, config).await?;
    let json_path = write::write_report(&report, out_dir.as_ref(), &base, write_markdown).await?;
    Ok((json_path, stats))
}

/// Synchronous wrapper around [`summarize`].
///
/// Creates a temporary tokio runtime internally; for callers that are not
/// already async.
pub fn summarize_sync(
    input_str: impl AsRef<str>,
    config: &ReportConfig,
) -> Result<(Report, RunStats), ReportError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ReportError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(summarize(input_str, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Fail fast on configuration, then resolve the input.
///
/// The credential check runs before any I/O so a missing key is reported
/// immediately, never after a download or extraction has already happened.
async fn resolve_checked(
    input_str: &str,
    config: &ReportConfig,
) -> Result<ResolvedInput, ReportError> {
    if config.api_key.is_empty() {
        return Err(ReportError::MissingApiKey);
    }
    info!("Starting summarization: {}", input_str);
    input::resolve_input(input_str, config.download_timeout_secs).await
}

/// Extract, pack, and request: the shared pipeline body.
async fn run(
    resolved: &ResolvedInput,
    config: &ReportConfig,
) -> Result<(Report, RunStats), ReportError> {
    let pages = extract::extract_pages(resolved.path()).await?;
    debug!("Extracted {} pages", pages.len());

    let counter = chunk::TokenCounter::new()?;
    let chunks = chunk::pack_pages(&pages, config.target_tokens, &counter);
    info!(
        "Packed {} pages into {} chunks (target {} tokens)",
        pages.len(),
        chunks.len(),
        config.target_tokens
    );

    let report = llm::request_report(&chunks, config).await?;

    Ok((
        report,
        RunStats {
            page_count: pages.len(),
            chunk_count: chunks.len(),
        },
    ))
}
