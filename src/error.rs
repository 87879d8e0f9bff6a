//! Error types for the pdf2report library.
//!
//! Every variant here is **fatal**: the run cannot produce a report and the
//! caller gets `Err(ReportError)` from the top-level `summarize*` functions.
//! Per-page extraction glitches are deliberately *not* errors — a page whose
//! text cannot be extracted degrades to an empty string so one bad page never
//! loses the document (see [`crate::pipeline::extract`]).
//!
//! Likewise, a model response whose *fields* have the wrong shape is not an
//! error: the normalization layer in [`crate::report`] coerces every field to
//! a documented default. Only a response body that is not JSON at all is
//! fatal.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2report library.
#[derive(Debug, Error)]
pub enum ReportError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// No API key in the environment. Raised before any network call.
    #[error("OPENAI_API_KEY is not set.\nExport it or add it to a .env file (see .env.example).")]
    MissingApiKey,

    /// The system-instruction file could not be read.
    #[error("System prompt file not found: '{path}'\nProvide one with --system-prompt <PATH>.")]
    SystemPromptMissing { path: PathBuf },

    /// Builder or environment validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The PDF could not be parsed at all.
    #[error("Failed to parse PDF '{path}': {detail}")]
    PdfParse { path: PathBuf, detail: String },

    // ── Remote-call errors ────────────────────────────────────────────────
    /// Transport-level failure talking to the completion endpoint.
    #[error("Completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The completion endpoint returned a non-success status.
    #[error("Completion API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response envelope was missing the expected message content.
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    /// The model's message content was not parseable JSON.
    #[error("Model did not return valid JSON: {0}")]
    InvalidReportJson(#[source] serde_json::Error),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let e = ReportError::Api {
            status: 429,
            message: "quota exceeded".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("429"), "got: {msg}");
        assert!(msg.contains("quota exceeded"));
    }

    #[test]
    fn not_a_pdf_display() {
        let e = ReportError::NotAPdf {
            path: PathBuf::from("/tmp/notes.txt"),
            magic: *b"Hell",
        };
        assert!(e.to_string().contains("notes.txt"));
    }

    #[test]
    fn download_timeout_display() {
        let e = ReportError::DownloadTimeout {
            url: "https://example.com/doc.pdf".into(),
            secs: 120,
        };
        assert!(e.to_string().contains("120s"));
        assert!(e.to_string().contains("example.com"));
    }

    #[test]
    fn missing_api_key_mentions_env_var() {
        assert!(ReportError::MissingApiKey
            .to_string()
            .contains("OPENAI_API_KEY"));
    }
}
