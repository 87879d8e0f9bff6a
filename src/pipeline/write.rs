//! Output writing: canonical JSON plus optional human-readable Markdown.
//!
//! The JSON file is the canonical serialization of the [`Report`] —
//! pretty-printed so diffs between runs stay readable. The Markdown file is
//! a fixed-layout rendering for humans: title, metadata bullets, the three
//! sections in a fixed order, then quotes, entities, topics, and page count.
//! Rendering is a pure function so the layout is testable without touching
//! the filesystem.

use crate::error::ReportError;
use crate::report::Report;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write `{base}.json` (always) and `{base}.md` (when `write_markdown`) into
/// `out_dir`, creating the directory and its parents as needed.
///
/// Returns the path of the JSON file.
pub async fn write_report(
    report: &Report,
    out_dir: &Path,
    base: &str,
    write_markdown: bool,
) -> Result<PathBuf, ReportError> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|e| ReportError::OutputWriteFailed {
            path: out_dir.to_path_buf(),
            source: e,
        })?;

    let json_path = out_dir.join(format!("{base}.json"));
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| ReportError::Internal(format!("report serialization failed: {}", e)))?;
    tokio::fs::write(&json_path, format!("{json}\n"))
        .await
        .map_err(|e| ReportError::OutputWriteFailed {
            path: json_path.clone(),
            source: e,
        })?;
    info!("Wrote {}", json_path.display());

    if write_markdown {
        let md_path = out_dir.join(format!("{base}.md"));
        tokio::fs::write(&md_path, render_markdown(report))
            .await
            .map_err(|e| ReportError::OutputWriteFailed {
                path: md_path.clone(),
                source: e,
            })?;
        info!("Wrote {}", md_path.display());
    }

    Ok(json_path)
}

/// Render a report as a Markdown document.
///
/// Layout (in order): H1 title; metadata bullets when present; the three
/// sections as H2 headings with their bullets (a heading is emitted even
/// when its bullet list is empty); quotes as block-quote lines with a
/// `(p. N)` prefix when the page is known; then entity, topic, and
/// pages-covered trailer lines, each only when populated.
pub fn render_markdown(report: &Report) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {}", report.doc_title));
    lines.push(String::new());

    if !report.doc_meta.is_empty() {
        lines.push("**Metadata**".to_string());
        for (key, value) in &report.doc_meta {
            lines.push(format!("- **{}**: {}", key, meta_value(value)));
        }
        lines.push(String::new());
    }

    for section in [
        &report.key_findings,
        &report.methodology,
        &report.limitations,
    ] {
        lines.push(format!("## {}", section.title));
        for bullet in &section.bullets {
            lines.push(format!("- {}", bullet));
        }
        lines.push(String::new());
    }

    if !report.important_quotes.is_empty() {
        lines.push("## Important quotes".to_string());
        for quote in &report.important_quotes {
            let prefix = match quote.page {
                Some(page) => format!("(p. {}) ", page),
                None => String::new(),
            };
            lines.push(format!("> {}{}", prefix, quote.text));
        }
        lines.push(String::new());
    }

    if !report.entities.is_empty() {
        lines.push(format!("**Entities:** {}", report.entities.join(", ")));
    }
    if !report.topics.is_empty() {
        lines.push(String::new());
        lines.push(format!("**Topics:** {}", report.topics.join(", ")));
    }
    if let Some(pages) = report.pages_covered {
        lines.push(String::new());
        lines.push(format!("**Pages covered:** {}", pages));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render a metadata value without JSON string quoting.
fn meta_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use serde_json::json;

    fn sample_report() -> Report {
        Report::from_value(&json!({
            "doc_title": "Sample",
            "doc_meta": {"author": "Unknown"},
            "key_findings": {"title": "Key findings", "bullets": ["A", "B"]},
            "methodology": {"title": "Method", "bullets": ["M1"]},
            "limitations": {"title": "Limitations", "bullets": []},
        }))
    }

    #[test]
    fn markdown_layout_matches_contract() {
        let md = render_markdown(&sample_report());

        assert!(md.contains("# Sample\n"));
        assert!(md.contains("- **author**: Unknown"));
        assert!(md.contains("## Key findings\n- A\n- B\n"));
        assert!(md.contains("## Method\n- M1\n"));
        // Empty section still gets its heading, with no bullets under it.
        assert!(md.contains("## Limitations\n\n"));
        assert!(md.ends_with('\n'));
    }

    #[test]
    fn quotes_render_with_page_prefix_only_when_known() {
        let report = Report::from_value(&json!({
            "doc_title": "T",
            "important_quotes": [
                {"page": 4, "text": "numbered"},
                {"text": "unnumbered"},
            ],
        }));
        let md = render_markdown(&report);
        assert!(md.contains("## Important quotes"));
        assert!(md.contains("> (p. 4) numbered"));
        assert!(md.contains("> unnumbered"));
    }

    #[test]
    fn trailer_lines_only_when_populated() {
        let bare = render_markdown(&Report::from_value(&json!({"doc_title": "T"})));
        assert!(!bare.contains("**Entities:**"));
        assert!(!bare.contains("**Topics:**"));
        assert!(!bare.contains("**Pages covered:**"));

        let full = render_markdown(&Report::from_value(&json!({
            "doc_title": "T",
            "entities": ["ACME", "Globex"],
            "topics": ["mergers"],
            "pages_covered": 9,
        })));
        assert!(full.contains("**Entities:** ACME, Globex"));
        assert!(full.contains("\n**Topics:** mergers"));
        assert!(full.contains("\n**Pages covered:** 9"));
    }

    #[tokio::test]
    async fn writes_json_and_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("reports");

        let json_path = write_report(&sample_report(), &out, "sample", true)
            .await
            .unwrap();

        assert_eq!(json_path, out.join("sample.json"));
        assert!(out.join("sample.md").exists());

        let raw = tokio::fs::read_to_string(&json_path).await.unwrap();
        let back: Report = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, sample_report());
    }

    #[tokio::test]
    async fn markdown_can_be_suppressed() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_path_buf();

        write_report(&sample_report(), &out, "sample", false)
            .await
            .unwrap();

        assert!(out.join("sample.json").exists());
        assert!(!out.join("sample.md").exists());
    }
}
