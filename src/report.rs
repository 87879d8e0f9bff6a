//! The structured report entity and its normalization boundary.
//!
//! The model's JSON output is untrusted: fields go missing, strings arrive
//! where objects were asked for, lists come back as scalars. Instead of
//! validating and rejecting, [`Report::from_value`] runs every field through
//! a small total coercion function — wrong shapes silently become the
//! documented default for that field. The one hard failure lives upstream:
//! a response body that is not JSON at all (see [`crate::pipeline::llm`]).
//!
//! Construction therefore never fails. Once built, a `Report` is handed
//! immutably to the output writer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder title used when the model omits or blanks `doc_title`.
pub const UNTITLED: &str = "Untitled";

/// A quoted or paraphrased snippet with an optional source page number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// 1-based page number, if the model knew it.
    #[serde(default)]
    pub page: Option<i64>,
    pub text: String,
}

/// A titled list of bullet points within a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// The normalized summary produced from the model's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub doc_title: String,
    #[serde(default)]
    pub doc_meta: Map<String, Value>,
    pub key_findings: Section,
    pub methodology: Section,
    pub limitations: Section,
    #[serde(default)]
    pub important_quotes: Vec<Citation>,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub pages_covered: Option<i64>,
}

impl Report {
    /// Build a report from an arbitrary JSON value, coercing every field.
    ///
    /// Total: any input produces a report. The per-field rules are
    ///
    /// | field            | wrong shape becomes            |
    /// |------------------|--------------------------------|
    /// | `doc_title`      | `"Untitled"`                   |
    /// | `doc_meta`       | `{}`                           |
    /// | the sections     | fallback title, empty bullets  |
    /// | `important_quotes` | `[]` (non-object items skipped) |
    /// | `entities`, `topics` | `[]` (non-string items skipped) |
    /// | `pages_covered`  | `None`                         |
    pub fn from_value(value: &Value) -> Self {
        Self {
            doc_title: nonempty_string(value.get("doc_title"))
                .unwrap_or_else(|| UNTITLED.to_string()),
            doc_meta: as_object(value.get("doc_meta")),
            key_findings: section(value.get("key_findings"), "Key Findings"),
            methodology: section(value.get("methodology"), "Methodology"),
            limitations: section(value.get("limitations"), "Limitations"),
            important_quotes: citations(value.get("important_quotes")),
            entities: string_list(value.get("entities")),
            topics: string_list(value.get("topics")),
            pages_covered: value.get("pages_covered").and_then(Value::as_i64),
        }
    }
}

// ── Coercion helpers ─────────────────────────────────────────────────────
// Each is total: no input raises, every wrong shape maps to the empty
// default for its target.

fn nonempty_string(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn as_object(v: Option<&Value>) -> Map<String, Value> {
    match v {
        Some(Value::Object(m)) => m.clone(),
        _ => Map::new(),
    }
}

fn string_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn section(v: Option<&Value>, fallback_title: &str) -> Section {
    let title = v
        .and_then(|s| nonempty_string(s.get("title")))
        .unwrap_or_else(|| fallback_title.to_string());
    let bullets = v.map(|s| string_list(s.get("bullets"))).unwrap_or_default();
    Section { title, bullets }
}

fn citations(v: Option<&Value>) -> Vec<Citation> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                item.as_object().map(|q| Citation {
                    page: q.get("page").and_then(Value::as_i64),
                    text: q
                        .get("text")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}
