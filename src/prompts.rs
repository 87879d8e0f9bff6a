//! Prompt assembly for the report completion call.
//!
//! Centralising the prompt text here serves two purposes:
//!
//! 1. **Single source of truth** — the JSON field contract in the user
//!    message must stay in lockstep with [`crate::report::Report`]; having
//!    one place to edit keeps them from drifting apart.
//!
//! 2. **Testability** — unit tests can inspect the assembled prompt without
//!    touching a live endpoint.
//!
//! The *system* message is not defined here: it is operator-owned text loaded
//! from an external file into [`crate::config::ReportConfig::system_prompt`].

/// Instruction prefix of the user message, naming the exact JSON shape the
/// model must return. `response_format: json_object` guarantees syntactic
/// JSON; this contract pins the field names.
pub const USER_INSTRUCTION: &str = "Summarize the following PDF chunks. Return ONLY valid JSON with fields: \
{doc_title, doc_meta, key_findings:{title,bullets[]}, methodology:{title,bullets[]}, \
limitations:{title,bullets[]}, important_quotes:[{page?, text}], \
entities[], topics[], pages_covered?}. \
Use nulls/empties when unknown.";

/// Assemble the user message: the field-contract instruction followed by
/// every chunk labeled `[Chunk i]` (1-based), blank-line separated.
///
/// All chunks go into one message — there is no map-reduce over chunks, so
/// total input size is bounded by the model's context window.
pub fn build_user_prompt(chunks: &[String]) -> String {
    let chunks_text = chunks
        .iter()
        .enumerate()
        .map(|(i, ch)| format!("[Chunk {}]\n{}", i + 1, ch))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{USER_INSTRUCTION}\n\n{chunks_text}")
}
