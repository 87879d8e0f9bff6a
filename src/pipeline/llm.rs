//! The completion call: one request, one structured report.
//!
//! This module is intentionally thin — prompt assembly lives in
//! [`crate::prompts`] and response normalization in [`crate::report`], so the
//! wire concerns here (request body, auth, status handling) can change
//! without touching either.
//!
//! There is exactly one synchronous-in-spirit call per run: every chunk goes
//! into a single user message, no map-reduce across chunks and no retries. A
//! failed call is fatal and carries the service's own message. The request
//! asks for `response_format: json_object`, so the body's *message content*
//! is expected to be JSON; content that still fails to parse is the one hard
//! response-shape failure.

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::prompts::build_user_prompt;
use crate::report::Report;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat<'a>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

/// Request a structured report covering every chunk.
///
/// Builds the system + user messages, issues one chat-completions call, and
/// normalizes the JSON content into a [`Report`]. The system prompt must
/// already be loaded into the config; an empty one is a configuration error
/// caught here, before the network is touched.
pub async fn request_report(
    chunks: &[String],
    config: &ReportConfig,
) -> Result<Report, ReportError> {
    if config.api_key.is_empty() {
        return Err(ReportError::MissingApiKey);
    }
    if config.system_prompt.is_empty() {
        return Err(ReportError::InvalidConfig(
            "system prompt is empty; load it before requesting a report".into(),
        ));
    }

    let user = build_user_prompt(chunks);
    debug!(
        "Requesting report: {} chunks, {} prompt chars, model {}",
        chunks.len(),
        user.len(),
        config.model
    );

    let request = ChatRequest {
        model: &config.model,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        messages: vec![
            ChatMessage {
                role: "system",
                content: &config.system_prompt,
            },
            ChatMessage {
                role: "user",
                content: &user,
            },
        ],
        response_format: ResponseFormat { kind: "json_object" },
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.api_timeout_secs))
        .build()?;

    let start = Instant::now();
    let response = client
        .post(format!("{}/chat/completions", config.api_base))
        .bearer_auth(&config.api_key)
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ReportError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body: ChatResponse = response
        .json()
        .await
        .map_err(|e| ReportError::MalformedResponse(e.to_string()))?;

    if let Some(usage) = &body.usage {
        debug!(
            "Completion usage: {} prompt tokens, {} completion tokens",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    let content = body
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| {
            ReportError::MalformedResponse("response contained no message content".into())
        })?;

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(ReportError::InvalidReportJson)?;

    info!("Report received in {:?}", start.elapsed());
    Ok(Report::from_value(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ReportConfig {
        ReportConfig::builder()
            .api_key("sk-test")
            .system_prompt("You are a summarizer.")
            .build()
            .unwrap()
    }

    #[test]
    fn request_body_shape() {
        let cfg = config();
        let user = build_user_prompt(&["chunk text".into()]);
        let request = ChatRequest {
            model: &cfg.model,
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &cfg.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            response_format: ResponseFormat { kind: "json_object" },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 3000);
    }

    #[test]
    fn response_content_deserializes() {
        let raw = r#"{
            "choices": [{"message": {"content": "{\"doc_title\": \"T\"}"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5}
        }"#;
        let body: ChatResponse = serde_json::from_str(raw).unwrap();
        let content = body.choices[0].message.content.as_deref().unwrap();
        assert!(content.contains("doc_title"));
        assert_eq!(body.usage.unwrap().prompt_tokens, 10);
    }

    #[tokio::test]
    async fn empty_system_prompt_fails_before_network() {
        let cfg = ReportConfig::builder().api_key("sk-test").build().unwrap();
        let err = request_report(&["x".into()], &cfg).await.unwrap_err();
        assert!(matches!(err, ReportError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_network() {
        let cfg = ReportConfig {
            api_key: String::new(),
            ..config()
        };
        let err = request_report(&["x".into()], &cfg).await.unwrap_err();
        assert!(matches!(err, ReportError::MissingApiKey));
    }
}
