//! Gemini-backed oracles.
//!
//! Both oracles call the Gemini REST API directly. The model oracle sends
//! the conversation as-is; the naming oracle wraps a transcript in a naming
//! prompt and returns the trimmed reply.

use async_trait::async_trait;
use parley_core::session::{Message, ModelOracle, NamingOracle, OracleError, Role};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const NAMING_PROMPT: &str = "\
Read the conversation below and decide whether it has a clear topic.
If it does, reply with a short, simple name for it: two to five words, no punctuation, no quotes, nothing else.
If it does not, reply with nothing at all.";

/// Thin HTTP client for the `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Reads the API key from the environment variable `key_env`.
    pub fn from_env(key_env: &str, model: impl Into<String>) -> Result<Self, OracleError> {
        let api_key = std::env::var(key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| OracleError::Config(format!("{key_env} is not set")))?;
        Ok(Self::new(api_key, model))
    }

    /// Applies a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, OracleError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    /// Points the client at a different endpoint root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, OracleError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| OracleError::Request {
                status: None,
                // without_url keeps the API key out of the message
                message: format!("Gemini API request failed: {}", err.without_url()),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| OracleError::Other(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

/// Produces assistant replies with Gemini.
pub struct GeminiModelOracle {
    client: GeminiClient,
}

impl GeminiModelOracle {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelOracle for GeminiModelOracle {
    async fn generate(&self, history: &[Message]) -> Result<Message, OracleError> {
        let request = build_request(history);
        tracing::debug!(
            model = %self.client.model(),
            contents = request.contents.len(),
            "Sending generateContent request"
        );
        let text = self.client.send_request(&request).await?;
        Ok(Message::assistant(text))
    }
}

/// Suggests conversation names with Gemini.
pub struct GeminiNamingOracle {
    client: GeminiClient,
}

impl GeminiNamingOracle {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NamingOracle for GeminiNamingOracle {
    async fn suggest_name(&self, history: &[Message]) -> Result<String, OracleError> {
        let prompt = format!("{NAMING_PROMPT}\n\n{}", transcript(history));
        let request = GenerateContentRequest {
            contents: vec![Content::text("user", prompt)],
            system_instruction: None,
        };

        match self.client.send_request(&request).await {
            Ok(text) => Ok(text.trim().to_string()),
            // An answer without text means "no name yet"
            Err(OracleError::EmptyResponse) => Ok(String::new()),
            Err(e) => Err(e),
        }
    }
}

/// Maps a history onto Gemini's request shape.
///
/// System messages become the `system_instruction`; human and assistant
/// messages become `user` and `model` contents in order.
fn build_request(history: &[Message]) -> GenerateContentRequest {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();

    for message in history {
        match message.role {
            Role::System => system_parts.push(Part {
                text: message.content.clone(),
            }),
            Role::Human => contents.push(Content::text("user", message.content.clone())),
            Role::Assistant => contents.push(Content::text("model", message.content.clone())),
        }
    }

    let system_instruction = (!system_parts.is_empty()).then(|| Content {
        role: "system".to_string(),
        parts: system_parts,
    });

    GenerateContentRequest {
        contents,
        system_instruction,
    }
}

fn transcript(history: &[Message]) -> String {
    history
        .iter()
        .filter_map(|message| match message.role {
            Role::System => None,
            Role::Human => Some(format!("User: {}", message.content)),
            Role::Assistant => Some(format!("Assistant: {}", message.content)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: &str, text: String) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text }],
        }
    }
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, OracleError> {
    let text: String = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(OracleError::EmptyResponse);
    }
    Ok(text)
}

fn map_http_error(status: StatusCode, body: String) -> OracleError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    OracleError::Request {
        status: Some(status.as_u16()),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_maps_roles() {
        let history = vec![
            Message::system("be brief"),
            Message::human("hi"),
            Message::assistant("hello"),
            Message::human("water?"),
        ];

        let request = serde_json::to_value(build_request(&history)).unwrap();

        assert_eq!(
            request,
            serde_json::json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "hi"}]},
                    {"role": "model", "parts": [{"text": "hello"}]},
                    {"role": "user", "parts": [{"text": "water?"}]}
                ],
                "system_instruction": {"role": "system", "parts": [{"text": "be brief"}]}
            })
        );
    }

    #[test]
    fn test_transcript_skips_system() {
        let history = vec![
            Message::system("secret persona"),
            Message::human("hi"),
            Message::assistant("hello"),
        ];
        assert_eq!(transcript(&history), "User: hi\nAssistant: hello");
    }

    #[test]
    fn test_extract_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Water "},{"text":"Facts"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), "Water Facts");
    }

    #[test]
    fn test_extract_without_text_is_empty_response() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        assert_eq!(
            extract_text_response(response).unwrap_err(),
            OracleError::EmptyResponse
        );

        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_text_response(response).is_err());
    }

    #[test]
    fn test_map_http_error_uses_api_message() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string());
        assert_eq!(
            err,
            OracleError::Request {
                status: Some(429),
                message: "RESOURCE_EXHAUSTED: Quota exceeded".to_string(),
            }
        );
    }

    #[test]
    fn test_map_http_error_falls_back_to_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert_eq!(err.to_string(), "request failed (502): upstream down");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_error() {
        let client = GeminiClient::new("test-key", "gemini-2.0-flash")
            .with_base_url("http://127.0.0.1:9/v1beta/models");
        let oracle = GeminiModelOracle::new(client);

        let err = oracle
            .generate(&[Message::system("s"), Message::human("hi")])
            .await
            .unwrap_err();

        match err {
            OracleError::Request { status, message } => {
                assert_eq!(status, None);
                assert!(!message.contains("test-key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
