// ABOUTME: HTTP client for structured generation calls to Anthropic Claude
// ABOUTME: Handles request construction, response parsing, and timeout mapping

use std::env;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{AgentError, AgentResult};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TEMPERATURE: f32 = 0.7;

// Collaborator latency is bounded so a hung call resolves into the
// engine's soft-failure path instead of stalling the turn.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

/// Client for structured JSON generation against the Anthropic messages API.
pub struct AgentService {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl AgentService {
    fn create_client() -> Client {
        Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default()
    }

    /// Creates a new service instance.
    /// API key is fetched from ANTHROPIC_API_KEY, model from ANTHROPIC_MODEL.
    pub fn new() -> Self {
        let api_key = env::var("ANTHROPIC_API_KEY").ok();
        if api_key.is_none() {
            info!("ANTHROPIC_API_KEY not set - agent calls will fail until a key is provided");
        }

        let model = env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        if model != DEFAULT_MODEL {
            info!("Using custom Anthropic model: {}", model);
        }

        Self {
            client: Self::create_client(),
            api_key,
            model,
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Creates a new service instance with a specific API key.
    pub fn with_api_key(api_key: String) -> Self {
        let model = env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self {
            client: Self::create_client(),
            api_key: Some(api_key),
            model,
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Override the endpoint URL. Intended for tests against a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a structured generation call. The prompt must request JSON
    /// output; the reply text is parsed into `T` after stripping any
    /// markdown code fences the model wrapped it in.
    pub async fn generate_structured<T: for<'de> Deserialize<'de>>(
        &self,
        prompt: String,
        system_prompt: Option<String>,
    ) -> AgentResult<T> {
        let api_key = self.api_key.as_ref().ok_or(AgentError::NoApiKey)?;

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt,
            }],
            system: system_prompt,
        };

        info!(model = %request.model, "Making Anthropic API request");

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Anthropic API request timed out");
                    AgentError::Api("Request timed out".to_string())
                } else {
                    error!("Anthropic API request failed: {}", e);
                    AgentError::RequestFailed(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Anthropic API error: {} - {}", status, error_text);
            return Err(AgentError::Api(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Parse(e.to_string()))?;

        let text = reply
            .content
            .first()
            .ok_or(AgentError::InvalidResponse)?
            .text
            .clone();

        let json_text = strip_code_fences(&text);

        serde_json::from_str(json_text).map_err(|e| {
            // Char-based truncation: byte slicing could split a multi-byte
            // character in an Arabic reply.
            let snippet: String = json_text.chars().take(500).collect();
            error!("JSON parsing failed: {}. Snippet: {}", e, snippet);
            AgentError::Parse(format!("Failed to parse JSON: {}", e))
        })
    }
}

impl Default for AgentService {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a surrounding ```json ... ``` fence if the model added one.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let start = trimmed.find('\n').map(|i| i + 1).unwrap_or(0);
    let end = trimmed[start..]
        .rfind("```")
        .map(|i| i + start)
        .unwrap_or(trimmed.len());
    trimmed[start..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Probe {
        value: i32,
    }

    #[test]
    fn strips_code_fences() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[tokio::test]
    async fn missing_api_key_is_rejected_before_any_request() {
        let service = AgentService {
            client: AgentService::create_client(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
        };

        let result = service
            .generate_structured::<Probe>("{}".to_string(), None)
            .await;
        assert!(matches!(result, Err(AgentError::NoApiKey)));
    }

    #[tokio::test]
    async fn parses_structured_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "```json\n{\"value\": 7}\n```"}]
            })))
            .mount(&server)
            .await;

        let service =
            AgentService::with_api_key("test-key".to_string()).with_base_url(server.uri());
        let probe: Probe = service
            .generate_structured("respond with json".to_string(), None)
            .await
            .unwrap();
        assert_eq!(probe.value, 7);
    }

    #[tokio::test]
    async fn long_non_json_reply_degrades_to_parse_error() {
        let server = MockServer::start().await;
        let refusal = "عذراً، لا أستطيع توليد استجابة منظمة الآن. ".repeat(30);
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": refusal}]
            })))
            .mount(&server)
            .await;

        let service =
            AgentService::with_api_key("test-key".to_string()).with_base_url(server.uri());
        let result = service
            .generate_structured::<Probe>("respond with json".to_string(), None)
            .await;
        assert!(matches!(result, Err(AgentError::Parse(_))));
    }

    #[tokio::test]
    async fn api_errors_are_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let service =
            AgentService::with_api_key("test-key".to_string()).with_base_url(server.uri());
        let result = service
            .generate_structured::<Probe>("respond with json".to_string(), None)
            .await;
        assert!(matches!(result, Err(AgentError::Api(_))));
    }
}
