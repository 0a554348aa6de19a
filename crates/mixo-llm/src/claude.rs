use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::http::default_client;
use crate::provider::{LlmProvider, Message, Role};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Paid provider. Domain knowledge travels in the system channel and the model is
/// asked to retrieve the recipe URL on its own.
pub struct ClaudeProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl fmt::Debug for ClaudeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaudeProvider")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Clone for ClaudeProvider {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            base_url: self.base_url.clone(),
        }
    }
}

impl ClaudeProvider {
    #[must_use]
    pub fn new(api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            client: default_client(Duration::from_secs(120)),
            api_key,
            model,
            max_tokens,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Override the API base URL, e.g. to point at a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = default_client(timeout);
        self
    }

    fn build_request(&self, messages: &[Message]) -> reqwest::RequestBuilder {
        let (system, chat_messages) = split_messages(messages);

        let body = RequestBody {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: &chat_messages,
        };

        self.client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
    }

    async fn send_request(&self, messages: &[Message]) -> Result<String, LlmError> {
        let response = self.build_request(messages).send().await?;

        let status = response.status();
        let text = response.text().await.map_err(LlmError::Http)?;

        if !status.is_success() {
            tracing::error!("Claude API error {status}: {text}");
            return Err(LlmError::Api {
                provider: "claude",
                status: status.as_u16(),
                message: text,
            });
        }

        let resp: ApiResponse = serde_json::from_str(&text)?;

        if let Some(ref usage) = resp.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Claude API usage"
            );
        }

        resp.content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or(LlmError::EmptyResponse { provider: "claude" })
    }
}

impl LlmProvider for ClaudeProvider {
    async fn generate(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.send_request(messages).await
    }

    fn name(&self) -> &'static str {
        "claude"
    }

    fn fetches_urls(&self) -> bool {
        true
    }
}

fn split_messages(messages: &[Message]) -> (Option<String>, Vec<ApiMessage<'_>>) {
    let mut system_parts = Vec::new();
    let mut chat = Vec::new();

    for msg in messages {
        match msg.role {
            Role::System => system_parts.push(msg.content.as_str()),
            Role::User => chat.push(ApiMessage {
                role: "user",
                content: &msg.content,
            }),
            Role::Assistant => chat.push(ApiMessage {
                role: "assistant",
                content: &msg.content,
            }),
        }
    }

    let system = if system_parts.is_empty() {
        None
    } else {
        Some(system_parts.join("\n\n"))
    };

    (system, chat)
}

#[derive(Serialize)]
struct RequestBody<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: &'a [ApiMessage<'a>],
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn provider(server: &MockServer) -> ClaudeProvider {
        ClaudeProvider::new("sk-test".into(), DEFAULT_MODEL.into(), DEFAULT_MAX_TOKENS)
            .with_base_url(server.uri())
    }

    #[test]
    fn split_messages_separates_system() {
        let messages = vec![
            Message::system("speed table"),
            Message::system("rules"),
            Message::user("fetch https://example.com/r"),
        ];
        let (system, chat) = split_messages(&messages);
        assert_eq!(system.as_deref(), Some("speed table\n\nrules"));
        assert_eq!(chat.len(), 1);
        assert_eq!(chat[0].role, "user");
        assert_eq!(chat[0].content, "fetch https://example.com/r");
    }

    #[test]
    fn split_messages_without_system() {
        let messages = vec![Message::user("hi")];
        let (system, chat) = split_messages(&messages);
        assert!(system.is_none());
        assert_eq!(chat.len(), 1);
    }

    #[test]
    fn request_body_skips_missing_system() {
        let chat = [ApiMessage {
            role: "user",
            content: "hi",
        }];
        let body = RequestBody {
            model: "m",
            max_tokens: 10,
            system: None,
            messages: &chat,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("system").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn debug_redacts_api_key() {
        let p = ClaudeProvider::new("sk-secret".into(), DEFAULT_MODEL.into(), 100);
        let dbg = format!("{p:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn claude_fetches_urls() {
        let p = ClaudeProvider::new("k".into(), DEFAULT_MODEL.into(), 100);
        assert!(p.fetches_urls());
        assert_eq!(p.name(), "claude");
    }

    #[tokio::test]
    async fn generate_sends_system_channel_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-test"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .and(body_partial_json(serde_json::json!({
                "model": DEFAULT_MODEL,
                "max_tokens": 4000,
                "system": "knowledge",
                "messages": [{ "role": "user", "content": "convert this" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{ "type": "text", "text": "{\"name\":\"Risotto\"}" }],
                "usage": { "input_tokens": 10, "output_tokens": 20 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = provider(&server)
            .generate(&[Message::system("knowledge"), Message::user("convert this")])
            .await
            .unwrap();
        assert_eq!(text, "{\"name\":\"Risotto\"}");
    }

    #[tokio::test]
    async fn generate_non_success_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .generate(&[Message::user("x")])
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "claude API error: 401 - invalid x-api-key");
    }

    #[tokio::test]
    async fn generate_without_text_block_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "content": [] })),
            )
            .mount(&server)
            .await;

        let err = provider(&server)
            .generate(&[Message::user("x")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse { provider: "claude" }));
    }
}
