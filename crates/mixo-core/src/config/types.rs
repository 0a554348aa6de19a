use serde::{Deserialize, Serialize};

use crate::vault::Secret;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(skip)]
    pub secrets: ResolvedSecrets,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    /// Overrides the Gemini API base URL.
    #[serde(default)]
    pub gemini_base_url: Option<String>,
    #[serde(default = "default_claude_model")]
    pub claude_model: String,
    /// Overrides the Anthropic API base URL.
    #[serde(default)]
    pub claude_base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_gemini_model() -> String {
    mixo_llm::gemini::DEFAULT_MODEL.into()
}

fn default_claude_model() -> String {
    mixo_llm::claude::DEFAULT_MODEL.into()
}

fn default_max_tokens() -> u32 {
    mixo_llm::claude::DEFAULT_MAX_TOKENS
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            gemini_model: default_gemini_model(),
            gemini_base_url: None,
            claude_model: default_claude_model(),
            claude_base_url: None,
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Seconds.
    #[serde(default = "default_fetch_timeout")]
    pub timeout: u64,
    #[serde(default = "default_fetch_max_body")]
    pub max_body_bytes: usize,
    #[serde(default = "default_true")]
    pub block_private_hosts: bool,
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_fetch_max_body() -> usize {
    5 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            max_body_bytes: default_fetch_max_body(),
            block_private_hosts: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Requests per minute per client IP; `0` disables limiting.
    #[serde(default = "default_gateway_rate_limit")]
    pub rate_limit: u32,
    #[serde(default = "default_gateway_max_body")]
    pub max_body_size: usize,
}

fn default_gateway_bind() -> String {
    "127.0.0.1".into()
}

fn default_gateway_port() -> u16 {
    8090
}

fn default_gateway_rate_limit() -> u32 {
    120
}

fn default_gateway_max_body() -> usize {
    1_048_576
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: default_gateway_bind(),
            port: default_gateway_port(),
            rate_limit: default_gateway_rate_limit(),
            max_body_size: default_gateway_max_body(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_llm_timeout")]
    pub llm_seconds: u64,
}

fn default_llm_timeout() -> u64 {
    120
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            llm_seconds: default_llm_timeout(),
        }
    }
}

/// Settings for `mixo convert`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_client_endpoint")]
    pub endpoint: String,
}

fn default_client_endpoint() -> String {
    "http://127.0.0.1:8090/convert-recipe".into()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_client_endpoint(),
        }
    }
}

/// Credentials resolved once at startup. Never serialized.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSecrets {
    pub gemini_api_key: Option<Secret>,
    pub anthropic_api_key: Option<Secret>,
}
