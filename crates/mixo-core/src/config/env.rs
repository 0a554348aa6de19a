use super::Config;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_llm();
        self.apply_env_overrides_serving();
    }

    fn apply_env_overrides_llm(&mut self) {
        if let Ok(v) = std::env::var("MIXO_GEMINI_MODEL") {
            self.llm.gemini_model = v;
        }
        if let Ok(v) = std::env::var("MIXO_GEMINI_BASE_URL") {
            self.llm.gemini_base_url = Some(v);
        }
        if let Ok(v) = std::env::var("MIXO_CLAUDE_MODEL") {
            self.llm.claude_model = v;
        }
        if let Ok(v) = std::env::var("MIXO_CLAUDE_BASE_URL") {
            self.llm.claude_base_url = Some(v);
        }
        if let Ok(v) = std::env::var("MIXO_CLAUDE_MAX_TOKENS") {
            if let Ok(tokens) = v.parse::<u32>()
                && tokens > 0
            {
                self.llm.max_tokens = tokens;
            } else {
                tracing::warn!("ignoring invalid MIXO_CLAUDE_MAX_TOKENS value: {v}");
            }
        }
        if let Ok(v) = std::env::var("MIXO_TIMEOUT_LLM")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.timeouts.llm_seconds = secs;
        }
    }

    fn apply_env_overrides_serving(&mut self) {
        if let Ok(v) = std::env::var("MIXO_FETCH_TIMEOUT")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.fetch.timeout = secs;
        }
        if let Ok(v) = std::env::var("MIXO_FETCH_MAX_BODY")
            && let Ok(bytes) = v.parse::<usize>()
        {
            self.fetch.max_body_bytes = bytes;
        }
        if let Ok(v) = std::env::var("MIXO_FETCH_BLOCK_PRIVATE")
            && let Ok(enabled) = v.parse::<bool>()
        {
            self.fetch.block_private_hosts = enabled;
        }
        if let Ok(v) = std::env::var("MIXO_GATEWAY_BIND") {
            self.gateway.bind = v;
        }
        if let Ok(v) = std::env::var("MIXO_GATEWAY_PORT")
            && let Ok(port) = v.parse::<u16>()
        {
            self.gateway.port = port;
        }
        if let Ok(v) = std::env::var("MIXO_GATEWAY_RATE_LIMIT")
            && let Ok(limit) = v.parse::<u32>()
        {
            self.gateway.rate_limit = limit;
        }
        if let Ok(v) = std::env::var("MIXO_GATEWAY_MAX_BODY")
            && let Ok(size) = v.parse::<usize>()
        {
            self.gateway.max_body_size = size;
        }
        if let Ok(v) = std::env::var("MIXO_CLIENT_ENDPOINT") {
            self.client.endpoint = v;
        }
    }
}
