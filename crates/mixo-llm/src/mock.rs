//! Test-only mock generation provider.

use std::sync::{Arc, Mutex};

use crate::provider::{LlmProvider, Message};

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<Vec<Message>>>>,
    pub default_response: String,
    pub fail_status: Option<u16>,
    pub fetches_urls: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            fail_status: None,
            fetches_urls: false,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    /// Every call fails with an API error carrying `status`.
    #[must_use]
    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_url_fetching(mut self) -> Self {
        self.fetches_urls = true;
        self
    }

    /// Messages received by each `generate` call, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the call log mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

impl LlmProvider for MockProvider {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }

    fn fetches_urls(&self) -> bool {
        self.fetches_urls
    }

    async fn generate(&self, messages: &[Message]) -> Result<String, crate::LlmError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if let Some(status) = self.fail_status {
            return Err(crate::LlmError::Api {
                provider: "mock",
                status,
                message: "mock LLM error".into(),
            });
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }
}
