#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{provider} API error: {status} - {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },
}

impl LlmError {
    /// HTTP status reported by the provider, when the failure came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
