//! Client side of a conversion: URL check, the single service call, coarse progress
//! and a second extraction pass over the returned envelope.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc;
use url::Url;

use crate::error::ConvertError;
use crate::extract::parse_recipe;
use crate::recipe::{Envelope, Recipe};
use crate::scale::ServingScale;

pub const INVALID_URL_MESSAGE: &str = "Please enter a valid recipe URL";

/// Shown for every failure after the URL check.
pub const USER_ERROR_MESSAGE: &str = "Failed to convert recipe. Please check the URL and try again, \
                                      or make sure your API key is configured correctly.";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Fixed checkpoints around the service call. They do not measure real progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fetching,
    Converting,
    Finalizing,
    Complete,
}

impl Phase {
    #[must_use]
    pub fn percent(self) -> u8 {
        match self {
            Self::Fetching => 25,
            Self::Converting => 60,
            Self::Finalizing => 85,
            Self::Complete => 100,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Fetching => "Fetching recipe...",
            Self::Converting => "Converting to TM6...",
            Self::Finalizing => "Finalizing...",
            Self::Complete => "Complete!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub phase: Phase,
    pub percent: u8,
    pub message: &'static str,
}

impl From<Phase> for Progress {
    fn from(phase: Phase) -> Self {
        Self {
            phase,
            percent: phase.percent(),
            message: phase.message(),
        }
    }
}

/// A converted recipe together with its serving-size view.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub recipe: Recipe,
    pub scale: ServingScale,
}

/// Text to show the user for a failed submission.
#[must_use]
pub fn display_message(err: &ConvertError) -> &str {
    match err {
        ConvertError::InvalidInput(msg) => msg.as_str(),
        _ => USER_ERROR_MESSAGE,
    }
}

#[derive(Debug, Clone)]
pub struct Orchestrator {
    client: reqwest::Client,
    endpoint: String,
    progress_tx: Option<mpsc::UnboundedSender<Progress>>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl Orchestrator {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: mixo_llm::http::default_client(DEFAULT_TIMEOUT),
            endpoint: endpoint.into(),
            progress_tx: None,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, tx: mpsc::UnboundedSender<Progress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = mixo_llm::http::default_client(timeout);
        self
    }

    fn report(&self, phase: Phase) {
        if let Some(ref tx) = self.progress_tx {
            let _ = tx.send(phase.into());
        }
    }

    /// Submit `url` to the conversion endpoint.
    ///
    /// # Errors
    ///
    /// [`ConvertError::InvalidInput`] without any request when `url` does not parse;
    /// [`ConvertError::Upstream`] for transport failures and non-2xx responses;
    /// extraction and shape errors from the envelope contents.
    pub async fn submit(&self, url: &str) -> Result<Conversion, ConvertError> {
        let url = url.trim();
        if url.is_empty() || Url::parse(url).is_err() {
            return Err(ConvertError::InvalidInput(INVALID_URL_MESSAGE.into()));
        }

        self.report(Phase::Fetching);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .map_err(|e| ConvertError::Upstream {
                status: None,
                message: e.to_string(),
            })?;

        self.report(Phase::Converting);
        let status = response.status();
        let body = response.text().await.map_err(|e| ConvertError::Upstream {
            status: Some(status.as_u16()),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body).map_or_else(
                |_| format!("API call failed: {}", status.as_u16()),
                |b| b.error,
            );
            tracing::warn!(status = status.as_u16(), "conversion request failed: {message}");
            return Err(ConvertError::Upstream {
                status: Some(status.as_u16()),
                message,
            });
        }

        let envelope: Envelope = serde_json::from_str(&body)
            .map_err(|e| ConvertError::MalformedResponse(e.to_string()))?;
        self.report(Phase::Finalizing);

        let recipe = parse_recipe(&envelope.joined_text())?;
        let scale = ServingScale::new(recipe.servings);
        self.report(Phase::Complete);

        Ok(Conversion { recipe, scale })
    }
}
