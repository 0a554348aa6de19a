//! Server-side conversion pipeline: provider selection, source retrieval, prompt
//! construction, generation, extraction and validation.

use std::time::{Duration, Instant};

use mixo_llm::any::AnyProvider;
use mixo_llm::claude::ClaudeProvider;
use mixo_llm::gemini::GeminiProvider;
use mixo_llm::LlmProvider;

use crate::config::{Config, LlmConfig, ResolvedSecrets};
use crate::error::ConvertError;
use crate::extract::parse_recipe;
use crate::fetch::SourceFetcher;
use crate::prompt::{delegated_messages, inline_messages};
use crate::recipe::{Envelope, Recipe};

pub const URL_REQUIRED_MESSAGE: &str = "Recipe URL is required";

/// Stateless per request; credentials are fixed at construction.
#[derive(Debug, Clone)]
pub struct ConversionService {
    llm: LlmConfig,
    llm_timeout: Duration,
    secrets: ResolvedSecrets,
    fetcher: SourceFetcher,
}

impl ConversionService {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            fetcher: SourceFetcher::new(&config.fetch),
            llm_timeout: Duration::from_secs(config.timeouts.llm_seconds),
            llm: config.llm,
            secrets: config.secrets,
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.secrets.gemini_api_key.is_some() || self.secrets.anthropic_api_key.is_some()
    }

    /// Build the provider for one request. The free tier always wins when both keys
    /// are present.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Unconfigured`] when neither key is set.
    pub fn select_provider(&self) -> Result<AnyProvider, ConvertError> {
        if let Some(key) = &self.secrets.gemini_api_key {
            let mut provider =
                GeminiProvider::new(key.expose().to_owned(), self.llm.gemini_model.clone())
                    .with_timeout(self.llm_timeout);
            if let Some(base) = &self.llm.gemini_base_url {
                provider = provider.with_base_url(base.as_str());
            }
            return Ok(AnyProvider::Gemini(provider));
        }

        if let Some(key) = &self.secrets.anthropic_api_key {
            let mut provider = ClaudeProvider::new(
                key.expose().to_owned(),
                self.llm.claude_model.clone(),
                self.llm.max_tokens,
            )
            .with_timeout(self.llm_timeout);
            if let Some(base) = &self.llm.claude_base_url {
                provider = provider.with_base_url(base.as_str());
            }
            return Ok(AnyProvider::Claude(provider));
        }

        Err(ConvertError::Unconfigured)
    }

    /// Convert the recipe at `url` with the configured provider.
    ///
    /// # Errors
    ///
    /// [`ConvertError::InvalidInput`] for a blank URL, [`ConvertError::Unconfigured`]
    /// without credentials, otherwise whatever [`Self::convert_with`] returns.
    pub async fn convert(&self, url: &str) -> Result<Recipe, ConvertError> {
        let url = require_url(url)?;
        let provider = self.select_provider()?;
        self.convert_with(&provider, url).await
    }

    /// Run the pipeline against an explicit provider.
    ///
    /// Providers that retrieve URLs themselves get the delegated prompt; all others get
    /// the page fetched here and embedded inline.
    ///
    /// # Errors
    ///
    /// [`ConvertError::Upstream`] on provider failure, [`ConvertError::MalformedResponse`]
    /// or [`ConvertError::InvalidRecipeShape`] when the output is not a usable recipe.
    pub async fn convert_with<P: LlmProvider>(
        &self,
        provider: &P,
        url: &str,
    ) -> Result<Recipe, ConvertError> {
        let url = require_url(url)?;

        let messages = if provider.fetches_urls() {
            delegated_messages(url)
        } else {
            let source = self.fetcher.fetch(url).await;
            inline_messages(url, &source)
        };

        let prompt_chars: usize = messages.iter().map(|m| m.content.chars().count()).sum();
        tracing::info!(provider = provider.name(), url, prompt_chars, "converting recipe");

        let started = Instant::now();
        let text = provider.generate(&messages).await.inspect_err(|e| {
            tracing::warn!(provider = provider.name(), "generation failed: {e}");
        })?;
        tracing::debug!(
            provider = provider.name(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            response_chars = text.chars().count(),
            "generation finished"
        );

        let recipe = parse_recipe(&text).inspect_err(|e| {
            tracing::warn!(provider = provider.name(), "unusable provider output: {e}");
        })?;
        tracing::info!(
            name = %recipe.name,
            ingredients = recipe.ingredients.len(),
            steps = recipe.steps.len(),
            "recipe converted"
        );
        Ok(recipe)
    }

    /// Convert and wrap the result in the provider-agnostic envelope.
    ///
    /// # Errors
    ///
    /// Same as [`Self::convert`].
    pub async fn convert_to_envelope(&self, url: &str) -> Result<Envelope, ConvertError> {
        let recipe = self.convert(url).await?;
        Envelope::wrap(&recipe).map_err(|e| ConvertError::MalformedResponse(e.to_string()))
    }
}

fn require_url(url: &str) -> Result<&str, ConvertError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ConvertError::InvalidInput(URL_REQUIRED_MESSAGE.into()));
    }
    Ok(url)
}
