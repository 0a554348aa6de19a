mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::Context;

use crate::error::{ANTHROPIC_KEY_NAME, GEMINI_KEY_NAME};
use crate::vault::{Secret, VaultProvider};

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Resolve provider credentials through the vault. Blank values count as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault backend fails.
    pub async fn resolve_secrets(&mut self, vault: &dyn VaultProvider) -> anyhow::Result<()> {
        self.secrets.gemini_api_key = non_blank(vault.get_secret(GEMINI_KEY_NAME).await?);
        self.secrets.anthropic_api_key = non_blank(vault.get_secret(ANTHROPIC_KEY_NAME).await?);

        tracing::debug!(
            gemini = self.secrets.gemini_api_key.is_some(),
            anthropic = self.secrets.anthropic_api_key.is_some(),
            "credentials resolved"
        );
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<Secret> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| Secret::new(v.trim()))
}
