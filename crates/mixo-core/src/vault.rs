use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Wrapper for sensitive strings with redacted Debug/Display.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Pluggable secret retrieval backend.
pub trait VaultProvider: Send + Sync {
    fn get_secret(
        &self,
        key: &str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Option<String>>> + Send + '_>>;
}

/// Reads secrets from process environment variables.
pub struct EnvVaultProvider;

impl VaultProvider for EnvVaultProvider {
    fn get_secret(
        &self,
        key: &str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Option<String>>> + Send + '_>> {
        let key = key.to_owned();
        Box::pin(async move { Ok(std::env::var(&key).ok()) })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Fixed in-memory vault for tests that must not touch the environment.
    pub(crate) struct MapVaultProvider(pub HashMap<String, String>);

    impl MapVaultProvider {
        pub(crate) fn with(entries: &[(&str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                    .collect(),
            )
        }
    }

    impl VaultProvider for MapVaultProvider {
        fn get_secret(
            &self,
            key: &str,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<Option<String>>> + Send + '_>> {
            let value = self.0.get(key).cloned();
            Box::pin(async move { Ok(value) })
        }
    }

    #[test]
    fn secret_is_redacted() {
        let s = Secret::new("AIza-secret");
        assert_eq!(format!("{s:?}"), "[REDACTED]");
        assert_eq!(format!("{s}"), "[REDACTED]");
        assert_eq!(s.expose(), "AIza-secret");
    }

    #[tokio::test]
    async fn env_vault_missing_key_is_none() {
        let value = EnvVaultProvider
            .get_secret("MIXO_TEST_SURELY_UNSET_VARIABLE")
            .await
            .unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn map_vault_returns_entries() {
        let vault = MapVaultProvider::with(&[("GEMINI_API_KEY", "g")]);
        assert_eq!(
            vault.get_secret("GEMINI_API_KEY").await.unwrap().as_deref(),
            Some("g")
        );
        assert!(vault.get_secret("ANTHROPIC_API_KEY").await.unwrap().is_none());
    }
}
