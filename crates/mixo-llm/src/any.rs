use crate::claude::ClaudeProvider;
use crate::gemini::GeminiProvider;
#[cfg(feature = "mock")]
use crate::mock::MockProvider;
use crate::provider::{LlmProvider, Message};

/// Generates a match over all `AnyProvider` variants, binding the inner provider
/// and evaluating the given closure for each arm.
macro_rules! delegate_provider {
    ($self:expr, |$p:ident| $expr:expr) => {
        match $self {
            AnyProvider::Gemini($p) => $expr,
            AnyProvider::Claude($p) => $expr,
            #[cfg(feature = "mock")]
            AnyProvider::Mock($p) => $expr,
        }
    };
}

#[derive(Debug, Clone)]
pub enum AnyProvider {
    Gemini(GeminiProvider),
    Claude(ClaudeProvider),
    #[cfg(feature = "mock")]
    Mock(MockProvider),
}

impl LlmProvider for AnyProvider {
    async fn generate(&self, messages: &[Message]) -> Result<String, crate::LlmError> {
        delegate_provider!(self, |p| p.generate(messages).await)
    }

    fn name(&self) -> &str {
        delegate_provider!(self, |p| p.name())
    }

    fn fetches_urls(&self) -> bool {
        delegate_provider!(self, |p| p.fetches_urls())
    }
}
