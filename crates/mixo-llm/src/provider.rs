use serde::{Deserialize, Serialize};

use crate::LlmError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

pub trait LlmProvider: Send + Sync {
    /// Send messages to the provider and return the raw generated text.
    ///
    /// Single attempt: no retry is performed on any failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to communicate or the response is missing
    /// the generated text.
    fn generate(&self, messages: &[Message])
    -> impl Future<Output = Result<String, LlmError>> + Send;

    fn name(&self) -> &str;

    /// Whether this provider is asked to retrieve the source URL itself instead of
    /// receiving pre-fetched page content.
    fn fetches_urls(&self) -> bool {
        false
    }
}
