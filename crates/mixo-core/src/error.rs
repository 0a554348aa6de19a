use mixo_llm::LlmError;
use thiserror::Error;

pub const GEMINI_KEY_NAME: &str = "GEMINI_API_KEY";
pub const ANTHROPIC_KEY_NAME: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no JSON object found in response")]
    NoObject,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(
        "No API key configured. Please add GEMINI_API_KEY (free) or ANTHROPIC_API_KEY to your environment variables."
    )]
    Unconfigured,

    #[error("{message}")]
    Upstream { status: Option<u16>, message: String },

    #[error("Failed to parse recipe data: {0}")]
    MalformedResponse(String),

    #[error("Invalid recipe format: {0}")]
    InvalidRecipeShape(String),
}

impl From<ExtractError> for ConvertError {
    fn from(e: ExtractError) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}

impl From<LlmError> for ConvertError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::EmptyResponse { provider } => {
                Self::MalformedResponse(format!("Invalid response from {provider} API"))
            }
            LlmError::Json(err) => Self::MalformedResponse(err.to_string()),
            other => Self::Upstream {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}
