//! Generation provider abstraction with Gemini (free tier) and Claude (paid) backends.

pub mod any;
pub mod claude;
pub mod error;
pub mod gemini;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod provider;

pub use error::LlmError;
pub use provider::{LlmProvider, Message, Role};
