//! Recipe model, appliance prompt construction, tolerant extraction, conversion
//! service and client-side orchestrator.

pub mod appliance;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod orchestrator;
pub mod prompt;
pub mod recipe;
pub mod scale;
pub mod service;
pub mod vault;

pub use error::{ConvertError, ExtractError};
pub use extract::{extract_json_candidate, parse_recipe};
pub use orchestrator::{Conversion, Orchestrator, Phase, Progress};
pub use recipe::{Amount, Envelope, Ingredient, Recipe, Step, StepSettings};
pub use scale::ServingScale;
pub use service::ConversionService;
