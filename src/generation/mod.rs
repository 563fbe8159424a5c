//! Turning free-text competency descriptions into a validated ontology.
//!
//! The heavy lifting is done by a hosted language model behind the [`Extractor`]
//! capability. Everything that comes back is validated here before the rest of
//! the app sees it; a response with any violation is discarded whole.

mod gemini;
mod prompt;

use async_trait::async_trait;
use log::{info, warn};
use thiserror::Error;

use crate::ontology::{OntologyData, SchemaError, validate};

pub use gemini::{GeminiExtractor, decode_ontology};
pub use prompt::{SYSTEM_INSTRUCTION, response_schema, user_prompt};

/// Why a generation attempt produced no graph.
#[derive(Debug, Error)]
pub enum ExtractError {
	#[error("input text is empty")]
	EmptyInput,

	#[error("generation request failed: {0}")]
	Generation(String),

	#[error("the model returned no text")]
	EmptyResponse,

	#[error("response violates the ontology schema: {0}")]
	SchemaViolation(#[from] SchemaError),
}

impl From<reqwest::Error> for ExtractError {
	fn from(err: reqwest::Error) -> Self {
		ExtractError::Generation(err.to_string())
	}
}

impl ExtractError {
	/// The single message shown in the sidebar error box.
	pub fn user_message(&self) -> String {
		match self {
			ExtractError::EmptyInput => "Enter competency data before generating.".into(),
			ExtractError::Generation(msg) => format!("Generation failed: {}", msg),
			ExtractError::EmptyResponse => "No response from the model. Try again.".into(),
			ExtractError::SchemaViolation(err) => {
				format!("The model returned an invalid ontology ({}).", err)
			}
		}
	}
}

/// Raw text in, one validated ontology out. One attempt per call.
#[async_trait(?Send)]
pub trait Extractor {
	async fn extract(&self, text: &str) -> Result<OntologyData, ExtractError>;
}

/// Run a single extraction and validate the result.
///
/// Callers gate on non-empty input; a blank `raw_text` is still refused here
/// without contacting the extractor.
pub async fn generate(
	extractor: &dyn Extractor,
	raw_text: &str,
) -> Result<OntologyData, ExtractError> {
	let text = raw_text.trim();
	if text.is_empty() {
		return Err(ExtractError::EmptyInput);
	}
	info!("generation: extracting ontology from {} chars", text.len());

	let result = extractor.extract(text).await.and_then(|data| {
		validate(&data)?;
		Ok(data)
	});
	match &result {
		Ok(data) => info!(
			"generation: {} nodes, {} links",
			data.nodes.len(),
			data.links.len()
		),
		Err(ExtractError::SchemaViolation(err)) => warn!(
			"generation: response rejected with {} violation(s)",
			err.violations.len()
		),
		Err(err) => warn!("generation: {}", err),
	}
	result
}
