use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::prompt::{SYSTEM_INSTRUCTION, response_schema, user_prompt};
use super::{ExtractError, Extractor};
use crate::config::ModelConfig;
use crate::ontology::OntologyData;

/// `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
	system_instruction: Content<'a>,
	contents: Vec<Content<'a>>,
	generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
	#[serde(skip_serializing_if = "Option::is_none")]
	role: Option<&'a str>,
	parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
	text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
	response_mime_type: &'static str,
	response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
	#[serde(default)]
	candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
	content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
	#[serde(default)]
	parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
	text: Option<String>,
}

impl GenerateResponse {
	/// Text of the first candidate, parts concatenated.
	fn text(&self) -> Option<String> {
		let content = self.candidates.first()?.content.as_ref()?;
		let text: String = content
			.parts
			.iter()
			.filter_map(|p| p.text.as_deref())
			.collect();
		Some(text)
	}
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
	error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
	message: String,
}

fn build_request(prompt: &str) -> GenerateRequest<'_> {
	GenerateRequest {
		system_instruction: Content {
			role: None,
			parts: vec![Part {
				text: SYSTEM_INSTRUCTION,
			}],
		},
		contents: vec![Content {
			role: Some("user"),
			parts: vec![Part { text: prompt }],
		}],
		generation_config: GenerationConfig {
			response_mime_type: "application/json",
			response_schema: response_schema(),
		},
	}
}

/// Decode the model's text output into a validated ontology.
pub fn decode_ontology(text: Option<&str>) -> Result<OntologyData, ExtractError> {
	let text = text
		.map(str::trim)
		.filter(|t| !t.is_empty())
		.ok_or(ExtractError::EmptyResponse)?;
	Ok(OntologyData::from_json(text)?)
}

/// [`Extractor`] backed by the hosted Gemini `generateContent` endpoint.
pub struct GeminiExtractor {
	client: Client,
	config: ModelConfig,
}

impl GeminiExtractor {
	pub fn new(config: ModelConfig) -> Self {
		Self {
			client: Client::new(),
			config,
		}
	}
}

#[async_trait(?Send)]
impl Extractor for GeminiExtractor {
	async fn extract(&self, text: &str) -> Result<OntologyData, ExtractError> {
		let api_key = self.config.api_key.as_deref().ok_or_else(|| {
			ExtractError::Generation("no API key configured (set GEMINI_API_KEY at build time)".into())
		})?;

		let prompt = user_prompt(text);
		let url = self.config.generate_url();
		debug!("gemini: POST {}", url);
		let response = self
			.client
			.post(&url)
			.header("x-goog-api-key", api_key)
			.json(&build_request(&prompt))
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			let message = serde_json::from_str::<ErrorResponse>(&body)
				.map(|e| e.error.message)
				.unwrap_or_else(|_| format!("HTTP {}", status));
			return Err(ExtractError::Generation(message));
		}

		let body: GenerateResponse = response.json().await?;
		decode_ontology(body.text().as_deref())
	}
}
