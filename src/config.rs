//! Hosted model settings. The CSR bundle has no runtime environment, so values
//! are captured at build time.

/// Default REST endpoint of the hosted model API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default model used for ontology extraction.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Where and how to reach the extraction model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelConfig {
	pub endpoint: String,
	pub model: String,
	pub api_key: Option<String>,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_ENDPOINT.into(),
			model: DEFAULT_MODEL.into(),
			api_key: None,
		}
	}
}

impl ModelConfig {
	/// Read `GEMINI_API_KEY` (or `API_KEY`) and `GEMINI_MODEL` from the build environment.
	pub fn from_build_env() -> Self {
		Self::from_values(
			option_env!("GEMINI_API_KEY").or(option_env!("API_KEY")),
			option_env!("GEMINI_MODEL"),
		)
	}

	fn from_values(api_key: Option<&str>, model: Option<&str>) -> Self {
		let mut config = Self::default();
		config.api_key = api_key
			.map(str::trim)
			.filter(|k| !k.is_empty())
			.map(String::from);
		if let Some(model) = model.map(str::trim).filter(|m| !m.is_empty()) {
			config.model = model.into();
		}
		config
	}

	/// `generateContent` URL for the configured model.
	pub fn generate_url(&self) -> String {
		format!(
			"{}/models/{}:generateContent",
			self.endpoint.trim_end_matches('/'),
			self.model
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_values_fall_back_to_defaults() {
		let config = ModelConfig::from_values(Some("  "), Some(""));
		assert_eq!(config, ModelConfig::default());
	}

	#[test]
	fn generate_url_joins_endpoint_and_model() {
		let mut config = ModelConfig::from_values(Some("key"), Some("gemini-test"));
		config.endpoint = "https://example.test/v1/".into();
		assert_eq!(config.api_key.as_deref(), Some("key"));
		assert_eq!(
			config.generate_url(),
			"https://example.test/v1/models/gemini-test:generateContent"
		);
	}
}
