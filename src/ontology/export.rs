use super::types::OntologyData;
use super::validate::{SchemaError, validate};

/// File name offered for downloads.
pub const EXPORT_FILE_NAME: &str = "physical_ai_ontology.json";

impl OntologyData {
	/// Pretty-printed JSON with two-space indentation, node/link order preserved.
	/// The same node/link list format NetworkX's `node_link_graph` reads.
	pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string_pretty(self)
	}

	/// Parse and validate a graph. Missing keys or wrong types are reported as a
	/// single `Malformed` violation; otherwise every structural violation is listed.
	pub fn from_json(text: &str) -> Result<Self, SchemaError> {
		let data: OntologyData =
			serde_json::from_str(text).map_err(|e| SchemaError::malformed(e.to_string()))?;
		validate(&data)?;
		Ok(data)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ontology::SchemaViolation;

	const SAMPLE: &str = r#"{
		"nodes": [
			{"id": "python", "label": "Python", "group": 1, "description": "Scripting"},
			{"id": "ros2", "label": "ROS2", "group": 2, "description": "Middleware"}
		],
		"links": [
			{"source": "ros2", "target": "python", "relationship": "built on"}
		]
	}"#;

	#[test]
	fn export_then_import_is_a_fixed_point() {
		let data = OntologyData::from_json(SAMPLE).unwrap();
		let exported = data.to_pretty_json().unwrap();
		let reimported = OntologyData::from_json(&exported).unwrap();
		assert_eq!(reimported, data);
		assert_eq!(reimported.to_pretty_json().unwrap(), exported);
	}

	#[test]
	fn export_keeps_field_order() {
		let data = OntologyData::from_json(SAMPLE).unwrap();
		let exported = data.to_pretty_json().unwrap();
		let id = exported.find("\"id\"").unwrap();
		let label = exported.find("\"label\"").unwrap();
		let group = exported.find("\"group\"").unwrap();
		let description = exported.find("\"description\"").unwrap();
		assert!(id < label && label < group && group < description);
		assert!(exported.contains("\n  \"nodes\": ["));
	}

	#[test]
	fn missing_links_key_is_malformed() {
		let err = OntologyData::from_json(r#"{"nodes": []}"#).unwrap_err();
		assert!(matches!(
			err.violations.as_slice(),
			[SchemaViolation::Malformed(msg)] if msg.contains("links")
		));
	}

	#[test]
	fn missing_node_field_is_malformed() {
		let err = OntologyData::from_json(
			r#"{"nodes": [{"id": "a", "label": "A", "group": 1}], "links": []}"#,
		)
		.unwrap_err();
		assert!(matches!(
			err.violations.as_slice(),
			[SchemaViolation::Malformed(msg)] if msg.contains("description")
		));
	}
}
