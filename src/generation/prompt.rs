use serde_json::{Value, json};

/// Extraction policy sent as the system instruction.
pub const SYSTEM_INSTRUCTION: &str = r#"You are a "Physical AI Competency Ontology Architect".
Your goal is to parse raw text data describing competencies in the Physical AI field and transform them into a structured JSON graph format compatible with NetworkX/D3.

Rules:
1. Identify individual competencies as nodes.
2. Assign each node to a group:
   - Group 1 (Foundation): Math, Physics, Basic Programming (Python, C++).
   - Group 2 (Core Robotics): SLAM, Control Systems, Perception, ROS2.
   - Group 3 (Physical AI): Sim-to-Real, Reinforcement Learning, Transformers for Robotics, Foundation Models.
   - Group 4 (Vibe): Safety Awareness (ISO 10218), Collaborative mindset, Problem Solving, Ethics, Cultural Fit.
3. Define links based on prerequisite or logical connections.
   - Example: ROS2 -> Python/C++
   - Example: Sim-to-Real -> Reinforcement Learning
4. CRITICAL: Explicitly connect Layer 4 (Vibe) to technical skills. Every Layer 4 node must link to at least one node in Layers 1-3.
   - Example: "Safety Awareness" should link to "Collaborative Robots" and "Control Systems".
   - Example: "Ethics" should link to "Decision Making" and "Foundation Models".
5. Every link source and target must be the id of a node in the output.

Ensure the output is strictly JSON and matches the schema provided."#;

/// User turn wrapping the raw competency text.
pub fn user_prompt(raw_text: &str) -> String {
	format!(
		"Transform this data into a Physical AI competency ontology: \n\n{}",
		raw_text
	)
}

/// Structured output schema in the hosted API's OpenAPI subset.
pub fn response_schema() -> Value {
	json!({
		"type": "OBJECT",
		"properties": {
			"nodes": {
				"type": "ARRAY",
				"items": {
					"type": "OBJECT",
					"properties": {
						"id": { "type": "STRING" },
						"label": { "type": "STRING" },
						"group": { "type": "NUMBER", "description": "1, 2, 3, or 4 based on layers" },
						"description": { "type": "STRING" }
					},
					"required": ["id", "label", "group", "description"]
				}
			},
			"links": {
				"type": "ARRAY",
				"items": {
					"type": "OBJECT",
					"properties": {
						"source": { "type": "STRING" },
						"target": { "type": "STRING" },
						"relationship": { "type": "STRING" }
					},
					"required": ["source", "target", "relationship"]
				}
			}
		},
		"required": ["nodes", "links"]
	})
}
