//! Competency ontology records exchanged with the extractor and the export file.

use serde::{Deserialize, Deserializer, Serialize};

/// A single competency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OntologyNode {
	/// Unique identifier within a graph. Links reference nodes by this id.
	pub id: String,
	pub label: String,
	/// Raw layer number as reported by the extractor. Only 1..=4 pass validation,
	/// see [`Layer`].
	#[serde(deserialize_with = "integral_group")]
	pub group: i64,
	pub description: String,
}

impl OntologyNode {
	/// The layer this node belongs to, if `group` is in range.
	pub fn layer(&self) -> Option<Layer> {
		Layer::from_group(self.group)
	}
}

/// A labelled relationship between two competencies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OntologyLink {
	pub source: String,
	pub target: String,
	pub relationship: String,
}

/// A complete ontology graph. Replaced wholesale, never patched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OntologyData {
	pub nodes: Vec<OntologyNode>,
	pub links: Vec<OntologyLink>,
}

impl OntologyData {
	pub fn node(&self, id: &str) -> Option<&OntologyNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn stats(&self) -> GraphStats {
		GraphStats {
			nodes: self.nodes.len(),
			links: self.links.len(),
		}
	}
}

/// Node and edge counts shown in the analytics panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
	pub nodes: usize,
	pub links: usize,
}

impl GraphStats {
	/// Average links per node; zero for an empty graph.
	pub fn connectivity(&self) -> f64 {
		if self.nodes == 0 {
			0.0
		} else {
			self.links as f64 / self.nodes as f64
		}
	}
}

/// The four fixed competency layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
	Foundation = 1,
	CoreRobotics = 2,
	PhysicalAi = 3,
	Vibe = 4,
}

impl Layer {
	pub const ALL: [Layer; 4] = [
		Layer::Foundation,
		Layer::CoreRobotics,
		Layer::PhysicalAi,
		Layer::Vibe,
	];

	pub fn from_group(group: i64) -> Option<Self> {
		match group {
			1 => Some(Layer::Foundation),
			2 => Some(Layer::CoreRobotics),
			3 => Some(Layer::PhysicalAi),
			4 => Some(Layer::Vibe),
			_ => None,
		}
	}

	pub fn number(self) -> i64 {
		self as i64
	}

	/// Label used in the detail panel.
	pub fn label(self) -> &'static str {
		match self {
			Layer::Foundation => "Layer 1: Foundations",
			Layer::CoreRobotics => "Layer 2: Core Robotics",
			Layer::PhysicalAi => "Layer 3: Physical AI",
			Layer::Vibe => "Layer 4: Vibe",
		}
	}

	/// Label used in the graph legend.
	pub fn short_label(self) -> &'static str {
		match self {
			Layer::Foundation => "Foundation",
			Layer::CoreRobotics => "Core Robotics",
			Layer::PhysicalAi => "Physical AI",
			Layer::Vibe => "Vibe",
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			Layer::Foundation => "#3b82f6",
			Layer::CoreRobotics => "#10b981",
			Layer::PhysicalAi => "#8b5cf6",
			Layer::Vibe => "#f43f5e",
		}
	}
}

/// Accepts `2` and `2.0`, rejects `2.5`. The model is asked for a JSON number,
/// which some responses render with a fractional part.
fn integral_group<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
	D: Deserializer<'de>,
{
	let value = serde_json::Number::deserialize(deserializer)?;
	if let Some(n) = value.as_i64() {
		return Ok(n);
	}
	match value.as_f64() {
		Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
		_ => Err(serde::de::Error::custom(format!(
			"group must be an integer layer number, got {}",
			value
		))),
	}
}
