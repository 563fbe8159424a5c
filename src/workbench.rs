//! Application state behind the home page: input text, the current graph,
//! the single-request loading gate, the error message and the selection.

use log::debug;

use crate::generation::ExtractError;
use crate::ontology::OntologyData;

/// Pre-filled input: four layers, twenty competencies, five relationship highlights.
pub const SAMPLE_COMPETENCIES: &str = "
Layer 1: Foundations
- Mathematics (Linear Algebra, Calculus)
- Classical Physics & Mechanics
- Programming (Python, C++)
- Data Structures & Algorithms

Layer 2: Core Robotics
- ROS2 (Robot Operating System)
- SLAM (Simultaneous Localization and Mapping)
- Perception (Computer Vision, Point Clouds)
- Control Theory (PID, MPC)
- Actuators and Sensors

Layer 3: Physical AI
- Sim-to-Real Transfer
- Deep Reinforcement Learning
- Robot Foundation Models (RT-1, RT-2, GATO)
- Multi-modal Transformers
- Embodied Intelligence

Layer 4: Vibe (Competencies)
- Safety Awareness (Compliance with ISO 10218-1/2)
- Collaborative Problem Solving
- Ethical AI Stewardship
- Systems Thinking
- Adaptability in Dynamic Environments

Relationship Highlights:
- ROS2 is built on Python and C++.
- Sim-to-Real depends on Physics and Mechanics.
- Safety Awareness is critical when deploying Collaborative Robots (Layer 2).
- Ethics connects to how Foundation Models make autonomous decisions.
- Systems Thinking links Core Robotics with Physical AI architectures.
";

#[derive(Clone, Debug)]
pub struct Workbench {
	pub raw_text: String,
	ontology: Option<OntologyData>,
	revision: u64,
	selected: Option<String>,
	loading: bool,
	error: Option<String>,
}

impl Default for Workbench {
	fn default() -> Self {
		Self::new(SAMPLE_COMPETENCIES)
	}
}

impl Workbench {
	pub fn new(raw_text: impl Into<String>) -> Self {
		Self {
			raw_text: raw_text.into(),
			ontology: None,
			revision: 0,
			selected: None,
			loading: false,
			error: None,
		}
	}

	pub fn ontology(&self) -> Option<&OntologyData> {
		self.ontology.as_ref()
	}

	/// Bumped every time a new graph replaces the current one.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	pub fn loading(&self) -> bool {
		self.loading
	}

	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// Whether the generate button is enabled.
	pub fn can_generate(&self) -> bool {
		!self.loading && !self.raw_text.trim().is_empty()
	}

	/// Enter the loading state and hand back the trimmed text to extract from.
	///
	/// Returns `None` without touching state while a request is outstanding or
	/// when the input is blank. Requests are never queued.
	pub fn begin_generation(&mut self) -> Option<String> {
		if !self.can_generate() {
			return None;
		}
		self.loading = true;
		self.error = None;
		Some(self.raw_text.trim().to_string())
	}

	/// Settle the outstanding request. A failure leaves the previous graph and
	/// selection in place.
	pub fn finish_generation(&mut self, result: Result<OntologyData, ExtractError>) {
		self.loading = false;
		match result {
			Ok(data) => {
				self.ontology = Some(data);
				self.revision += 1;
				self.selected = None;
				self.error = None;
			}
			Err(err) => self.error = Some(err.user_message()),
		}
	}

	/// Select a node of the current graph, or clear with `None`. Ids that are not
	/// in the current graph clear the selection.
	pub fn select(&mut self, id: Option<String>) {
		let id = id.filter(|id| self.ontology.as_ref().is_some_and(|o| o.node(id).is_some()));
		debug!("workbench: selection {:?}", id);
		self.selected = id;
	}

	pub fn selected_id(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	pub fn selected_node(&self) -> Option<&crate::ontology::OntologyNode> {
		let id = self.selected.as_deref()?;
		self.ontology.as_ref()?.node(id)
	}
}
