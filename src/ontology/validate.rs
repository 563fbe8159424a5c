use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;

use super::types::{Layer, OntologyData};

/// Which end of a link failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
	Source,
	Target,
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Endpoint::Source => f.write_str("source"),
			Endpoint::Target => f.write_str("target"),
		}
	}
}

/// One reason a graph was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaViolation {
	#[error("malformed ontology JSON: {0}")]
	Malformed(String),

	#[error("node id {id:?} appears {occurrences} times")]
	DuplicateNodeId { id: String, occurrences: usize },

	#[error("link #{link} {endpoint} {id:?} does not name a node")]
	UnresolvedEndpoint {
		link: usize,
		endpoint: Endpoint,
		id: String,
	},

	#[error("node {id:?} has group {group}, expected 1-4")]
	InvalidGroup { id: String, group: i64 },
}

/// Every violation found in a graph, in discovery order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaError {
	pub violations: Vec<SchemaViolation>,
}

impl SchemaError {
	pub fn malformed(message: impl Into<String>) -> Self {
		Self {
			violations: vec![SchemaViolation::Malformed(message.into())],
		}
	}
}

impl fmt::Display for SchemaError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} schema violation(s)", self.violations.len())?;
		for v in &self.violations {
			write!(f, "; {}", v)?;
		}
		Ok(())
	}
}

impl std::error::Error for SchemaError {}

/// Checks id uniqueness, link endpoint resolution and layer range.
///
/// Collects all violations instead of stopping at the first one, so a response
/// with several hallucinated ids reports all of them.
pub fn validate(data: &OntologyData) -> Result<(), SchemaError> {
	let mut violations = Vec::new();

	let mut counts: HashMap<&str, usize> = HashMap::new();
	for node in &data.nodes {
		*counts.entry(node.id.as_str()).or_default() += 1;
	}
	let mut reported = HashSet::new();
	for node in &data.nodes {
		let occurrences = counts[node.id.as_str()];
		if occurrences > 1 && reported.insert(node.id.as_str()) {
			violations.push(SchemaViolation::DuplicateNodeId {
				id: node.id.clone(),
				occurrences,
			});
		}
	}

	for node in &data.nodes {
		if Layer::from_group(node.group).is_none() {
			violations.push(SchemaViolation::InvalidGroup {
				id: node.id.clone(),
				group: node.group,
			});
		}
	}

	for (i, link) in data.links.iter().enumerate() {
		for (endpoint, id) in [
			(Endpoint::Source, &link.source),
			(Endpoint::Target, &link.target),
		] {
			if !counts.contains_key(id.as_str()) {
				violations.push(SchemaViolation::UnresolvedEndpoint {
					link: i,
					endpoint,
					id: id.clone(),
				});
			}
		}
	}

	if violations.is_empty() {
		Ok(())
	} else {
		Err(SchemaError { violations })
	}
}
