//! Competency ontology data contract: records, layers, validation and JSON export.

mod export;
mod types;
mod validate;

pub use export::EXPORT_FILE_NAME;
pub use types::{GraphStats, Layer, OntologyData, OntologyLink, OntologyNode};
pub use validate::{Endpoint, SchemaError, SchemaViolation, validate};
