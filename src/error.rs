//! Error kinds surfaced by the graph model, the canvas controller and the
//! snapshot codec. None of them are fatal: the graph and canvas stay usable
//! after any of these is reported.

use crate::graph::{VertexId, Weight};

/// Failures raised by [`Graph`](crate::graph::Graph) mutators and lookups.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GraphError {
	#[error("vertex {0} does not exist")]
	InvalidReference(VertexId),

	#[error("weight must be a finite non-negative number, got {0}")]
	InvalidWeight(Weight),

	/// The id space is used up, or an explicit id leaves no room after it.
	#[error("vertex id {0} is out of range")]
	IdOutOfRange(VertexId),

	#[error("no edge between {0} and {1}")]
	EdgeNotFound(VertexId, VertexId),

	#[error("no vertex named {0:?}")]
	UnknownName(String),
}

/// Failures raised while decoding or installing a snapshot.
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
	#[error("unsupported snapshot format {0:?}")]
	UnsupportedFormat(String),

	#[error("malformed snapshot: {0}")]
	Malformed(#[from] serde_json::Error),

	#[error("snapshot does not describe a valid graph: {0}")]
	Graph(#[from] GraphError),
}
