//! Error types for backend calls and workspace operations.

use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum StoreError {
	/// Transport or decoding failure.
	#[error("request failed: {0}")]
	Http(#[from] reqwest::Error),

	/// Non-success HTTP status.
	#[error("backend answered {status}: {body}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body, as text.
		body: String,
	},

	/// Row does not exist.
	#[error("{entity} {id} not found")]
	NotFound {
		/// Entity name, e.g. `FlowNode`.
		entity: &'static str,
		/// Row id.
		id: String,
	},
}

/// Failure of a workspace operation.
#[derive(Debug, Error)]
pub enum FlowError {
	/// Fetching the flow's rows failed.
	#[error("failed to load flow {flow_id}: {source}")]
	Load {
		/// Flow that was being loaded.
		flow_id: String,
		/// Underlying backend failure.
		#[source]
		source: StoreError,
	},

	/// A write during save failed.
	#[error("failed to save flow: {source}")]
	Save {
		/// Underlying backend failure.
		#[source]
		source: StoreError,
	},

	/// No node with this id.
	#[error("node {0} does not exist")]
	UnknownNode(String),

	/// No edge with this id.
	#[error("edge {0} does not exist")]
	UnknownEdge(String),

	/// Save requested before any flow was opened.
	#[error("no flow is loaded")]
	NoFlowLoaded,

	/// Another load or save is in flight; carries the current phase.
	#[error("workspace is busy ({0})")]
	Busy(&'static str),
}

/// Result alias for workspace operations.
pub type Result<T, E = FlowError> = std::result::Result<T, E>;
