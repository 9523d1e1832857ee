//! Errors raised while building or mounting a graph view.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Failure to construct or mount a graph view.
#[derive(Debug, Error)]
pub enum GraphError {
	/// Two nodes share the same id.
	#[error("duplicate node id `{0}`")]
	DuplicateNodeId(String),
	/// Two links share the same id.
	#[error("duplicate link id `{0}`")]
	DuplicateLinkId(String),
	/// A link endpoint names a node that is not in the dataset.
	#[error("link `{link}` references unknown node `{node}`")]
	DanglingLink {
		/// Id of the offending link.
		link: String,
		/// The endpoint id that did not resolve.
		node: String,
	},
	/// A browser API call failed or was unavailable.
	#[error("DOM operation failed: {0}")]
	Dom(String),
}

impl GraphError {
	pub(crate) fn dom(what: &str) -> Self {
		GraphError::Dom(what.to_string())
	}
}

impl From<JsValue> for GraphError {
	fn from(value: JsValue) -> Self {
		let message = match value.dyn_ref::<js_sys::Error>() {
			Some(err) => String::from(err.message()),
			None => value.as_string().unwrap_or_else(|| format!("{:?}", value)),
		};
		GraphError::Dom(message)
	}
}

/// Result alias for graph view operations.
pub type Result<T, E = GraphError> = std::result::Result<T, E>;
