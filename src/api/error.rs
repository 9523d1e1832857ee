//! Errors returned by the producoes REST client.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the producoes backend.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The configured base URL does not parse.
	#[error("invalid base URL `{url}`: {source}")]
	InvalidBaseUrl {
		/// The rejected URL.
		url: String,
		/// Why it was rejected.
		#[source]
		source: url::ParseError,
	},
	/// The request could not be sent or the body could not be read.
	#[error("request failed: {0}")]
	Http(#[from] reqwest::Error),
	/// The backend answered with a non-success status.
	#[error("backend returned {status}: {body}")]
	Status {
		/// HTTP status received.
		status: StatusCode,
		/// Start of the response body.
		body: String,
	},
	/// The body is not the JSON shape the endpoint promises.
	#[error("unexpected response body: {0}")]
	Decode(#[from] serde_json::Error),
}

/// Result alias for REST client operations.
pub type Result<T, E = ApiError> = std::result::Result<T, E>;
