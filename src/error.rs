use thiserror::Error;

/// Failures while loading the diagram's static data.
#[derive(Debug, Error)]
pub enum DiagramError {
	/// The request never produced a response.
	#[error("request to {url} failed: {source}")]
	Request {
		/// Requested URL.
		url: String,
		/// Underlying transport error.
		#[source]
		source: gloo_net::Error,
	},
	/// The server answered with a non-success status.
	#[error("{url} responded with HTTP {status}")]
	Status {
		/// Requested URL.
		url: String,
		/// HTTP status code.
		status: u16,
	},
	/// The body was not the expected JSON.
	#[error("could not decode {url}: {source}")]
	Decode {
		/// Requested URL.
		url: String,
		/// Parser error.
		#[source]
		source: serde_json::Error,
	},
	/// Embedded configuration was not valid JSON for [`crate::config::DiagramConfig`].
	#[error("invalid diagram config: {0}")]
	Config(#[from] serde_json::Error),
}
