//! Error type shared by payload parsing, layout and fetching.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Everything that can stop a graph from being drawn.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
	/// The server answered with an `error` field; shown to the user verbatim.
	#[error("{0}")]
	Input(String),
	/// The payload is not a well-formed graph or tree.
	#[error("malformed graph payload: {0}")]
	Malformed(String),
	/// A category hierarchy revisits a name on its own root path.
	#[error("category hierarchy contains a cycle at \"{0}\"")]
	Cycle(String),
	/// The request never produced a usable response.
	#[error("request failed: {0}")]
	Fetch(String),
}

impl GraphError {
	/// Returns the server-reported error carried by a payload, if any.
	///
	/// An `error` key wins over every other field of the payload.
	pub fn reported(payload: &serde_json::Value) -> Option<Self> {
		let error = payload.as_object()?.get("error")?;
		if error.is_null() {
			return None;
		}
		Some(Self::Input(
			error
				.as_str()
				.map(str::to_owned)
				.unwrap_or_else(|| error.to_string()),
		))
	}

	/// Wraps a JavaScript exception raised by the fetch machinery.
	pub fn from_js(value: &JsValue) -> Self {
		let message = value
			.dyn_ref::<js_sys::Error>()
			.map(|e| String::from(e.message()))
			.or_else(|| value.as_string())
			.unwrap_or_else(|| format!("{value:?}"));
		Self::Fetch(message)
	}
}

impl From<serde_json::Error> for GraphError {
	fn from(err: serde_json::Error) -> Self {
		Self::Malformed(err.to_string())
	}
}
