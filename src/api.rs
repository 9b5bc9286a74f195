//! Form posts to the graph server.
//!
//! Uses web-sys fetch; every failure is mapped onto [`GraphError`] so the
//! pages show a single kind of message.

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, UrlSearchParams};

use crate::components::force_graph::Graph;
use crate::components::tree_graph::CategoryTree;
use crate::config::Endpoints;
use crate::error::GraphError;

#[derive(Clone, Debug)]
pub struct ApiClient {
	base_url: String,
}

impl ApiClient {
	/// `base_url` is prefixed verbatim; an empty one posts relative to the page.
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.to_string(),
		}
	}

	/// POSTs `fields` as `application/x-www-form-urlencoded` and returns the body.
	pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<String, GraphError> {
		let url = format!("{}{}", self.base_url, path);

		let params = UrlSearchParams::new().map_err(|e| GraphError::from_js(&e))?;
		for (name, value) in fields {
			params.append(name, value);
		}

		let opts = RequestInit::new();
		opts.set_method("POST");
		opts.set_body(&params);

		let request = Request::new_with_str_and_init(&url, &opts).map_err(|e| GraphError::from_js(&e))?;
		let window = web_sys::window().ok_or_else(|| GraphError::Fetch("no window".into()))?;

		debug!("POST {url}");
		let resp: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(|e| GraphError::from_js(&e))?
			.dyn_into()
			.map_err(|_| GraphError::Fetch("response is not a Response".into()))?;

		let text = JsFuture::from(resp.text().map_err(|e| GraphError::from_js(&e))?)
			.await
			.map_err(|e| GraphError::from_js(&e))?
			.as_string()
			.unwrap_or_default();

		if !resp.ok() {
			warn!("POST {url} returned HTTP {}", resp.status());
			// A server-reported message still beats the bare status.
			let reported = serde_json::from_str(&text)
				.ok()
				.and_then(|payload| GraphError::reported(&payload));
			return Err(reported.unwrap_or_else(|| GraphError::Fetch(format!("HTTP {}", resp.status()))));
		}
		Ok(text)
	}

	/// Related-term network for `keyword`, capped at `disp_count` terms.
	pub async fn search(&self, keyword: &str, disp_count: u32) -> Result<Graph, GraphError> {
		let disp_count = disp_count.to_string();
		let body = self
			.post_form(Endpoints::SEARCH, &[("disp_count", &disp_count), ("keyword", keyword)])
			.await?;
		Graph::from_json(&body)
	}

	/// Category taxonomy rooted at `keyword`.
	pub async fn categories(&self, keyword: &str) -> Result<CategoryTree, GraphError> {
		let body = self
			.post_form(Endpoints::CATEGORY, &[("keyword", keyword)])
			.await?;
		CategoryTree::from_json(&body)
	}
}
