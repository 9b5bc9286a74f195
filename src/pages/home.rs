use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};

use super::search_form::{Query, SearchForm};
use crate::api::ApiClient;
use crate::components::force_graph::{ForceGraphSvg, Graph};
use crate::config::{API_BASE, CanvasConfig};
use crate::error::GraphError;

/// Status line and drawn graph of the last search, guarded against stale replies.
#[derive(Clone, Copy)]
pub struct SearchSession {
	pub status: RwSignal<Option<String>>,
	pub graph: RwSignal<Option<Graph>>,
	generation: StoredValue<u64>,
}

impl SearchSession {
	pub fn new() -> Self {
		Self {
			status: RwSignal::new(None),
			graph: RwSignal::new(None),
			generation: StoredValue::new(0),
		}
	}

	/// Clears the message and canvas and returns the id of the new request.
	pub fn reset(&self) -> u64 {
		self.status.set(None);
		self.graph.set(None);
		self.generation.update_value(|g| *g += 1);
		self.generation.get_value()
	}

	/// Whether `request` is still the latest one.
	pub fn is_current(&self, request: u64) -> bool {
		self.generation.get_value() == request
	}

	pub fn fail(&self, err: &GraphError) {
		warn!("{err}");
		self.status.set(Some(err.to_string()));
	}

	/// Resets, then fetches and draws the related-term graph for `query`.
	pub fn search(self, query: Result<Query, GraphError>) -> Option<(u64, Query)> {
		let request = self.reset();
		let query = match query {
			Ok(query) => query,
			Err(err) => {
				self.fail(&err);
				return None;
			}
		};

		info!("searching \"{}\" ({} terms)", query.keyword, query.disp_count);
		let (keyword, disp_count) = (query.keyword.clone(), query.disp_count);
		spawn_local(async move {
			let result = ApiClient::new(API_BASE).search(&keyword, disp_count).await;
			if !self.is_current(request) {
				return;
			}
			match result {
				Ok(graph) => self.graph.set(Some(graph)),
				Err(err) => self.fail(&err),
			}
		});
		Some((request, query))
	}
}

/// Search form above a fixed 800x600 related-term graph.
#[component]
pub fn Home() -> impl IntoView {
	let session = SearchSession::new();
	let on_search = Callback::new(move |query| {
		session.search(query);
	});

	view! {
		<main class="page">
			<h1>"Related terms"</h1>
			<SearchForm on_search=on_search />
			<p id="msg" class="status">{move || session.status.get()}</p>
			<ForceGraphSvg data=session.graph config=CanvasConfig::FIXED />
		</main>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn newer_request_makes_older_ones_stale() {
		let owner = Owner::new();
		owner.with(|| {
			let session = SearchSession::new();
			let first = session.reset();
			assert!(session.is_current(first));

			let second = session.reset();
			assert_ne!(first, second);
			assert!(!session.is_current(first));
			assert!(session.is_current(second));
		});
	}

	#[test]
	fn reset_clears_status_and_graph() {
		let owner = Owner::new();
		owner.with(|| {
			let session = SearchSession::new();
			session.status.set(Some("old message".into()));
			session.graph.set(Some(
				Graph::from_json(r#"{"nodes": [{"id": "A", "size": 1}]}"#).unwrap(),
			));
			session.reset();
			assert_eq!(session.status.get_untracked(), None);
			assert_eq!(session.graph.get_untracked(), None);
		});
	}

	#[test]
	fn server_error_becomes_the_status_line() {
		let owner = Owner::new();
		owner.with(|| {
			let session = SearchSession::new();
			let err = Graph::from_json(r#"{"error": "no results"}"#).unwrap_err();
			session.fail(&err);
			assert_eq!(session.status.get_untracked().as_deref(), Some("no results"));
			assert_eq!(session.graph.get_untracked(), None);
		});
	}

	#[test]
	fn invalid_query_reports_without_fetching() {
		let owner = Owner::new();
		owner.with(|| {
			let session = SearchSession::new();
			let before = session.reset();
			let query = Query::parse("", "30");
			assert_eq!(session.search(query), None);
			assert!(!session.is_current(before));
			assert_eq!(session.status.get_untracked().as_deref(), Some("enter a keyword"));
		});
	}
}
