use leptos::prelude::*;
use leptos::task::spawn_local;

use super::home::SearchSession;
use super::search_form::SearchForm;
use crate::api::ApiClient;
use crate::components::force_graph::ForceGraphSvg;
use crate::components::tree_graph::{CategoryTree, CategoryTreeSvg};
use crate::config::{API_BASE, CanvasConfig, CanvasSizing};

/// Window-sized related-term graph with the keyword's category tree beside it.
#[component]
pub fn Explore() -> impl IntoView {
	let session = SearchSession::new();
	let tree = RwSignal::new(None::<CategoryTree>);

	let on_search = Callback::new(move |query| {
		tree.set(None);
		let Some((request, query)) = session.search(query) else {
			return;
		};
		spawn_local(async move {
			let result = ApiClient::new(API_BASE).categories(&query.keyword).await;
			if !session.is_current(request) {
				return;
			}
			match result {
				Ok(categories) => tree.set(Some(categories)),
				Err(err) => session.fail(&err),
			}
		});
	});

	view! {
		<main class="page explore">
			<SearchForm on_search=on_search />
			<p id="msg" class="status">{move || session.status.get()}</p>
			<div class="panels">
				<section class="panel graph-panel">
					<ForceGraphSvg data=session.graph config=CanvasConfig::RESPONSIVE />
				</section>
				<section class="panel tree-panel">
					<CategoryTreeSvg data=tree sizing=CanvasSizing::Responsive />
				</section>
			</div>
		</main>
	}
}
