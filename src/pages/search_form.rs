use leptos::prelude::*;

use crate::config::DEFAULT_DISP_COUNT;
use crate::error::GraphError;

/// A validated form submission.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
	pub keyword: String,
	pub disp_count: u32,
}

impl Query {
	pub fn parse(keyword: &str, disp_count: &str) -> Result<Self, GraphError> {
		let keyword = keyword.trim();
		if keyword.is_empty() {
			return Err(GraphError::Input("enter a keyword".into()));
		}
		let disp_count = disp_count
			.trim()
			.parse::<u32>()
			.ok()
			.filter(|&n| n > 0)
			.ok_or_else(|| GraphError::Input("display count must be a positive whole number".into()))?;
		Ok(Self {
			keyword: keyword.to_string(),
			disp_count,
		})
	}
}

/// Keyword and display-count inputs with a search button.
///
/// `on_search` receives the raw parse result so the page can reset its
/// canvas and show the message itself.
#[component]
pub fn SearchForm(on_search: Callback<Result<Query, GraphError>>) -> impl IntoView {
	let keyword = RwSignal::new(String::new());
	let disp_count = RwSignal::new(DEFAULT_DISP_COUNT.to_string());

	let submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		on_search.run(Query::parse(&keyword.get_untracked(), &disp_count.get_untracked()));
	};

	view! {
		<form class="search-form" on:submit=submit>
			<label>
				"Keyword "
				<input
					type="text"
					id="keyword"
					prop:value=keyword
					on:input=move |ev| keyword.set(event_target_value(&ev))
				/>
			</label>
			<label>
				"Terms "
				<input
					type="number"
					id="disp_count"
					min="1"
					prop:value=disp_count
					on:input=move |ev| disp_count.set(event_target_value(&ev))
				/>
			</label>
			<button type="submit" id="search_button">"Search"</button>
		</form>
	}
}
