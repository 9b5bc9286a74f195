use leptos::prelude::*;
use leptos_router::components::A;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<main class="page">
			<h1>"Page not found"</h1>
			<p>
				<A href="/">"Back to search"</A>
			</p>
		</main>
	}
}
