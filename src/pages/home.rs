use leptos::prelude::*;

use crate::components::graph_canvas::GraphEditor;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="editor-page">
				<div class="graph-overlay">
					<h1>"Shortest Path"</h1>
					<p class="subtitle">
						"Place vertices, connect them with weighted edges, then pick a start and a finish."
					</p>
				</div>
				<GraphEditor />
			</div>
		</ErrorBoundary>
	}
}
