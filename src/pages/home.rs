use leptos::prelude::*;

use crate::components::diagram::{DiagramCanvas, DiagramData, DiagramLink, DiagramNode};

/// The three-node chain shown on the home page.
fn sample_data() -> DiagramData {
	DiagramData {
		nodes: ["node1", "node2", "node3"]
			.into_iter()
			.map(DiagramNode::new)
			.collect(),
		links: vec![
			DiagramLink::new("node1", "node2"),
			DiagramLink::new("node2", "node3"),
		],
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let diagram_data = Signal::derive(sample_data);

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

			<div class="diagram-page">
				<DiagramCanvas data=diagram_data />
				<div class="diagram-overlay">
					<h1>"Node Diagram"</h1>
					<p class="subtitle">
						"Drag nodes to reposition. Scroll to zoom. Middle-drag to pan. Double-click a node to focus it."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
