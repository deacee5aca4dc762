use leptos::prelude::*;
use node_diagram_canvas::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(|| {
		view! { <App /> }
	})
}
