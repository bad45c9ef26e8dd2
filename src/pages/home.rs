use leptos::prelude::*;

use crate::components::flow_workspace::FlowEditor;
use crate::config::AppConfig;
use crate::store::FlowBackend;

/// Default Home Page: the editor on the configured flow.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let store = FlowBackend::from_config(&config);

	view! {
		<main class="fullscreen-editor">
			<FlowEditor initial_flow_id=config.default_flow_id store=store />
		</main>
	}
}
