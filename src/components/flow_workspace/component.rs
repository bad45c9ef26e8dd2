use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::inspector::Inspector;
use crate::components::flow_canvas::FlowCanvas;
use crate::components::toast::Toaster;
use crate::flow::workspace::{execute_save, fetch_flow};
use crate::flow::{
	Connection, EdgeChange, FlowWorkspace, NodeChange, NodeKind, WorkspacePhase, XYPosition,
};
use crate::store::FlowBackend;

/// Where the next added node lands, stepping diagonally so new nodes do not
/// stack exactly on top of each other.
fn spawn_position(existing: usize) -> XYPosition {
	let step = (existing % 8) as f64 * 30.0;
	XYPosition::new(100.0 + step, 100.0 + step)
}

/// Editor for one flow: toolbar, canvas and inspector around a
/// [`FlowWorkspace`].
#[component]
pub fn FlowEditor(#[prop(into)] initial_flow_id: String, store: FlowBackend) -> impl IntoView {
	let toaster = expect_context::<Toaster>();
	let store = StoredValue::new_local(store);
	let ws = RwSignal::new(FlowWorkspace::new());
	let flow_id = RwSignal::new(Some(initial_flow_id.clone()));
	let draft = RwSignal::new(initial_flow_id);

	// reloads whenever a flow is (re)selected
	Effect::new(move |_| {
		let Some(id) = flow_id.get() else {
			return;
		};
		match ws.try_update(|w| w.begin_load(&id)) {
			Some(Ok(())) => {}
			Some(Err(err)) => {
				log::warn!("{}", err);
				return;
			}
			None => return,
		}
		let backend = store.get_value();
		spawn_local(async move {
			let fetched = fetch_flow(&backend, &id).await;
			ws.try_update(|w| {
				// failures are logged and toasted inside
				w.finish_load(fetched, &toaster).ok();
			});
		});
	});

	let on_save = move |_: MouseEvent| {
		let plan = match ws.try_update(|w| w.begin_save()) {
			Some(Ok(plan)) => plan,
			Some(Err(err)) => {
				log::warn!("{}", err);
				return;
			}
			None => return,
		};
		let backend = store.get_value();
		spawn_local(async move {
			let report = execute_save(&backend, &plan).await;
			ws.try_update(|w| {
				// failures are logged and toasted inside
				w.finish_save(report, &toaster).ok();
			});
		});
	};

	let on_open = move |_: MouseEvent| {
		let id = draft.get_untracked().trim().to_owned();
		if !id.is_empty() {
			flow_id.set(Some(id));
		}
	};

	let add_node = move |kind: NodeKind| {
		ws.update(|w| {
			let id = w.add_node(kind, spawn_position(w.nodes().len()));
			w.select_node(&id);
		});
	};

	let nodes = Memo::new(move |_| ws.with(|w| w.nodes().to_vec()));
	let edges = Memo::new(move |_| ws.with(|w| w.edges().to_vec()));

	let on_nodes_change =
		Callback::new(move |changes: Vec<NodeChange>| ws.update(|w| w.apply_node_changes(&changes)));
	let on_edges_change =
		Callback::new(move |changes: Vec<EdgeChange>| ws.update(|w| w.apply_edge_changes(&changes)));
	let on_connect = Callback::new(move |params: Connection| {
		ws.update(|w| {
			if let Err(err) = w.connect(params) {
				log::warn!("Connection rejected: {}", err);
			}
		})
	});
	let on_node_click = Callback::new(move |id: String| ws.update(|w| w.select_node(&id)));
	let on_edge_click = Callback::new(move |id: String| ws.update(|w| w.select_edge(&id)));
	let on_pane_click = Callback::new(move |_: ()| ws.update(|w| w.clear_selection()));

	let save_disabled = move || ws.with(|w| w.is_saving() || w.is_loading() || w.flow_id().is_none());
	let status = move || {
		ws.with(|w| match w.phase() {
			WorkspacePhase::Idle => "No flow loaded",
			WorkspacePhase::Loading => "Loading…",
			WorkspacePhase::Saving => "Saving…",
			WorkspacePhase::Ready if w.is_dirty() => "Unsaved changes",
			WorkspacePhase::Ready => "All changes saved",
		})
	};

	view! {
		<div class="flow-editor">
			<header class="flow-toolbar">
				<input
					type="text"
					placeholder="Flow id"
					prop:value=move || draft.get()
					on:input=move |ev| draft.set(event_target_value(&ev))
				/>
				<button on:click=on_open>"Open"</button>
				<span class="toolbar-divider" />
				{NodeKind::ALL
					.into_iter()
					.map(|kind| {
						view! {
							<button title="Add node" on:click=move |_| add_node(kind)>
								{kind.title()}
							</button>
						}
					})
					.collect_view()}
				<span class="toolbar-divider" />
				<button class="primary" disabled=save_disabled on:click=on_save>
					{move || if ws.with(|w| w.is_saving()) { "Saving…" } else { "Save" }}
				</button>
				<span class="flow-status">{status}</span>
			</header>
			<div class="flow-body">
				<div class="flow-stage">
					<FlowCanvas
						nodes=nodes
						edges=edges
						on_nodes_change=on_nodes_change
						on_edges_change=on_edges_change
						on_connect=on_connect
						on_node_click=on_node_click
						on_edge_click=on_edge_click
						on_pane_click=on_pane_click
					/>
				</div>
				<Inspector ws=ws />
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn spawn_positions_cycle() {
		assert_eq!(spawn_position(0), XYPosition::new(100.0, 100.0));
		assert_eq!(spawn_position(1), XYPosition::new(130.0, 130.0));
		assert_eq!(spawn_position(8), spawn_position(0));
	}
}
