use leptos::prelude::*;

use crate::error::Result;
use crate::flow::{EdgeChange, EdgeKind, FlowWorkspace, NodeChange};

/// Runs one edit, logging a rejected one.
fn edit(ws: RwSignal<FlowWorkspace>, f: impl FnOnce(&mut FlowWorkspace) -> Result<()>) {
	ws.update(|w| {
		if let Err(err) = f(w) {
			log::warn!("{}", err);
		}
	});
}

fn node_panel(ws: RwSignal<FlowWorkspace>, id: String) -> impl IntoView {
	let (kind, label, description) = ws
		.with_untracked(|w| {
			w.node(&id)
				.map(|n| (n.kind.title(), n.data.label.clone(), n.data.description.clone()))
		})
		.unwrap_or_default();
	let (label_id, description_id) = (id.clone(), id.clone());

	view! {
		<div class="inspector-panel">
			<h3>{kind}</h3>
			<label>
				"Label"
				<input
					type="text"
					prop:value=label
					on:input=move |ev| {
						edit(ws, |w| w.set_node_label(&label_id, &event_target_value(&ev)))
					}
				/>
			</label>
			<label>
				"Description"
				<textarea
					prop:value=description
					on:input=move |ev| {
						edit(ws, |w| w.set_node_description(&description_id, &event_target_value(&ev)))
					}
				/>
			</label>
			<button
				class="danger"
				on:click=move |_| {
					ws.update(|w| w.apply_node_changes(&[NodeChange::Remove { id: id.clone() }]))
				}
			>
				"Delete node"
			</button>
		</div>
	}
}

fn edge_panel(ws: RwSignal<FlowWorkspace>, id: String) -> impl IntoView {
	let (label, curved) = ws
		.with_untracked(|w| {
			w.edge(&id).map(|e| {
				(
					e.label.clone().unwrap_or_default(),
					e.edge_type == Some(EdgeKind::SmoothStep),
				)
			})
		})
		.unwrap_or_default();
	let (label_id, kind_id) = (id.clone(), id.clone());

	view! {
		<div class="inspector-panel">
			<h3>"Connection"</h3>
			<label>
				"Label"
				<input
					type="text"
					prop:value=label
					on:input=move |ev| {
						edit(ws, |w| w.set_edge_label(&label_id, Some(event_target_value(&ev))))
					}
				/>
			</label>
			<label class="checkbox">
				<input
					type="checkbox"
					prop:checked=curved
					on:change=move |ev| {
						let kind = if event_target_checked(&ev) {
							EdgeKind::SmoothStep
						} else {
							EdgeKind::Default
						};
						edit(ws, |w| w.set_edge_kind(&kind_id, kind))
					}
				/>
				"Curved"
			</label>
			<button
				class="danger"
				on:click=move |_| {
					ws.update(|w| w.apply_edge_changes(&[EdgeChange::Remove { id: id.clone() }]))
				}
			>
				"Delete connection"
			</button>
		</div>
	}
}

/// Property editor for the current selection.
#[component]
pub fn Inspector(ws: RwSignal<FlowWorkspace>) -> impl IntoView {
	// rebuilt only when the selection moves, so inputs keep focus while typing
	let selection = Memo::new(move |_| {
		ws.with(|w| {
			(
				w.selected_node().map(String::from),
				w.selected_edge().map(String::from),
			)
		})
	});

	view! {
		<aside class="inspector">
			{move || match selection.get() {
				(Some(node), _) => node_panel(ws, node).into_any(),
				(None, Some(edge)) => edge_panel(ws, edge).into_any(),
				(None, None) => {
					view! { <p class="muted">"Select a node or connection to edit it."</p> }
						.into_any()
				}
			}}
		</aside>
	}
}
