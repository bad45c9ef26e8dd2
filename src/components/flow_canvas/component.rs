use std::cell::RefCell;
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use super::render;
use super::state::{CanvasEvent, FlowCanvasState};
use crate::flow::{Connection, EdgeChange, EditorEdge, EditorNode, NodeChange};

type SharedState = Rc<RefCell<Option<FlowCanvasState>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Owner callbacks, copied into every event handler.
#[derive(Clone, Copy)]
struct Handlers {
	on_nodes_change: Callback<Vec<NodeChange>>,
	on_edges_change: Callback<Vec<EdgeChange>>,
	on_connect: Callback<Connection>,
	on_node_click: Option<Callback<String>>,
	on_edge_click: Option<Callback<String>>,
	on_pane_click: Option<Callback<()>>,
}

impl Handlers {
	fn dispatch(self, events: Vec<CanvasEvent>) {
		for event in events {
			match event {
				CanvasEvent::NodesChange(changes) => self.on_nodes_change.run(changes),
				CanvasEvent::EdgesChange(changes) => self.on_edges_change.run(changes),
				CanvasEvent::Connect(params) => self.on_connect.run(params),
				CanvasEvent::NodeClick(id) => {
					if let Some(cb) = self.on_node_click {
						cb.run(id);
					}
				}
				CanvasEvent::EdgeClick(id) => {
					if let Some(cb) = self.on_edge_click {
						cb.run(id);
					}
				}
				CanvasEvent::PaneClick => {
					if let Some(cb) = self.on_pane_click {
						cb.run(());
					}
				}
			}
		}
	}
}

/// Runs `f` against the canvas state and reports what it produced. The state
/// borrow is released before any owner callback runs.
fn drive(
	state: &SharedState,
	handlers: Handlers,
	f: impl FnOnce(&mut FlowCanvasState) -> Vec<CanvasEvent>,
) {
	let events = match state.borrow_mut().as_mut() {
		Some(s) => f(s),
		None => return,
	};
	handlers.dispatch(events);
}

/// Pointer position relative to the canvas.
fn local_point(canvas_ref: NodeRef<Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|(w, h)| *w > 0.0 && *h > 0.0)
		.unwrap_or((800.0, 600.0))
}

/// Interactive node-graph canvas.
///
/// The canvas keeps its own mirror of `nodes` and `edges` so drags render
/// immediately; every interaction is reported through the callbacks and the
/// mirror is replaced whenever the owner's signals change.
#[component]
pub fn FlowCanvas(
	#[prop(into)] nodes: Signal<Vec<EditorNode>>,
	#[prop(into)] edges: Signal<Vec<EditorEdge>>,
	#[prop(into)] on_nodes_change: Callback<Vec<NodeChange>>,
	#[prop(into)] on_edges_change: Callback<Vec<EdgeChange>>,
	#[prop(into)] on_connect: Callback<Connection>,
	#[prop(optional, into)] on_node_click: Option<Callback<String>>,
	#[prop(optional, into)] on_edge_click: Option<Callback<String>>,
	#[prop(optional, into)] on_pane_click: Option<Callback<()>>,
) -> impl IntoView {
	let handlers = Handlers {
		on_nodes_change,
		on_edges_change,
		on_connect,
		on_node_click,
		on_edge_click,
		on_pane_click,
	};
	let canvas_ref = NodeRef::<Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>().ok(),
			_ => None,
		};
		let Some(ctx) = ctx else {
			log::error!("Canvas 2d context unavailable");
			return;
		};
		*state_init.borrow_mut() = Some(FlowCanvasState::new(
			nodes.get_untracked(),
			edges.get_untracked(),
			w,
			h,
		));

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref s) = *state_anim.borrow() {
				render::render(s, &ctx);
			}
			let window: Option<Window> = web_sys::window();
			if let (Some(window), Some(cb)) = (window, animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_sync = state.clone();
	Effect::new(move |_| {
		let (n, e) = (nodes.get(), edges.get());
		if let Some(ref mut s) = *state_sync.borrow_mut() {
			s.sync(n, e);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(canvas) = canvas_ref.get() {
			let _ = canvas.focus();
		}
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		drive(&state_md, handlers, |s| s.pointer_down(x, y));
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		drive(&state_mm, handlers, |s| s.pointer_move(x, y));
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		drive(&state_mu, handlers, |s| s.pointer_up(x, y));
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		drive(&state_ml, handlers, |s| s.pointer_leave());
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	let state_kd = state.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if matches!(ev.key().as_str(), "Delete" | "Backspace") {
			ev.prevent_default();
			drive(&state_kd, handlers, |s| s.delete_selected());
		}
	};

	let view_control = move |f: fn(&mut FlowCanvasState)| {
		let state = state.clone();
		move |_: MouseEvent| {
			if let Some(ref mut s) = *state.borrow_mut() {
				f(s);
			}
		}
	};

	view! {
		<div class="flow-canvas">
			<canvas
				node_ref=canvas_ref
				tabindex="0"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:keydown=on_keydown
				style="display: block; outline: none; cursor: default;"
			/>
			<div class="flow-canvas-controls">
				<button title="Zoom in" on:click=view_control(|s| s.zoom_by(1.2))>"+"</button>
				<button title="Zoom out" on:click=view_control(|s| s.zoom_by(1.0 / 1.2))>"−"</button>
				<button title="Fit view" on:click=view_control(FlowCanvasState::fit_view)>"⤢"</button>
			</div>
		</div>
	}
}
