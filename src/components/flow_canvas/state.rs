use crate::components::node_shapes::{self, ANCHOR_RADIUS, NodeVisual};
use crate::flow::editor::{
	self, Connection, EdgeChange, EdgeKind, EdgeStroke, EditorEdge, EditorNode, MarkerEnd,
	NodeChange, NodeSize, XYPosition,
};
use crate::flow::model::Port;

use super::geometry::{self, Point};

/// Curve used for edges that do not pick one.
pub const DEFAULT_EDGE_KIND: EdgeKind = EdgeKind::SmoothStep;
/// Side of the resize grip, world units.
pub const RESIZE_GRIP: f64 = 10.0;
/// Edges within this many screen pixels of the pointer are hit.
const EDGE_HIT: f64 = 6.0;
const MIN_NODE_SIDE: f64 = 40.0;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 4.0;

#[derive(Clone, Copy, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_id: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: XYPosition,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// A connection being dragged out of an anchor.
#[derive(Clone, Debug)]
pub struct PendingConnection {
	pub source: String,
	pub source_handle: Port,
	/// Pointer, diagram coordinates.
	pub cursor: Point,
}

#[derive(Clone, Debug)]
pub struct ResizeState {
	pub node_id: String,
	pub start_x: f64,
	pub start_y: f64,
	pub start_w: f64,
	pub start_h: f64,
	pub moved: bool,
}

/// What the canvas reports to its owner.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
	NodesChange(Vec<NodeChange>),
	EdgesChange(Vec<EdgeChange>),
	Connect(Connection),
	NodeClick(String),
	EdgeClick(String),
	PaneClick,
}

/// Resolved drawing path of one edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeGeometry {
	pub kind: EdgeKind,
	/// Polyline for hit testing and smooth-step drawing.
	pub points: Vec<Point>,
	/// Control points when drawn as a bezier.
	pub curve: Option<[Point; 4]>,
}

/// Local mirror of the graph plus interaction state. Pure: pointer input in,
/// [`CanvasEvent`]s out, no DOM access.
pub struct FlowCanvasState {
	pub nodes: Vec<EditorNode>,
	pub edges: Vec<EditorEdge>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub connecting: Option<PendingConnection>,
	pub resizing: Option<ResizeState>,
	pub hover_anchor: Option<(String, Port)>,
	pub width: f64,
	pub height: f64,
	fitted: bool,
}

impl FlowCanvasState {
	pub fn new(nodes: Vec<EditorNode>, edges: Vec<EditorEdge>, width: f64, height: f64) -> Self {
		let mut state = Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			connecting: None,
			resizing: None,
			hover_anchor: None,
			width,
			height,
			fitted: false,
		};
		state.sync(nodes, edges);
		state
	}

	/// Replaces the mirror with the owner's graph. The first non-empty graph
	/// is fitted into view.
	pub fn sync(&mut self, nodes: Vec<EditorNode>, edges: Vec<EditorEdge>) {
		self.nodes = nodes;
		self.edges = edges;
		if let Some(id) = &self.drag.node_id {
			if !self.nodes.iter().any(|n| &n.id == id) {
				self.drag = DragState::default();
			}
		}
		if !self.fitted && !self.nodes.is_empty() {
			self.fit_view();
			self.fitted = true;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node(&self, id: &str) -> Option<&EditorNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Absolute position of one of a node's anchors.
	pub fn handle_point(&self, node: &EditorNode, port: Port) -> Point {
		let (ax, ay) = node_shapes::visual(node).anchor(port);
		(node.position.x + ax, node.position.y + ay)
	}

	/// Topmost node whose outline holds the point.
	pub fn node_at(&self, gx: f64, gy: f64) -> Option<&EditorNode> {
		self.nodes.iter().rev().find(|n| {
			node_shapes::visual(n).contains(gx - n.position.x, gy - n.position.y)
		})
	}

	/// Anchor under the point, if any.
	pub fn anchor_at(&self, gx: f64, gy: f64) -> Option<(String, Port)> {
		let reach = (ANCHOR_RADIUS * 2.0) / self.transform.k.max(0.5);
		self.nodes.iter().rev().find_map(|n| {
			let visual = node_shapes::visual(n);
			visual.anchors().into_iter().find_map(|a| {
				let (ax, ay) = (n.position.x + a.x, n.position.y + a.y);
				let d = ((gx - ax).powi(2) + (gy - ay).powi(2)).sqrt();
				(d <= reach).then(|| (n.id.clone(), a.port))
			})
		})
	}

	/// Selected node whose resize grip is under the point.
	pub fn resize_grip_at(&self, gx: f64, gy: f64) -> Option<(String, NodeVisual)> {
		self.nodes.iter().rev().filter(|n| n.selected).find_map(|n| {
			let v = node_shapes::visual(n);
			let (cx, cy) = (n.position.x + v.width, n.position.y + v.height);
			let inside = (gx - cx).abs() <= RESIZE_GRIP && (gy - cy).abs() <= RESIZE_GRIP;
			inside.then(|| (n.id.clone(), v))
		})
	}

	pub fn edge_geometry(&self, edge: &EditorEdge) -> Option<EdgeGeometry> {
		let source = self.node(&edge.source)?;
		let target = self.node(&edge.target)?;
		let from_port = edge.source_handle.unwrap_or(Port::Right);
		let to_port = edge.target_handle.unwrap_or(Port::Left);
		let from = self.handle_point(source, from_port);
		let to = self.handle_point(target, to_port);
		let kind = edge.edge_type.unwrap_or(DEFAULT_EDGE_KIND);
		Some(match kind {
			EdgeKind::SmoothStep => EdgeGeometry {
				kind,
				points: geometry::smooth_step(from, from_port, to, to_port),
				curve: None,
			},
			EdgeKind::Default => {
				let c = geometry::bezier(from, from_port, to, to_port);
				EdgeGeometry {
					kind,
					points: geometry::sample_bezier(&c, 24),
					curve: Some(c),
				}
			}
		})
	}

	pub fn edge_at(&self, gx: f64, gy: f64) -> Option<&EditorEdge> {
		let reach = EDGE_HIT / self.transform.k;
		self.edges.iter().rev().find(|e| {
			self.edge_geometry(e)
				.is_some_and(|g| geometry::distance_to_polyline((gx, gy), &g.points) <= reach)
		})
	}

	// ---- pointer input ----

	pub fn pointer_down(&mut self, sx: f64, sy: f64) -> Vec<CanvasEvent> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut out = Vec::new();

		if let Some((source, port)) = self.anchor_at(gx, gy) {
			self.connecting = Some(PendingConnection {
				source,
				source_handle: port,
				cursor: (gx, gy),
			});
			return out;
		}

		if let Some((node_id, v)) = self.resize_grip_at(gx, gy) {
			self.resizing = Some(ResizeState {
				node_id,
				start_x: sx,
				start_y: sy,
				start_w: v.width,
				start_h: v.height,
				moved: false,
			});
			return out;
		}

		if let Some(node) = self.node_at(gx, gy) {
			let (id, start) = (node.id.clone(), node.position);
			self.drag = DragState {
				node_id: Some(id.clone()),
				start_x: sx,
				start_y: sy,
				node_start: start,
				moved: false,
			};
			self.select(Some(&id), None, &mut out);
			out.push(CanvasEvent::NodeClick(id));
			return out;
		}

		if let Some(edge) = self.edge_at(gx, gy) {
			let id = edge.id.clone();
			self.select(None, Some(&id), &mut out);
			out.push(CanvasEvent::EdgeClick(id));
			return out;
		}

		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
		self.select(None, None, &mut out);
		out.push(CanvasEvent::PaneClick);
		out
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) -> Vec<CanvasEvent> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut out = Vec::new();

		if let Some(pending) = self.connecting.as_mut() {
			pending.cursor = (gx, gy);
			self.hover_anchor = self.anchor_at(gx, gy);
			return out;
		}
		self.hover_anchor = self.anchor_at(gx, gy);

		if let Some(resize) = self.resizing.as_mut() {
			let k = self.transform.k;
			let size = NodeSize {
				width: Some((resize.start_w + (sx - resize.start_x) / k).max(MIN_NODE_SIDE)),
				height: Some((resize.start_h + (sy - resize.start_y) / k).max(MIN_NODE_SIDE)),
			};
			resize.moved = true;
			let change = NodeChange::Dimensions {
				id: resize.node_id.clone(),
				size: Some(size),
				resizing: true,
			};
			self.emit_nodes(vec![change], &mut out);
			return out;
		}

		if let Some(id) = self.drag.node_id.clone() {
			let k = self.transform.k;
			let position = XYPosition::new(
				self.drag.node_start.x + (sx - self.drag.start_x) / k,
				self.drag.node_start.y + (sy - self.drag.start_y) / k,
			);
			self.drag.moved = true;
			self.emit_nodes(
				vec![NodeChange::Position {
					id,
					position: Some(position),
					dragging: true,
				}],
				&mut out,
			);
			return out;
		}

		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
		out
	}

	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Vec<CanvasEvent> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut out = Vec::new();

		if let Some(pending) = self.connecting.take() {
			self.hover_anchor = None;
			let target = self.anchor_at(gx, gy).or_else(|| {
				// dropped on a body: use the nearest anchor of that node
				let node = self.node_at(gx, gy)?;
				let port = Port::ALL.into_iter().min_by(|a, b| {
					let da = dist((gx, gy), self.handle_point(node, *a));
					let db = dist((gx, gy), self.handle_point(node, *b));
					da.total_cmp(&db)
				})?;
				Some((node.id.clone(), port))
			});
			if let Some((target, port)) = target {
				let params = Connection {
					source: pending.source,
					source_handle: Some(pending.source_handle),
					target,
					target_handle: Some(port),
				};
				self.edges.push(optimistic_edge(&params));
				out.push(CanvasEvent::Connect(params));
			}
			return out;
		}

		if let Some(resize) = self.resizing.take() {
			if resize.moved {
				let size = self.node(&resize.node_id).and_then(|n| n.size);
				self.emit_nodes(
					vec![NodeChange::Dimensions {
						id: resize.node_id,
						size,
						resizing: false,
					}],
					&mut out,
				);
			}
			return out;
		}

		out.extend(self.end_drag());
		self.pan.active = false;
		out
	}

	/// Pointer left the canvas: a running drag settles where it is.
	pub fn pointer_leave(&mut self) -> Vec<CanvasEvent> {
		let mut out = self.end_drag();
		if let Some(resize) = self.resizing.take() {
			let size = self.node(&resize.node_id).and_then(|n| n.size);
			self.emit_nodes(
				vec![NodeChange::Dimensions {
					id: resize.node_id,
					size,
					resizing: false,
				}],
				&mut out,
			);
		}
		self.connecting = None;
		self.hover_anchor = None;
		self.pan.active = false;
		out
	}

	fn end_drag(&mut self) -> Vec<CanvasEvent> {
		let drag = std::mem::take(&mut self.drag);
		let mut out = Vec::new();
		if let (Some(id), true) = (drag.node_id, drag.moved) {
			let position = self.node(&id).map(|n| n.position);
			self.emit_nodes(
				vec![NodeChange::Position {
					id,
					position,
					dragging: false,
				}],
				&mut out,
			);
		}
		out
	}

	/// Zoom around a screen point; `delta_y > 0` zooms out.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.zoom_at(sx, sy, factor);
	}

	/// Zoom around the viewport centre.
	pub fn zoom_by(&mut self, factor: f64) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, factor);
	}

	fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Box around every node, diagram coordinates.
	pub fn graph_bounds(&self) -> Option<(f64, f64, f64, f64)> {
		geometry::bounds(self.nodes.iter().map(|n| {
			let v = node_shapes::visual(n);
			(n.position.x, n.position.y, v.width, v.height)
		}))
	}

	/// Centres all nodes in the viewport with some padding, never zooming
	/// in past 1:1.
	pub fn fit_view(&mut self) {
		let Some((x0, y0, x1, y1)) = self.graph_bounds() else {
			self.transform = ViewTransform::default();
			return;
		};
		let pad = 40.0;
		let (w, h) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k = ((self.width - 2.0 * pad) / w)
			.min((self.height - 2.0 * pad) / h)
			.clamp(MIN_ZOOM, 1.0);
		self.transform = ViewTransform {
			k,
			x: self.width / 2.0 - (x0 + w / 2.0) * k,
			y: self.height / 2.0 - (y0 + h / 2.0) * k,
		};
	}

	/// Removes whatever is selected; a node takes its edges with it.
	pub fn delete_selected(&mut self) -> Vec<CanvasEvent> {
		let mut out = Vec::new();
		let doomed_nodes: Vec<String> = self
			.nodes
			.iter()
			.filter(|n| n.selected)
			.map(|n| n.id.clone())
			.collect();
		let edge_changes: Vec<EdgeChange> = self
			.edges
			.iter()
			.filter(|e| e.selected || doomed_nodes.iter().any(|n| e.touches(n)))
			.map(|e| EdgeChange::Remove { id: e.id.clone() })
			.collect();
		let node_changes = doomed_nodes
			.into_iter()
			.map(|id| NodeChange::Remove { id })
			.collect();
		self.emit_nodes(node_changes, &mut out);
		self.emit_edges(edge_changes, &mut out);
		out
	}

	/// Single selection: at most one node or one edge.
	fn select(&mut self, node: Option<&str>, edge: Option<&str>, out: &mut Vec<CanvasEvent>) {
		let node_changes = self
			.nodes
			.iter()
			.filter_map(|n| {
				let want = node == Some(n.id.as_str());
				(n.selected != want).then(|| NodeChange::Select {
					id: n.id.clone(),
					selected: want,
				})
			})
			.collect();
		let edge_changes = self
			.edges
			.iter()
			.filter_map(|e| {
				let want = edge == Some(e.id.as_str());
				(e.selected != want).then(|| EdgeChange::Select {
					id: e.id.clone(),
					selected: want,
				})
			})
			.collect();
		self.emit_nodes(node_changes, out);
		self.emit_edges(edge_changes, out);
	}

	fn emit_nodes(&mut self, changes: Vec<NodeChange>, out: &mut Vec<CanvasEvent>) {
		if changes.is_empty() {
			return;
		}
		editor::apply_node_changes(&mut self.nodes, &changes);
		out.push(CanvasEvent::NodesChange(changes));
	}

	fn emit_edges(&mut self, changes: Vec<EdgeChange>, out: &mut Vec<CanvasEvent>) {
		if changes.is_empty() {
			return;
		}
		editor::apply_edge_changes(&mut self.edges, &changes);
		out.push(CanvasEvent::EdgesChange(changes));
	}
}

fn dist(a: Point, b: Point) -> f64 {
	((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Edge shown locally until the owner's graph comes back with its own copy.
fn optimistic_edge(params: &Connection) -> EditorEdge {
	let port = |p: Option<Port>| p.map(|p| format!("{:?}", p).to_lowercase()).unwrap_or_default();
	EditorEdge {
		id: format!(
			"xy-edge__{}{}-{}{}",
			params.source,
			port(params.source_handle),
			params.target,
			port(params.target_handle)
		),
		source: params.source.clone(),
		target: params.target.clone(),
		source_handle: params.source_handle,
		target_handle: params.target_handle,
		label: None,
		stroke: EdgeStroke::default(),
		edge_type: None,
		marker_end: Some(MarkerEnd::ArrowClosed),
		selected: false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::flow::editor::NodeData;
	use crate::flow::model::NodeKind;

	fn rect(id: &str, x: f64, y: f64) -> EditorNode {
		EditorNode {
			id: id.into(),
			kind: NodeKind::Rectangle,
			position: XYPosition::new(x, y),
			data: NodeData::default(),
			size: Some(NodeSize::default()),
			selected: false,
		}
	}

	fn edge(id: &str, source: &str, target: &str) -> EditorEdge {
		EditorEdge {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			source_handle: Some(Port::Right),
			target_handle: Some(Port::Left),
			label: None,
			stroke: EdgeStroke::default(),
			edge_type: None,
			marker_end: Some(MarkerEnd::ArrowClosed),
			selected: false,
		}
	}

	/// Identity transform so screen and diagram coordinates match.
	fn canvas(nodes: Vec<EditorNode>, edges: Vec<EditorEdge>) -> FlowCanvasState {
		let mut s = FlowCanvasState::new(nodes, edges, 1000.0, 800.0);
		s.transform = ViewTransform::default();
		s
	}

	fn node_changes(events: &[CanvasEvent]) -> Vec<NodeChange> {
		events
			.iter()
			.filter_map(|e| match e {
				CanvasEvent::NodesChange(c) => Some(c.clone()),
				_ => None,
			})
			.flatten()
			.collect()
	}

	#[test]
	fn dragging_emits_intermediate_then_settled_positions() {
		let mut s = canvas(vec![rect("a", 0.0, 0.0)], vec![]);

		let down = s.pointer_down(100.0, 60.0);
		assert!(down.contains(&CanvasEvent::NodeClick("a".into())));

		let moved = s.pointer_move(130.0, 90.0);
		assert_eq!(
			node_changes(&moved),
			vec![NodeChange::Position {
				id: "a".into(),
				position: Some(XYPosition::new(30.0, 30.0)),
				dragging: true,
			}]
		);
		// the mirror follows the pointer
		assert_eq!(s.node("a").unwrap().position, XYPosition::new(30.0, 30.0));

		let up = s.pointer_up(130.0, 90.0);
		assert_eq!(
			node_changes(&up),
			vec![NodeChange::Position {
				id: "a".into(),
				position: Some(XYPosition::new(30.0, 30.0)),
				dragging: false,
			}]
		);
	}

	#[test]
	fn click_without_move_does_not_emit_a_position() {
		let mut s = canvas(vec![rect("a", 0.0, 0.0)], vec![]);
		s.pointer_down(50.0, 50.0);
		let up = s.pointer_up(50.0, 50.0);
		assert!(up.is_empty());
	}

	#[test]
	fn connecting_two_anchors_appends_an_edge_and_reports_it() {
		let mut s = canvas(vec![rect("a", 0.0, 0.0), rect("b", 400.0, 0.0)], vec![]);
		// right anchor of a is at (200, 60), left anchor of b at (400, 60)
		assert!(s.pointer_down(200.0, 60.0).is_empty());
		s.pointer_move(300.0, 60.0);
		assert!(s.connecting.is_some());

		let up = s.pointer_up(401.0, 61.0);
		assert_eq!(
			up,
			vec![CanvasEvent::Connect(Connection {
				source: "a".into(),
				source_handle: Some(Port::Right),
				target: "b".into(),
				target_handle: Some(Port::Left),
			})]
		);
		assert_eq!(s.edges.len(), 1);
		assert_eq!(s.edges[0].stroke, EdgeStroke::default());
		assert!(s.connecting.is_none());
	}

	#[test]
	fn dropping_on_a_body_uses_the_nearest_anchor() {
		let mut s = canvas(vec![rect("a", 0.0, 0.0), rect("b", 400.0, 0.0)], vec![]);
		s.pointer_down(100.0, 120.0); // bottom anchor of a
		let up = s.pointer_up(500.0, 10.0);
		let CanvasEvent::Connect(params) = &up[0] else {
			panic!("expected a connect, got {:?}", up);
		};
		assert_eq!(params.source_handle, Some(Port::Bottom));
		assert_eq!(params.target, "b");
		assert_eq!(params.target_handle, Some(Port::Top));
	}

	#[test]
	fn self_loops_are_not_rejected() {
		let mut s = canvas(vec![rect("a", 0.0, 0.0)], vec![]);
		s.pointer_down(200.0, 60.0);
		let up = s.pointer_up(0.0, 60.0);
		assert!(matches!(&up[0], CanvasEvent::Connect(c) if c.source == "a" && c.target == "a"));
	}

	#[test]
	fn clicking_selects_exclusively() {
		let mut s = canvas(
			vec![rect("a", 0.0, 0.0), rect("b", 400.0, 0.0)],
			vec![edge("e", "a", "b")],
		);
		s.pointer_down(50.0, 50.0);
		s.pointer_up(50.0, 50.0);
		assert!(s.node("a").unwrap().selected);

		// edge runs along y = 60 between the nodes
		let events = s.pointer_down(300.0, 60.0);
		assert!(events.contains(&CanvasEvent::EdgeClick("e".into())));
		assert!(!s.node("a").unwrap().selected);
		assert!(s.edges[0].selected);
		s.pointer_up(300.0, 60.0);

		let events = s.pointer_down(700.0, 700.0);
		assert!(events.contains(&CanvasEvent::PaneClick));
		assert!(!s.edges[0].selected);
	}

	#[test]
	fn panning_moves_the_view_only() {
		let mut s = canvas(vec![rect("a", 0.0, 0.0)], vec![]);
		s.pointer_down(600.0, 600.0);
		s.pointer_move(650.0, 620.0);
		s.pointer_up(650.0, 620.0);
		assert_eq!((s.transform.x, s.transform.y), (50.0, 20.0));
		assert_eq!(s.node("a").unwrap().position, XYPosition::new(0.0, 0.0));
	}

	#[test]
	fn resize_grip_emits_dimensions() {
		let mut n = rect("a", 0.0, 0.0);
		n.selected = true;
		let mut s = canvas(vec![n], vec![]);
		s.pointer_down(200.0, 120.0);
		let moved = s.pointer_move(250.0, 140.0);
		assert_eq!(
			node_changes(&moved),
			vec![NodeChange::Dimensions {
				id: "a".into(),
				size: Some(NodeSize {
					width: Some(250.0),
					height: Some(140.0),
				}),
				resizing: true,
			}]
		);
		let up = s.pointer_up(250.0, 140.0);
		assert!(matches!(
			node_changes(&up).as_slice(),
			[NodeChange::Dimensions { resizing: false, size: Some(_), .. }]
		));
	}

	#[test]
	fn deleting_a_node_takes_its_edges() {
		let mut a = rect("a", 0.0, 0.0);
		a.selected = true;
		let mut s = canvas(
			vec![a, rect("b", 400.0, 0.0), rect("c", 0.0, 400.0)],
			vec![edge("ab", "a", "b"), edge("bc", "b", "c")],
		);
		let events = s.delete_selected();
		assert_eq!(
			events,
			vec![
				CanvasEvent::NodesChange(vec![NodeChange::Remove { id: "a".into() }]),
				CanvasEvent::EdgesChange(vec![EdgeChange::Remove { id: "ab".into() }]),
			]
		);
		assert_eq!(s.nodes.len(), 2);
		assert_eq!(s.edges.len(), 1);
	}

	#[test]
	fn wheel_zoom_keeps_the_point_under_the_cursor() {
		let mut s = canvas(vec![], vec![]);
		let before = s.screen_to_graph(300.0, 200.0);
		s.wheel(300.0, 200.0, -1.0);
		assert!(s.transform.k > 1.0);
		let after = s.screen_to_graph(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn fit_view_centres_the_graph() {
		let mut s = canvas(vec![rect("a", 1000.0, 1000.0)], vec![]);
		s.fit_view();
		let t = s.transform;
		assert!((1100.0 * t.k + t.x - 500.0).abs() < 1e-9);
		assert!((1060.0 * t.k + t.y - 400.0).abs() < 1e-9);
		assert_eq!(s.transform.k, 1.0);
	}

	#[test]
	fn sync_replaces_the_mirror() {
		let mut s = canvas(vec![rect("a", 0.0, 0.0)], vec![]);
		s.pointer_down(50.0, 50.0);
		s.sync(vec![rect("b", 0.0, 0.0)], vec![]);
		assert!(s.node("a").is_none());
		assert!(s.drag.node_id.is_none());
	}

	#[test]
	fn default_edges_route_as_smooth_steps() {
		let s = canvas(
			vec![rect("a", 0.0, 0.0), rect("b", 400.0, 200.0)],
			vec![edge("e", "a", "b")],
		);
		let g = s.edge_geometry(&s.edges[0]).unwrap();
		assert_eq!(g.kind, EdgeKind::SmoothStep);
		assert_eq!(g.points.first(), Some(&(200.0, 60.0)));
		assert_eq!(g.points.last(), Some(&(400.0, 260.0)));
		assert!(g.curve.is_none());
	}
}
