//! In-memory graph-editor model shared by the workspace and the canvas.

use serde_json::{Map, Value};

use super::model::{DbField, NodeKind, NodeStyle, Port};

/// Marker prefix of ids that have not been persisted yet.
pub const TEMP_ID_PREFIX: &str = "temp-";

/// Default edge stroke colour.
pub const EDGE_COLOR: &str = "#6B46C1";
/// Default edge stroke width.
pub const EDGE_WIDTH: f64 = 2.0;

/// True for client-side placeholder ids.
pub fn is_temp_id(id: &str) -> bool {
	id.starts_with(TEMP_ID_PREFIX)
}

/// A point in diagram coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct XYPosition {
	/// Horizontal, growing to the right.
	pub x: f64,
	/// Vertical, growing downwards.
	pub y: f64,
}

impl XYPosition {
	/// Point at `(x, y)`.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Explicit node box size; missing sides fall back to the shape default.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeSize {
	/// Box width.
	pub width: Option<f64>,
	/// Box height.
	pub height: Option<f64>,
}

/// Render payload of a node.
///
/// `label` and `description` are kept apart from the free-form payload so
/// that a payload or style key of the same name can never shadow them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeData {
	/// Title text.
	pub label: String,
	/// Secondary text.
	pub description: String,
	/// Kind-specific keys (`fields`, `content`, `radius`, ...).
	pub payload: Map<String, Value>,
	/// Colour overrides.
	pub style: NodeStyle,
}

impl NodeData {
	/// Flat view of everything the node carries: payload, then style, then
	/// the explicit text fields, later keys winning.
	pub fn merged(&self) -> Map<String, Value> {
		let mut out = self.payload.clone();
		if let Ok(Value::Object(style)) = serde_json::to_value(&self.style) {
			out.extend(style);
		}
		out.insert("label".into(), Value::String(self.label.clone()));
		out.insert(
			"description".into(),
			Value::String(self.description.clone()),
		);
		out
	}

	/// Columns of a database node; malformed entries are skipped.
	pub fn fields(&self) -> Vec<DbField> {
		match self.payload.get("fields") {
			Some(Value::Array(items)) => items
				.iter()
				.filter_map(|v| serde_json::from_value(v.clone()).ok())
				.collect(),
			_ => Vec::new(),
		}
	}

	/// Body text of a note.
	pub fn content(&self) -> Option<&str> {
		self.payload.get("content").and_then(Value::as_str)
	}

	/// Radius of a circle.
	pub fn radius(&self) -> Option<f64> {
		self.payload.get("radius").and_then(Value::as_f64)
	}
}

/// A node as the canvas sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorNode {
	/// Backend id, or a temp id until the first save.
	pub id: String,
	/// Shape kind.
	pub kind: NodeKind,
	/// Top-left corner in diagram coordinates.
	pub position: XYPosition,
	/// Render payload.
	pub data: NodeData,
	/// Explicit box size.
	pub size: Option<NodeSize>,
	/// Selection flag.
	pub selected: bool,
}

/// Curve used to draw an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
	/// Orthogonal path with rounded corners.
	SmoothStep,
	/// Cubic bezier.
	Default,
}

/// Arrowhead at the target end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerEnd {
	/// Filled triangle.
	ArrowClosed,
}

/// Stroke of an edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStroke {
	/// CSS colour.
	pub stroke: String,
	/// Line width in pixels.
	pub stroke_width: f64,
}

impl Default for EdgeStroke {
	fn default() -> Self {
		Self {
			stroke: EDGE_COLOR.into(),
			stroke_width: EDGE_WIDTH,
		}
	}
}

/// A directed edge as the canvas sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorEdge {
	/// Backend id, or a temp id until the first save.
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Source anchor; the right side when absent.
	pub source_handle: Option<Port>,
	/// Target anchor; the left side when absent.
	pub target_handle: Option<Port>,
	/// Text drawn at the middle of the edge.
	pub label: Option<String>,
	/// Colour and width.
	pub stroke: EdgeStroke,
	/// `None` renders with the canvas default (smooth-step).
	pub edge_type: Option<EdgeKind>,
	/// Arrowhead at the target.
	pub marker_end: Option<MarkerEnd>,
	/// Selection flag.
	pub selected: bool,
}

impl EditorEdge {
	/// Whether either end is `node_id`.
	pub fn touches(&self, node_id: &str) -> bool {
		self.source == node_id || self.target == node_id
	}
}

/// Parameters of a user-drawn connection.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	/// Node the drag started on.
	pub source: String,
	/// Anchor the drag started on.
	pub source_handle: Option<Port>,
	/// Node the drag ended on.
	pub target: String,
	/// Anchor the drag ended on.
	pub target_handle: Option<Port>,
}

/// Change descriptor emitted by the canvas for a node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeChange {
	/// Node moved.
	Position {
		/// Node id.
		id: String,
		/// New top-left corner, if known.
		position: Option<XYPosition>,
		/// Still being dragged.
		dragging: bool,
	},
	/// Node resized.
	Dimensions {
		/// Node id.
		id: String,
		/// New box size, if known.
		size: Option<NodeSize>,
		/// Still being resized.
		resizing: bool,
	},
	/// Selection toggled.
	Select {
		/// Node id.
		id: String,
		/// New flag.
		selected: bool,
	},
	/// Node deleted.
	Remove {
		/// Node id.
		id: String,
	},
}

impl NodeChange {
	/// Id of the node the change is about.
	pub fn id(&self) -> &str {
		match self {
			NodeChange::Position { id, .. }
			| NodeChange::Dimensions { id, .. }
			| NodeChange::Select { id, .. }
			| NodeChange::Remove { id } => id,
		}
	}
}

/// Change descriptor emitted by the canvas for an edge.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeChange {
	/// Selection toggled.
	Select {
		/// Edge id.
		id: String,
		/// New flag.
		selected: bool,
	},
	/// Edge deleted.
	Remove {
		/// Edge id.
		id: String,
	},
}

/// Applies changes to a node list the way the canvas mirror needs it:
/// every position and size update lands, dragging or not.
pub fn apply_node_changes(nodes: &mut Vec<EditorNode>, changes: &[NodeChange]) {
	for change in changes {
		match change {
			NodeChange::Remove { id } => nodes.retain(|n| &n.id != id),
			NodeChange::Position { id, position, .. } => {
				if let (Some(node), Some(pos)) = (nodes.iter_mut().find(|n| &n.id == id), position)
				{
					node.position = *pos;
				}
			}
			NodeChange::Dimensions { id, size, .. } => {
				if let (Some(node), Some(size)) = (nodes.iter_mut().find(|n| &n.id == id), size) {
					node.size = Some(*size);
				}
			}
			NodeChange::Select { id, selected } => {
				if let Some(node) = nodes.iter_mut().find(|n| &n.id == id) {
					node.selected = *selected;
				}
			}
		}
	}
}

/// Edge counterpart of [`apply_node_changes`].
pub fn apply_edge_changes(edges: &mut Vec<EditorEdge>, changes: &[EdgeChange]) {
	for change in changes {
		match change {
			EdgeChange::Remove { id } => edges.retain(|e| &e.id != id),
			EdgeChange::Select { id, selected } => {
				if let Some(edge) = edges.iter_mut().find(|e| &e.id == id) {
					edge.selected = *selected;
				}
			}
		}
	}
}
