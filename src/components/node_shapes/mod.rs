//! Node renderers: pure functions from a node's payload to the shape the
//! canvas draws and hit-tests.

mod circle;
mod database;
mod diamond;
mod note;
mod rectangle;

pub use database::ROW_HEIGHT as TABLE_ROW_HEIGHT;

use crate::flow::editor::{EditorNode, NodeData, NodeSize};
use crate::flow::model::{NodeKind, Port};

/// Colour of the selection ring.
pub const SELECTION_COLOR: &str = "#9F7AEA";
/// Radius of an anchor dot.
pub const ANCHOR_RADIUS: f64 = 5.0;

/// Outline family of a visual.
#[derive(Clone, Debug, PartialEq)]
pub enum Outline {
	Rounded { radius: f64 },
	Diamond,
	Ellipse,
	Table { header: f64 },
	Note { fold: f64 },
}

/// One text row inside a node.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
	pub text: String,
	/// Right-aligned secondary text (column type).
	pub detail: Option<String>,
	/// Key badge such as `PK`.
	pub marker: Option<&'static str>,
	pub muted: bool,
}

impl TextLine {
	fn plain(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			detail: None,
			marker: None,
			muted: false,
		}
	}

	fn muted(text: impl Into<String>) -> Self {
		Self {
			muted: true,
			..Self::plain(text)
		}
	}
}

/// A connection anchor in node-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
	pub port: Port,
	pub x: f64,
	pub y: f64,
}

/// Everything needed to draw one node, relative to its top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	pub outline: Outline,
	pub width: f64,
	pub height: f64,
	pub fill: String,
	pub border: String,
	pub border_width: f64,
	pub title: String,
	pub lines: Vec<TextLine>,
	pub selected: bool,
}

impl NodeVisual {
	/// The four anchors: top and bottom centre, left and right middle.
	pub fn anchors(&self) -> [Anchor; 4] {
		Port::ALL.map(|port| {
			let (x, y) = self.anchor(port);
			Anchor { port, x, y }
		})
	}

	pub fn anchor(&self, port: Port) -> (f64, f64) {
		let (w, h) = (self.width, self.height);
		match port {
			Port::Top => (w / 2.0, 0.0),
			Port::Left => (0.0, h / 2.0),
			Port::Right => (w, h / 2.0),
			Port::Bottom => (w / 2.0, h),
		}
	}

	/// Whether a node-local point lies inside the outline.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		let (w, h) = (self.width, self.height);
		if x < 0.0 || y < 0.0 || x > w || y > h {
			return false;
		}
		let (dx, dy) = ((x - w / 2.0) / (w / 2.0), (y - h / 2.0) / (h / 2.0));
		match self.outline {
			Outline::Ellipse => dx * dx + dy * dy <= 1.0,
			Outline::Diamond => dx.abs() + dy.abs() <= 1.0,
			_ => true,
		}
	}
}

/// Inputs of a renderer.
#[derive(Clone, Copy, Debug)]
pub struct NodeProps<'a> {
	pub data: &'a NodeData,
	pub size: Option<NodeSize>,
	pub selected: bool,
}

impl NodeProps<'_> {
	fn width_or(&self, default: f64) -> f64 {
		self.size.and_then(|s| s.width).unwrap_or(default)
	}

	fn height_or(&self, default: f64) -> f64 {
		self.size.and_then(|s| s.height).unwrap_or(default)
	}

	fn fill_or(&self, default: &str) -> String {
		self.data.style.color.clone().unwrap_or_else(|| default.into())
	}

	fn border_or(&self, default: &str) -> String {
		self.data
			.style
			.border_color
			.clone()
			.unwrap_or_else(|| default.into())
	}

	fn border_width(&self) -> f64 {
		if self.selected { 3.0 } else { 2.0 }
	}
}

/// Renders any node through the renderer registered for its kind.
pub fn visual(node: &EditorNode) -> NodeVisual {
	let props = NodeProps {
		data: &node.data,
		size: node.size,
		selected: node.selected,
	};
	match node.kind {
		NodeKind::Rectangle => rectangle::render(props),
		NodeKind::Diamond => diamond::render(props),
		NodeKind::Circle => circle::render(props),
		NodeKind::Database => database::render(props),
		NodeKind::Note => note::render(props),
	}
}

/// Greedy word wrap by character count.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
	let max_chars = max_chars.max(1);
	let mut lines = Vec::new();
	for paragraph in text.lines() {
		let mut line = String::new();
		for word in paragraph.split_whitespace() {
			if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > max_chars {
				lines.push(std::mem::take(&mut line));
			}
			if !line.is_empty() {
				line.push(' ');
			}
			line.push_str(word);
		}
		lines.push(line);
	}
	lines
}
