//! Persisted row shapes for flow nodes and connections.
//!
//! Field names match the backend entities exactly (`type`, `borderColor`,
//! `from_node_id`, ...), so these types are (de)serialized as-is.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Shape kind of a node. Fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// Plain box.
	Rectangle,
	/// Decision rhombus.
	Diamond,
	/// Circle sized by `data.radius`.
	Circle,
	/// Database table listing `data.fields`.
	Database,
	/// Sticky note showing `data.content`.
	Note,
}

impl NodeKind {
	/// Every kind, in toolbar order.
	pub const ALL: [NodeKind; 5] = [
		NodeKind::Rectangle,
		NodeKind::Diamond,
		NodeKind::Circle,
		NodeKind::Database,
		NodeKind::Note,
	];

	/// Human-readable name.
	pub fn title(self) -> &'static str {
		match self {
			NodeKind::Rectangle => "Rectangle",
			NodeKind::Diamond => "Diamond",
			NodeKind::Circle => "Circle",
			NodeKind::Database => "Database",
			NodeKind::Note => "Note",
		}
	}
}

/// One of the four anchor positions on a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Port {
	/// Top centre.
	Top,
	/// Left middle.
	Left,
	/// Right middle.
	Right,
	/// Bottom centre.
	Bottom,
}

impl Port {
	/// Anchor order used by the renderers.
	pub const ALL: [Port; 4] = [Port::Top, Port::Left, Port::Right, Port::Bottom];

	/// Top and left are labelled as targets, right and bottom as sources.
	/// Nothing enforces it.
	pub fn is_inbound(self) -> bool {
		matches!(self, Port::Top | Port::Left)
	}

	/// Unit vector pointing away from the node.
	pub fn direction(self) -> (f64, f64) {
		match self {
			Port::Top => (0.0, -1.0),
			Port::Left => (-1.0, 0.0),
			Port::Right => (1.0, 0.0),
			Port::Bottom => (0.0, 1.0),
		}
	}
}

/// Persisted curve type of a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStyle {
	/// Rendered as a smooth-step edge.
	Curved,
	/// Rendered as a plain edge.
	Straight,
}

/// `null` reads as the type's default, like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Unrecognised styles read as `None` and render with the default curve.
fn lenient_style<'de, D>(deserializer: D) -> Result<Option<ConnectionStyle>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<Value>::deserialize(deserializer)?;
	Ok(raw.and_then(|v| serde_json::from_value(v).ok()))
}

/// Colour overrides for a node. Unknown keys are kept in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
	/// Fill colour.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	/// Border colour.
	#[serde(rename = "borderColor", default, skip_serializing_if = "Option::is_none")]
	pub border_color: Option<String>,
	/// Corner radius for rectangles.
	#[serde(rename = "cornerRadius", default, skip_serializing_if = "Option::is_none")]
	pub corner_radius: Option<f64>,
	/// Anything else the backend stored.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// A column of a database node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DbField {
	/// Column name.
	#[serde(default)]
	pub name: String,
	/// Column type, free text.
	#[serde(rename = "type", default)]
	pub field_type: String,
	/// Part of the primary key.
	#[serde(default)]
	pub primary: bool,
	/// Has a unique constraint.
	#[serde(default)]
	pub unique: bool,
}

/// A node row without its id; the create payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowNodeBody {
	/// Owning flow.
	pub flow_id: String,
	/// Shape kind.
	#[serde(rename = "type")]
	pub kind: NodeKind,
	/// Title text.
	#[serde(default)]
	pub label: Option<String>,
	/// Secondary text.
	#[serde(default)]
	pub description: Option<String>,
	/// Left edge in diagram coordinates.
	#[serde(default, deserialize_with = "null_as_default")]
	pub x: f64,
	/// Top edge in diagram coordinates.
	#[serde(default, deserialize_with = "null_as_default")]
	pub y: f64,
	/// Explicit width.
	#[serde(default)]
	pub width: Option<f64>,
	/// Explicit height.
	#[serde(default)]
	pub height: Option<f64>,
	/// Kind-specific payload.
	#[serde(default, deserialize_with = "null_as_default")]
	pub data: Map<String, Value>,
	/// Colour overrides.
	#[serde(default, deserialize_with = "null_as_default")]
	pub style: NodeStyle,
}

/// A persisted node row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowNodeRow {
	/// Backend id.
	pub id: String,
	/// Everything else.
	#[serde(flatten)]
	pub body: FlowNodeBody,
}

/// A connection row without its id; the create payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowConnectionBody {
	/// Owning flow.
	pub flow_id: String,
	/// Source node id.
	pub from_node_id: String,
	/// Target node id.
	pub to_node_id: String,
	/// Source anchor.
	#[serde(default)]
	pub from_port: Option<Port>,
	/// Target anchor.
	#[serde(default)]
	pub to_port: Option<Port>,
	/// Edge label.
	#[serde(default)]
	pub label: Option<String>,
	/// Stroke colour.
	#[serde(default)]
	pub color: Option<String>,
	/// Stroke width in pixels.
	#[serde(default)]
	pub stroke_width: Option<f64>,
	/// Curve type.
	#[serde(default, deserialize_with = "lenient_style")]
	pub style: Option<ConnectionStyle>,
}

/// A persisted connection row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowConnectionRow {
	/// Backend id.
	pub id: String,
	/// Everything else.
	#[serde(flatten)]
	pub body: FlowConnectionBody,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn node_row_uses_backend_field_names() {
		let row: FlowNodeRow = serde_json::from_value(json!({
			"id": "n1",
			"flow_id": "f1",
			"type": "database",
			"label": "users",
			"x": 10.0,
			"y": 20.5,
			"data": { "fields": [{ "name": "id", "type": "uuid", "primary": true }] },
			"style": { "color": "#FFF", "borderColor": "#000", "cornerRadius": 4, "shadow": true }
		}))
		.unwrap();

		assert_eq!(row.id, "n1");
		assert_eq!(row.body.kind, NodeKind::Database);
		assert_eq!(row.body.description, None);
		assert_eq!(row.body.width, None);
		assert_eq!(row.body.style.border_color.as_deref(), Some("#000"));
		assert_eq!(row.body.style.corner_radius, Some(4.0));
		assert_eq!(row.body.style.extra.get("shadow"), Some(&json!(true)));

		let back = serde_json::to_value(&row).unwrap();
		assert_eq!(back["type"], json!("database"));
		assert_eq!(back["style"]["borderColor"], json!("#000"));
		assert_eq!(back["style"]["shadow"], json!(true));
	}

	#[test]
	fn connection_row_parses_ports_and_style() {
		let row: FlowConnectionRow = serde_json::from_value(json!({
			"id": "c1",
			"flow_id": "f1",
			"from_node_id": "a",
			"to_node_id": "b",
			"from_port": "right",
			"to_port": "left",
			"style": "curved"
		}))
		.unwrap();

		assert_eq!(row.body.from_port, Some(Port::Right));
		assert_eq!(row.body.to_port, Some(Port::Left));
		assert_eq!(row.body.style, Some(ConnectionStyle::Curved));
		assert_eq!(row.body.stroke_width, None);
	}

	#[test]
	fn unknown_connection_style_reads_as_none() {
		for style in [json!("dashed"), json!(3), json!(null)] {
			let row: FlowConnectionRow = serde_json::from_value(json!({
				"id": "c1",
				"flow_id": "f1",
				"from_node_id": "a",
				"to_node_id": "b",
				"style": style
			}))
			.unwrap();
			assert_eq!(row.body.style, None);
		}
	}

	#[test]
	fn null_geometry_payload_and_style_take_defaults() {
		let row: FlowNodeRow = serde_json::from_value(json!({
			"id": "n1",
			"flow_id": "f1",
			"type": "note",
			"x": null,
			"y": 7,
			"data": null,
			"style": null
		}))
		.unwrap();

		assert_eq!((row.body.x, row.body.y), (0.0, 7.0));
		assert!(row.body.data.is_empty());
		assert_eq!(row.body.style, NodeStyle::default());
	}

	#[test]
	fn unknown_port_is_rejected() {
		let res: Result<FlowConnectionRow, _> = serde_json::from_value(json!({
			"id": "c1",
			"flow_id": "f1",
			"from_node_id": "a",
			"to_node_id": "b",
			"from_port": "middle"
		}));
		assert!(res.is_err());
	}
}
