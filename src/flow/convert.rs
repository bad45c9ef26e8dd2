//! Row form <-> editor form.

use std::collections::HashMap;

use super::editor::{
	EdgeKind, EdgeStroke, EditorEdge, EditorNode, MarkerEnd, NodeData, NodeSize, XYPosition,
};
use super::model::{
	ConnectionStyle, FlowConnectionBody, FlowConnectionRow, FlowNodeBody, FlowNodeRow,
};

/// Hydrates a node row. Explicit label/description stay separate from the
/// payload and style maps, so same-named keys there never override them.
pub fn hydrate_node(row: FlowNodeRow) -> EditorNode {
	let FlowNodeRow { id, body } = row;
	EditorNode {
		id,
		kind: body.kind,
		position: XYPosition::new(body.x, body.y),
		data: NodeData {
			label: body.label.unwrap_or_default(),
			description: body.description.unwrap_or_default(),
			payload: body.data,
			style: body.style,
		},
		size: Some(NodeSize {
			width: body.width,
			height: body.height,
		}),
		selected: false,
	}
}

/// Hydrates a connection row. `curved` maps to smooth-step, anything else
/// (including a missing style) to the default curve.
pub fn hydrate_connection(row: FlowConnectionRow) -> EditorEdge {
	let FlowConnectionRow { id, body } = row;
	let defaults = EdgeStroke::default();
	EditorEdge {
		id,
		source: body.from_node_id,
		target: body.to_node_id,
		source_handle: body.from_port,
		target_handle: body.to_port,
		label: body.label,
		stroke: EdgeStroke {
			stroke: body.color.unwrap_or(defaults.stroke),
			stroke_width: body.stroke_width.unwrap_or(defaults.stroke_width),
		},
		edge_type: Some(match body.style {
			Some(ConnectionStyle::Curved) => EdgeKind::SmoothStep,
			_ => EdgeKind::Default,
		}),
		marker_end: Some(MarkerEnd::ArrowClosed),
		selected: false,
	}
}

/// Non-empty text, or `None`.
fn non_empty(text: &str) -> Option<String> {
	(!text.is_empty()).then(|| text.to_owned())
}

/// Write payload for a node. Empty label/description are written as absent,
/// matching a row that never had them.
pub fn node_body(node: &EditorNode, flow_id: &str) -> FlowNodeBody {
	let size = node.size.unwrap_or_default();
	FlowNodeBody {
		flow_id: flow_id.to_owned(),
		kind: node.kind,
		label: non_empty(&node.data.label),
		description: non_empty(&node.data.description),
		x: node.position.x,
		y: node.position.y,
		width: size.width,
		height: size.height,
		data: node.data.payload.clone(),
		style: node.data.style.clone(),
	}
}

/// Write payload for an edge. Endpoints found in `ids` (temp id -> real id)
/// are rewritten.
pub fn connection_body(
	edge: &EditorEdge,
	flow_id: &str,
	ids: &HashMap<String, String>,
) -> FlowConnectionBody {
	let resolve = |id: &String| ids.get(id).unwrap_or(id).clone();
	FlowConnectionBody {
		flow_id: flow_id.to_owned(),
		from_node_id: resolve(&edge.source),
		to_node_id: resolve(&edge.target),
		from_port: edge.source_handle,
		to_port: edge.target_handle,
		label: edge.label.clone(),
		color: Some(edge.stroke.stroke.clone()),
		stroke_width: Some(edge.stroke.stroke_width),
		style: Some(match edge.edge_type {
			Some(EdgeKind::SmoothStep) => ConnectionStyle::Curved,
			_ => ConnectionStyle::Straight,
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::flow::model::{NodeKind, NodeStyle, Port};
	use serde_json::{Map, json};

	fn full_row() -> FlowNodeRow {
		let mut data = Map::new();
		data.insert("radius".into(), json!(60));
		data.insert("description".into(), json!("shadowed by the column"));
		let mut style = NodeStyle {
			color: Some("#FFFFFF".into()),
			border_color: Some("#6B46C1".into()),
			corner_radius: Some(8.0),
			..Default::default()
		};
		style.extra.insert("label".into(), json!("shadowed too"));
		FlowNodeRow {
			id: "n-1".into(),
			body: FlowNodeBody {
				flow_id: "flow-9".into(),
				kind: NodeKind::Circle,
				label: Some("Start".into()),
				description: Some("entry point".into()),
				x: 12.5,
				y: -40.0,
				width: Some(120.0),
				height: Some(120.0),
				data,
				style,
			},
		}
	}

	#[test]
	fn node_round_trip_keeps_geometry_and_identity() {
		let row = full_row();
		let node = hydrate_node(row.clone());
		let body = node_body(&node, &row.body.flow_id);

		assert_eq!(node.id, row.id);
		assert_eq!(body.flow_id, row.body.flow_id);
		assert_eq!(body.kind, row.body.kind);
		assert_eq!((body.x, body.y), (row.body.x, row.body.y));
		assert_eq!((body.width, body.height), (row.body.width, row.body.height));
	}

	#[test]
	fn absent_text_stays_absent_after_a_round_trip() {
		let mut row = full_row();
		row.body.label = None;
		row.body.description = None;
		let node = hydrate_node(row.clone());
		assert_eq!(node.data.label, "");

		let body = node_body(&node, &row.body.flow_id);
		assert_eq!(body, row.body);
	}

	#[test]
	fn explicit_text_wins_over_same_named_payload_keys() {
		let row = full_row();
		let node = hydrate_node(row.clone());

		let merged = node.data.merged();
		assert_eq!(merged["label"], json!("Start"));
		assert_eq!(merged["description"], json!("entry point"));

		// the shadowed keys survive in their own maps
		let body = node_body(&node, "flow-9");
		assert_eq!(body.label.as_deref(), Some("Start"));
		assert_eq!(body.description.as_deref(), Some("entry point"));
		assert_eq!(body.data, row.body.data);
		assert_eq!(body.style, row.body.style);
	}

	#[test]
	fn connection_style_maps_to_edge_kind_and_back() {
		let row = FlowConnectionRow {
			id: "c-1".into(),
			body: FlowConnectionBody {
				flow_id: "flow-9".into(),
				from_node_id: "a".into(),
				to_node_id: "b".into(),
				from_port: Some(Port::Bottom),
				to_port: Some(Port::Top),
				label: Some("yes".into()),
				color: None,
				stroke_width: None,
				style: Some(ConnectionStyle::Curved),
			},
		};
		let edge = hydrate_connection(row.clone());
		assert_eq!(edge.edge_type, Some(EdgeKind::SmoothStep));
		assert_eq!(edge.stroke, EdgeStroke::default());
		assert_eq!(edge.marker_end, Some(MarkerEnd::ArrowClosed));

		let body = connection_body(&edge, "flow-9", &HashMap::new());
		assert_eq!(body.style, Some(ConnectionStyle::Curved));
		assert_eq!(body.from_port, Some(Port::Bottom));

		let mut straight = row;
		straight.body.style = None;
		let edge = hydrate_connection(straight);
		assert_eq!(edge.edge_type, Some(EdgeKind::Default));
		assert_eq!(
			connection_body(&edge, "flow-9", &HashMap::new()).style,
			Some(ConnectionStyle::Straight)
		);
	}

	#[test]
	fn unrecognised_style_hydrates_as_the_default_curve() {
		let row: FlowConnectionRow = serde_json::from_value(json!({
			"id": "c-2",
			"flow_id": "flow-9",
			"from_node_id": "a",
			"to_node_id": "b",
			"style": "dashed"
		}))
		.unwrap();
		assert_eq!(hydrate_connection(row).edge_type, Some(EdgeKind::Default));
	}

	#[test]
	fn connection_endpoints_follow_created_ids() {
		let edge = EditorEdge {
			id: "temp-1".into(),
			source: "temp-a".into(),
			target: "existing".into(),
			source_handle: Some(Port::Right),
			target_handle: Some(Port::Left),
			label: None,
			stroke: EdgeStroke::default(),
			edge_type: None,
			marker_end: Some(MarkerEnd::ArrowClosed),
			selected: false,
		};
		let ids = HashMap::from([("temp-a".to_string(), "node-7".to_string())]);
		let body = connection_body(&edge, "f", &ids);
		assert_eq!(body.from_node_id, "node-7");
		assert_eq!(body.to_node_id, "existing");
		assert_eq!(body.style, Some(ConnectionStyle::Straight));
	}
}
