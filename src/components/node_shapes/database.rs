use super::{NodeProps, NodeVisual, Outline, TextLine};

const WIDTH: f64 = 250.0;
const MIN_HEIGHT: f64 = 120.0;
const HEADER: f64 = 40.0;
/// Height reserved for the header and padding.
const CHROME: f64 = 60.0;
/// Height of one field row.
pub const ROW_HEIGHT: f64 = 30.0;

/// Table card. Height always follows the field count.
pub fn render(props: NodeProps<'_>) -> NodeVisual {
	let fields = props.data.fields();
	let height = MIN_HEIGHT.max(CHROME + ROW_HEIGHT * fields.len() as f64);
	let lines = fields
		.into_iter()
		.map(|f| TextLine {
			text: f.name,
			detail: (!f.field_type.is_empty()).then_some(f.field_type),
			marker: if f.primary {
				Some("PK")
			} else if f.unique {
				Some("UQ")
			} else {
				None
			},
			muted: false,
		})
		.collect();
	NodeVisual {
		outline: Outline::Table { header: HEADER },
		width: props.width_or(WIDTH),
		height,
		fill: props.fill_or("#FFFFFF"),
		border: props.border_or("#6B46C1"),
		border_width: props.border_width(),
		title: props.data.label.clone(),
		lines,
		selected: props.selected,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::flow::editor::NodeData;
	use serde_json::json;

	fn with_fields(fields: serde_json::Value) -> NodeData {
		let mut data = NodeData {
			label: "users".into(),
			..Default::default()
		};
		data.payload.insert("fields".into(), fields);
		data
	}

	fn draw(data: &NodeData) -> NodeVisual {
		render(NodeProps {
			data,
			size: None,
			selected: false,
		})
	}

	#[test]
	fn single_primary_key_field() {
		let v = draw(&with_fields(json!([{ "name": "id", "type": "uuid", "primary": true }])));
		assert_eq!(v.height, 120.0);
		assert_eq!(v.lines.len(), 1);
		assert_eq!(v.lines[0].text, "id");
		assert_eq!(v.lines[0].marker, Some("PK"));
		assert_eq!(v.lines[0].detail.as_deref(), Some("uuid"));
	}

	#[test]
	fn height_grows_with_fields() {
		let v = draw(&with_fields(json!([
			{ "name": "id", "primary": true },
			{ "name": "email", "unique": true },
			{ "name": "a" },
			{ "name": "b" }
		])));
		assert_eq!(v.height, 180.0);
		assert_eq!(v.lines[1].marker, Some("UQ"));
		assert_eq!(v.lines[2].marker, None);
		assert_eq!(v.lines[2].detail, None);
	}

	#[test]
	fn no_fields_keeps_the_minimum_height() {
		assert_eq!(draw(&NodeData::default()).height, 120.0);
	}
}
