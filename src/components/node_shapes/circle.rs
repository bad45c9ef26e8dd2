use super::{NodeProps, NodeVisual, Outline};

const RADIUS: f64 = 60.0;

/// The circle is sized by an explicit width first, then `data.radius`.
pub fn render(props: NodeProps<'_>) -> NodeVisual {
	let radius = props
		.size
		.and_then(|s| s.width)
		.map(|w| w / 2.0)
		.or_else(|| props.data.radius())
		.unwrap_or(RADIUS);
	NodeVisual {
		outline: Outline::Ellipse,
		width: radius * 2.0,
		height: radius * 2.0,
		fill: props.fill_or("#FFFFFF"),
		border: props.border_or("#2563EB"),
		border_width: props.border_width(),
		title: props.data.label.clone(),
		lines: Vec::new(),
		selected: props.selected,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::flow::editor::{NodeData, NodeSize};
	use serde_json::json;

	fn props(data: &NodeData, size: Option<NodeSize>) -> NodeProps<'_> {
		NodeProps {
			data,
			size,
			selected: false,
		}
	}

	#[test]
	fn radius_comes_from_size_then_data_then_default() {
		let mut data = NodeData::default();
		assert_eq!(render(props(&data, None)).width, 120.0);

		data.payload.insert("radius".into(), json!(40));
		assert_eq!(render(props(&data, None)).height, 80.0);

		let sized = Some(NodeSize {
			width: Some(50.0),
			height: Some(50.0),
		});
		assert_eq!(render(props(&data, sized)).width, 50.0);
	}
}
