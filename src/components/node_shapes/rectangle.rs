use super::{NodeProps, NodeVisual, Outline, TextLine};

const WIDTH: f64 = 200.0;
const HEIGHT: f64 = 120.0;
const CORNER: f64 = 8.0;

pub fn render(props: NodeProps<'_>) -> NodeVisual {
	let data = props.data;
	let mut lines = Vec::new();
	if !data.description.is_empty() {
		lines.push(TextLine::muted(data.description.clone()));
	}
	NodeVisual {
		outline: Outline::Rounded {
			radius: data.style.corner_radius.unwrap_or(CORNER),
		},
		width: props.width_or(WIDTH),
		height: props.height_or(HEIGHT),
		fill: props.fill_or("#FFFFFF"),
		border: props.border_or("#6B46C1"),
		border_width: props.border_width(),
		title: data.label.clone(),
		lines,
		selected: props.selected,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::flow::editor::{NodeData, NodeSize};

	#[test]
	fn defaults_apply_when_nothing_is_set() {
		let data = NodeData::default();
		let v = render(NodeProps {
			data: &data,
			size: None,
			selected: false,
		});
		assert_eq!((v.width, v.height), (200.0, 120.0));
		assert_eq!(v.fill, "#FFFFFF");
		assert_eq!(v.border, "#6B46C1");
		assert_eq!(v.outline, Outline::Rounded { radius: 8.0 });
		assert!(v.lines.is_empty());
	}

	#[test]
	fn style_and_size_override_defaults() {
		let mut data = NodeData {
			label: "API".into(),
			description: "gateway".into(),
			..Default::default()
		};
		data.style.color = Some("#000".into());
		data.style.corner_radius = Some(0.0);
		let v = render(NodeProps {
			data: &data,
			size: Some(NodeSize {
				width: Some(300.0),
				height: None,
			}),
			selected: false,
		});
		assert_eq!((v.width, v.height), (300.0, 120.0));
		assert_eq!(v.fill, "#000");
		assert_eq!(v.outline, Outline::Rounded { radius: 0.0 });
		assert_eq!(v.lines[0].text, "gateway");
		assert!(v.lines[0].muted);
	}
}
