use super::{NodeProps, NodeVisual, Outline, TextLine};

const SIDE: f64 = 150.0;

pub fn render(props: NodeProps<'_>) -> NodeVisual {
	let data = props.data;
	let lines = if data.description.is_empty() {
		Vec::new()
	} else {
		vec![TextLine::muted(data.description.clone())]
	};
	NodeVisual {
		outline: Outline::Diamond,
		width: props.width_or(SIDE),
		height: props.height_or(SIDE),
		fill: props.fill_or("#FFFFFF"),
		border: props.border_or("#D97706"),
		border_width: props.border_width(),
		title: data.label.clone(),
		lines,
		selected: props.selected,
	}
}
