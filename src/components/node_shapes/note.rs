use super::{NodeProps, NodeVisual, Outline, TextLine, wrap};

const WIDTH: f64 = 200.0;
const HEIGHT: f64 = 150.0;
const FOLD: f64 = 16.0;
/// Rough glyph width used for wrapping.
const CHAR_WIDTH: f64 = 7.0;
const PADDING: f64 = 12.0;

pub fn render(props: NodeProps<'_>) -> NodeVisual {
	let width = props.width_or(WIDTH);
	let max_chars = ((width - 2.0 * PADDING) / CHAR_WIDTH).floor().max(1.0) as usize;
	let lines = props
		.data
		.content()
		.map(|c| wrap(c, max_chars).into_iter().map(TextLine::plain).collect())
		.unwrap_or_default();
	NodeVisual {
		outline: Outline::Note { fold: FOLD },
		width,
		height: props.height_or(HEIGHT),
		fill: props.fill_or("#FEF3C7"),
		border: props.border_or("#F59E0B"),
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

	#[test]
	fn content_is_wrapped_to_the_width() {
		let mut data = NodeData::default();
		data.payload.insert(
			"content".into(),
			json!("remember to rotate the signing keys before launch"),
		);
		let v = render(NodeProps {
			data: &data,
			size: None,
			selected: false,
		});
		assert_eq!((v.width, v.height), (200.0, 150.0));
		assert_eq!(v.fill, "#FEF3C7");
		assert!(v.lines.len() > 1);
		assert!(v.lines.iter().all(|l| l.text.chars().count() <= 25));
	}
}
