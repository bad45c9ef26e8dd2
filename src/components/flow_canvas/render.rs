use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::{self, Point};
use super::state::{FlowCanvasState, RESIZE_GRIP};
use crate::components::node_shapes::{
	self, ANCHOR_RADIUS, NodeVisual, Outline, SELECTION_COLOR, TABLE_ROW_HEIGHT,
};
use crate::flow::editor::{EDGE_COLOR, EditorEdge, EditorNode};

const BACKGROUND: &str = "#F8FAFC";
const GRID_DOT: &str = "#CBD5E1";
const GRID: f64 = 20.0;
const TEXT: &str = "#1F2937";
const MUTED: &str = "#6B7280";
const ARROW: f64 = 10.0;
const MINIMAP_W: f64 = 180.0;
const MINIMAP_H: f64 = 120.0;
const MINIMAP_MARGIN: f64 = 12.0;

pub fn render(state: &FlowCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	for edge in &state.edges {
		draw_edge(state, edge, ctx);
	}
	draw_pending_connection(state, ctx);
	for node in &state.nodes {
		draw_node(state, node, ctx);
	}
	ctx.restore();

	draw_minimap(state, ctx);
}

/// Dotted grid, screen space, following pan and zoom.
fn draw_grid(state: &FlowCanvasState, ctx: &CanvasRenderingContext2d) {
	let step = GRID * state.transform.k;
	if step < 6.0 {
		return;
	}
	let (ox, oy) = (
		state.transform.x.rem_euclid(step),
		state.transform.y.rem_euclid(step),
	);
	ctx.set_fill_style_str(GRID_DOT);
	let mut x = ox;
	while x < state.width {
		let mut y = oy;
		while y < state.height {
			ctx.fill_rect(x - 0.75, y - 0.75, 1.5, 1.5);
			y += step;
		}
		x += step;
	}
}

fn draw_edge(state: &FlowCanvasState, edge: &EditorEdge, ctx: &CanvasRenderingContext2d) {
	let Some(geom) = state.edge_geometry(edge) else {
		return;
	};
	let k = state.transform.k;
	let color = if edge.selected {
		SELECTION_COLOR
	} else {
		edge.stroke.stroke.as_str()
	};
	let width = edge.stroke.stroke_width + if edge.selected { 1.0 } else { 0.0 };

	ctx.set_stroke_style_str(color);
	ctx.set_line_width(width);
	ctx.begin_path();
	match geom.curve {
		Some(c) => {
			ctx.move_to(c[0].0, c[0].1);
			ctx.bezier_curve_to(c[1].0, c[1].1, c[2].0, c[2].1, c[3].0, c[3].1);
		}
		None => trace_rounded_polyline(&geom.points, 5.0, ctx),
	}
	ctx.stroke();

	let n = geom.points.len();
	if edge.marker_end.is_some() && n >= 2 {
		let [tip, a, b] = geometry::arrow_head(geom.points[n - 2], geom.points[n - 1], ARROW);
		ctx.set_fill_style_str(color);
		ctx.begin_path();
		ctx.move_to(tip.0, tip.1);
		ctx.line_to(a.0, a.1);
		ctx.line_to(b.0, b.1);
		ctx.close_path();
		ctx.fill();
	}

	if let (Some(label), Some((mx, my))) = (&edge.label, geometry::midpoint(&geom.points)) {
		ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
		let w = ctx
			.measure_text(label)
			.map(|m| m.width())
			.unwrap_or(label.len() as f64 * 7.0);
		ctx.set_fill_style_str("#FFFFFF");
		ctx.fill_rect(mx - w / 2.0 - 4.0, my - 9.0, w + 8.0, 18.0);
		ctx.set_fill_style_str(TEXT);
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(label, mx, my);
	}
}

/// Polyline with arc corners.
fn trace_rounded_polyline(points: &[Point], radius: f64, ctx: &CanvasRenderingContext2d) {
	let Some(first) = points.first() else {
		return;
	};
	ctx.move_to(first.0, first.1);
	for w in points.windows(3) {
		let _ = ctx.arc_to(w[1].0, w[1].1, w[2].0, w[2].1, radius);
	}
	if let Some(last) = points.last() {
		ctx.line_to(last.0, last.1);
	}
}

fn draw_pending_connection(state: &FlowCanvasState, ctx: &CanvasRenderingContext2d) {
	let Some(pending) = &state.connecting else {
		return;
	};
	let Some(source) = state.node(&pending.source) else {
		return;
	};
	let from = state.handle_point(source, pending.source_handle);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(6.0),
		&JsValue::from_f64(4.0),
	));
	ctx.set_stroke_style_str(EDGE_COLOR);
	ctx.set_line_width(2.0);
	ctx.begin_path();
	ctx.move_to(from.0, from.1);
	ctx.line_to(pending.cursor.0, pending.cursor.1);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_node(state: &FlowCanvasState, node: &EditorNode, ctx: &CanvasRenderingContext2d) {
	let v = node_shapes::visual(node);
	let (x, y) = (node.position.x, node.position.y);

	ctx.save();
	let _ = ctx.translate(x, y);

	if v.selected {
		ctx.set_stroke_style_str(SELECTION_COLOR);
		ctx.set_line_width(6.0);
		ctx.set_global_alpha(0.35);
		trace_outline(&v, ctx);
		ctx.stroke();
		ctx.set_global_alpha(1.0);
	}

	ctx.set_fill_style_str(&v.fill);
	trace_outline(&v, ctx);
	ctx.fill();
	ctx.set_stroke_style_str(&v.border);
	ctx.set_line_width(v.border_width);
	ctx.stroke();

	draw_contents(&v, ctx);
	draw_anchors(state, node, &v, ctx);

	if v.selected {
		ctx.set_fill_style_str(SELECTION_COLOR);
		let half = RESIZE_GRIP / 2.0;
		ctx.fill_rect(v.width - half, v.height - half, RESIZE_GRIP, RESIZE_GRIP);
	}
	ctx.restore();
}

fn trace_outline(v: &NodeVisual, ctx: &CanvasRenderingContext2d) {
	let (w, h) = (v.width, v.height);
	ctx.begin_path();
	match v.outline {
		Outline::Rounded { radius } => trace_round_rect(w, h, radius, ctx),
		Outline::Table { .. } => trace_round_rect(w, h, 6.0, ctx),
		Outline::Diamond => {
			ctx.move_to(w / 2.0, 0.0);
			ctx.line_to(w, h / 2.0);
			ctx.line_to(w / 2.0, h);
			ctx.line_to(0.0, h / 2.0);
			ctx.close_path();
		}
		Outline::Ellipse => {
			let _ = ctx.ellipse(w / 2.0, h / 2.0, w / 2.0, h / 2.0, 0.0, 0.0, 2.0 * PI);
		}
		Outline::Note { fold } => {
			ctx.move_to(0.0, 0.0);
			ctx.line_to(w - fold, 0.0);
			ctx.line_to(w, fold);
			ctx.line_to(w, h);
			ctx.line_to(0.0, h);
			ctx.close_path();
		}
	}
}

fn trace_round_rect(w: f64, h: f64, r: f64, ctx: &CanvasRenderingContext2d) {
	let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
	ctx.move_to(r, 0.0);
	let _ = ctx.arc_to(w, 0.0, w, h, r);
	let _ = ctx.arc_to(w, h, 0.0, h, r);
	let _ = ctx.arc_to(0.0, h, 0.0, 0.0, r);
	let _ = ctx.arc_to(0.0, 0.0, w, 0.0, r);
	ctx.close_path();
}

fn draw_contents(v: &NodeVisual, ctx: &CanvasRenderingContext2d) {
	ctx.set_text_baseline("middle");
	match v.outline {
		Outline::Table { header } => {
			ctx.set_fill_style_str(&v.border);
			ctx.fill_rect(0.0, 0.0, v.width, header);
			ctx.set_fill_style_str("#FFFFFF");
			ctx.set_font("bold 14px sans-serif");
			ctx.set_text_align("left");
			let _ = ctx.fill_text(&v.title, 12.0, header / 2.0);

			ctx.set_font("13px monospace");
			for (i, line) in v.lines.iter().enumerate() {
				let row_y = header + 10.0 + TABLE_ROW_HEIGHT * (i as f64 + 0.5);
				let mut text_x = 12.0;
				if let Some(marker) = line.marker {
					ctx.set_fill_style_str(if marker == "PK" { "#D97706" } else { "#2563EB" });
					ctx.set_text_align("left");
					let _ = ctx.fill_text(marker, text_x, row_y);
					text_x += 28.0;
				}
				ctx.set_fill_style_str(TEXT);
				ctx.set_text_align("left");
				let _ = ctx.fill_text(&line.text, text_x, row_y);
				if let Some(detail) = &line.detail {
					ctx.set_fill_style_str(MUTED);
					ctx.set_text_align("right");
					let _ = ctx.fill_text(detail, v.width - 12.0, row_y);
				}
			}
		}
		Outline::Note { .. } => {
			ctx.set_text_align("left");
			ctx.set_fill_style_str(TEXT);
			ctx.set_font("bold 13px sans-serif");
			let _ = ctx.fill_text(&v.title, 12.0, 18.0);
			ctx.set_font("12px sans-serif");
			for (i, line) in v.lines.iter().enumerate() {
				let _ = ctx.fill_text(&line.text, 12.0, 40.0 + 16.0 * i as f64);
			}
		}
		_ => {
			ctx.set_text_align("center");
			let (cx, cy) = (v.width / 2.0, v.height / 2.0);
			let offset = if v.lines.is_empty() { 0.0 } else { 9.0 };
			ctx.set_fill_style_str(TEXT);
			ctx.set_font("bold 14px sans-serif");
			let _ = ctx.fill_text(&v.title, cx, cy - offset);
			ctx.set_font("12px sans-serif");
			for (i, line) in v.lines.iter().enumerate() {
				ctx.set_fill_style_str(if line.muted { MUTED } else { TEXT });
				let _ = ctx.fill_text(&line.text, cx, cy + offset + 16.0 * i as f64);
			}
		}
	}
}

/// Inbound anchors are hollow, outbound ones filled.
fn draw_anchors(
	state: &FlowCanvasState,
	node: &EditorNode,
	v: &NodeVisual,
	ctx: &CanvasRenderingContext2d,
) {
	for anchor in v.anchors() {
		let hovered = state
			.hover_anchor
			.as_ref()
			.is_some_and(|(id, port)| id == &node.id && *port == anchor.port);
		let r = if hovered { ANCHOR_RADIUS + 2.0 } else { ANCHOR_RADIUS };
		ctx.begin_path();
		let _ = ctx.arc(anchor.x, anchor.y, r, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(if anchor.port.is_inbound() { "#FFFFFF" } else { v.border.as_str() });
		ctx.fill();
		ctx.set_stroke_style_str(&v.border);
		ctx.set_line_width(1.5);
		ctx.stroke();
	}
}

/// Scaled overview of all nodes plus the visible viewport.
fn draw_minimap(state: &FlowCanvasState, ctx: &CanvasRenderingContext2d) {
	let Some((x0, y0, x1, y1)) = state.graph_bounds() else {
		return;
	};
	let (vx0, vy0) = state.screen_to_graph(0.0, 0.0);
	let (vx1, vy1) = state.screen_to_graph(state.width, state.height);
	let (bx0, by0, bx1, by1) = (x0.min(vx0), y0.min(vy0), x1.max(vx1), y1.max(vy1));
	let scale = (MINIMAP_W / (bx1 - bx0).max(1.0)).min(MINIMAP_H / (by1 - by0).max(1.0));
	let (ox, oy) = (
		state.width - MINIMAP_W - MINIMAP_MARGIN,
		state.height - MINIMAP_H - MINIMAP_MARGIN,
	);
	let map = |gx: f64, gy: f64| (ox + (gx - bx0) * scale, oy + (gy - by0) * scale);

	ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
	ctx.fill_rect(ox, oy, MINIMAP_W, MINIMAP_H);
	ctx.set_stroke_style_str("#E2E8F0");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(ox, oy, MINIMAP_W, MINIMAP_H);

	for node in &state.nodes {
		let v = node_shapes::visual(node);
		let (mx, my) = map(node.position.x, node.position.y);
		ctx.set_fill_style_str(if node.selected { SELECTION_COLOR } else { v.border.as_str() });
		ctx.fill_rect(mx, my, (v.width * scale).max(2.0), (v.height * scale).max(2.0));
	}

	let (rx, ry) = map(vx0, vy0);
	ctx.set_stroke_style_str(EDGE_COLOR);
	ctx.stroke_rect(rx, ry, (vx1 - vx0) * scale, (vy1 - vy0) * scale);
}
