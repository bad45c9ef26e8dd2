use crate::flow::model::Port;

/// A point in diagram coordinates.
pub type Point = (f64, f64);

/// Distance an edge travels straight out of its anchor before turning.
const STEP_OFFSET: f64 = 20.0;

/// Orthogonal route between two anchors: out of the source, one elbow pair
/// through the midpoint, into the target.
pub fn smooth_step(from: Point, from_port: Port, to: Point, to_port: Port) -> Vec<Point> {
	let (fdx, fdy) = from_port.direction();
	let (tdx, tdy) = to_port.direction();
	let s = (from.0 + fdx * STEP_OFFSET, from.1 + fdy * STEP_OFFSET);
	let t = (to.0 + tdx * STEP_OFFSET, to.1 + tdy * STEP_OFFSET);

	let mut points = vec![from, s];
	if fdx != 0.0 {
		let mid_x = (s.0 + t.0) / 2.0;
		points.push((mid_x, s.1));
		points.push((mid_x, t.1));
	} else {
		let mid_y = (s.1 + t.1) / 2.0;
		points.push((s.0, mid_y));
		points.push((t.0, mid_y));
	}
	points.push(t);
	points.push(to);
	points.dedup();
	points
}

/// Control points of the default bezier edge.
pub fn bezier(from: Point, from_port: Port, to: Point, to_port: Port) -> [Point; 4] {
	let dist = ((to.0 - from.0).powi(2) + (to.1 - from.1).powi(2)).sqrt();
	let pull = (dist * 0.4).max(25.0);
	let (fdx, fdy) = from_port.direction();
	let (tdx, tdy) = to_port.direction();
	[
		from,
		(from.0 + fdx * pull, from.1 + fdy * pull),
		(to.0 + tdx * pull, to.1 + tdy * pull),
		to,
	]
}

/// Flattens a cubic bezier into `steps` segments.
pub fn sample_bezier(c: &[Point; 4], steps: usize) -> Vec<Point> {
	(0..=steps)
		.map(|i| {
			let t = i as f64 / steps as f64;
			let u = 1.0 - t;
			let (a, b, cc, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
			(
				a * c[0].0 + b * c[1].0 + cc * c[2].0 + d * c[3].0,
				a * c[0].1 + b * c[1].1 + cc * c[2].1 + d * c[3].1,
			)
		})
		.collect()
}

pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len2 = dx * dx + dy * dy;
	let t = if len2 == 0.0 {
		0.0
	} else {
		(((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

pub fn distance_to_polyline(p: Point, points: &[Point]) -> f64 {
	points
		.windows(2)
		.map(|w| distance_to_segment(p, w[0], w[1]))
		.fold(f64::INFINITY, f64::min)
}

/// Point halfway along a polyline, by length.
pub fn midpoint(points: &[Point]) -> Option<Point> {
	let total: f64 = points.windows(2).map(|w| seg_len(w[0], w[1])).sum();
	let mut remaining = total / 2.0;
	for w in points.windows(2) {
		let len = seg_len(w[0], w[1]);
		if len >= remaining && len > 0.0 {
			let t = remaining / len;
			return Some((w[0].0 + (w[1].0 - w[0].0) * t, w[0].1 + (w[1].1 - w[0].1) * t));
		}
		remaining -= len;
	}
	points.first().copied()
}

fn seg_len(a: Point, b: Point) -> f64 {
	((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

/// Closed arrowhead at `tip`, pointing away from `from`.
pub fn arrow_head(from: Point, tip: Point, size: f64) -> [Point; 3] {
	let (dx, dy) = (tip.0 - from.0, tip.1 - from.1);
	let len = (dx * dx + dy * dy).sqrt().max(f64::EPSILON);
	let (ux, uy) = (dx / len, dy / len);
	let (bx, by) = (tip.0 - ux * size, tip.1 - uy * size);
	let (px, py) = (-uy * size * 0.5, ux * size * 0.5);
	[tip, (bx + px, by + py), (bx - px, by - py)]
}

/// Smallest box holding all rects `(x, y, w, h)`.
pub fn bounds(rects: impl IntoIterator<Item = (f64, f64, f64, f64)>) -> Option<(f64, f64, f64, f64)> {
	rects.into_iter().fold(None, |acc, (x, y, w, h)| {
		Some(match acc {
			None => (x, y, x + w, y + h),
			Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + w), y1.max(y + h)),
		})
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn smooth_step_is_orthogonal() {
		let pts = smooth_step((0.0, 0.0), Port::Right, (200.0, 100.0), Port::Left);
		assert_eq!(pts.first(), Some(&(0.0, 0.0)));
		assert_eq!(pts.last(), Some(&(200.0, 100.0)));
		for w in pts.windows(2) {
			assert!(w[0].0 == w[1].0 || w[0].1 == w[1].1, "diagonal segment {:?}", w);
		}
	}

	#[test]
	fn polyline_distance() {
		let pts = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)];
		assert_eq!(distance_to_polyline((5.0, 3.0), &pts), 3.0);
		assert_eq!(distance_to_polyline((12.0, 5.0), &pts), 2.0);
	}

	#[test]
	fn midpoint_by_length() {
		assert_eq!(midpoint(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]), Some((10.0, 0.0)));
		assert_eq!(midpoint(&[(4.0, 4.0)]), Some((4.0, 4.0)));
	}

	#[test]
	fn bezier_samples_hit_both_ends() {
		let c = bezier((0.0, 0.0), Port::Bottom, (0.0, 100.0), Port::Top);
		let pts = sample_bezier(&c, 8);
		assert_eq!(pts.len(), 9);
		assert_eq!(pts[0], (0.0, 0.0));
		assert!((pts[8].1 - 100.0).abs() < 1e-9);
	}

	#[test]
	fn bounds_cover_all_rects() {
		let b = bounds([(0.0, 0.0, 10.0, 10.0), (-5.0, 20.0, 5.0, 5.0)]);
		assert_eq!(b, Some((-5.0, 0.0, 10.0, 25.0)));
		assert_eq!(bounds(Vec::new()), None);
	}
}
