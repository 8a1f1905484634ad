//! Frame rendering for particle fields.
//!
//! Each frame is drawn in passes for correct z-ordering:
//! 1. Clear (and the sphere outline for the globe)
//! 2. Connection edges between nearby nodes
//! 3. Node glows, each followed by its solid core

use super::state::{FieldState, Node};
use super::surface::Surface;
use super::theme::{FieldStyle, GradientStop};

/// Glow scale at `time` (ms): `1 + amplitude * sin(time / period + phase)`.
pub fn pulse_factor(time: f64, period: f64, phase: f64, amplitude: f64) -> f64 {
	1.0 + amplitude * (time / period + phase).sin()
}

/// Opacity of an edge of length `distance`, or `None` when the nodes are too
/// far apart to connect. Falls linearly from `max_alpha` at 0 to 0 at `threshold`.
pub fn edge_opacity(distance: f64, threshold: f64, max_alpha: f64) -> Option<f64> {
	if distance < threshold {
		Some(max_alpha * (1.0 - distance / threshold))
	} else {
		None
	}
}

/// A connection between two nodes, by index into the node list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
	/// Lower node index.
	pub a: usize,
	/// Higher node index.
	pub b: usize,
	/// Euclidean length.
	pub distance: f64,
	/// Edge alpha before depth and field opacity.
	pub opacity: f64,
}

/// All edges shorter than `threshold`. Each unordered pair is visited once
/// with `a < b`.
pub fn connections(nodes: &[Node], threshold: f64, max_alpha: f64) -> Vec<Edge> {
	let mut edges = Vec::new();
	for (a, n1) in nodes.iter().enumerate() {
		for (offset, n2) in nodes[a + 1..].iter().enumerate() {
			let distance = (n2.x - n1.x).hypot(n2.y - n1.y);
			if let Some(opacity) = edge_opacity(distance, threshold, max_alpha) {
				edges.push(Edge {
					a,
					b: a + 1 + offset,
					distance,
					opacity,
				});
			}
		}
	}
	edges
}

/// Renders one frame of `state` to `surface`. Does nothing before seeding.
pub fn render<S: Surface + ?Sized>(surface: &mut S, state: &FieldState, style: &FieldStyle) {
	let Some(size) = state.size() else {
		return;
	};
	let opacity = state.config().opacity;

	surface.clear(size, style.background);

	if let (Some(globe), Some(outline)) = (state.globe(), style.outline) {
		surface.stroke_circle(globe.center(), globe.radius(), outline.fade(opacity), 1.0);
	}

	let nodes = state.nodes();
	draw_edges(surface, state, style, &nodes, opacity);
	draw_nodes(surface, state, style, &nodes, opacity);
}

fn draw_edges<S: Surface + ?Sized>(
	surface: &mut S,
	state: &FieldState,
	style: &FieldStyle,
	nodes: &[Node],
	opacity: f64,
) {
	let threshold = state.config().connection_distance;

	for edge in connections(nodes, threshold, style.edge.max_alpha) {
		let (n1, n2) = (&nodes[edge.a], &nodes[edge.b]);
		let alpha = edge.opacity * n1.alpha.min(n2.alpha) * opacity;
		if alpha < 0.005 {
			continue;
		}

		let stops: Vec<GradientStop> = style
			.edge
			.stops
			.iter()
			.map(|s| GradientStop::new(s.offset, s.color.fade(alpha)))
			.collect();
		surface.gradient_line((n1.x, n1.y), (n2.x, n2.y), &stops, style.edge.width);
	}
}

fn draw_nodes<S: Surface + ?Sized>(
	surface: &mut S,
	state: &FieldState,
	style: &FieldStyle,
	nodes: &[Node],
	opacity: f64,
) {
	let pulse = &state.config().pulse;
	let time = state.time();
	let glow = style.node.glow_color;
	let core = style.node.core_color;

	for node in nodes {
		let alpha = node.alpha * opacity;
		let factor = pulse_factor(time, pulse.period_ms, node.phase, pulse.amplitude);
		let glow_radius = node.radius * style.node.glow_radius * factor;

		let stops = [
			GradientStop::new(0.0, glow.lerp(core, 0.25).fade(alpha)),
			GradientStop::new(0.4, glow.fade(alpha * 0.5)),
			GradientStop::new(1.0, glow.with_alpha(0.0)),
		];
		surface.radial_glow((node.x, node.y), glow_radius, &stops);
		surface.fill_circle((node.x, node.y), node.radius, core.fade(alpha));
	}
}

#[cfg(test)]
mod tests {
	use std::f64::consts::PI;

	use super::*;
	use crate::components::particle_field::config::FieldConfig;
	use crate::components::particle_field::state::SurfaceSize;
	use crate::components::particle_field::surface::{DrawCommand, RecordingSurface};

	fn node(x: f64, y: f64) -> Node {
		Node {
			x,
			y,
			radius: 2.0,
			phase: 0.0,
			alpha: 1.0,
		}
	}

	#[test]
	fn pulse_oscillates_around_one() {
		assert_eq!(pulse_factor(0.0, 1000.0, 0.0, 0.3), 1.0);
		let peak = pulse_factor(1000.0 * PI / 2.0, 1000.0, 0.0, 0.3);
		assert!((peak - 1.3).abs() < 1e-9);
		let trough = pulse_factor(0.0, 1000.0, -PI / 2.0, 0.3);
		assert!((trough - 0.7).abs() < 1e-9);
	}

	#[test]
	fn phase_desynchronizes_nodes() {
		let a = pulse_factor(500.0, 1000.0, 0.0, 0.2);
		let b = pulse_factor(500.0, 1000.0, 1.0, 0.2);
		assert_ne!(a, b);
	}

	#[test]
	fn edge_opacity_falls_to_zero_at_threshold() {
		assert_eq!(edge_opacity(0.0, 100.0, 0.5), Some(0.5));
		assert_eq!(edge_opacity(50.0, 100.0, 0.5), Some(0.25));
		assert_eq!(edge_opacity(100.0, 100.0, 0.5), None);
		assert_eq!(edge_opacity(150.0, 100.0, 0.5), None);
		let near = edge_opacity(99.999, 100.0, 1.0).unwrap();
		assert!(near > 0.0 && near < 1e-4);
	}

	#[test]
	fn edge_opacity_strictly_decreases() {
		let mut last = f64::INFINITY;
		for d in 0..100 {
			let o = edge_opacity(d as f64, 100.0, 1.0).unwrap();
			assert!(o < last);
			last = o;
		}
	}

	#[test]
	fn zero_threshold_never_connects() {
		let nodes = [node(0.0, 0.0), node(0.0, 0.0)];
		assert!(connections(&nodes, 0.0, 1.0).is_empty());
	}

	#[test]
	fn each_pair_visited_once() {
		let nodes = [node(0.0, 0.0), node(1.0, 0.0), node(0.0, 1.0), node(1.0, 1.0)];
		let edges = connections(&nodes, 10.0, 1.0);
		assert_eq!(edges.len(), 6);
		for e in &edges {
			assert!(e.a < e.b);
		}
		let mut pairs: Vec<_> = edges.iter().map(|e| (e.a, e.b)).collect();
		pairs.dedup();
		assert_eq!(pairs.len(), 6);
	}

	#[test]
	fn distant_pairs_are_skipped() {
		let nodes = [node(0.0, 0.0), node(3.0, 4.0), node(100.0, 100.0)];
		let edges = connections(&nodes, 10.0, 1.0);
		assert_eq!(edges.len(), 1);
		assert_eq!((edges[0].a, edges[0].b), (0, 1));
		assert!((edges[0].distance - 5.0).abs() < 1e-9);
		assert!((edges[0].opacity - 0.5).abs() < 1e-9);
	}

	#[test]
	fn render_before_seeding_draws_nothing() {
		let state = FieldState::new(FieldConfig::network(), 1);
		let mut surface = RecordingSurface::new();
		render(&mut surface, &state, &FieldStyle::network());
		assert!(surface.commands.is_empty());
	}

	#[test]
	fn render_draws_glow_then_core_per_node() {
		let mut state = FieldState::new(FieldConfig::neural(), 11);
		state.initialize(SurfaceSize::new(300.0, 200.0, 1.0), 5);
		let mut surface = RecordingSurface::new();
		render(&mut surface, &state, &FieldStyle::neural());

		assert!(matches!(surface.commands[0], DrawCommand::Clear { .. }));
		assert_eq!(surface.glows().count(), 5);
		assert_eq!(surface.circles().count(), 5);

		let tail: Vec<_> = surface.commands.iter().rev().take(10).collect();
		for pair in tail.chunks(2) {
			assert!(matches!(pair[0], DrawCommand::Circle { .. }));
			assert!(matches!(pair[1], DrawCommand::Glow { .. }));
		}
	}

	#[test]
	fn core_uses_true_radius() {
		let mut state = FieldState::new(FieldConfig::network(), 2);
		state.initialize(SurfaceSize::new(300.0, 200.0, 1.0), 3);
		let radii: Vec<f64> = state.particles().iter().map(|p| p.radius).collect();
		let mut surface = RecordingSurface::new();
		render(&mut surface, &state, &FieldStyle::network());
		let drawn: Vec<f64> = surface
			.circles()
			.map(|c| match c {
				DrawCommand::Circle { radius, .. } => *radius,
				_ => unreachable!(),
			})
			.collect();
		assert_eq!(drawn, radii);
	}

	#[test]
	fn glow_radius_follows_pulse() {
		let config = FieldConfig::network();
		let style = FieldStyle::network();
		let mut state = FieldState::new(config.clone(), 3);
		state.initialize(SurfaceSize::new(300.0, 200.0, 1.0), 1);
		let p = &mut state.particles_mut()[0];
		p.vx = 0.0;
		p.vy = 0.0;
		p.phase = 0.5;
		let base = p.radius * style.node.glow_radius;

		let mut drawn = Vec::new();
		for t in [0.0, 1000.0] {
			state.step(t);
			let mut surface = RecordingSurface::new();
			render(&mut surface, &state, &style);
			let radius = match surface.glows().next() {
				Some(DrawCommand::Glow { radius, .. }) => *radius,
				_ => unreachable!(),
			};
			let factor = pulse_factor(t, config.pulse.period_ms, 0.5, config.pulse.amplitude);
			assert!((radius - base * factor).abs() < 1e-9);
			drawn.push(radius);
		}
		assert!((drawn[0] - drawn[1]).abs() > 1e-3);
	}

	#[test]
	fn edges_use_variant_gradient() {
		let mut state = FieldState::new(FieldConfig::neural(), 5);
		state.initialize(SurfaceSize::new(300.0, 200.0, 1.0), 2);
		let particles = state.particles_mut();
		particles[0].x = 10.0;
		particles[0].y = 10.0;
		particles[1].x = 20.0;
		particles[1].y = 10.0;

		let mut surface = RecordingSurface::new();
		render(&mut surface, &state, &FieldStyle::neural());
		let lines: Vec<_> = surface.lines().collect();
		assert_eq!(lines.len(), 1);
		match lines[0] {
			DrawCommand::Line { stops, from, to, .. } => {
				assert_eq!(stops.len(), 3);
				assert_eq!(*from, (10.0, 10.0));
				assert_eq!(*to, (20.0, 10.0));
			}
			_ => unreachable!(),
		}
	}

	#[test]
	fn globe_draws_outline_first() {
		let mut state = FieldState::new(FieldConfig::globe(), 5);
		state.initialize(SurfaceSize::new(400.0, 400.0, 2.0), 20);
		let mut surface = RecordingSurface::new();
		render(&mut surface, &state, &FieldStyle::globe());
		assert!(matches!(surface.commands[1], DrawCommand::Ring { .. }));
		let visible = state.nodes().len();
		assert_eq!(surface.circles().count(), visible);
	}
}
