//! Nodes pinned to a rotating sphere.
//!
//! Positions are not integrated. Each frame the sphere turns by a fixed
//! increment and every node is re-projected orthographically onto the
//! surface. Nodes on the far side are culled by their depth `z`.

use std::f64::consts::{PI, TAU};

use rand::Rng;

use super::config::FieldConfig;
use super::particles::sample;

/// A node at a fixed geographic location, in radians.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoNode {
	/// Latitude in radians.
	pub lat: f64,
	/// Longitude in radians.
	pub lon: f64,
	/// Core radius in CSS pixels.
	pub radius: f64,
	/// Pulse offset.
	pub phase: f64,
}

/// Screen position plus depth. `z` is 1 facing the viewer and -1 directly behind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
	/// Screen x.
	pub x: f64,
	/// Screen y.
	pub y: f64,
	/// Depth in `[-1, 1]`, positive toward the viewer.
	pub z: f64,
}

/// Orthographic projection of `(lat, lon)` on a sphere turned by `rotation`.
pub fn project(lat: f64, lon: f64, rotation: f64, cx: f64, cy: f64, radius: f64) -> Projection {
	let angle = lon + rotation;
	Projection {
		x: cx + radius * lat.cos() * angle.sin(),
		y: cy - radius * lat.sin(),
		z: lat.cos() * angle.cos(),
	}
}

/// Size and opacity multiplier for a node at depth `z`.
pub fn depth_scale(z: f64) -> f64 {
	(0.5 + 0.5 * z).clamp(0.1, 1.0)
}

/// A projected, visible globe node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleNode {
	/// Index into [`Globe::nodes`].
	pub index: usize,
	/// Where the node lands this frame.
	pub projection: Projection,
}

/// The rotating sphere and its nodes.
#[derive(Clone, Debug)]
pub struct Globe {
	/// Every node, visible or not.
	pub nodes: Vec<GeoNode>,
	rotation: f64,
	rotation_speed: f64,
	cull_z: f64,
	center: (f64, f64),
	radius: f64,
}

impl Globe {
	/// Place configured hub points first, then fill to `config.count` with
	/// points spread uniformly over the sphere.
	pub fn seed<R: Rng + ?Sized>(config: &FieldConfig, width: f64, height: f64, rng: &mut R) -> Self {
		let globe = &config.globe;
		let mut nodes = Vec::with_capacity(config.count);

		for point in globe.points.iter().take(config.count) {
			nodes.push(GeoNode {
				lat: point.lat.to_radians(),
				lon: point.lon.to_radians(),
				radius: config.radius_max,
				phase: sample(rng, 0.0, TAU),
			});
		}
		while nodes.len() < config.count {
			// asin of a uniform height gives equal density per unit area
			nodes.push(GeoNode {
				lat: sample(rng, -1.0, 1.0).asin(),
				lon: sample(rng, -PI, PI),
				radius: sample(rng, config.radius_min, config.radius_max),
				phase: sample(rng, 0.0, TAU),
			});
		}

		Self {
			nodes,
			rotation: 0.0,
			rotation_speed: globe.rotation_speed,
			cull_z: globe.cull_z,
			center: (width / 2.0, height / 2.0),
			radius: width.min(height) * globe.radius_ratio,
		}
	}

	/// Turn the sphere by one increment.
	pub fn step(&mut self) {
		self.rotation += self.rotation_speed;
	}

	/// Accumulated rotation in radians.
	pub fn rotation(&self) -> f64 {
		self.rotation
	}

	/// Sphere centre in CSS pixels.
	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	/// Sphere radius in logical pixels.
	pub fn radius(&self) -> f64 {
		self.radius
	}

	/// Whether a projected node is in front of the cull plane.
	pub fn is_visible(&self, projection: &Projection) -> bool {
		projection.z > self.cull_z
	}

	/// Project every node and keep the ones in front of the cull plane.
	pub fn visible(&self) -> Vec<VisibleNode> {
		let (cx, cy) = self.center;
		self.nodes
			.iter()
			.enumerate()
			.map(|(index, node)| VisibleNode {
				index,
				projection: project(node.lat, node.lon, self.rotation, cx, cy, self.radius),
			})
			.filter(|v| self.is_visible(&v.projection))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::components::particle_field::config::GeoPoint;

	const EPS: f64 = 1e-9;

	#[test]
	fn prime_meridian_faces_viewer() {
		let p = project(0.0, 0.0, 0.0, 100.0, 100.0, 50.0);
		assert!((p.z - 1.0).abs() < EPS);
		assert!((p.x - 100.0).abs() < EPS);
		assert!((p.y - 100.0).abs() < EPS);
	}

	#[test]
	fn antimeridian_is_behind_and_culled() {
		let mut config = FieldConfig::globe();
		config.count = 1;
		config.globe.points = vec![GeoPoint::new(0.0, 180.0)];
		let globe = Globe::seed(&config, 200.0, 200.0, &mut SmallRng::seed_from_u64(0));
		let p = project(0.0, PI, 0.0, 100.0, 100.0, 80.0);
		assert!((p.z + 1.0).abs() < EPS);
		assert!(!globe.is_visible(&p));
		assert!(globe.visible().is_empty());
	}

	#[test]
	fn north_pole_sits_above_center() {
		let p = project(PI / 2.0, 1.0, 0.3, 100.0, 100.0, 50.0);
		assert!((p.y - 50.0).abs() < EPS);
		assert!((p.x - 100.0).abs() < EPS);
		assert!(p.z.abs() < EPS);
	}

	#[test]
	fn quarter_turn_moves_node_to_limb() {
		let p = project(0.0, 0.0, PI / 2.0, 0.0, 0.0, 10.0);
		assert!((p.x - 10.0).abs() < EPS);
		assert!(p.z.abs() < EPS);
	}

	#[test]
	fn depth_scale_is_monotone_and_bounded() {
		assert_eq!(depth_scale(1.0), 1.0);
		assert!(depth_scale(0.0) < depth_scale(0.5));
		assert!(depth_scale(-0.2) > 0.0);
		assert_eq!(depth_scale(-1.0), 0.1);
	}

	#[test]
	fn rotation_increases_every_step() {
		let config = FieldConfig::globe();
		let mut globe = Globe::seed(&config, 400.0, 300.0, &mut SmallRng::seed_from_u64(2));
		let mut last = globe.rotation();
		for _ in 0..5000 {
			globe.step();
			assert!(globe.rotation() > last);
			last = globe.rotation();
		}
	}

	#[test]
	fn seeds_hubs_then_random_fill() {
		let config = FieldConfig::globe();
		let globe = Globe::seed(&config, 400.0, 300.0, &mut SmallRng::seed_from_u64(4));
		assert_eq!(globe.nodes.len(), config.count);
		let first = &config.globe.points[0];
		assert!((globe.nodes[0].lat - first.lat.to_radians()).abs() < EPS);
		assert!((globe.nodes[0].lon - first.lon.to_radians()).abs() < EPS);
		for node in &globe.nodes {
			assert!((-PI / 2.0..=PI / 2.0).contains(&node.lat));
		}
	}

	#[test]
	fn hub_list_is_truncated_to_count() {
		let mut config = FieldConfig::globe();
		config.count = 3;
		let globe = Globe::seed(&config, 400.0, 300.0, &mut SmallRng::seed_from_u64(4));
		assert_eq!(globe.nodes.len(), 3);
	}

	#[test]
	fn sphere_fits_smaller_side() {
		let config = FieldConfig::globe();
		let globe = Globe::seed(&config, 800.0, 600.0, &mut SmallRng::seed_from_u64(5));
		assert_eq!(globe.center(), (400.0, 300.0));
		assert!((globe.radius() - 600.0 * config.globe.radius_ratio).abs() < EPS);
	}

	#[test]
	fn visible_nodes_all_pass_cull() {
		let config = FieldConfig::globe();
		let globe = Globe::seed(&config, 800.0, 600.0, &mut SmallRng::seed_from_u64(6));
		let visible = globe.visible();
		assert!(!visible.is_empty());
		assert!(visible.len() <= globe.nodes.len());
		for v in visible {
			assert!(v.projection.z > config.globe.cull_z);
		}
	}
}
