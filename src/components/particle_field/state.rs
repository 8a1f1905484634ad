//! Simulation state for one mounted field.
//!
//! Owns the seeded bodies, the surface extent they live in, and a local RNG.
//! Nothing here touches the DOM; the component and the renderer read from it.

use log::debug;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::{FieldConfig, Variant};
use super::globe::{Globe, depth_scale};
use super::particles::{Particle, ParticleSystem};

/// Logical size of the drawing surface plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
	/// CSS pixels.
	pub width: f64,
	/// CSS pixels.
	pub height: f64,
	/// Physical pixels per CSS pixel.
	pub pixel_ratio: f64,
}

impl SurfaceSize {
	/// Normalizes unusable input: non-finite or negative extents become 0 and a
	/// non-finite or non-positive ratio becomes 1.
	pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
		let extent = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
		Self {
			width: extent(width),
			height: extent(height),
			pixel_ratio: if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
				pixel_ratio
			} else {
				1.0
			},
		}
	}

	/// Backing buffer width in physical pixels.
	pub fn backing_width(&self) -> u32 {
		(self.width * self.pixel_ratio).round() as u32
	}

	/// Backing buffer height in physical pixels.
	pub fn backing_height(&self) -> u32 {
		(self.height * self.pixel_ratio).round() as u32
	}

	/// True when either CSS extent is zero.
	pub fn is_empty(&self) -> bool {
		self.width == 0.0 || self.height == 0.0
	}
}

/// Drawable view of one body for the current frame, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
	/// Screen x.
	pub x: f64,
	/// Screen y.
	pub y: f64,
	/// Drawn core radius.
	pub radius: f64,
	/// Pulse offset.
	pub phase: f64,
	/// Opacity multiplier (depth fade on the globe, 1.0 otherwise).
	pub alpha: f64,
}

/// The seeded bodies, by motion rule.
#[derive(Clone, Debug)]
pub enum Bodies {
	/// Velocity integration with reflective walls.
	Drift(ParticleSystem),
	/// Fixed locations on a rotating sphere.
	Globe(Globe),
}

impl Bodies {
	fn len(&self) -> usize {
		match self {
			Bodies::Drift(system) => system.particles.len(),
			Bodies::Globe(globe) => globe.nodes.len(),
		}
	}
}

/// Simulation state: configuration, surface extent, bodies, and RNG.
pub struct FieldState {
	config: FieldConfig,
	size: Option<SurfaceSize>,
	bodies: Option<Bodies>,
	rng: SmallRng,
	time: f64,
}

impl FieldState {
	/// Create an unseeded state. Bodies appear on the first `initialize` or `resize`.
	pub fn new(config: FieldConfig, seed: u64) -> Self {
		Self {
			config,
			size: None,
			bodies: None,
			rng: SmallRng::seed_from_u64(seed),
			time: 0.0,
		}
	}

	/// Seed `count` bodies for `size`, replacing any existing set.
	pub fn initialize(&mut self, size: SurfaceSize, count: usize) {
		self.config.count = count;
		self.reseed(size);
	}

	/// Discard every body and seed a fresh set bounded by `size`.
	pub fn resize(&mut self, size: SurfaceSize) {
		self.reseed(size);
	}

	fn reseed(&mut self, size: SurfaceSize) {
		let bodies = match self.config.variant {
			Variant::Network | Variant::Neural => Bodies::Drift(ParticleSystem::seed(
				&self.config,
				size.width,
				size.height,
				&mut self.rng,
			)),
			Variant::Globe => Bodies::Globe(Globe::seed(
				&self.config,
				size.width,
				size.height,
				&mut self.rng,
			)),
		};
		debug!(
			"neural-field: seeded {} {:?} bodies for {}x{} @{}x",
			bodies.len(),
			self.config.variant,
			size.width,
			size.height,
			size.pixel_ratio
		);
		self.size = Some(size);
		self.bodies = Some(bodies);
	}

	/// Advance every body by one frame. Does nothing before seeding.
	pub fn step(&mut self, timestamp: f64) {
		let Some(bodies) = self.bodies.as_mut() else {
			return;
		};
		match bodies {
			Bodies::Drift(system) => system.step(),
			Bodies::Globe(globe) => globe.step(),
		}
		if timestamp.is_finite() {
			self.time = timestamp;
		}
	}

	/// Drawable nodes for the current frame. Globe nodes behind the cull plane
	/// are omitted.
	pub fn nodes(&self) -> Vec<Node> {
		match &self.bodies {
			None => Vec::new(),
			Some(Bodies::Drift(system)) => system
				.particles
				.iter()
				.map(|p| Node {
					x: p.x,
					y: p.y,
					radius: p.radius,
					phase: p.phase,
					alpha: 1.0,
				})
				.collect(),
			Some(Bodies::Globe(globe)) => globe
				.visible()
				.into_iter()
				.map(|v| {
					let node = &globe.nodes[v.index];
					let depth = depth_scale(v.projection.z);
					Node {
						x: v.projection.x,
						y: v.projection.y,
						radius: node.radius * depth,
						phase: node.phase,
						alpha: depth,
					}
				})
				.collect(),
		}
	}

	/// Drop all bodies. The state can be seeded again with `initialize`.
	pub fn clear(&mut self) {
		self.bodies = None;
		self.size = None;
	}

	/// Whether bodies exist.
	pub fn is_seeded(&self) -> bool {
		self.bodies.is_some()
	}

	/// Number of seeded bodies (0 before seeding).
	pub fn count(&self) -> usize {
		self.bodies.as_ref().map_or(0, Bodies::len)
	}

	/// Drifting particles; empty for the globe or before seeding.
	pub fn particles(&self) -> &[Particle] {
		match &self.bodies {
			Some(Bodies::Drift(system)) => &system.particles[..],
			_ => &[],
		}
	}

	/// Mutable access for placing particles. The slice cannot change the count.
	pub fn particles_mut(&mut self) -> &mut [Particle] {
		match &mut self.bodies {
			Some(Bodies::Drift(system)) => &mut system.particles[..],
			_ => &mut [],
		}
	}

	/// The globe, for the globe variant.
	pub fn globe(&self) -> Option<&Globe> {
		match &self.bodies {
			Some(Bodies::Globe(globe)) => Some(globe),
			_ => None,
		}
	}

	/// Current size, once initialized.
	pub fn size(&self) -> Option<SurfaceSize> {
		self.size
	}

	/// Active configuration.
	pub fn config(&self) -> &FieldConfig {
		&self.config
	}

	/// Timestamp of the most recent step, in milliseconds.
	pub fn time(&self) -> f64 {
		self.time
	}
}
