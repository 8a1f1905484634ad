//! Drifting particles with reflective walls.

use std::f64::consts::TAU;

use rand::Rng;

use super::config::FieldConfig;

/// A single floating particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Horizontal position, CSS pixels.
	pub x: f64,
	/// Vertical position, CSS pixels.
	pub y: f64,
	/// Horizontal velocity per frame.
	pub vx: f64,
	/// Vertical velocity per frame.
	pub vy: f64,
	/// Core radius.
	pub radius: f64,
	/// Pulse offset.
	pub phase: f64,
}

impl Particle {
	/// Advance one frame, bouncing off the walls of `[0, width] x [0, height]`.
	pub fn step(&mut self, width: f64, height: f64) {
		(self.x, self.vx) = bounce(self.x + self.vx, self.vx, width);
		(self.y, self.vy) = bounce(self.y + self.vy, self.vy, height);
	}
}

/// Reflect an already-advanced coordinate back into `[0, extent]`.
///
/// The overshoot is mirrored across the wall and the velocity turned to point
/// inwards. Overshoots larger than the extent land on the far wall.
fn bounce(pos: f64, vel: f64, extent: f64) -> (f64, f64) {
	if pos < 0.0 {
		((-pos).min(extent), vel.abs())
	} else if pos > extent {
		((2.0 * extent - pos).max(0.0), -vel.abs())
	} else {
		(pos, vel)
	}
}

/// Uniform sample from `[lo, hi)`, or `lo` when the range is empty.
pub(crate) fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
	if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

/// Manages the drifting particle set for one field.
#[derive(Clone, Debug)]
pub struct ParticleSystem {
	/// Live particles.
	pub particles: Vec<Particle>,
	width: f64,
	height: f64,
}

impl ParticleSystem {
	/// Seed `config.count` particles inside a `width` x `height` rectangle.
	///
	/// Extents must be finite and non-negative. A zero extent seeds every
	/// particle on that axis at 0.
	pub fn seed<R: Rng + ?Sized>(config: &FieldConfig, width: f64, height: f64, rng: &mut R) -> Self {
		let particles = (0..config.count)
			.map(|_| Particle {
				x: sample(rng, 0.0, width),
				y: sample(rng, 0.0, height),
				vx: sample(rng, -0.5, 0.5) * config.speed,
				vy: sample(rng, -0.5, 0.5) * config.speed,
				radius: sample(rng, config.radius_min, config.radius_max),
				phase: sample(rng, 0.0, TAU),
			})
			.collect();

		Self {
			particles,
			width,
			height,
		}
	}

	/// Update particle positions
	pub fn step(&mut self) {
		for p in &mut self.particles {
			p.step(self.width, self.height);
		}
	}

	/// Horizontal extent.
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Vertical extent.
	pub fn height(&self) -> f64 {
		self.height
	}
}
