//! One particle field: simulation state, style, and an optional surface.
//!
//! This is the mount-independent core of the component. Frames are driven by
//! calling [`ParticleField::frame`] with a timestamp, either from the
//! animation loop or directly from a test.

use log::{info, warn};

use super::config::FieldConfig;
use super::particles::Particle;
use super::render;
use super::state::{FieldState, SurfaceSize};
use super::surface::Surface;
use super::theme::FieldStyle;

/// A mounted or mountable particle field drawing to a surface `S`.
pub struct ParticleField<S: Surface> {
	state: FieldState,
	style: FieldStyle,
	surface: Option<S>,
	torn_down: bool,
}

impl<S: Surface> ParticleField<S> {
	/// Create an unmounted field. `seed` drives this instance's RNG only.
	pub fn new(config: FieldConfig, seed: u64) -> Self {
		let style = FieldStyle::for_variant(config.variant);
		Self {
			state: FieldState::new(config, seed),
			style,
			surface: None,
			torn_down: false,
		}
	}

	/// Replace the variant's default style.
	pub fn with_style(mut self, style: FieldStyle) -> Self {
		self.style = style;
		self
	}

	/// Hand over the drawing surface. If the field is already sized the
	/// surface is sized to match.
	pub fn attach(&mut self, surface: S) {
		if self.torn_down {
			return;
		}
		self.surface = Some(surface);
		if let Some(size) = self.state.size() {
			self.resize_surface(size);
		}
	}

	/// Seed `count` bodies inside `size`.
	pub fn initialize(&mut self, size: SurfaceSize, count: usize) {
		if self.torn_down {
			return;
		}
		self.state.initialize(size, count);
		self.resize_surface(size);
	}

	/// Re-seed every body for the new size and resize the backing buffer.
	pub fn resize(&mut self, size: SurfaceSize) {
		if self.torn_down {
			return;
		}
		self.state.resize(size);
		self.resize_surface(size);
	}

	fn resize_surface(&mut self, size: SurfaceSize) {
		if let Some(surface) = self.surface.as_mut() {
			if let Err(e) = surface.resize(size) {
				warn!("neural-field: failed to resize surface: {}", e);
			}
		}
	}

	/// Advance one frame and draw it. Does nothing without a surface, before
	/// seeding, or after teardown.
	pub fn frame(&mut self, timestamp: f64) {
		if self.torn_down || !self.state.is_seeded() {
			return;
		}
		let Some(surface) = self.surface.as_mut() else {
			return;
		};
		self.state.step(timestamp);
		render::render(surface, &self.state, &self.style);
	}

	/// Release the surface and bodies. Safe to call repeatedly.
	pub fn teardown(&mut self) {
		if self.torn_down {
			return;
		}
		self.torn_down = true;
		self.surface = None;
		self.state.clear();
		info!("neural-field: {} field torn down", self.style.name);
	}

	/// Whether [`teardown`](Self::teardown) has run.
	pub fn is_torn_down(&self) -> bool {
		self.torn_down
	}

	/// Simulation state.
	pub fn state(&self) -> &FieldState {
		&self.state
	}

	/// Drifting particles. Empty for the globe variant.
	pub fn particles(&self) -> &[Particle] {
		self.state.particles()
	}

	/// Reposition particles in place. The particle count cannot change.
	pub fn particles_mut(&mut self) -> &mut [Particle] {
		self.state.particles_mut()
	}

	/// The attached surface, if any.
	pub fn surface(&self) -> Option<&S> {
		self.surface.as_ref()
	}

	/// Mutable access to the attached surface.
	pub fn surface_mut(&mut self) -> Option<&mut S> {
		self.surface.as_mut()
	}
}
