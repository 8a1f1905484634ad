//! Visual theming for particle fields.
//!
//! Provides colors, edge gradients, and glow styles for each variant.

use super::config::Variant;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque colour.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Colour with alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same colour with alpha replaced.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Multiply the existing alpha, clamped to [0, 1].
	pub fn fade(self, factor: f64) -> Self {
		Self {
			a: (self.a * factor).clamp(0.0, 1.0),
			..self
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	/// CSS `rgba()` string.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
		}
	}
}

/// One stop of a linear or radial gradient. `offset` is in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
	/// Position along the gradient, `[0, 1]`.
	pub offset: f64,
	/// Colour at this stop.
	pub color: Color,
}

impl GradientStop {
	/// Stop at `offset`.
	pub const fn new(offset: f64, color: Color) -> Self {
		Self { offset, color }
	}
}

/// Connection edge style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Gradient along the line, source to target. Two or three stops.
	pub stops: Vec<GradientStop>,
	/// Alpha of an edge between coincident nodes.
	pub max_alpha: f64,
	/// Line width in CSS pixels.
	pub width: f64,
}

/// Node glow and core style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Halo color at the node center; fades to transparent at the rim.
	pub glow_color: Color,
	/// Halo radius relative to the node radius, before pulsing.
	pub glow_radius: f64,
	/// Solid core color.
	pub core_color: Color,
}

/// Complete visual style for one field.
#[derive(Clone, Debug)]
pub struct FieldStyle {
	/// Style name, used in logs.
	pub name: &'static str,
	/// Fill painted before each frame. `None` leaves the surface transparent.
	pub background: Option<Color>,
	/// Edge appearance.
	pub edge: EdgeStyle,
	/// Node appearance.
	pub node: NodeStyle,
	/// Sphere outline for the globe variant.
	pub outline: Option<Color>,
}

impl FieldStyle {
	/// Indigo to cyan graph.
	pub fn network() -> Self {
		Self {
			name: "network",
			background: None,
			edge: EdgeStyle {
				stops: vec![
					GradientStop::new(0.0, Color::rgb(99, 102, 241)),
					GradientStop::new(1.0, Color::rgb(34, 211, 238)),
				],
				max_alpha: 0.5,
				width: 1.0,
			},
			node: NodeStyle {
				glow_color: Color::rgba(129, 140, 248, 0.6),
				glow_radius: 4.0,
				core_color: Color::rgb(224, 231, 255),
			},
			outline: None,
		}
	}

	/// Violet-pink-blue synapses.
	pub fn neural() -> Self {
		Self {
			name: "neural",
			background: None,
			edge: EdgeStyle {
				stops: vec![
					GradientStop::new(0.0, Color::rgb(168, 85, 247)),
					GradientStop::new(0.5, Color::rgb(236, 72, 153)),
					GradientStop::new(1.0, Color::rgb(59, 130, 246)),
				],
				max_alpha: 0.35,
				width: 0.8,
			},
			node: NodeStyle {
				glow_color: Color::rgba(192, 132, 252, 0.5),
				glow_radius: 3.0,
				core_color: Color::rgb(243, 232, 255),
			},
			outline: None,
		}
	}

	/// Teal hubs on a faint sphere.
	pub fn globe() -> Self {
		Self {
			name: "globe",
			background: None,
			edge: EdgeStyle {
				stops: vec![
					GradientStop::new(0.0, Color::rgb(45, 212, 191)),
					GradientStop::new(1.0, Color::rgb(56, 189, 248)),
				],
				max_alpha: 0.6,
				width: 1.0,
			},
			node: NodeStyle {
				glow_color: Color::rgba(94, 234, 212, 0.7),
				glow_radius: 3.5,
				core_color: Color::rgb(240, 253, 250),
			},
			outline: Some(Color::rgba(45, 212, 191, 0.15)),
		}
	}

	/// Style for a variant.
	pub fn for_variant(variant: Variant) -> Self {
		match variant {
			Variant::Network => Self::network(),
			Variant::Neural => Self::neural(),
			Variant::Globe => Self::globe(),
		}
	}
}
