//! Field configuration.
//!
//! Each [`Variant`] has a preset holding its constants (count, connection
//! distance, pulse timing, globe parameters). JSON overrides are layered on
//! top of the preset chosen by the override's `variant`, so a document that
//! only says `{"variant": "globe"}` yields the full globe preset.

use serde::Deserialize;
use thiserror::Error;

/// Upper bound on bodies per field. Edges are checked pairwise every frame.
pub const MAX_COUNT: usize = 1000;

/// Errors produced while loading or validating a [`FieldConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The JSON document could not be parsed.
	#[error("failed to parse field config: {0}")]
	Parse(#[from] serde_json::Error),

	/// A field holds a value the renderer cannot use.
	#[error("invalid field config `{field}`: {reason}")]
	Invalid {
		/// Name of the offending field.
		field: &'static str,
		/// Human-readable explanation.
		reason: String,
	},
}

/// Which flavour of particle field to render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
	/// Free-floating nodes with two-stop gradient edges.
	#[default]
	Network,
	/// Slower, denser nodes with three-stop gradient edges.
	Neural,
	/// Nodes pinned to a rotating sphere.
	Globe,
}

/// Glow pulse timing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
	/// Divisor applied to the frame timestamp (milliseconds) inside `sin`.
	pub period_ms: f64,
	/// Relative oscillation around 1.0 (0.3 = ±30%).
	pub amplitude: f64,
}

impl Default for PulseConfig {
	fn default() -> Self {
		Self {
			period_ms: 1000.0,
			amplitude: 0.25,
		}
	}
}

/// A fixed location on the globe, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct GeoPoint {
	/// Latitude, -90..=90.
	pub lat: f64,
	/// Longitude, -180..=180.
	pub lon: f64,
}

impl GeoPoint {
	/// Construct from degrees.
	pub const fn new(lat: f64, lon: f64) -> Self {
		Self { lat, lon }
	}
}

/// Globe-only parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
	/// Rotation added every frame, in radians.
	pub rotation_speed: f64,
	/// Sphere radius as a fraction of `min(width, height)`.
	pub radius_ratio: f64,
	/// Nodes with depth `z <= cull_z` are not drawn.
	pub cull_z: f64,
	/// Explicit hub locations, placed before any random fill.
	pub points: Vec<GeoPoint>,
}

impl Default for GlobeConfig {
	fn default() -> Self {
		Self {
			rotation_speed: 0.003,
			radius_ratio: 0.4,
			cull_z: -0.2,
			points: vec![
				GeoPoint::new(37.77, -122.42), // San Francisco
				GeoPoint::new(40.71, -74.01),  // New York
				GeoPoint::new(-23.55, -46.63), // São Paulo
				GeoPoint::new(51.51, -0.13),   // London
				GeoPoint::new(52.52, 13.40),   // Berlin
				GeoPoint::new(6.52, 3.38),     // Lagos
				GeoPoint::new(19.08, 72.88),   // Mumbai
				GeoPoint::new(1.35, 103.82),   // Singapore
				GeoPoint::new(35.68, 139.69),  // Tokyo
				GeoPoint::new(-33.87, 151.21), // Sydney
			],
		}
	}
}

/// Complete configuration for one mounted field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
	/// Motion rule and style family.
	pub variant: Variant,
	/// Number of bodies. Fixed for the lifetime of a seeding.
	pub count: usize,
	/// Maximum distance (logical pixels) at which two nodes are joined.
	pub connection_distance: f64,
	/// Velocity scale for drifting variants, pixels per frame.
	pub speed: f64,
	/// Smallest body radius in CSS pixels.
	pub radius_min: f64,
	/// Largest body radius in CSS pixels.
	pub radius_max: f64,
	/// Overall density modifier applied to everything drawn.
	pub opacity: f64,
	/// Glow pulse timing.
	pub pulse: PulseConfig,
	/// Globe parameters, used by [`Variant::Globe`] only.
	pub globe: GlobeConfig,
}

impl FieldConfig {
	/// General graph background used on the landing hero.
	pub fn network() -> Self {
		Self {
			variant: Variant::Network,
			count: 50,
			connection_distance: 150.0,
			speed: 0.6,
			radius_min: 1.5,
			radius_max: 3.0,
			opacity: 0.6,
			pulse: PulseConfig {
				period_ms: 1000.0,
				amplitude: 0.3,
			},
			globe: GlobeConfig::default(),
		}
	}

	/// Calmer "neural" background used behind long-form sections.
	pub fn neural() -> Self {
		Self {
			variant: Variant::Neural,
			count: 40,
			connection_distance: 120.0,
			speed: 0.4,
			radius_min: 2.0,
			radius_max: 4.0,
			opacity: 0.5,
			pulse: PulseConfig {
				period_ms: 800.0,
				amplitude: 0.2,
			},
			globe: GlobeConfig::default(),
		}
	}

	/// Spinning globe used on the contact page.
	pub fn globe() -> Self {
		Self {
			variant: Variant::Globe,
			count: 60,
			connection_distance: 90.0,
			speed: 0.0,
			radius_min: 1.5,
			radius_max: 3.0,
			opacity: 0.8,
			pulse: PulseConfig {
				period_ms: 1200.0,
				amplitude: 0.25,
			},
			globe: GlobeConfig::default(),
		}
	}

	/// Preset for a variant.
	pub fn for_variant(variant: Variant) -> Self {
		match variant {
			Variant::Network => Self::network(),
			Variant::Neural => Self::neural(),
			Variant::Globe => Self::globe(),
		}
	}

	/// Parse a JSON override document and validate the result.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let overrides: FieldOverrides = serde_json::from_str(json)?;
		let config = overrides.apply();
		config.validate()?;
		Ok(config)
	}

	/// Reject values the renderer cannot use.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let finite = [
			("connection_distance", self.connection_distance),
			("speed", self.speed),
			("radius_min", self.radius_min),
			("radius_max", self.radius_max),
			("opacity", self.opacity),
			("pulse.period_ms", self.pulse.period_ms),
			("pulse.amplitude", self.pulse.amplitude),
			("globe.rotation_speed", self.globe.rotation_speed),
			("globe.radius_ratio", self.globe.radius_ratio),
			("globe.cull_z", self.globe.cull_z),
		];
		for (field, value) in finite {
			if !value.is_finite() {
				return Err(invalid(field, format!("{value} is not finite")));
			}
		}

		if self.count > MAX_COUNT {
			return Err(invalid(
				"count",
				format!("{} exceeds the maximum of {MAX_COUNT}", self.count),
			));
		}
		if self.connection_distance < 0.0 {
			return Err(invalid("connection_distance", "must not be negative"));
		}
		if self.radius_min < 0.0 || self.radius_min > self.radius_max {
			return Err(invalid(
				"radius_min",
				format!(
					"range {}..{} is empty or negative",
					self.radius_min, self.radius_max
				),
			));
		}
		if !(0.0..=1.0).contains(&self.opacity) {
			return Err(invalid("opacity", "must be within 0..=1"));
		}
		if self.pulse.period_ms <= 0.0 {
			return Err(invalid("pulse.period_ms", "must be positive"));
		}
		if !(0.0..1.0).contains(&self.pulse.amplitude) {
			return Err(invalid("pulse.amplitude", "must be within 0..1"));
		}
		if self.globe.radius_ratio <= 0.0 {
			return Err(invalid("globe.radius_ratio", "must be positive"));
		}
		for point in &self.globe.points {
			if !(-90.0..=90.0).contains(&point.lat) || !(-180.0..=180.0).contains(&point.lon) {
				return Err(invalid(
					"globe.points",
					format!("({}, {}) is not a valid location", point.lat, point.lon),
				));
			}
		}
		Ok(())
	}
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self::network()
	}
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
	ConfigError::Invalid {
		field,
		reason: reason.into(),
	}
}

/// Sparse JSON form of [`FieldConfig`]. Missing fields keep the preset value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FieldOverrides {
	variant: Option<Variant>,
	count: Option<usize>,
	connection_distance: Option<f64>,
	speed: Option<f64>,
	radius_min: Option<f64>,
	radius_max: Option<f64>,
	opacity: Option<f64>,
	pulse: Option<PulseOverrides>,
	globe: Option<GlobeOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PulseOverrides {
	period_ms: Option<f64>,
	amplitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GlobeOverrides {
	rotation_speed: Option<f64>,
	radius_ratio: Option<f64>,
	cull_z: Option<f64>,
	points: Option<Vec<GeoPoint>>,
}

impl FieldOverrides {
	fn apply(self) -> FieldConfig {
		let mut config = FieldConfig::for_variant(self.variant.unwrap_or_default());
		if let Some(count) = self.count {
			config.count = count;
		}
		if let Some(d) = self.connection_distance {
			config.connection_distance = d;
		}
		if let Some(speed) = self.speed {
			config.speed = speed;
		}
		if let Some(r) = self.radius_min {
			config.radius_min = r;
		}
		if let Some(r) = self.radius_max {
			config.radius_max = r;
		}
		if let Some(opacity) = self.opacity {
			config.opacity = opacity;
		}
		if let Some(pulse) = self.pulse {
			if let Some(period) = pulse.period_ms {
				config.pulse.period_ms = period;
			}
			if let Some(amplitude) = pulse.amplitude {
				config.pulse.amplitude = amplitude;
			}
		}
		if let Some(globe) = self.globe {
			if let Some(speed) = globe.rotation_speed {
				config.globe.rotation_speed = speed;
			}
			if let Some(ratio) = globe.radius_ratio {
				config.globe.radius_ratio = ratio;
			}
			if let Some(cull) = globe.cull_z {
				config.globe.cull_z = cull;
			}
			if let Some(points) = globe.points {
				config.globe.points = points;
			}
		}
		config
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn presets_are_valid() {
		for variant in [Variant::Network, Variant::Neural, Variant::Globe] {
			let config = FieldConfig::for_variant(variant);
			assert_eq!(config.variant, variant);
			config.validate().unwrap();
		}
	}

	#[test]
	fn counts_stay_in_observed_band() {
		assert!((25..=60).contains(&FieldConfig::network().count));
		assert!((25..=60).contains(&FieldConfig::neural().count));
	}

	#[test]
	fn variant_only_document_yields_preset() {
		let config = FieldConfig::from_json(r#"{"variant": "globe"}"#).unwrap();
		assert_eq!(config, FieldConfig::globe());
	}

	#[test]
	fn overrides_layer_on_variant_preset() {
		let config =
			FieldConfig::from_json(r#"{"variant": "neural", "count": 25, "opacity": 0.3}"#)
				.unwrap();
		assert_eq!(config.count, 25);
		assert_eq!(config.opacity, 0.3);
		assert_eq!(
			config.connection_distance,
			FieldConfig::neural().connection_distance
		);
	}

	#[test]
	fn partial_pulse_keeps_preset_period() {
		let config =
			FieldConfig::from_json(r#"{"variant": "neural", "pulse": {"amplitude": 0.1}}"#).unwrap();
		assert_eq!(config.pulse.amplitude, 0.1);
		assert_eq!(config.pulse.period_ms, FieldConfig::neural().pulse.period_ms);

		let config = FieldConfig::from_json(r#"{"variant": "globe", "pulse": {"period_ms": 500}}"#)
			.unwrap();
		assert_eq!(config.pulse.period_ms, 500.0);
		assert_eq!(config.pulse.amplitude, FieldConfig::globe().pulse.amplitude);
	}

	#[test]
	fn partial_globe_keeps_preset_hubs() {
		let config =
			FieldConfig::from_json(r#"{"variant": "globe", "globe": {"cull_z": 0.0}}"#).unwrap();
		let preset = FieldConfig::globe().globe;
		assert_eq!(config.globe.cull_z, 0.0);
		assert_eq!(config.globe.points, preset.points);
		assert_eq!(config.globe.rotation_speed, preset.rotation_speed);
	}

	#[test]
	fn empty_document_is_network() {
		let config = FieldConfig::from_json("{}").unwrap();
		assert_eq!(config, FieldConfig::network());
	}

	#[test]
	fn malformed_json_is_parse_error() {
		let err = FieldConfig::from_json("{count: }").unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[test]
	fn unknown_variant_is_parse_error() {
		let err = FieldConfig::from_json(r#"{"variant": "galaxy"}"#).unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[test]
	fn rejects_inverted_radius_range() {
		let err = FieldConfig::from_json(r#"{"radius_min": 5, "radius_max": 1}"#).unwrap_err();
		assert!(matches!(
			err,
			ConfigError::Invalid {
				field: "radius_min",
				..
			}
		));
	}

	#[test]
	fn rejects_non_positive_period() {
		let mut config = FieldConfig::neural();
		config.pulse.period_ms = 0.0;
		assert!(config.validate().is_err());
	}

	#[test]
	fn rejects_opacity_out_of_range() {
		let err = FieldConfig::from_json(r#"{"opacity": 1.5}"#).unwrap_err();
		assert!(err.to_string().contains("opacity"));
	}

	#[test]
	fn rejects_excessive_count() {
		let mut config = FieldConfig::network();
		config.count = MAX_COUNT + 1;
		assert!(config.validate().is_err());
	}

	#[test]
	fn rejects_invalid_globe_point() {
		let err = FieldConfig::from_json(
			r#"{"variant": "globe", "globe": {"points": [{"lat": 95, "lon": 0}]}}"#,
		)
		.unwrap_err();
		assert!(matches!(
			err,
			ConfigError::Invalid {
				field: "globe.points",
				..
			}
		));
	}

	#[test]
	fn zero_count_is_valid() {
		let config = FieldConfig::from_json(r#"{"count": 0}"#).unwrap();
		assert_eq!(config.count, 0);
	}
}
