//! Animated particle field backgrounds.
//!
//! Renders a fixed set of glowing nodes on an HTML canvas with:
//! - Drifting nodes that bounce off the canvas edges (`network`, `neural`)
//! - Nodes pinned to a rotating, depth-culled sphere (`globe`)
//! - Gradient edges between nearby nodes, fading out with distance
//! - Per-node glow pulses, offset by phase so nodes never pulse in lockstep
//!
//! # Example
//!
//! ```ignore
//! use neural_field::{ParticleFieldCanvas, Variant};
//!
//! view! {
//!     <section style="position: relative; height: 480px;">
//!         <ParticleFieldCanvas variant=Variant::Neural count=40 opacity=0.5 />
//!     </section>
//! }
//! ```
//!
//! Frames can also be driven without a browser by pairing a
//! [`ParticleField`] with a [`RecordingSurface`] and calling
//! [`ParticleField::frame`] directly.

mod component;
/// Presets, JSON overrides and validation.
pub mod config;
mod field;
/// Rotating sphere of nodes.
pub mod globe;
/// Drifting particles with reflective walls.
pub mod particles;
/// Per-frame drawing.
pub mod render;
/// Animation frame scheduling.
pub mod scheduler;
/// Simulation state and surface size.
pub mod state;
/// Drawing surfaces.
pub mod surface;
/// Colours and per-variant styles.
pub mod theme;

pub use component::ParticleFieldCanvas;
pub use config::{ConfigError, FieldConfig, GeoPoint, GlobeConfig, PulseConfig, Variant};
pub use field::ParticleField;
pub use particles::Particle;
pub use scheduler::{AnimationFrameHost, FrameHost, FrameLoop};
pub use state::SurfaceSize;
pub use surface::{CanvasSurface, DrawCommand, RecordingSurface, Surface, SurfaceError};
pub use theme::{Color, FieldStyle, GradientStop};
