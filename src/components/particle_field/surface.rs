//! Drawing surfaces.
//!
//! The renderer only talks to the [`Surface`] trait. [`CanvasSurface`] draws to
//! an HTML canvas; [`RecordingSurface`] keeps a list of commands so frames can
//! be inspected without a browser.

use std::f64::consts::TAU;

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::state::SurfaceSize;
use super::theme::{Color, GradientStop};

/// Errors raised while acquiring or sizing a drawing surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
	/// No global `window` (not running in a browser).
	#[error("no window available")]
	NoWindow,
	/// The canvas refused to hand out a 2d context.
	#[error("2d drawing context unavailable")]
	NoContext,
	/// A DOM call threw.
	#[error("canvas call failed: {0}")]
	Js(String),
}

impl From<JsValue> for SurfaceError {
	fn from(err: JsValue) -> Self {
		SurfaceError::Js(err.as_string().unwrap_or_else(|| format!("{err:?}")))
	}
}

/// A 2D raster target in logical (CSS) pixel coordinates.
///
/// Drawing calls are infallible: a failed call leaves the pixels unchanged.
pub trait Surface {
	/// Match the backing buffer to `size` in physical pixels.
	fn resize(&mut self, size: SurfaceSize) -> Result<(), SurfaceError>;

	/// Wipe the surface, optionally painting `fill` over it.
	fn clear(&mut self, size: SurfaceSize, fill: Option<Color>);

	/// Straight line with a color gradient running from `from` to `to`.
	fn gradient_line(
		&mut self,
		from: (f64, f64),
		to: (f64, f64),
		stops: &[GradientStop],
		width: f64,
	);

	/// Disc filled with a radial gradient from the center outwards.
	fn radial_glow(&mut self, center: (f64, f64), radius: f64, stops: &[GradientStop]);

	fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color);

	fn stroke_circle(&mut self, center: (f64, f64), radius: f64, color: Color, width: f64);
}

/// Canvas 2d context bound to its element.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	/// Wrap `canvas` and acquire its 2d context.
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or(SurfaceError::NoContext)?
			.dyn_into()
			.map_err(|_| SurfaceError::NoContext)?;
		Ok(Self { canvas, ctx })
	}

	/// The wrapped canvas.
	pub fn canvas(&self) -> &HtmlCanvasElement {
		&self.canvas
	}
}

impl Surface for CanvasSurface {
	fn resize(&mut self, size: SurfaceSize) -> Result<(), SurfaceError> {
		self.canvas.set_width(size.backing_width());
		self.canvas.set_height(size.backing_height());

		let style = self.canvas.style();
		style.set_property("width", &format!("{}px", size.width))?;
		style.set_property("height", &format!("{}px", size.height))?;

		// Resetting the buffer resets the transform, so apply the ratio afresh.
		let ratio = size.pixel_ratio;
		self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)?;
		Ok(())
	}

	fn clear(&mut self, size: SurfaceSize, fill: Option<Color>) {
		self.ctx.clear_rect(0.0, 0.0, size.width, size.height);
		if let Some(color) = fill {
			self.ctx.set_fill_style_str(&color.to_css());
			self.ctx.fill_rect(0.0, 0.0, size.width, size.height);
		}
	}

	fn gradient_line(
		&mut self,
		from: (f64, f64),
		to: (f64, f64),
		stops: &[GradientStop],
		width: f64,
	) {
		let gradient = self.ctx.create_linear_gradient(from.0, from.1, to.0, to.1);
		for stop in stops {
			let _ = gradient.add_color_stop(stop.offset as f32, &stop.color.to_css());
		}

		#[allow(deprecated)]
		self.ctx.set_stroke_style(&gradient);
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		self.ctx.move_to(from.0, from.1);
		self.ctx.line_to(to.0, to.1);
		self.ctx.stroke();
	}

	fn radial_glow(&mut self, center: (f64, f64), radius: f64, stops: &[GradientStop]) {
		let Ok(gradient) = self
			.ctx
			.create_radial_gradient(center.0, center.1, 0.0, center.0, center.1, radius)
		else {
			return;
		};
		for stop in stops {
			let _ = gradient.add_color_stop(stop.offset as f32, &stop.color.to_css());
		}

		self.ctx.begin_path();
		let _ = self.ctx.arc(center.0, center.1, radius, 0.0, TAU);
		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill();
	}

	fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color) {
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.0, center.1, radius, 0.0, TAU);
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill();
	}

	fn stroke_circle(&mut self, center: (f64, f64), radius: f64, color: Color, width: f64) {
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.0, center.1, radius, 0.0, TAU);
		self.ctx.set_stroke_style_str(&color.to_css());
		self.ctx.set_line_width(width);
		self.ctx.stroke();
	}
}

/// A command captured by [`RecordingSurface`]. Fields mirror the arguments
/// of the matching [`Surface`] method.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	/// [`Surface::resize`]
	Resize(SurfaceSize),
	/// [`Surface::clear`]
	Clear {
		size: SurfaceSize,
		fill: Option<Color>,
	},
	/// [`Surface::gradient_line`]
	Line {
		from: (f64, f64),
		to: (f64, f64),
		stops: Vec<GradientStop>,
		width: f64,
	},
	/// [`Surface::radial_glow`]
	Glow {
		center: (f64, f64),
		radius: f64,
		stops: Vec<GradientStop>,
	},
	/// [`Surface::fill_circle`]
	Circle {
		center: (f64, f64),
		radius: f64,
		color: Color,
	},
	/// [`Surface::stroke_circle`]
	Ring {
		center: (f64, f64),
		radius: f64,
		color: Color,
		width: f64,
	},
}

/// Headless surface that records every call.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
	/// Every command in call order.
	pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
	/// An empty recording.
	pub fn new() -> Self {
		Self::default()
	}

	/// Drop recorded commands, returning them.
	pub fn take(&mut self) -> Vec<DrawCommand> {
		std::mem::take(&mut self.commands)
	}

	/// Recorded edge lines.
	pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
		self.commands
			.iter()
			.filter(|c| matches!(c, DrawCommand::Line { .. }))
	}

	/// Recorded glows.
	pub fn glows(&self) -> impl Iterator<Item = &DrawCommand> {
		self.commands
			.iter()
			.filter(|c| matches!(c, DrawCommand::Glow { .. }))
	}

	/// Recorded core fills.
	pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
		self.commands
			.iter()
			.filter(|c| matches!(c, DrawCommand::Circle { .. }))
	}
}

impl Surface for RecordingSurface {
	fn resize(&mut self, size: SurfaceSize) -> Result<(), SurfaceError> {
		self.commands.push(DrawCommand::Resize(size));
		Ok(())
	}

	fn clear(&mut self, size: SurfaceSize, fill: Option<Color>) {
		self.commands.push(DrawCommand::Clear { size, fill });
	}

	fn gradient_line(
		&mut self,
		from: (f64, f64),
		to: (f64, f64),
		stops: &[GradientStop],
		width: f64,
	) {
		self.commands.push(DrawCommand::Line {
			from,
			to,
			stops: stops.to_vec(),
			width,
		});
	}

	fn radial_glow(&mut self, center: (f64, f64), radius: f64, stops: &[GradientStop]) {
		self.commands.push(DrawCommand::Glow {
			center,
			radius,
			stops: stops.to_vec(),
		});
	}

	fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color) {
		self.commands.push(DrawCommand::Circle {
			center,
			radius,
			color,
		});
	}

	fn stroke_circle(&mut self, center: (f64, f64), radius: f64, color: Color, width: f64) {
		self.commands.push(DrawCommand::Ring {
			center,
			radius,
			color,
			width,
		});
	}
}
