//! Leptos component wrapping a particle field canvas.
//!
//! The component creates a canvas that fills its positioned parent, sizes it
//! for the device pixel ratio, and drives the field from an animation loop via
//! `requestAnimationFrame`. Resizing the window re-seeds the field. Unmounting
//! stops the loop, detaches the resize listener and drops the field.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

use super::config::{FieldConfig, Variant};
use super::field::ParticleField;
use super::scheduler::{AnimationFrameHost, FrameCallback, FrameLoop};
use super::state::SurfaceSize;
use super::surface::{CanvasSurface, SurfaceError};

/// Everything a mounted canvas owns, released together on unmount.
struct Mounted {
	window: Window,
	field: Rc<RefCell<ParticleField<CanvasSurface>>>,
	frames: Rc<RefCell<FrameLoop<AnimationFrameHost>>>,
	animate: FrameCallback,
	resize_cb: Option<Closure<dyn FnMut()>>,
}

impl Mounted {
	fn teardown(&mut self) {
		self.frames.borrow_mut().stop();
		if let Some(cb) = self.resize_cb.take() {
			let _ = self
				.window
				.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		self.field.borrow_mut().teardown();
		// The callback holds the loop, which holds the callback slot.
		self.animate.borrow_mut().take();
	}
}

/// Rendered box of the canvas' parent (or the canvas itself) plus the
/// device pixel ratio.
fn measure(canvas: &HtmlCanvasElement, window: &Window) -> SurfaceSize {
	let rect = canvas
		.parent_element()
		.map(|p| p.get_bounding_client_rect())
		.unwrap_or_else(|| canvas.get_bounding_client_rect());
	SurfaceSize::new(rect.width(), rect.height(), window.device_pixel_ratio())
}

fn random_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}

fn mount(canvas: HtmlCanvasElement, config: FieldConfig) -> Result<Mounted, SurfaceError> {
	let window = web_sys::window().ok_or(SurfaceError::NoWindow)?;
	let surface = CanvasSurface::new(canvas.clone())?;

	let count = config.count;
	let variant = config.variant;
	let mut field = ParticleField::new(config, random_seed());
	field.attach(surface);
	field.initialize(measure(&canvas, &window), count);
	let field = Rc::new(RefCell::new(field));

	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let frames = Rc::new(RefCell::new(FrameLoop::new(AnimationFrameHost::new(
		window.clone(),
		animate.clone(),
	))));

	let (field_anim, frames_anim) = (field.clone(), frames.clone());
	*animate.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
		if !frames_anim.borrow_mut().begin_frame() {
			return;
		}
		field_anim.borrow_mut().frame(timestamp);
		frames_anim.borrow_mut().end_frame();
	}));

	let (field_resize, canvas_resize) = (field.clone(), canvas);
	let resize_cb: Closure<dyn FnMut()> = Closure::new(move || {
		let Some(win) = web_sys::window() else {
			return;
		};
		field_resize.borrow_mut().resize(measure(&canvas_resize, &win));
	});
	release_on_err(
		&animate,
		window.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref()),
	)?;

	frames.borrow_mut().start();
	info!("neural-field: mounted {:?} field with {} bodies", variant, count);

	Ok(Mounted {
		window,
		field,
		frames,
		animate,
		resize_cb: Some(resize_cb),
	})
}

/// Empties `slot` when `result` is an error. The animation closure holds the
/// frame loop that holds the closure, so a failed mount must break the cycle.
fn release_on_err<T, E, C>(slot: &RefCell<Option<C>>, result: Result<T, E>) -> Result<T, E> {
	if result.is_err() {
		slot.borrow_mut().take();
	}
	result
}

/// Resolve props into a usable configuration, falling back to the variant
/// preset when the result does not validate.
fn resolve_config(
	variant: Variant,
	config: Option<FieldConfig>,
	count: Option<usize>,
	opacity: Option<f64>,
) -> FieldConfig {
	let mut resolved = config.unwrap_or_else(|| FieldConfig::for_variant(variant));
	if let Some(count) = count {
		resolved.count = count;
	}
	if let Some(opacity) = opacity {
		resolved.opacity = opacity;
	}
	match resolved.validate() {
		Ok(()) => resolved,
		Err(e) => {
			warn!("neural-field: {}; using {:?} preset", e, resolved.variant);
			FieldConfig::for_variant(resolved.variant)
		}
	}
}

/// Decorative animated background.
///
/// The canvas is absolutely positioned to fill its parent, so the parent must
/// be a positioned element. A full `config` takes precedence over `variant`;
/// `count` and `opacity` override whichever configuration is in effect.
#[component]
pub fn ParticleFieldCanvas(
	#[prop(default = Variant::Network)] variant: Variant,
	#[prop(optional)] config: Option<FieldConfig>,
	#[prop(optional)] count: Option<usize>,
	#[prop(optional)] opacity: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted: Rc<RefCell<Option<Mounted>>> = Rc::new(RefCell::new(None));
	let config = resolve_config(variant, config, count, opacity);

	let mounted_init = mounted.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if mounted_init.borrow().is_some() {
			return;
		}
		match mount(canvas.into(), config.clone()) {
			Ok(m) => *mounted_init.borrow_mut() = Some(m),
			Err(e) => warn!("neural-field: not rendering: {}", e),
		}
	});

	let mounted = StoredValue::new_local(mounted);
	on_cleanup(move || {
		mounted.try_with_value(|m| {
			if let Some(mut m) = m.borrow_mut().take() {
				m.teardown();
			}
		});
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-field-canvas"
			aria-hidden="true"
			style="position: absolute; inset: 0; display: block; pointer-events: none;"
		/>
	}
}
