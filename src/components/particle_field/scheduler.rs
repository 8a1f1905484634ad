//! Explicit frame scheduling.
//!
//! [`FrameLoop`] tracks whether a field is animating and which display-refresh
//! request is outstanding, so teardown can cancel it. The host that actually
//! issues requests sits behind [`FrameHost`]: `requestAnimationFrame` in the
//! browser, a counter in tests.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::Window;

/// Issues and cancels one-shot frame callbacks.
pub trait FrameHost {
	/// Identifier of an outstanding request.
	type Handle: Copy;

	/// Request a callback on the next display refresh.
	fn schedule(&mut self) -> Option<Self::Handle>;

	/// Withdraw an outstanding request.
	fn cancel(&mut self, handle: Self::Handle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
	Idle,
	Running,
	Stopped,
}

/// Start/stop handle around a [`FrameHost`].
///
/// The frame callback brackets its work with [`begin_frame`](Self::begin_frame)
/// and [`end_frame`](Self::end_frame); the latter re-arms the host while the
/// loop is running. [`stop`](Self::stop) is terminal and idempotent.
pub struct FrameLoop<H: FrameHost> {
	host: H,
	phase: Phase,
	pending: Option<H::Handle>,
}

impl<H: FrameHost> FrameLoop<H> {
	/// Idle loop over `host`.
	pub fn new(host: H) -> Self {
		Self {
			host,
			phase: Phase::Idle,
			pending: None,
		}
	}

	/// Schedule the first frame. Returns `false` if already started or stopped.
	pub fn start(&mut self) -> bool {
		if self.phase != Phase::Idle {
			return false;
		}
		self.phase = Phase::Running;
		self.arm();
		true
	}

	/// Mark the outstanding request as delivered. Returns whether the frame
	/// should do any work.
	pub fn begin_frame(&mut self) -> bool {
		self.pending = None;
		self.phase == Phase::Running
	}

	/// Request the next frame if still running.
	pub fn end_frame(&mut self) {
		if self.phase == Phase::Running && self.pending.is_none() {
			self.arm();
		}
	}

	/// Cancel any outstanding request and refuse further frames.
	pub fn stop(&mut self) {
		if let Some(handle) = self.pending.take() {
			self.host.cancel(handle);
		}
		self.phase = Phase::Stopped;
	}

	/// True between `start` and `stop`.
	pub fn is_running(&self) -> bool {
		self.phase == Phase::Running
	}

	/// Whether a frame request is outstanding.
	pub fn pending(&self) -> bool {
		self.pending.is_some()
	}

	/// The underlying host.
	pub fn host(&self) -> &H {
		&self.host
	}

	fn arm(&mut self) {
		self.pending = self.host.schedule();
		if self.pending.is_none() {
			warn!("neural-field: frame request refused, animation stalled");
		}
	}
}

/// Shared slot for the per-frame callback. The callback receives the
/// `DOMHighResTimeStamp` in milliseconds.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// [`FrameHost`] backed by `window.requestAnimationFrame`.
pub struct AnimationFrameHost {
	window: Window,
	callback: FrameCallback,
}

impl AnimationFrameHost {
	/// Host scheduling `callback` on `window`.
	pub fn new(window: Window, callback: FrameCallback) -> Self {
		Self { window, callback }
	}
}

impl FrameHost for AnimationFrameHost {
	type Handle = i32;

	fn schedule(&mut self) -> Option<i32> {
		let callback = self.callback.borrow();
		let cb = callback.as_ref()?;
		self.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.ok()
	}

	fn cancel(&mut self, handle: i32) {
		let _ = self.window.cancel_animation_frame(handle);
	}
}
