//! Browser scheduling glue shared by the canvases.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::Element;

/// A `requestAnimationFrame` loop that runs `step` until it returns `false`.
///
/// A stopped loop is resumed with [`FrameLoop::wake`]. Dropping the loop
/// cancels any pending frame, so nothing scheduled by it runs afterwards.
pub struct FrameLoop {
	inner: Rc<FrameLoopInner>,
}

struct FrameLoopInner {
	callback: RefCell<Option<Closure<dyn FnMut()>>>,
	handle: Cell<Option<i32>>,
}

impl FrameLoop {
	pub fn new(mut step: impl FnMut() -> bool + 'static) -> Self {
		let inner = Rc::new(FrameLoopInner {
			callback: RefCell::new(None),
			handle: Cell::new(None),
		});
		let weak = Rc::downgrade(&inner);
		let callback = Closure::<dyn FnMut()>::new(move || {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			inner.handle.set(None);
			if step() {
				inner.schedule();
			}
		});
		*inner.callback.borrow_mut() = Some(callback);
		Self { inner }
	}

	/// Schedules the next frame unless one is already pending.
	pub fn wake(&self) {
		if self.inner.handle.get().is_none() {
			self.inner.schedule();
		}
	}
}

impl FrameLoopInner {
	fn schedule(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let callback = self.callback.borrow();
		let Some(cb) = callback.as_ref() else {
			return;
		};
		match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(handle) => self.handle.set(Some(handle)),
			Err(err) => warn!("requestAnimationFrame failed: {err:?}"),
		}
	}
}

impl Drop for FrameLoopInner {
	fn drop(&mut self) {
		if let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(handle);
		}
	}
}

/// A window event listener removed again when dropped.
pub struct WindowListener {
	event: &'static str,
	callback: Closure<dyn FnMut()>,
}

impl WindowListener {
	pub fn new(event: &'static str, callback: impl FnMut() + 'static) -> Option<Self> {
		let window = web_sys::window()?;
		let callback = Closure::<dyn FnMut()>::new(callback);
		window
			.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
			.ok()?;
		Some(Self { event, callback })
	}
}

impl Drop for WindowListener {
	fn drop(&mut self) {
		if let Some(window) = web_sys::window() {
			let _ = window
				.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
		}
	}
}

/// Current client size of a host element.
pub fn host_size(host: &Element) -> (f64, f64) {
	(host.client_width() as f64, host.client_height() as f64)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use js_sys::Promise;
	use wasm_bindgen_futures::JsFuture;
	use wasm_bindgen_test::*;

	use super::*;

	wasm_bindgen_test_configure!(run_in_browser);

	async fn wait_ms(ms: i32) {
		let wait = Promise::new(&mut |resolve, _| {
			if let Some(window) = web_sys::window() {
				let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
			}
		});
		JsFuture::from(wait).await.unwrap();
	}

	fn counting_loop(frames: Rc<Cell<u32>>, limit: u32) -> FrameLoop {
		FrameLoop::new(move || {
			frames.set(frames.get() + 1);
			frames.get() < limit
		})
	}

	#[wasm_bindgen_test]
	async fn loop_runs_until_step_declines() {
		let frames = Rc::new(Cell::new(0));
		let frame_loop = counting_loop(frames.clone(), 3);
		frame_loop.wake();
		wait_ms(300).await;
		assert_eq!(frames.get(), 3);
	}

	#[wasm_bindgen_test]
	async fn dropped_loop_never_steps_again() {
		let frames = Rc::new(Cell::new(0));
		let frame_loop = counting_loop(frames.clone(), u32::MAX);
		frame_loop.wake();
		drop(frame_loop);
		wait_ms(100).await;
		assert_eq!(frames.get(), 0);
	}
}
