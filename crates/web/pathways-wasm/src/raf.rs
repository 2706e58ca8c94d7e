//! `requestAnimationFrame` behind the core's frame-scheduler seam.

use log::warn;
use pathways_map_core::{FrameCallback, FrameScheduler};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub struct RafScheduler {
    window: web_sys::Window,
}

impl RafScheduler {
    pub fn new() -> Result<Self, JsError> {
        let window =
            web_sys::window().ok_or_else(|| JsError::new("requestAnimationFrame needs a window"))?;
        Ok(Self { window })
    }
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn request_frame(&self, callback: FrameCallback) -> Option<i32> {
        // Freed by the JS side once it fires; a cancelled frame leaks the box.
        let js_cb = Closure::once_into_js(move |now: f64| callback(now));
        match self.window.request_animation_frame(js_cb.unchecked_ref()) {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!("requestAnimationFrame failed: {err:?}");
                None
            }
        }
    }

    fn cancel_frame(&self, handle: i32) {
        if let Err(err) = self.window.cancel_animation_frame(handle) {
            warn!("cancelAnimationFrame({handle}) failed: {err:?}");
        }
    }
}
