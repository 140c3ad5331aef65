//! Browser frame scheduling via `requestAnimationFrame`

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::FrameScheduler;

/// Callback handed to `requestAnimationFrame`; receives the frame timestamp in ms
pub type FrameCallback = Closure<dyn FnMut(f64)>;

/// One-shot `requestAnimationFrame` scheduler that remembers its handle so a
/// pause or game over can cancel the pending callback
pub struct RafScheduler {
    /// Filled in once the game exists (the callback captures the game)
    callback: Rc<RefCell<Option<FrameCallback>>>,
    handle: Option<i32>,
}

impl Default for RafScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RafScheduler {
    pub fn new() -> Self {
        Self {
            callback: Rc::new(RefCell::new(None)),
            handle: None,
        }
    }

    pub fn set_callback(&self, callback: FrameCallback) {
        *self.callback.borrow_mut() = Some(callback);
    }
}

impl FrameScheduler for RafScheduler {
    fn request(&mut self) {
        if self.handle.is_some() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let slot = self.callback.borrow();
        let Some(callback) = slot.as_ref() else {
            log::warn!("Frame requested before the callback was installed");
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => self.handle = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel(&mut self) {
        if let Some(id) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    fn fired(&mut self) {
        self.handle = None;
    }

    fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}
