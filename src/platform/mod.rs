//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (`requestAnimationFrame` on web, manual elsewhere)
//! - Time stamps
//!
//! A scheduler holds at most one pending frame request. Requesting while one
//! is pending and cancelling when none is pending are both no-ops.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Something that can call the game back on the next display refresh
pub trait FrameScheduler {
    /// Ask for one frame callback (no-op if one is already pending)
    fn request(&mut self);
    /// Drop the pending callback, if any
    fn cancel(&mut self);
    /// The pending callback has been delivered
    fn fired(&mut self);
    fn is_pending(&self) -> bool;
}

/// Scheduler driven by hand: the headless binary and tests call
/// `Session::frame` themselves and use this to check what would be scheduled
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    pending: bool,
    /// Requests actually issued (not counting no-op repeats)
    pub requests: u32,
    /// Cancels that dropped a pending request
    pub cancels: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request(&mut self) {
        if !self.pending {
            self.pending = true;
            self.requests += 1;
        }
    }

    fn cancel(&mut self) {
        if self.pending {
            self.pending = false;
            self.cancels += 1;
        }
    }

    fn fired(&mut self) {
        self.pending = false;
    }

    fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Host time in seconds
#[cfg(target_arch = "wasm32")]
pub fn now_secs() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_secs() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64()
}
