//! Pausable game clock
//!
//! Hosts pass in their own timestamps (seconds, e.g. `performance.now() /
//! 1000`), which keeps the simulation testable without a real time source.
//! Time spent paused is excluded from both elapsed time and the next frame
//! delta.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PausableClock {
    started_at: Option<f64>,
    paused_at: Option<f64>,
    /// Sum of completed pause spans
    paused_total: f64,
    last_frame: Option<f64>,
}

impl PausableClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) counting from `now`
    pub fn start(&mut self, now: f64) {
        *self = Self {
            started_at: Some(now),
            last_frame: Some(now),
            ..Self::default()
        };
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn pause(&mut self, now: f64) {
        if self.is_started() && !self.is_paused() {
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: f64) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += (now - paused_at).max(0.0);
            // The pause gap is not a frame
            self.last_frame = Some(now);
        }
    }

    /// Running seconds since `start`, excluding pauses
    pub fn elapsed(&self, now: f64) -> f32 {
        let Some(started_at) = self.started_at else {
            return 0.0;
        };
        let now = self.paused_at.unwrap_or(now);
        (now - started_at - self.paused_total).max(0.0) as f32
    }

    /// Seconds since the previous call, capped at `max`
    pub fn delta(&mut self, now: f64, max: f32) -> f32 {
        let previous = self.last_frame.replace(now).unwrap_or(now);
        ((now - previous).max(0.0) as f32).min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_started() {
        let clock = PausableClock::new();
        assert!(!clock.is_started());
        assert_eq!(clock.elapsed(42.0), 0.0);
    }

    #[test]
    fn test_elapsed_excludes_pauses() {
        let mut clock = PausableClock::new();
        clock.start(10.0);
        assert_eq!(clock.elapsed(10.5), 0.5);

        clock.pause(10.5);
        // Frozen while paused
        assert_eq!(clock.elapsed(30.0), 0.5);

        clock.resume(30.0);
        assert_eq!(clock.elapsed(30.25), 0.75);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = PausableClock::new();
        clock.start(0.0);
        assert_eq!(clock.delta(0.016, 0.05), 0.016);
        // Stall
        assert_eq!(clock.delta(2.0, 0.05), 0.05);
    }

    #[test]
    fn test_resume_resets_delta() {
        let mut clock = PausableClock::new();
        clock.start(0.0);
        clock.delta(0.02, 0.05);
        clock.pause(0.03);
        clock.resume(5.0);
        assert!((clock.delta(5.01, 1.0) - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_double_pause_keeps_first_timestamp() {
        let mut clock = PausableClock::new();
        clock.start(0.0);
        clock.pause(1.0);
        clock.pause(3.0);
        clock.resume(4.0);
        assert_eq!(clock.elapsed(4.0), 1.0);
    }
}
