//! Audio system using Web Audio API
//!
//! Procedurally generated cues plus a low running drone standing in for the
//! background track. No external files needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Obstacles got faster
    SpeedUp,
    /// Hit an obstacle
    Crash,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    muted: bool,
    /// Background loop, present while a run is playing
    drone: Option<(OscillatorNode, GainNode)>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: 0.6,
            muted: false,
            drone: None,
        }
    }

    /// Flip mute; returns the new state
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        if let Some((_, gain)) = &self.drone {
            gain.gain().set_value(self.drone_level());
        }
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    fn drone_level(&self) -> f32 {
        self.effective_volume() * 0.08
    }

    /// React to a simulation event
    pub fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Started | GameEvent::Resumed => self.play_music(),
            GameEvent::Paused => self.suspend(),
            GameEvent::Jumped => self.play(SoundEffect::Jump),
            GameEvent::SpeedIncreased { .. } => self.play(SoundEffect::SpeedUp),
            GameEvent::GameOver { .. } => {
                self.stop_music();
                self.play(SoundEffect::Crash);
            }
            GameEvent::Restarted => self.stop_music(),
            GameEvent::ObstacleSpawned { .. } | GameEvent::ObstacleCulled { .. } => {}
        }
    }

    /// Start the drone (or wake the context if it is already there)
    pub fn play_music(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        // Browsers keep the context suspended until a user gesture
        let _ = ctx.resume();
        if self.drone.is_some() {
            return;
        }

        let Some((osc, gain)) = create_osc(ctx, 55.0, OscillatorType::Sawtooth) else {
            log::warn!("Could not create music oscillator");
            return;
        };
        gain.gain().set_value(self.drone_level());
        osc.start().ok();
        self.drone = Some((osc, gain));
    }

    /// Freeze all audio, keeping the drone for `play_music` to pick up
    pub fn suspend(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.suspend();
        }
    }

    pub fn stop_music(&mut self) {
        if let Some((osc, _)) = self.drone.take() {
            osc.stop().ok();
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Jump => play_jump(ctx, vol),
            SoundEffect::SpeedUp => play_speed_up(ctx, vol),
            SoundEffect::Crash => play_crash(ctx, vol),
        }
    }
}

// === Sound generators ===

/// Create an oscillator routed through its own gain node
fn create_osc(ctx: &AudioContext, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

/// Jump - quick rising chirp
fn play_jump(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 250.0, OscillatorType::Triangle) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.3, t).ok();
    gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.2).ok();
    osc.frequency().set_value_at_time(250.0, t).ok();
    osc.frequency().exponential_ramp_to_value_at_time(700.0, t + 0.15).ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.25).ok();
}

/// Speed up - two short ascending blips
fn play_speed_up(ctx: &AudioContext, vol: f32) {
    for (i, freq) in [600.0, 900.0].iter().enumerate() {
        let delay = i as f64 * 0.08;
        if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.12).ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }
}

/// Crash - heavy low thud sliding down
fn play_crash(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 160.0, OscillatorType::Square) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.5, t).ok();
    gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.6).ok();
    osc.frequency().set_value_at_time(160.0, t).ok();
    osc.frequency().exponential_ramp_to_value_at_time(30.0, t + 0.6).ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.7).ok();
}
