//! Data-driven game balance
//!
//! Every number the simulation depends on lives in [`Tuning`]. Hosts may
//! override any subset from JSON; missing fields fall back to [`crate::consts`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration rejected at construction time
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{what} must be positive and finite, got {value}")]
    InvalidExtent { what: &'static str, value: f32 },

    #[error("track needs at least one lane")]
    NoLanes,

    #[error("track width {track_width} leaves no room for a player of width {player_width}")]
    TrackTooNarrow { track_width: f32, player_width: f32 },

    #[error("spawn interval must be non-zero")]
    ZeroSpawnInterval,

    #[error("spawn interval floor {floor} must be between 1 and the initial interval {initial}")]
    SpawnFloor { floor: u32, initial: u32 },

    #[error("speed ramp cadence must be non-zero")]
    ZeroSpeedCadence,

    #[error("{what} must be finite and not negative, got {value}")]
    NegativeRate { what: &'static str, value: f32 },

    #[error("gravity must pull down (negative and finite), got {0}")]
    GravityNotDownward(f32),

    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn positive(what: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::InvalidExtent { what, value })
    }
}

fn non_negative(what: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::NegativeRate { what, value })
    }
}

/// Size and spawn height of one obstacle archetype
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDims {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Center height at spawn
    pub spawn_y: f32,
}

impl ObstacleDims {
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}

/// Game balance and geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Run seed for the spawner RNG
    pub seed: u64,

    // === Track ===
    pub lane_count: u32,
    pub track_width: f32,
    pub track_length: f32,
    pub edge_margin: f32,
    pub ground_thickness: f32,
    pub ground_y: f32,

    // === Player ===
    pub player_size: Vec3,
    pub player_spawn: Vec3,
    pub player_restart: Vec3,
    pub player_initial_vy: f32,
    pub jump_velocity: f32,
    pub lateral_speed: f32,
    pub crouch_factor: f32,

    // === Physics ===
    pub gravity: f32,
    pub grace_period: f32,
    pub max_frame_delta: f32,

    // === Spawning ===
    pub spawn_interval: u32,
    pub spawn_interval_step: u32,
    pub spawn_interval_floor: u32,
    pub spawn_distance: f32,
    pub spawn_jitter: f32,
    pub train: ObstacleDims,
    pub barrier: ObstacleDims,
    /// `None` keeps every obstacle until restart
    pub cull_distance: Option<f32>,

    // === Difficulty ===
    pub obstacle_speed: f32,
    pub speed_step: f32,
    pub speed_ramp_frames: u64,
    pub scroll_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: 0x5eed_cafe,

            lane_count: LANE_COUNT,
            track_width: TRACK_WIDTH,
            track_length: TRACK_LENGTH,
            edge_margin: EDGE_MARGIN,
            ground_thickness: GROUND_THICKNESS,
            ground_y: GROUND_Y,

            player_size: Vec3::new(PLAYER_WIDTH, PLAYER_HEIGHT, PLAYER_DEPTH),
            player_spawn: Vec3::new(0.0, PLAYER_HEIGHT / 2.0, PLAYER_SPAWN_Z),
            player_restart: Vec3::new(0.0, PLAYER_HEIGHT / 2.0, PLAYER_RESTART_Z),
            player_initial_vy: PLAYER_INITIAL_VY,
            jump_velocity: JUMP_VELOCITY,
            lateral_speed: LATERAL_SPEED,
            crouch_factor: CROUCH_FACTOR,

            gravity: DEFAULT_GRAVITY,
            grace_period: GRACE_PERIOD_SECS,
            max_frame_delta: MAX_FRAME_DELTA,

            spawn_interval: SPAWN_INTERVAL,
            spawn_interval_step: SPAWN_INTERVAL_STEP,
            spawn_interval_floor: SPAWN_INTERVAL_FLOOR,
            spawn_distance: SPAWN_DISTANCE,
            spawn_jitter: SPAWN_JITTER,
            train: ObstacleDims {
                width: 80.0,
                height: 90.0,
                depth: 600.0,
                spawn_y: 45.0,
            },
            barrier: ObstacleDims {
                width: 70.0,
                height: 10.0,
                depth: 5.0,
                spawn_y: 25.0,
            },
            cull_distance: Some(CULL_DISTANCE),

            obstacle_speed: OBSTACLE_SPEED,
            speed_step: SPEED_STEP,
            speed_ramp_frames: SPEED_RAMP_FRAMES,
            scroll_factor: SCROLL_FACTOR,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject geometry and cadences the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lane_count == 0 {
            return Err(TuningError::NoLanes);
        }
        positive("track width", self.track_width)?;
        positive("track length", self.track_length)?;
        positive("ground thickness", self.ground_thickness)?;
        positive("player width", self.player_size.x)?;
        positive("player height", self.player_size.y)?;
        positive("player depth", self.player_size.z)?;
        for (name, dims) in [("train", &self.train), ("barrier", &self.barrier)] {
            positive(name, dims.width)?;
            positive(name, dims.height)?;
            positive(name, dims.depth)?;
        }
        positive("max frame delta", self.max_frame_delta)?;
        if let Some(distance) = self.cull_distance {
            positive("cull distance", distance)?;
        }

        let limit = self.track_width / 2.0 - self.player_size.x / 2.0 - self.edge_margin;
        if limit < 0.0 {
            return Err(TuningError::TrackTooNarrow {
                track_width: self.track_width,
                player_width: self.player_size.x,
            });
        }

        if self.spawn_interval == 0 {
            return Err(TuningError::ZeroSpawnInterval);
        }
        if self.spawn_interval_floor == 0 || self.spawn_interval_floor > self.spawn_interval {
            return Err(TuningError::SpawnFloor {
                floor: self.spawn_interval_floor,
                initial: self.spawn_interval,
            });
        }
        if self.speed_ramp_frames == 0 {
            return Err(TuningError::ZeroSpeedCadence);
        }

        // Obstacles only ever speed up, and everything falls onto the ground
        positive("obstacle speed", self.obstacle_speed)?;
        non_negative("speed step", self.speed_step)?;
        non_negative("spawn jitter", self.spawn_jitter)?;
        if !(self.gravity.is_finite() && self.gravity < 0.0) {
            return Err(TuningError::GravityNotDownward(self.gravity));
        }
        Ok(())
    }

    /// Ground slab extents: spans the full track width and length
    pub fn ground_size(&self) -> Vec3 {
        Vec3::new(self.track_width, self.ground_thickness, self.track_length)
    }

    pub fn ground_position(&self) -> Vec3 {
        Vec3::new(0.0, self.ground_y, 0.0)
    }

    /// Load overrides from the page's `<script id="tuning" type="application/json">` (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("tuning"))
            .and_then(|el| el.text_content());

        if let Some(json) = text {
            match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides from page");
                    return tuning;
                }
                Err(e) => log::warn!("Ignoring tuning overrides: {}", e),
            }
        }

        log::info!("Using default tuning");
        Self {
            seed: js_sys::Date::now() as u64,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "lane_count": 4, "spawn_interval": 90 }"#).unwrap();
        assert_eq!(tuning.lane_count, 4);
        assert_eq!(tuning.spawn_interval, 90);
        assert_eq!(tuning.track_width, TRACK_WIDTH);
        assert_eq!(tuning.train.depth, 600.0);
    }

    #[test]
    fn test_rejects_zero_lanes() {
        let tuning = Tuning {
            lane_count: 0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(TuningError::NoLanes)));
    }

    #[test]
    fn test_rejects_negative_extent() {
        let tuning = Tuning {
            player_size: Vec3::new(20.0, -1.0, 10.0),
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::InvalidExtent { what: "player height", .. })
        ));
    }

    #[test]
    fn test_rejects_narrow_track() {
        let tuning = Tuning {
            track_width: 40.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::TrackTooNarrow { .. })
        ));
    }

    #[test]
    fn test_rejects_floor_above_initial() {
        let tuning = Tuning {
            spawn_interval: 40,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::SpawnFloor { floor: 50, initial: 40 })
        ));
    }

    #[test]
    fn test_rejects_negative_speed_step() {
        assert!(matches!(
            Tuning::from_json(r#"{ "speed_step": -20.0 }"#),
            Err(TuningError::NegativeRate { what: "speed step", .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_obstacle_speed() {
        for speed in [-10.0, 0.0, f32::INFINITY] {
            let tuning = Tuning {
                obstacle_speed: speed,
                ..Default::default()
            };
            assert!(matches!(
                tuning.validate(),
                Err(TuningError::InvalidExtent { what: "obstacle speed", .. })
            ));
        }
    }

    #[test]
    fn test_rejects_upward_or_zero_gravity() {
        assert!(matches!(
            Tuning::from_json(r#"{ "gravity": 3.0 }"#),
            Err(TuningError::GravityNotDownward(_))
        ));
        let tuning = Tuning {
            gravity: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::GravityNotDownward(_))
        ));
    }

    #[test]
    fn test_rejects_negative_or_nan_jitter() {
        for jitter in [-1.0, f32::NAN] {
            let tuning = Tuning {
                spawn_jitter: jitter,
                ..Default::default()
            };
            assert!(matches!(
                tuning.validate(),
                Err(TuningError::NegativeRate { what: "spawn jitter", .. })
            ));
        }
        let still_fine = Tuning {
            spawn_jitter: 0.0,
            speed_step: 0.0,
            ..Default::default()
        };
        still_fine.validate().unwrap();
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ lane_count: "),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn test_cull_distance_can_be_disabled() {
        let tuning = Tuning::from_json(r#"{ "cull_distance": null }"#).unwrap();
        assert_eq!(tuning.cull_distance, None);
    }
}
