//! Rail Runner - a three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (box physics, collisions, spawning, game state)
//! - `session`: Frame scheduling, held input and render snapshots for a host
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance and geometry

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{Key, Session, Snapshot};
pub use tuning::{ObstacleDims, Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Seconds after start during which input and spawning are suppressed
    pub const GRACE_PERIOD_SECS: f32 = 1.0;
    /// Frame delta cap, avoids tunneling after a stall
    pub const MAX_FRAME_DELTA: f32 = 0.05;

    /// Track layout
    pub const LANE_COUNT: u32 = 3;
    pub const TRACK_WIDTH: f32 = 300.0;
    /// Length of the ground slab and of the scrolling sleeper loop
    pub const TRACK_LENGTH: f32 = 3000.0;
    /// Extra keep-out distance between the player and the track edge
    pub const EDGE_MARGIN: f32 = 15.0;

    /// Ground slab (width follows the track)
    pub const GROUND_THICKNESS: f32 = 5.0;
    pub const GROUND_Y: f32 = -5.0;

    /// Player collider
    pub const PLAYER_WIDTH: f32 = 20.0;
    pub const PLAYER_HEIGHT: f32 = 25.0;
    pub const PLAYER_DEPTH: f32 = 10.0;
    pub const PLAYER_SPAWN_Z: f32 = 100.0;
    pub const PLAYER_RESTART_Z: f32 = 50.0;
    /// Tiny downward drift so the first frame already resolves against the ground
    pub const PLAYER_INITIAL_VY: f32 = -0.01;

    /// Per-frame physics (units per frame, not per second)
    pub const DEFAULT_GRAVITY: f32 = -0.25;
    pub const Z_ACCELERATION: f32 = 0.0003;
    pub const JUMP_VELOCITY: f32 = 6.0;
    pub const LATERAL_SPEED: f32 = 2.0;
    /// Lateral speed multiplier while sliding (forward held)
    pub const CROUCH_FACTOR: f32 = 0.5;

    /// Spawning
    pub const SPAWN_INTERVAL: u32 = 150;
    pub const SPAWN_INTERVAL_STEP: u32 = 2;
    pub const SPAWN_INTERVAL_FLOOR: u32 = 50;
    /// Obstacles appear this far ahead of the track origin
    pub const SPAWN_DISTANCE: f32 = 1000.0;
    /// Total width of the random x jitter around a lane center
    pub const SPAWN_JITTER: f32 = 5.0;

    /// Difficulty ramp
    pub const OBSTACLE_SPEED: f32 = 10.0;
    pub const SPEED_STEP: f32 = 0.3;
    pub const SPEED_RAMP_FRAMES: u64 = 1000;
    /// Sleeper scroll rate relative to obstacle speed
    pub const SCROLL_FACTOR: f32 = 10.0;

    /// Obstacles are dropped once their back face is this far past the player
    pub const CULL_DISTANCE: f32 = 300.0;
}
