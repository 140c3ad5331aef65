//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Per-frame physics, host-supplied timestamps only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod animation;
pub mod body;
pub mod clock;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod track;

pub use animation::{AnimationClip, Animator, select_animation};
pub use body::BoxBody;
pub use clock::PausableClock;
pub use collision::{Bounds, overlap};
pub use spawn::{ObstacleKind, maybe_spawn, ramp_spawn_interval};
pub use state::{GameEvent, GamePhase, GameState, Obstacle, VisualId};
pub use tick::{TickInput, tick};
pub use track::Track;
