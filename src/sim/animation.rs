//! Character clip selection
//!
//! The skeletal animation itself belongs to the renderer; the simulation only
//! decides which named clip should be playing.

use serde::{Deserialize, Serialize};

use super::tick::TickInput;

/// Named animation clips the renderer is expected to provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationClip {
    /// Standing still (grace period)
    Idle,
    /// Running straight ahead
    Run,
    /// Strafing left
    Left,
    /// Strafing right
    Right,
    /// Sliding low while moving forward
    Crouch,
    /// Ascending
    Jump,
    /// Descending
    Fall,
}

impl AnimationClip {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationClip::Idle => "idle",
            AnimationClip::Run => "run",
            AnimationClip::Left => "left",
            AnimationClip::Right => "right",
            AnimationClip::Crouch => "crouch",
            AnimationClip::Jump => "jump",
            AnimationClip::Fall => "fall",
        }
    }
}

/// Pick the clip for the current player state
pub fn select_animation(in_grace: bool, can_jump: bool, vy: f32, input: &TickInput) -> AnimationClip {
    if in_grace {
        return AnimationClip::Idle;
    }
    if !can_jump {
        // Lateral keys still steer in the air, but never change the clip
        return if vy > 0.0 {
            AnimationClip::Jump
        } else {
            AnimationClip::Fall
        };
    }
    if input.forward {
        AnimationClip::Crouch
    } else if input.left {
        AnimationClip::Left
    } else if input.right {
        AnimationClip::Right
    } else {
        AnimationClip::Run
    }
}

/// Tracks the playing clip and filters requests that would restart it or
/// break the airborne Jump/Fall lock
#[derive(Debug, Clone, Default)]
pub struct Animator {
    current: Option<AnimationClip>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<AnimationClip> {
        self.current
    }

    /// Request `clip`; returns true if the renderer should crossfade to it
    pub fn play(&mut self, clip: AnimationClip, can_jump: bool, vy: f32) -> bool {
        if self.current == Some(clip) {
            return false;
        }
        if !can_jump {
            if vy > 0.0 && clip != AnimationClip::Jump {
                return false;
            }
            if vy < 0.0 && clip != AnimationClip::Fall {
                return false;
            }
        }
        self.current = Some(clip);
        true
    }

    /// Back to the standing pose for a fresh run. Bypasses the airborne
    /// lock: the player spawns slightly above the ground.
    pub fn reset(&mut self) {
        self.current = Some(AnimationClip::Idle);
    }
}
