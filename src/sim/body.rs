//! Box bodies: the only collider shape in the game
//!
//! The player, the ground slab and every obstacle are a [`BoxBody`]. Velocities
//! are in units per frame and gravity is applied once per frame, so the same
//! input sequence always produces the same trajectory regardless of display
//! refresh rate jitter.

use glam::Vec3;

use super::collision::{Bounds, overlap};
use crate::consts::{DEFAULT_GRAVITY, Z_ACCELERATION};
use crate::tuning::TuningError;

/// An axis-aligned box with velocity and single-axis gravity
#[derive(Debug, Clone, PartialEq)]
pub struct BoxBody {
    /// Center position
    pub pos: Vec3,
    /// Velocity (units per frame)
    pub vel: Vec3,
    /// Added to `vel.y` every frame
    pub gravity: f32,
    /// True exactly when resting on a supporting surface
    pub can_jump: bool,
    /// Slowly accelerate forward along +z
    pub z_acceleration: bool,
    /// Full extents (width, height, depth)
    size: Vec3,
    /// Cached faces; refreshed by `update_bounds`
    bounds: Bounds,
}

impl BoxBody {
    /// Create a resting box. Extents must be positive and finite.
    pub fn new(size: Vec3, pos: Vec3) -> Result<Self, TuningError> {
        for (what, value) in [("width", size.x), ("height", size.y), ("depth", size.z)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::InvalidExtent { what, value });
            }
        }
        Ok(Self {
            pos,
            vel: Vec3::ZERO,
            gravity: DEFAULT_GRAVITY,
            can_jump: false,
            z_acceleration: false,
            size,
            bounds: Bounds::from_center_size(pos, size),
        })
    }

    pub fn with_velocity(mut self, vel: Vec3) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_z_acceleration(mut self, enabled: bool) -> Self {
        self.z_acceleration = enabled;
        self
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.size
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Faces as of the last `update_bounds` call
    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Recompute faces from the current position
    #[inline]
    pub fn update_bounds(&mut self) {
        self.bounds = Bounds::from_center_size(self.pos, self.size);
    }

    /// Teleport (restart, tests); bounds follow immediately
    pub fn place(&mut self, pos: Vec3, vel: Vec3) {
        self.pos = pos;
        self.vel = vel;
        self.update_bounds();
    }

    /// Advance one frame: forward drift, horizontal motion, then gravity
    /// against `ground`. Bounds match the new position on return.
    pub fn integrate(&mut self, ground: &BoxBody) {
        if self.z_acceleration {
            self.vel.z += Z_ACCELERATION;
        }
        self.pos.x += self.vel.x;
        self.pos.z += self.vel.z;
        self.resolve_gravity(ground);
        self.update_bounds();
    }

    /// Apply gravity, then either land on `ground` or keep falling/rising.
    ///
    /// Landing snaps the bottom face exactly onto the ground's top face so a
    /// fast fall can never sink into (or tunnel through) the slab.
    pub fn resolve_gravity(&mut self, ground: &BoxBody) {
        self.vel.y += self.gravity;
        self.update_bounds();

        if overlap(self, ground) {
            self.vel.y = 0.0;
            self.can_jump = true;
            self.pos.y = ground.bounds().top + self.size.y / 2.0;
        } else {
            self.can_jump = false;
            self.pos.y += self.vel.y;
        }
    }
}
