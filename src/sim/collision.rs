//! Axis-aligned collision tests
//!
//! All colliders are boxes aligned with the world axes, so overlap reduces to
//! three interval tests. The vertical test looks one frame ahead for the
//! moving box only: it asks whether `a` *will* reach `b` after its current
//! vertical velocity is applied. That is what lets the ground resolver snap a
//! falling body onto a surface before it visibly sinks into it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::BoxBody;

/// Face coordinates of an axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub back: f32,
    pub front: f32,
}

impl Bounds {
    /// Bounds of a box centered at `pos` with full extents `size`
    #[inline]
    pub fn from_center_size(pos: Vec3, size: Vec3) -> Self {
        let half = size / 2.0;
        Self {
            left: pos.x - half.x,
            right: pos.x + half.x,
            bottom: pos.y - half.y,
            top: pos.y + half.y,
            back: pos.z - half.z,
            front: pos.z + half.z,
        }
    }

    /// Three-axis overlap where `self` moves vertically by `vy` next frame
    #[inline]
    pub fn overlaps_ahead(&self, other: &Bounds, vy: f32) -> bool {
        let x = self.right >= other.left && self.left <= other.right;
        let y = self.bottom + vy <= other.top && self.top >= other.bottom;
        let z = self.front >= other.back && self.back <= other.front;
        x && y && z
    }
}

/// Does moving box `a` touch box `b`?
///
/// Not commutative: only `a`'s vertical velocity feeds the lookahead. Always
/// pass the moving entity first (player vs ground, obstacle vs ground,
/// player vs obstacle).
#[inline]
pub fn overlap(a: &BoxBody, b: &BoxBody) -> bool {
    a.bounds().overlaps_ahead(b.bounds(), a.vel.y)
}
