//! Lane geometry
//!
//! The track is `lane_count` equal-width lanes centered on x = 0. Lanes are
//! fixed for the lifetime of a game state; only the sleeper scroll moves.

use crate::tuning::{Tuning, TuningError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    lane_count: u32,
    width: f32,
    /// Length of the sleeper loop
    length: f32,
    /// Keep-out distance between the player's side and the track edge
    edge_margin: f32,
}

impl Track {
    pub fn new(lane_count: u32, width: f32, length: f32, edge_margin: f32) -> Result<Self, TuningError> {
        if lane_count == 0 {
            return Err(TuningError::NoLanes);
        }
        for (what, value) in [("track width", width), ("track length", length)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::InvalidExtent { what, value });
            }
        }
        Ok(Self {
            lane_count,
            width,
            length,
            edge_margin,
        })
    }

    pub fn from_tuning(tuning: &Tuning) -> Result<Self, TuningError> {
        Self::new(
            tuning.lane_count,
            tuning.track_width,
            tuning.track_length,
            tuning.edge_margin,
        )
    }

    #[inline]
    pub fn lane_count(&self) -> u32 {
        self.lane_count
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Width of one lane
    #[inline]
    pub fn spacing(&self) -> f32 {
        self.width / self.lane_count as f32
    }

    /// Center x of lane `lane`, counted from the left edge
    pub fn lane_center(&self, lane: u32) -> Option<f32> {
        (lane < self.lane_count)
            .then(|| -self.width / 2.0 + self.spacing() / 2.0 + lane as f32 * self.spacing())
    }

    pub fn lane_centers(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.lane_count).filter_map(|lane| self.lane_center(lane))
    }

    /// Largest |x| a body of `body_width` may occupy
    #[inline]
    pub fn limit_x(&self, body_width: f32) -> f32 {
        self.width / 2.0 - body_width / 2.0 - self.edge_margin
    }

    /// Clamp `x` into `[-limit_x, limit_x]`
    #[inline]
    pub fn clamp_x(&self, x: f32, body_width: f32) -> f32 {
        let limit = self.limit_x(body_width);
        (-limit).max(limit.min(x))
    }

    /// Advance the sleeper scroll, wrapping into `[-length/2, length/2)`
    pub fn advance_scroll(&self, offset: f32, amount: f32) -> f32 {
        let half = self.length / 2.0;
        (offset + amount + half).rem_euclid(self.length) - half
    }
}
