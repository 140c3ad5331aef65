//! Per-frame simulation step
//!
//! One call per display refresh while the game is running. Order matters and
//! is fixed: difficulty ramp, steering, lane clamp, player physics, obstacle
//! physics and collision, spawning, frame counter.

use super::body::BoxBody;
use super::collision::overlap;
use super::spawn::{cull_passed, maybe_spawn, ramp_speed, speed_ramp_due};
use super::state::GameState;
use crate::tuning::Tuning;

/// Held keys for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Slide forward (crouch)
    pub forward: bool,
}

impl TickInput {
    /// -1 for left, +1 for right, 0 for neither. Left wins when both are held.
    pub fn lateral(&self) -> f32 {
        if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        }
    }
}

/// Advance the game by one frame at host time `now` (seconds)
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) {
    if !state.is_running() {
        return;
    }
    let tuning = *state.tuning();

    let delta = state.clock.delta(now, tuning.max_frame_delta);
    let in_grace = state.in_grace_period(now);

    if !in_grace {
        let scroll = state.obstacle_speed * delta * tuning.scroll_factor;
        state.scroll_offset = state.track().advance_scroll(state.scroll_offset, scroll);
        if speed_ramp_due(state) {
            ramp_speed(state);
        }
    }

    steer(&mut state.player, input, in_grace, &tuning);

    let width = state.player.width();
    state.player.pos.x = state.track().clamp_x(state.player.pos.x, width);
    state.player.integrate(&state.ground);

    if !in_grace {
        advance_obstacles(state, delta);
        cull_passed(state);
        if let Err(e) = maybe_spawn(state) {
            log::error!("Spawn failed: {}", e);
        }
    }

    state.frame += 1;
}

/// Set player velocity from held keys. Airborne players keep lateral control
/// but cannot crouch.
fn steer(player: &mut BoxBody, input: &TickInput, in_grace: bool, tuning: &Tuning) {
    player.vel.x = 0.0;
    player.vel.z = 0.0;
    if in_grace {
        return;
    }

    let lateral = input.lateral() * tuning.lateral_speed;
    if player.can_jump {
        player.vel.x = lateral;
        if input.forward {
            player.vel.x *= tuning.crouch_factor;
        }
    } else if lateral != 0.0 {
        player.vel.x = lateral;
    }
}

/// Move every obstacle and test it against the player. A hit ends the run but
/// the remaining obstacles still move this frame.
fn advance_obstacles(state: &mut GameState, delta: f32) {
    let step = state.obstacle_speed * delta;
    let mut hit = None;

    for obstacle in &mut state.obstacles {
        obstacle.body.integrate(&state.ground);
        obstacle.body.pos.z += step;
        obstacle.body.update_bounds();

        if overlap(&state.player, &obstacle.body) && hit.is_none() {
            hit = Some(obstacle.id);
        }
    }

    if let Some(id) = hit {
        log::debug!("Player hit obstacle #{}", id);
        state.end_game();
    }
}
