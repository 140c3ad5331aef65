//! Obstacle spawning and difficulty ramp
//!
//! Two archetypes share one lane-snapped placement rule. Tall trains must be
//! dodged sideways; low barriers can be jumped.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::BoxBody;
use super::state::{GameEvent, GameState, Obstacle};
use crate::tuning::{ObstacleDims, Tuning, TuningError};

/// Obstacle archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Long and tall: change lanes
    Train,
    /// Low and thin: jump it
    Barrier,
}

impl ObstacleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Train => "train",
            ObstacleKind::Barrier => "barrier",
        }
    }

    pub fn dims<'a>(&self, tuning: &'a Tuning) -> &'a ObstacleDims {
        match self {
            ObstacleKind::Train => &tuning.train,
            ObstacleKind::Barrier => &tuning.barrier,
        }
    }
}

/// Next spawn interval: one step shorter, never below `floor`
#[inline]
pub fn ramp_spawn_interval(interval: u32, step: u32, floor: u32) -> u32 {
    if interval > floor {
        interval.saturating_sub(step).max(floor)
    } else {
        interval
    }
}

/// Is this frame a spawn frame? Caller has already checked the grace period.
pub fn spawn_due(state: &GameState) -> bool {
    state.is_running() && state.frame % state.spawn_interval as u64 == 0
}

/// Is this frame a speed-ramp frame? Caller has already checked the grace period.
pub fn speed_ramp_due(state: &GameState) -> bool {
    state.frame % state.tuning().speed_ramp_frames == 0
}

/// Raise obstacle speed by one step
pub fn ramp_speed(state: &mut GameState) {
    state.obstacle_speed += state.tuning().speed_step;
    let speed = state.obstacle_speed;
    state.push_event(GameEvent::SpeedIncreased { speed });
    log::debug!("Obstacle speed now {:.1} (frame {})", speed, state.frame);
}

/// Spawn one obstacle if this is a spawn frame. Returns the new obstacle's id.
pub fn maybe_spawn(state: &mut GameState) -> Result<Option<u32>, TuningError> {
    if !spawn_due(state) {
        return Ok(None);
    }
    let tuning = *state.tuning();
    state.spawn_interval = ramp_spawn_interval(
        state.spawn_interval,
        tuning.spawn_interval_step,
        tuning.spawn_interval_floor,
    );

    let lane_count = state.track().lane_count();
    let lane = state.rng.random_range(0..lane_count);
    let kind = if state.rng.random_bool(0.5) {
        ObstacleKind::Train
    } else {
        ObstacleKind::Barrier
    };
    let jitter = (state.rng.random::<f32>() - 0.5) * tuning.spawn_jitter;

    let center = state.track().lane_center(lane).unwrap_or(0.0);
    let dims = kind.dims(&tuning);
    let position = Vec3::new(
        center + jitter,
        dims.spawn_y,
        state.track_origin_z - tuning.spawn_distance,
    );
    let body = BoxBody::new(dims.size(), position)?
        .with_velocity(Vec3::new(0.0, 0.0, state.obstacle_speed))
        .with_gravity(tuning.gravity);

    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        kind,
        body,
        visual: None,
    });
    state.push_event(GameEvent::ObstacleSpawned { id, kind, position });
    log::debug!(
        "Spawned {} #{} in lane {} (interval now {})",
        kind.as_str(),
        id,
        lane,
        state.spawn_interval
    );
    Ok(Some(id))
}

/// Drop obstacles that have passed far enough behind the player
pub fn cull_passed(state: &mut GameState) -> usize {
    let Some(distance) = state.tuning().cull_distance else {
        return 0;
    };
    let threshold = state.player.pos.z + distance;

    let mut culled = Vec::new();
    state.obstacles.retain(|o| {
        let passed = o.body.bounds().back > threshold;
        if passed {
            culled.push(o.id);
        }
        !passed
    });

    for &id in &culled {
        state.push_event(GameEvent::ObstacleCulled { id });
        log::debug!("Culled obstacle #{}", id);
    }
    culled.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn running_state() -> GameState {
        let mut state = GameState::new(Tuning::default()).unwrap();
        state.start(0.0);
        state.drain_events();
        state
    }

    #[test]
    fn test_spawn_on_frame_zero() {
        let mut state = running_state();
        assert_eq!(state.spawn_interval, 150);

        let id = maybe_spawn(&mut state).unwrap();
        assert!(id.is_some());
        assert_eq!(state.spawn_interval, 148);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_no_spawn_off_cadence() {
        let mut state = running_state();
        state.frame = 149;
        assert_eq!(maybe_spawn(&mut state).unwrap(), None);
        assert_eq!(state.spawn_interval, 150);
        state.frame = 300;
        assert!(maybe_spawn(&mut state).unwrap().is_some());
    }

    #[test]
    fn test_no_spawn_unless_running() {
        let mut state = running_state();
        state.pause(0.5);
        assert_eq!(maybe_spawn(&mut state).unwrap(), None);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_spawned_obstacle_placement() {
        let mut state = running_state();
        let tuning = *state.tuning();
        for frame in 0..40u64 {
            state.frame = frame * state.spawn_interval as u64;
            maybe_spawn(&mut state).unwrap();
        }
        assert_eq!(state.obstacles.len(), 40);

        let centers: Vec<f32> = state.track().lane_centers().collect();
        for obstacle in &state.obstacles {
            let pos = obstacle.body.pos;
            let dims = obstacle.kind.dims(&tuning);
            assert!(centers.iter().any(|c| (pos.x - c).abs() <= 2.5));
            assert_eq!(pos.y, dims.spawn_y);
            assert_eq!(pos.z, -1000.0);
            assert_eq!(obstacle.body.size(), dims.size());
            assert_eq!(obstacle.body.vel, Vec3::new(0.0, 0.0, 10.0));
            assert!(obstacle.visual.is_none());
        }

        // Both archetypes show up with a fair coin over 40 draws
        assert!(state.obstacles.iter().any(|o| o.kind == ObstacleKind::Train));
        assert!(state.obstacles.iter().any(|o| o.kind == ObstacleKind::Barrier));
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut state = running_state();
        let a = maybe_spawn(&mut state).unwrap().unwrap();
        state.frame = state.spawn_interval as u64;
        let b = maybe_spawn(&mut state).unwrap().unwrap();
        assert!(b > a);
        assert_eq!(state.obstacles[0].id, a);
        assert_eq!(state.obstacles[1].id, b);
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = running_state();
        let mut b = running_state();
        for _ in 0..10 {
            maybe_spawn(&mut a).unwrap();
            maybe_spawn(&mut b).unwrap();
            a.frame = 0;
            b.frame = 0;
        }
        let pa: Vec<_> = a.obstacles.iter().map(|o| (o.kind, o.body.pos)).collect();
        let pb: Vec<_> = b.obstacles.iter().map(|o| (o.kind, o.body.pos)).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_ramp_speed_emits_event() {
        let mut state = running_state();
        ramp_speed(&mut state);
        assert!((state.obstacle_speed - 10.3).abs() < 1e-5);
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::SpeedIncreased { .. }]
        ));
    }

    #[test]
    fn test_cull_passed() {
        let mut state = running_state();
        maybe_spawn(&mut state).unwrap();
        state.frame = state.spawn_interval as u64;
        maybe_spawn(&mut state).unwrap();
        state.drain_events();

        // Push the first one far behind the player (player z = 100)
        state.obstacles[0].body.pos.z = 2000.0;
        state.obstacles[0].body.update_bounds();
        let culled_id = state.obstacles[0].id;

        assert_eq!(cull_passed(&mut state), 1);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ObstacleCulled { id: culled_id }]
        );
    }

    #[test]
    fn test_cull_disabled_keeps_everything() {
        let tuning = Tuning {
            cull_distance: None,
            ..Default::default()
        };
        let mut state = GameState::new(tuning).unwrap();
        state.start(0.0);
        maybe_spawn(&mut state).unwrap();
        state.obstacles[0].body.pos.z = 1.0e6;
        state.obstacles[0].body.update_bounds();
        assert_eq!(cull_passed(&mut state), 0);
        assert_eq!(state.obstacles.len(), 1);
    }

    proptest! {
        #[test]
        fn spawn_interval_never_rises_or_drops_below_floor(
            start in 50u32..400,
            step in 1u32..10,
            rounds in 0usize..500,
        ) {
            let mut interval = start;
            for _ in 0..rounds {
                let next = ramp_spawn_interval(interval, step, 50);
                prop_assert!(next <= interval);
                prop_assert!(next >= 50);
                interval = next;
            }
        }
    }
}
