//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything the frame step mutates.
//! Construct a fresh one per run (or per test); there are no globals.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::BoxBody;
use super::clock::PausableClock;
use super::spawn::ObstacleKind;
use super::track::Track;
use crate::tuning::{Tuning, TuningError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created or restarting, waiting for `start`
    Idle,
    /// Active gameplay
    Running,
    /// Frame schedule suspended
    Paused,
    /// Run ended on a collision
    GameOver,
}

/// Opaque handle to a renderer-owned visual (loaded model, mesh group...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualId(pub u32);

/// An obstacle: physics body plus an optional visual that may arrive later
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub body: BoxBody,
    /// `None` until the renderer finishes loading the model
    pub visual: Option<VisualId>,
}

/// Things that happened during a transition or frame, for audio/UI/renderer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Jumped,
    ObstacleSpawned { id: u32, kind: ObstacleKind, position: Vec3 },
    ObstacleCulled { id: u32 },
    SpeedIncreased { speed: f32 },
    GameOver { score: u64 },
    Restarted,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    tuning: Tuning,
    track: Track,
    /// Current phase
    pub phase: GamePhase,
    /// Start/pause aware time source
    pub clock: PausableClock,
    /// Frames stepped since start (also the score)
    pub frame: u64,
    /// Frames between spawn attempts, ramps down to the floor
    pub spawn_interval: u32,
    /// Forward speed of obstacles, ramps up every cadence
    pub obstacle_speed: f32,
    /// Track group z; obstacles spawn relative to it
    pub track_origin_z: f32,
    /// Sleeper scroll for the renderer, wrapped to the track length
    pub scroll_offset: f32,
    /// Final score once the run ends
    pub score: Option<u64>,
    pub player: BoxBody,
    /// Static slab everything rests on
    pub ground: BoxBody,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle game. Fails on invalid tuning.
    pub fn new(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        let track = Track::from_tuning(&tuning)?;
        let ground = BoxBody::new(tuning.ground_size(), tuning.ground_position())?;
        let player = BoxBody::new(tuning.player_size, tuning.player_spawn)?
            .with_velocity(Vec3::new(0.0, tuning.player_initial_vy, 0.0))
            .with_gravity(tuning.gravity);

        Ok(Self {
            tuning,
            track,
            phase: GamePhase::Idle,
            clock: PausableClock::new(),
            frame: 0,
            spawn_interval: tuning.spawn_interval,
            obstacle_speed: tuning.obstacle_speed,
            track_origin_z: 0.0,
            scroll_offset: 0.0,
            score: None,
            player,
            ground,
            obstacles: Vec::new(),
            rng: Pcg32::seed_from_u64(tuning.seed),
            events: Vec::new(),
            next_id: 1,
        })
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Running seconds since start, pauses excluded
    pub fn elapsed(&self, now: f64) -> f32 {
        self.clock.elapsed(now)
    }

    /// Still inside the post-start window where input and spawning are off
    pub fn in_grace_period(&self, now: f64) -> bool {
        self.elapsed(now) < self.tuning.grace_period
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Idle -> Running. Returns false (and does nothing) from any other phase.
    pub fn start(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Idle {
            log::debug!("start ignored in {:?}", self.phase);
            return false;
        }
        self.clock.start(now);
        self.phase = GamePhase::Running;
        self.push_event(GameEvent::Started);
        log::info!("Run started (seed {})", self.tuning.seed);
        true
    }

    /// Running -> Paused
    pub fn pause(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Running {
            log::debug!("pause ignored in {:?}", self.phase);
            return false;
        }
        self.clock.pause(now);
        self.phase = GamePhase::Paused;
        self.push_event(GameEvent::Paused);
        log::info!("Paused at frame {}", self.frame);
        true
    }

    /// Paused -> Running
    pub fn resume(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Paused {
            log::debug!("resume ignored in {:?}", self.phase);
            return false;
        }
        self.clock.resume(now);
        self.phase = GamePhase::Running;
        self.push_event(GameEvent::Resumed);
        log::info!("Resumed at frame {}", self.frame);
        true
    }

    /// Pause if running, resume if paused; no-op otherwise
    pub fn toggle_pause(&mut self, now: f64) -> bool {
        match self.phase {
            GamePhase::Running => self.pause(now),
            GamePhase::Paused => self.resume(now),
            _ => false,
        }
    }

    /// Running -> GameOver, scoring the current frame
    pub(crate) fn end_game(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        let score = self.frame;
        self.phase = GamePhase::GameOver;
        self.score = Some(score);
        self.push_event(GameEvent::GameOver { score });
        log::info!("Game over at frame {}", score);
    }

    /// Reset everything except the lane geometry and RNG stream, then start
    /// again from `now`. Valid from any phase.
    pub fn restart(&mut self, now: f64) {
        let restart_vel = Vec3::new(0.0, self.tuning.player_initial_vy, 0.0);
        self.player.place(self.tuning.player_restart, restart_vel);
        self.player.can_jump = false;
        self.obstacles.clear();
        self.track_origin_z = 0.0;
        self.scroll_offset = 0.0;
        self.obstacle_speed = self.tuning.obstacle_speed;
        self.spawn_interval = self.tuning.spawn_interval;
        self.frame = 0;
        self.score = None;
        self.clock = PausableClock::new();
        self.phase = GamePhase::Idle;
        self.push_event(GameEvent::Restarted);
        log::info!("Restarting");

        self.start(now);
    }

    /// Launch the player upward if it is standing on something
    pub fn jump(&mut self) -> bool {
        if self.phase != GamePhase::Running || !self.player.can_jump {
            return false;
        }
        self.player.vel.y = self.tuning.jump_velocity;
        self.player.can_jump = false;
        self.push_event(GameEvent::Jumped);
        true
    }

    pub fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Attach a late-loaded visual. The obstacle may already be gone (culled
    /// or cleared by a restart); that is not an error.
    pub fn attach_visual(&mut self, id: u32, visual: VisualId) -> bool {
        match self.obstacles.iter_mut().find(|o| o.id == id) {
            Some(obstacle) => {
                obstacle.visual = Some(visual);
                true
            }
            None => {
                log::warn!("Visual {:?} arrived for missing obstacle {}", visual, id);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(Tuning::default()).unwrap()
    }

    #[test]
    fn test_new_is_idle() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.spawn_interval, 150);
        assert_eq!(state.obstacle_speed, 10.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.player.pos, Vec3::new(0.0, 12.5, 100.0));
        assert_eq!(state.ground.bounds().top, -2.5);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            lane_count: 0,
            ..Default::default()
        };
        assert!(GameState::new(tuning).is_err());
    }

    #[test]
    fn test_transitions_are_idempotent() {
        let mut state = state();
        assert!(!state.pause(0.0));
        assert!(!state.resume(0.0));
        assert!(!state.toggle_pause(0.0));

        assert!(state.start(0.0));
        assert!(!state.start(0.5));
        assert!(!state.resume(0.5));

        assert!(state.toggle_pause(1.0));
        assert!(state.is_paused());
        assert!(!state.pause(1.5));
        assert!(state.toggle_pause(2.0));
        assert!(state.is_running());

        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Started, GameEvent::Paused, GameEvent::Resumed]
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let mut state = state();
        state.start(0.0);
        state.pause(0.4);
        assert!(state.in_grace_period(10.0));
        state.resume(10.0);
        assert!(state.in_grace_period(10.5));
        assert!(!state.in_grace_period(10.7));
    }

    #[test]
    fn test_end_game_scores_frame() {
        let mut state = state();
        state.start(0.0);
        state.frame = 321;
        state.end_game();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, Some(321));

        // Only once
        state.frame = 400;
        state.end_game();
        assert_eq!(state.score, Some(321));
        assert!(!state.toggle_pause(0.0));
    }

    #[test]
    fn test_jump_requires_ground_and_running() {
        let mut state = state();
        state.player.can_jump = true;
        assert!(!state.jump());

        state.start(0.0);
        assert!(state.jump());
        assert_eq!(state.player.vel.y, 6.0);
        assert!(!state.player.can_jump);
        assert!(!state.jump());
    }

    #[test]
    fn test_attach_visual_tolerates_missing_obstacle() {
        let mut state = state();
        assert!(!state.attach_visual(99, VisualId(7)));
    }
}
