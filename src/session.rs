//! Host-facing game session
//!
//! A `Session` ties the simulation to a frame scheduler and the keyboard.
//! Hosts call `frame(now)` from their frame callback and feed key events in;
//! everything else (phase changes, scheduling, clip selection) happens here.

use glam::Vec3;
use serde::Serialize;

use crate::platform::FrameScheduler;
use crate::sim::{
    AnimationClip, Animator, GameEvent, GamePhase, GameState, ObstacleKind, TickInput, VisualId,
    select_animation, tick,
};
use crate::tuning::{Tuning, TuningError};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Slide forward
    Forward,
    Jump,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "KeyA" | "ArrowLeft" => Some(Key::Left),
            "KeyD" | "ArrowRight" => Some(Key::Right),
            "KeyW" | "ArrowUp" => Some(Key::Forward),
            "Space" => Some(Key::Jump),
            _ => None,
        }
    }
}

/// Position and extents of a box, for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyView {
    pub position: Vec3,
    pub size: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub size: Vec3,
    /// Renderer handle once the model has loaded
    pub visual: Option<u32>,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub frame: u64,
    pub score: Option<u64>,
    pub speed: f32,
    /// Sleeper scroll offset
    pub scroll: f32,
    pub player: BodyView,
    pub obstacles: Vec<ObstacleView>,
    pub clip: Option<AnimationClip>,
}

impl Snapshot {
    pub fn capture(state: &GameState, clip: Option<AnimationClip>) -> Self {
        Self {
            phase: state.phase,
            frame: state.frame,
            score: state.score,
            speed: state.obstacle_speed,
            scroll: state.scroll_offset,
            player: BodyView {
                position: state.player.pos,
                size: state.player.size(),
            },
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    kind: o.kind,
                    position: o.body.pos,
                    size: o.body.size(),
                    visual: o.visual.map(|v| v.0),
                })
                .collect(),
            clip,
        }
    }
}

/// One game plus the machinery that drives it
pub struct Session<S: FrameScheduler> {
    state: GameState,
    animator: Animator,
    input: TickInput,
    scheduler: S,
}

impl<S: FrameScheduler> Session<S> {
    pub fn new(tuning: Tuning, scheduler: S) -> Result<Self, TuningError> {
        Ok(Self {
            state: GameState::new(tuning)?,
            animator: Animator::new(),
            input: TickInput::default(),
            scheduler,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn input(&self) -> &TickInput {
        &self.input
    }

    /// Begin the run and schedule the first frame
    pub fn start(&mut self, now: f64) -> bool {
        if !self.state.start(now) {
            return false;
        }
        self.animator.reset();
        self.scheduler.request();
        true
    }

    /// Pause cancels the pending frame; resume schedules one
    pub fn toggle_pause(&mut self, now: f64) -> bool {
        if !self.state.toggle_pause(now) {
            return false;
        }
        if self.state.is_paused() {
            self.scheduler.cancel();
            // Key-up events are lost while the page is out of focus
            self.input = TickInput::default();
        } else {
            self.scheduler.request();
        }
        true
    }

    /// Throw the current run away and start a new one at `now`
    pub fn restart(&mut self, now: f64) {
        self.scheduler.cancel();
        self.input = TickInput::default();
        self.animator.reset();
        self.state.restart(now);
        if self.state.is_running() {
            self.scheduler.request();
        }
    }

    /// Jump if standing on something; only while running
    pub fn jump(&mut self) -> bool {
        if !self.state.jump() {
            return false;
        }
        let player = &self.state.player;
        self.animator
            .play(AnimationClip::Jump, player.can_jump, player.vel.y);
        true
    }

    pub fn key_down(&mut self, key: Key) {
        if !self.state.is_running() {
            return;
        }
        match key {
            Key::Left => self.input.left = true,
            Key::Right => self.input.right = true,
            Key::Forward => self.input.forward = true,
            Key::Jump => {
                self.jump();
            }
        }
    }

    /// Releases always apply so a key let go during a pause does not stick
    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.input.left = false,
            Key::Right => self.input.right = false,
            Key::Forward => self.input.forward = false,
            Key::Jump => {}
        }
    }

    /// Frame callback. Returns `None` when the game was not running (a stale
    /// callback), otherwise the snapshot to render.
    pub fn frame(&mut self, now: f64) -> Option<Snapshot> {
        self.scheduler.fired();
        if !self.state.is_running() {
            return None;
        }

        let in_grace = self.state.in_grace_period(now);
        let player = &self.state.player;
        let (can_jump, vy) = (player.can_jump, player.vel.y);
        let clip = select_animation(in_grace, can_jump, vy, &self.input);
        if self.animator.play(clip, can_jump, vy) {
            log::debug!("Clip -> {} (frame {})", clip.as_str(), self.state.frame);
        }

        tick(&mut self.state, &self.input, now);

        if self.state.is_running() {
            self.scheduler.request();
        }
        Some(self.snapshot())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.animator.current())
    }

    pub fn attach_visual(&mut self, id: u32, visual: VisualId) -> bool {
        self.state.attach_visual(id, visual)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
