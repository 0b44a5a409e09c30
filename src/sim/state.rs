//! Game state and core simulation types
//!
//! Everything a run needs to be reproducible from its seed lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::story::{PanelPayload, StoryScript};
use crate::consts::*;

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the hitbox
    pub pos: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    pub ducking: bool,
    /// Seconds of jump eligibility left after leaving the ground
    pub coyote: f32,
    /// Seconds a buffered jump press stays valid before landing
    pub jump_buffer: f32,
    /// Monotonic phase accumulator driving the run/flap animation
    pub anim_clock: f32,
}

impl Player {
    /// A fresh player resting at the fixed spawn point
    pub fn spawn() -> Self {
        Self {
            pos: Vec2::new(PLAYER_SPAWN_X, GROUND_Y - PLAYER_H),
            vel: Vec2::ZERO,
            grounded: true,
            ducking: false,
            coyote: 0.0,
            jump_buffer: 0.0,
            anim_clock: 0.0,
        }
    }

    /// Current hitbox height; ducking shrinks it to whole pixels
    pub fn height(&self) -> f32 {
        if self.ducking {
            (PLAYER_H * DUCK_SCALE).floor()
        } else {
            PLAYER_H
        }
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_W, self.height())
    }
}

/// World-space scroll offset. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    /// World x of the rightmost visible column
    pub fn lead_edge(&self) -> f32 {
        self.x + VIEW_WIDTH
    }

    /// World x past which new content is scheduled
    pub fn spawn_front(&self) -> f32 {
        self.lead_edge() + SPAWN_LOOKAHEAD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Static hazard sitting on the ground, spawned in 1-3 unit clusters
    Ground,
    /// Airborne hazard oscillating inside a fixed vertical band
    Flying,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical drift, flyers only (zero for ground obstacles)
    pub osc_vy: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// One story panel placed in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Billboard {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub payload: PanelPayload,
}

impl Billboard {
    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// Complete game state (deterministic, serializable)
///
/// Owned exclusively by the simulation; renderers get a read reference per
/// frame. Restart replaces the whole value with a fresh `GameState::new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// The stream every procedural decision draws from
    pub rng: Pcg32,
    pub player: Player,
    pub camera: Camera,
    /// Insertion order, not spatial order
    pub obstacles: Vec<Obstacle>,
    /// Insertion order matches story order
    pub billboards: Vec<Billboard>,
    /// World x where the next obstacle group is scheduled
    pub next_obstacle_x: f32,
    /// World x where the next story panel is scheduled
    pub next_billboard_x: f32,
    /// Cursor into the story script
    pub story_index: usize,
    /// Fixed, ordered story script for this run
    pub script: StoryScript,
    /// Rightmost x the player has reached
    pub furthest_x: f32,
    pub score: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paused: bool,
    pub game_over: bool,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run with the built-in story script
    pub fn new(seed: u64) -> Self {
        Self::with_script(seed, StoryScript::default())
    }

    /// Create a fresh run with a custom story script
    pub fn with_script(seed: u64, script: StoryScript) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::spawn(),
            camera: Camera { x: 0.0 },
            obstacles: Vec::new(),
            billboards: Vec::new(),
            next_obstacle_x: FIRST_OBSTACLE_X,
            next_billboard_x: FIRST_BILLBOARD_X,
            story_index: 0,
            script,
            furthest_x: PLAYER_SPAWN_X,
            score: 0.0,
            time_ticks: 0,
            paused: false,
            game_over: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
