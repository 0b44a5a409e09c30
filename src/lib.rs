//! Story Dash - a deterministic side-scrolling runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, game state)
//! - `render`: Draw-call contract against an abstract 2D surface
//! - `theme`: Data-driven visual metadata
//! - `host`: Fixed-timestep driver, input aggregation, restart

pub mod host;
pub mod render;
pub mod sim;
pub mod theme;

pub use sim::{GameState, TickInput};
pub use theme::Theme;

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest single frame delta the host loop will accept
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Ceiling callers should clamp one tick's `dt` to
    pub const MAX_TICK_DT: f32 = 0.032;

    /// View dimensions (world units are screen pixels at 1:1)
    pub const VIEW_WIDTH: f32 = 1000.0;
    pub const VIEW_HEIGHT: f32 = 360.0;
    /// World-space y of the ground line
    pub const GROUND_Y: f32 = 270.0;

    /// Gravity (pixels/s²)
    pub const GRAVITY: f32 = 3000.0;
    /// Top horizontal speed
    pub const MAX_RUN_SPEED: f32 = 360.0;
    /// Horizontal acceleration toward the held direction (pixels/s²)
    pub const RUN_ACCEL: f32 = 3000.0;
    /// Per-tick horizontal velocity decay when no direction is held
    pub const FRICTION: f32 = 0.85;
    /// Initial upward speed of a jump
    pub const JUMP_VEL: f32 = 980.0;
    /// Upward velocity multiplier applied on early jump release
    pub const JUMP_CUT_FACTOR: f32 = 0.55;
    /// Terminal fall speed
    pub const MAX_FALL_SPEED: f32 = 1800.0;
    /// Seconds a jump stays available after leaving the ground
    pub const COYOTE_TIME: f32 = 0.1;
    /// Seconds an early jump press stays valid before landing
    pub const JUMP_BUFFER: f32 = 0.12;

    /// Player box
    pub const PLAYER_W: f32 = 44.0;
    pub const PLAYER_H: f32 = 48.0;
    /// Hitbox height factor while ducking (floored to whole pixels)
    pub const DUCK_SCALE: f32 = 0.6;
    pub const PLAYER_SPAWN_X: f32 = 50.0;

    /// Constant auto-scroll speed
    pub const BASE_SPEED: f32 = 220.0;
    /// Fraction of the view kept behind the player
    pub const CAMERA_ANCHOR: f32 = 0.35;
    /// Proportion of the camera-to-anchor gap closed per tick
    pub const CAMERA_EASE: f32 = 0.08;

    /// How far past the right view edge content is generated
    pub const SPAWN_LOOKAHEAD: f32 = 400.0;
    pub const FIRST_OBSTACLE_X: f32 = 400.0;
    /// Gap before each obstacle group, uniform [min, max)
    pub const OBSTACLE_GAP_MIN: f32 = 160.0;
    pub const OBSTACLE_GAP_MAX: f32 = 360.0;
    /// Extra gap after each obstacle group, uniform [min, max)
    pub const GROUP_GAP_MIN: f32 = 80.0;
    pub const GROUP_GAP_MAX: f32 = 200.0;
    /// Probability a spawn rolls a ground cluster instead of a flyer
    pub const GROUND_OBSTACLE_CHANCE: f32 = 0.8;
    /// Ground cluster: unit width, x step between units, shared height range
    pub const CLUSTER_UNIT_W: f32 = 18.0;
    pub const CLUSTER_STEP_X: f32 = 32.0;
    pub const CLUSTER_HEIGHT_MIN: f32 = 36.0;
    pub const CLUSTER_HEIGHT_MAX: f32 = 70.0;
    /// Random horizontal offset applied to a whole cluster
    pub const CLUSTER_JITTER_X: f32 = 70.0;
    /// Flyer box
    pub const FLYER_W: f32 = 40.0;
    pub const FLYER_H: f32 = 24.0;
    /// Flyer spawn bands, as height above the ground line
    pub const FLYER_BANDS: [f32; 3] = [110.0, 160.0, 70.0];
    /// Flyer vertical drift speed
    pub const FLYER_OSC_SPEED: f32 = 40.0;
    /// Flyer oscillation limits, as height above the ground line
    pub const FLYER_OSC_TOP: f32 = 200.0;
    pub const FLYER_OSC_BOTTOM: f32 = 60.0;

    /// Obstacle collision scan window around the camera
    pub const COLLIDE_BEHIND: f32 = 100.0;
    pub const COLLIDE_AHEAD: f32 = 300.0;

    /// Entities are dropped once fully this far behind the camera
    pub const CULL_MARGIN: f32 = 600.0;

    /// Story billboards
    pub const FIRST_BILLBOARD_X: f32 = 600.0;
    /// Gap between scheduled panels, uniform [min, max)
    pub const BILLBOARD_GAP_MIN: f32 = 900.0;
    pub const BILLBOARD_GAP_MAX: f32 = 1400.0;
    /// Default panel size
    pub const BILLBOARD_W: f32 = 280.0;
    pub const BILLBOARD_H: f32 = 120.0;
    /// Gap between a panel's bottom edge and the ground line
    pub const BILLBOARD_LIFT: f32 = 60.0;

    /// Pixels of new rightward progress per score unit
    pub const SCORE_DIVISOR: f32 = 4.0;
    /// Run-cycle animation rate divisor while grounded
    pub const ANIM_RUN_DIVISOR: f32 = 180.0;
    /// Fixed animation rate while airborne
    pub const ANIM_AIR_RATE: f32 = 6.0;
}

/// Opaque handle naming an image asset.
///
/// The engine never loads pixels. A handle is resolved by whatever asset
/// layer backs the active surface; entities and themes carry only declared
/// geometry alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
