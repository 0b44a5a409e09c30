//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-clamped timestep only
//! - Seeded RNG only, embedded in the state
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod story;
pub mod tick;

pub use collision::{Rect, rects_overlap};
pub use state::{Billboard, Camera, GameState, Obstacle, ObstacleKind, Player};
pub use story::{PanelPayload, StoryPanel, StoryScript};
pub use tick::{TickInput, tick};
