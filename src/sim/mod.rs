//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (obstacles left to right)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod difficulty;
pub mod geometry;
pub mod obstacles;
pub mod player;
pub mod score;
pub mod state;
pub mod tick;

pub use difficulty::Difficulty;
pub use geometry::Rect;
pub use obstacles::{Obstacle, ObstacleField, ObstaclePass};
pub use player::Player;
pub use score::{Score, Scoreboard};
pub use state::{GameEvent, GameState, SessionPhase};
pub use tick::{TickInput, tick};
