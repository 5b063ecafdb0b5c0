//! Night Runner - A single-screen endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, obstacles, score)
//! - `driver`: Per-frame driver wiring the simulation to presentation
//! - `present`: Renderer / HUD capability traits
//! - `renderer`: WebGPU rendering pipeline
//! - `backdrop`: Cosmetic parallax scenery
//! - `tuning`: Data-driven game balance

pub mod backdrop;
pub mod driver;
pub mod present;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::{Command, FrameControl, FrameDriver};
pub use settings::{QualityPreset, Settings};
pub use tuning::{Span, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Logical playfield size (pixels, y grows downward)
    pub const ARENA_WIDTH: f32 = 720.0;
    pub const ARENA_HEIGHT: f32 = 420.0;
    /// Height of the ground strip at the bottom of the playfield
    pub const GROUND_HEIGHT: f32 = 60.0;

    /// Player physics (pixels/s², pixels/s)
    pub const GRAVITY: f32 = 1800.0;
    pub const JUMP_VELOCITY: f32 = 820.0;

    /// Player box
    pub const PLAYER_X: f32 = 80.0;
    pub const PLAYER_WIDTH: f32 = 56.0;
    pub const PLAYER_HEIGHT: f32 = 64.0;

    /// Scroll speed at session start (pixels/s)
    pub const BASE_SPEED: f32 = 280.0;
    /// Speed gained per second while running
    pub const SPEED_RAMP: f32 = 6.0;

    /// Spawn countdown range (ms, inclusive) at base speed
    pub const SPAWN_GAP_MIN_MS: u32 = 480;
    pub const SPAWN_GAP_MAX_MS: u32 = 860;
    /// Obstacle size ranges (pixels, inclusive)
    pub const OBSTACLE_MIN_HEIGHT: u32 = 30;
    pub const OBSTACLE_MAX_HEIGHT: u32 = 80;
    pub const OBSTACLE_MIN_WIDTH: u32 = 28;
    pub const OBSTACLE_MAX_WIDTH: u32 = 40;
    /// Obstacles appear this far past the right edge
    pub const SPAWN_OFFSET: f32 = 20.0;
    /// Obstacles are dropped once their right edge passes -DESPAWN_MARGIN
    pub const DESPAWN_MARGIN: f32 = 40.0;

    /// Score per second = SCORE_BASE_RATE + speed / SCORE_SPEED_DIVISOR
    pub const SCORE_BASE_RATE: f64 = 20.0;
    pub const SCORE_SPEED_DIVISOR: f64 = 10.0;

    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.032;
    /// Nominal frame delta used by headless runs and tests
    pub const NOMINAL_DT: f32 = 1.0 / 60.0;
}
