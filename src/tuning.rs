//! Data-driven game balance
//!
//! Every field defaults to the value in [`crate::consts`], so a tuning file
//! only needs to name the knobs it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Inclusive integer range used for randomized spawn parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: u32,
    pub max: u32,
}

impl Span {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,
    pub ground_height: f32,

    pub gravity: f32,
    pub jump_velocity: f32,

    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,

    pub base_speed: f32,
    pub speed_ramp: f32,

    /// Spawn countdown in ms at base speed
    pub spawn_gap_ms: Span,
    pub obstacle_height: Span,
    pub obstacle_width: Span,
    pub spawn_offset: f32,
    pub despawn_margin: f32,

    pub score_base_rate: f64,
    pub score_speed_divisor: f64,

    /// Frame delta clamp (seconds)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            ground_height: GROUND_HEIGHT,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            player_x: PLAYER_X,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            base_speed: BASE_SPEED,
            speed_ramp: SPEED_RAMP,
            spawn_gap_ms: Span::new(SPAWN_GAP_MIN_MS, SPAWN_GAP_MAX_MS),
            obstacle_height: Span::new(OBSTACLE_MIN_HEIGHT, OBSTACLE_MAX_HEIGHT),
            obstacle_width: Span::new(OBSTACLE_MIN_WIDTH, OBSTACLE_MAX_WIDTH),
            spawn_offset: SPAWN_OFFSET,
            despawn_margin: DESPAWN_MARGIN,
            score_base_rate: SCORE_BASE_RATE,
            score_speed_divisor: SCORE_SPEED_DIVISOR,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

/// Why a tuning document was rejected
#[derive(Debug, Error)]
pub enum TuningError {
    /// Not valid JSON, or a field has the wrong type
    #[error("tuning is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field is out of its allowed range
    #[error("invalid tuning field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {}", value)))
    }
}

fn require_span(field: &'static str, span: Span) -> Result<(), TuningError> {
    if span.min == 0 {
        return Err(invalid(field, "min must be at least 1"));
    }
    if span.min > span.max {
        return Err(invalid(
            field,
            format!("min {} exceeds max {}", span.min, span.max),
        ));
    }
    Ok(())
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), TuningError> {
        require_positive("arena_width", self.arena_width)?;
        require_positive("arena_height", self.arena_height)?;
        require_positive("ground_height", self.ground_height)?;
        require_positive("gravity", self.gravity)?;
        require_positive("jump_velocity", self.jump_velocity)?;
        require_positive("player_width", self.player_width)?;
        require_positive("player_height", self.player_height)?;
        require_positive("base_speed", self.base_speed)?;
        require_positive("max_frame_dt", self.max_frame_dt)?;

        if self.ground_height + self.player_height >= self.arena_height {
            return Err(invalid(
                "player_height",
                "player does not fit above the ground",
            ));
        }
        if !(self.speed_ramp.is_finite() && self.speed_ramp >= 0.0) {
            return Err(invalid("speed_ramp", "must be zero or positive"));
        }
        if self.max_frame_dt > 0.25 {
            return Err(invalid("max_frame_dt", "must not exceed 0.25 seconds"));
        }
        if self.despawn_margin < 0.0 || self.spawn_offset < 0.0 {
            return Err(invalid("despawn_margin", "margins must not be negative"));
        }

        require_span("spawn_gap_ms", self.spawn_gap_ms)?;
        require_span("obstacle_height", self.obstacle_height)?;
        require_span("obstacle_width", self.obstacle_width)?;

        if self.obstacle_height.max as f32 >= self.ground_line() {
            return Err(invalid("obstacle_height", "taller than the playfield"));
        }
        if !(self.score_base_rate >= 0.0 && self.score_speed_divisor > 0.0) {
            return Err(invalid(
                "score_speed_divisor",
                "score rates must be non-negative with a positive divisor",
            ));
        }
        Ok(())
    }

    /// Y coordinate of the walkable surface
    #[inline]
    pub fn ground_line(&self) -> f32 {
        self.arena_height - self.ground_height
    }

    /// Resting Y of the player's top edge
    #[inline]
    pub fn player_floor_y(&self) -> f32 {
        self.ground_line() - self.player_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.ground_line(), 360.0);
        assert_eq!(tuning.player_floor_y(), 296.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 2000.0, "spawn_gap_ms": { "min": 300, "max": 400 } }"#)
            .expect("valid tuning");
        assert_eq!(tuning.gravity, 2000.0);
        assert_eq!(tuning.spawn_gap_ms, Span::new(300, 400));
        assert_eq!(tuning.base_speed, BASE_SPEED);
    }

    #[test]
    fn test_rejects_inverted_span() {
        let err = Tuning::from_json(r#"{ "obstacle_width": { "min": 50, "max": 10 } }"#)
            .unwrap_err();
        match err {
            TuningError::Invalid { field, .. } => assert_eq!(field, "obstacle_width"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ gravity: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_error_messages_and_source() {
        use std::error::Error as _;

        let err = Tuning::from_json("[1, 2]").unwrap_err();
        assert!(err.source().is_some(), "parse errors keep the serde_json cause");

        let err = Tuning::from_json(r#"{ "gravity": -5.0 }"#).unwrap_err();
        assert!(err.source().is_none());
        assert_eq!(
            err.to_string(),
            "invalid tuning field `gravity`: must be positive, got -5"
        );
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let tuning = Tuning {
            base_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid { field: "base_speed", .. })
        ));
    }

    #[test]
    fn test_rejects_huge_frame_clamp() {
        let tuning = Tuning {
            max_frame_dt: 1.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }
}
