//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; given the same seed,
//! tuning and inputs, a run replays identically.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::obstacles::{Obstacle, ObstacleField};
use super::player::Player;
use super::score::{Score, Scoreboard};
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Nothing started yet
    #[default]
    Idle,
    /// Active run
    Running,
    /// Run ended on a collision, waiting for restart
    Ended,
}

/// Something that happened during a tick, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A run began (1-based run number)
    Started { run: u32 },
    Jumped,
    ObstacleSpawned { width: f32, height: f32 },
    /// The player hit an obstacle and the run ended
    Crashed {
        score: u64,
        best: u64,
        new_best: bool,
    },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(super) rng: Pcg32,
    pub tuning: Tuning,
    pub phase: SessionPhase,
    pub player: Player,
    pub field: ObstacleField,
    pub difficulty: Difficulty,
    pub score: Score,
    pub scoreboard: Scoreboard,
    /// Ticks simulated in the current run
    pub time_ticks: u64,
}

impl GameState {
    /// Create an idle game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create an idle game with the given tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(&tuning),
            field: ObstacleField::new(),
            difficulty: Difficulty::new(tuning.base_speed, tuning.speed_ramp),
            score: Score::default(),
            scoreboard: Scoreboard::new(),
            phase: SessionPhase::Idle,
            time_ticks: 0,
            tuning,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Reset everything run-scoped and enter `Running`.
    ///
    /// The scoreboard and the RNG stream carry over, so consecutive runs
    /// differ but the whole session stays reproducible from the seed.
    pub fn start_run(&mut self) -> GameEvent {
        self.field.clear();
        self.difficulty.reset();
        self.score.reset();
        self.player.reset(&self.tuning);
        self.time_ticks = 0;
        self.phase = SessionPhase::Running;

        let run = self.scoreboard.runs + 1;
        log::info!("Run {} started (seed {})", run, self.seed);
        GameEvent::Started { run }
    }

    /// Stop the run after hitting `obstacle` and record the score
    pub fn end_run(&mut self, obstacle: &Obstacle) -> GameEvent {
        self.phase = SessionPhase::Ended;
        let score = self.score.display();
        let new_best = self.scoreboard.record(score);
        log::info!(
            "Run {} ended at x={:.0}: score {}, best {}{}",
            self.scoreboard.runs,
            obstacle.pos.x,
            score,
            self.scoreboard.best,
            if new_best { " (new best)" } else { "" }
        );
        GameEvent::Crashed {
            score,
            best: self.scoreboard.best,
            new_best,
        }
    }

    /// Score shown on the HUD
    #[inline]
    pub fn display_score(&self) -> u64 {
        self.score.display()
    }

    #[inline]
    pub fn best_score(&self) -> u64 {
        self.scoreboard.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_idle() {
        let state = GameState::new(42);
        assert_eq!(state.phase, SessionPhase::Idle);
        assert!(state.player.on_ground);
        assert!(state.field.obstacles.is_empty());
        assert_eq!(state.difficulty.speed, state.tuning.base_speed);
        assert_eq!(state.best_score(), 0);
    }

    #[test]
    fn test_start_resets_run_state() {
        let mut state = GameState::new(42);
        state.start_run();
        state.difficulty.speed += 100.0;
        state.score.accrue(3.0, 300.0, 20.0, 10.0);
        state.player.jump(state.tuning.jump_velocity);
        state.field.countdown_ms = 700.0;
        let ground = state.tuning.ground_line();
        state.field.obstacles.push(Obstacle::new(200.0, 30.0, 40.0, ground));

        let obstacle = state.field.obstacles[0];
        let event = state.end_run(&obstacle);
        assert!(matches!(event, GameEvent::Crashed { new_best: true, .. }));
        let best = state.best_score();
        assert!(best > 0);

        assert_eq!(state.start_run(), GameEvent::Started { run: 2 });
        assert_eq!(state.phase, SessionPhase::Running);
        assert!(state.field.obstacles.is_empty());
        assert_eq!(state.field.countdown_ms, 0.0);
        assert_eq!(state.difficulty.speed, state.tuning.base_speed);
        assert_eq!(state.score.value(), 0.0);
        assert!(state.player.on_ground);
        assert_eq!(state.player.pos.y, state.tuning.player_floor_y());
        assert_eq!(state.best_score(), best);
    }

    #[test]
    fn test_state_serializes() {
        let mut state = GameState::new(7);
        state.start_run();
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.phase, SessionPhase::Running);
        assert_eq!(back.seed, 7);
    }
}
