//! Score accrual and the in-memory scoreboard
//!
//! Nothing here is persisted; the scoreboard lives as long as the process.

use serde::{Deserialize, Serialize};

/// Real-valued score accumulator for the current run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    value: f64,
}

impl Score {
    /// Add `dt * (base_rate + speed / speed_divisor)`.
    ///
    /// Rates are clamped at zero so the total never decreases.
    pub fn accrue(&mut self, dt: f32, speed: f32, base_rate: f64, speed_divisor: f64) {
        let rate = (base_rate + speed as f64 / speed_divisor).max(0.0);
        self.value += dt.max(0.0) as f64 * rate;
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }

    /// Raw accumulated value
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Score as shown to the player
    #[inline]
    pub fn display(&self) -> u64 {
        self.value.floor() as u64
    }
}

/// Results across every run of this process
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Best floored score so far
    pub best: u64,
    /// Floored score of the most recent finished run
    pub last: Option<u64>,
    /// Number of finished runs
    pub runs: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run. Returns true if it set a new best.
    pub fn record(&mut self, score: u64) -> bool {
        self.runs += 1;
        self.last = Some(score);
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }
}
