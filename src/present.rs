//! Presentation capabilities
//!
//! The frame driver only talks to the outside world through these traits.
//! The GPU renderer and the DOM overlay implement them on web; the headless
//! binary uses the null/logging versions below.

use crate::backdrop::Backdrop;
use crate::sim::{Obstacle, Player};

/// Draws one frame. Each method is called exactly once per frame, in
/// declaration order, followed by `present`.
pub trait Renderer {
    fn draw_background(&mut self, backdrop: &Backdrop);
    fn draw_obstacles(&mut self, obstacles: &[Obstacle]);
    fn draw_player(&mut self, player: &Player);
    /// Submit whatever the draw calls collected
    fn present(&mut self) {}
}

/// Score readout and end-of-run overlay
pub trait Hud {
    /// Live score, called every frame
    fn show_score(&mut self, score: u64, best: u64);
    /// A run began; hide any end-of-run overlay
    fn hide_overlay(&mut self) {}
    /// The run ended
    fn show_game_over(&mut self, score: u64, best: u64, new_best: bool);
}

/// Renderer that draws nothing and counts frames
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: u64,
}

impl Renderer for NullRenderer {
    fn draw_background(&mut self, _backdrop: &Backdrop) {}

    fn draw_obstacles(&mut self, _obstacles: &[Obstacle]) {}

    fn draw_player(&mut self, _player: &Player) {}

    fn present(&mut self) {
        self.frames += 1;
    }
}

/// HUD that writes to the log
#[derive(Debug, Default)]
pub struct LogHud {
    /// Last score shown
    pub score: u64,
    pub best: u64,
    /// Final scores of finished runs, oldest first
    pub finished: Vec<u64>,
}

impl Hud for LogHud {
    fn show_score(&mut self, score: u64, best: u64) {
        if score / 100 != self.score / 100 {
            log::debug!("Score {}", score);
        }
        self.score = score;
        self.best = best;
    }

    fn hide_overlay(&mut self) {
        log::debug!("Run in progress");
    }

    fn show_game_over(&mut self, score: u64, best: u64, new_best: bool) {
        self.finished.push(score);
        self.best = best;
        if new_best {
            log::info!("Game over - score {} (new best!)", score);
        } else {
            log::info!("Game over - score {} (best {})", score, best);
        }
    }
}
