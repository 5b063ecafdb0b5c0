//! Demo autopilot
//!
//! Jumps when the nearest obstacle ahead comes within a speed-scaled
//! reaction window. Used by the headless runner and attract mode.

use super::state::GameState;

/// Seconds of warning the autopilot wants before an obstacle arrives
const LEAD_TIME: f32 = 0.2;

/// Returns true if the player should jump this tick
pub fn should_jump(state: &GameState) -> bool {
    if !state.is_running() || !state.player.on_ground {
        return false;
    }

    let player = state.player.rect();
    let window = state.difficulty.speed * LEAD_TIME;

    state
        .field
        .obstacles
        .iter()
        .filter(|o| o.right() > player.left())
        .map(|o| o.pos.x - player.right())
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .is_some_and(|gap| gap <= window)
}
