//! Obstacle spawning, scrolling and collision
//!
//! Obstacles stand on the ground line and scroll left at the current world
//! speed. They are appended at the tail, so vector order is left-to-right.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    /// An obstacle of the given size resting on `ground_line`
    pub fn new(x: f32, width: f32, height: f32, ground_line: f32) -> Self {
        Self {
            pos: Vec2::new(x, ground_line - height),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// What happened during one obstacle pass
#[derive(Debug, Clone, Default)]
pub struct ObstaclePass {
    pub spawned: Option<Obstacle>,
    /// First obstacle found overlapping the player
    pub hit: Option<Obstacle>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    /// Live obstacles, left to right
    pub obstacles: Vec<Obstacle>,
    /// Time until the next spawn (ms)
    pub countdown_ms: f32,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every obstacle and make the next pass spawn immediately
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.countdown_ms = 0.0;
    }

    /// Spawn one obstacle just past the right edge and rearm the countdown.
    ///
    /// The countdown is drawn at base speed and divided by `gap_scale`, so a
    /// faster world spawns more often.
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning, gap_scale: f32) -> Obstacle {
        let height = rng.random_range(tuning.obstacle_height.min..=tuning.obstacle_height.max);
        let width = rng.random_range(tuning.obstacle_width.min..=tuning.obstacle_width.max);
        let obstacle = Obstacle::new(
            tuning.arena_width + tuning.spawn_offset,
            width as f32,
            height as f32,
            tuning.ground_line(),
        );
        self.obstacles.push(obstacle);

        let gap = rng.random_range(tuning.spawn_gap_ms.min..=tuning.spawn_gap_ms.max);
        self.countdown_ms = gap as f32 / gap_scale.max(f32::EPSILON);

        log::debug!(
            "Spawned {}x{} obstacle, next in {:.0}ms",
            width,
            height,
            self.countdown_ms
        );
        obstacle
    }

    /// Run one pass: count down, maybe spawn, scroll, prune, then collide.
    ///
    /// Collision testing stops at the first hit; the caller ends the session
    /// on a hit so the remaining obstacles don't matter.
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        speed: f32,
        gap_scale: f32,
        player: &Rect,
        tuning: &Tuning,
        rng: &mut R,
    ) -> ObstaclePass {
        let mut pass = ObstaclePass::default();

        self.countdown_ms -= dt * 1000.0;
        if self.obstacles.is_empty() || self.countdown_ms <= 0.0 {
            pass.spawned = Some(self.spawn(rng, tuning, gap_scale));
        }

        let dx = speed * dt;
        for obstacle in &mut self.obstacles {
            obstacle.pos.x -= dx;
        }

        let left_bound = -tuning.despawn_margin;
        self.obstacles.retain(|o| o.right() >= left_bound);

        pass.hit = self
            .obstacles
            .iter()
            .find(|o| o.rect().overlaps(player))
            .copied();
        pass
    }
}
