//! Cosmetic parallax scenery
//!
//! Stars, rolling hills and ground stripes. Advanced every frame whether or
//! not a run is active; never read by the simulation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::tuning::Tuning;

pub const STAR_COUNT: usize = 80;
pub const HILL_COUNT: usize = 5;
const HILL_SPACING: f32 = 220.0;
const HILL_SIZE: Vec2 = Vec2::new(240.0, 80.0);
/// Parallax factor relative to the layer's own speed
const PARALLAX: f32 = 0.25;
/// Ground stripe repeat distance and scroll rate (pixels, pixels/s)
pub const STRIPE_PERIOD: f32 = 40.0;
const STRIPE_RATE: f32 = 125.0;

#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    /// Drift speed before parallax (pixels/s)
    pub speed: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Hill {
    /// Top-left of the hill's bounding box
    pub pos: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone)]
pub struct Backdrop {
    pub stars: Vec<Star>,
    pub hills: Vec<Hill>,
    /// Horizontal offset of the ground stripes, in [0, STRIPE_PERIOD)
    pub stripe_phase: f32,
    pub width: f32,
    pub height: f32,
    pub ground_line: f32,
    rng: Pcg32,
}

impl Backdrop {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let width = tuning.arena_width;
        let height = tuning.arena_height;
        let ground_line = tuning.ground_line();
        let sky_depth = (height - 120.0).max(1.0);

        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec2::new(rng.random_range(0.0..width), rng.random_range(0.0..sky_depth)),
                size: rng.random_range(0.3..1.5),
                speed: rng.random_range(10.0..30.0),
            })
            .collect();

        let hills = (0..HILL_COUNT)
            .map(|i| Hill {
                pos: Vec2::new(i as f32 * HILL_SPACING, ground_line - 40.0),
                size: HILL_SIZE,
            })
            .collect();

        Self {
            stars,
            hills,
            stripe_phase: 0.0,
            width,
            height,
            ground_line,
            rng,
        }
    }

    /// Scroll every layer. `speed` is the world scroll speed.
    pub fn advance(&mut self, dt: f32, speed: f32) {
        let dt = dt.max(0.0);

        for star in &mut self.stars {
            star.pos.x -= star.speed * dt * PARALLAX;
            if star.pos.x < -2.0 {
                star.pos.x = self.width + self.rng.random_range(0.0..40.0);
            }
        }

        let wrap = HILL_SPACING * self.hills.len() as f32;
        for hill in &mut self.hills {
            hill.pos.x -= speed * dt * PARALLAX;
            if hill.pos.x + hill.size.x < 0.0 {
                hill.pos.x += wrap;
            }
        }

        self.stripe_phase = (self.stripe_phase + dt * STRIPE_RATE) % STRIPE_PERIOD;
    }
}
