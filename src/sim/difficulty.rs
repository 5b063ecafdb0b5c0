//! Scroll speed ramp

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Difficulty {
    /// Current scroll speed (pixels/s)
    pub speed: f32,
    base_speed: f32,
    ramp: f32,
}

impl Difficulty {
    pub fn new(base_speed: f32, ramp: f32) -> Self {
        Self {
            speed: base_speed,
            base_speed,
            ramp,
        }
    }

    /// Back to base speed. Only called when a session starts.
    pub fn reset(&mut self) {
        self.speed = self.base_speed;
    }

    /// Speed up by `ramp * dt`. A negative dt never slows the world down.
    pub fn ramp(&mut self, dt: f32) {
        self.speed += self.ramp * dt.max(0.0);
    }

    /// How many times faster than base the world currently scrolls.
    ///
    /// Spawn countdowns are divided by this so obstacle spacing stays roughly
    /// constant in distance rather than in time.
    #[inline]
    pub fn gap_scale(&self) -> f32 {
        self.speed / self.base_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_ramp_and_reset() {
        let mut difficulty = Difficulty::new(BASE_SPEED, SPEED_RAMP);
        assert_eq!(difficulty.gap_scale(), 1.0);

        difficulty.ramp(10.0);
        assert_eq!(difficulty.speed, BASE_SPEED + 60.0);
        assert!(difficulty.gap_scale() > 1.0);

        difficulty.ramp(-5.0);
        assert_eq!(difficulty.speed, BASE_SPEED + 60.0);

        difficulty.reset();
        assert_eq!(difficulty.speed, BASE_SPEED);
    }
}
