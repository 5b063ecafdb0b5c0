//! The runner: a vertical-only physics body

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (negative = up)
    pub vel_y: f32,
    pub on_ground: bool,
}

impl Player {
    /// A player standing on the ground at the tuned x position
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.player_x, tuning.player_floor_y()),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            vel_y: 0.0,
            on_ground: true,
        }
    }

    /// Put the player back on the ground, at rest
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Launch upward. Ignored while airborne, so there is no double jump.
    ///
    /// Returns whether the jump happened.
    pub fn jump(&mut self, velocity: f32) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel_y = -velocity;
        self.on_ground = false;
        true
    }

    /// Semi-implicit Euler step followed by the ground clamp.
    ///
    /// A body still moving upward is never clamped, so a jump survives a
    /// zero-length step.
    pub fn integrate(&mut self, dt: f32, gravity: f32, floor_y: f32) {
        self.vel_y += gravity * dt;
        self.pos.y += self.vel_y * dt;
        if self.pos.y >= floor_y && self.vel_y >= 0.0 {
            self.pos.y = floor_y;
            self.vel_y = 0.0;
            self.on_ground = true;
        }
    }

    /// Collision box
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn floor() -> f32 {
        Tuning::default().player_floor_y()
    }

    #[test]
    fn test_starts_on_ground() {
        let player = Player::new(&Tuning::default());
        assert!(player.on_ground);
        assert_eq!(player.pos, Vec2::new(PLAYER_X, floor()));
        assert_eq!(player.vel_y, 0.0);
    }

    #[test]
    fn test_no_double_jump() {
        let mut player = Player::new(&Tuning::default());
        assert!(player.jump(JUMP_VELOCITY));
        assert_eq!(player.vel_y, -JUMP_VELOCITY);

        player.integrate(NOMINAL_DT, GRAVITY, floor());
        let vel_mid_air = player.vel_y;
        assert!(!player.jump(JUMP_VELOCITY));
        assert_eq!(player.vel_y, vel_mid_air);
    }

    #[test]
    fn test_jump_arc_lands() {
        let mut player = Player::new(&Tuning::default());
        player.jump(JUMP_VELOCITY);

        let mut apex = player.pos.y;
        let mut ticks = 0;
        while !player.on_ground {
            player.integrate(NOMINAL_DT, GRAVITY, floor());
            apex = apex.min(player.pos.y);
            ticks += 1;
            assert!(ticks < 1000, "player never landed");
        }

        // v²/2g ≈ 186px of lift
        let height = floor() - apex;
        assert!(height > 170.0 && height < 200.0, "jump height {height}");
        assert_eq!(player.pos.y, floor());
        assert_eq!(player.vel_y, 0.0);
    }

    #[test]
    fn test_jump_survives_zero_dt() {
        let mut player = Player::new(&Tuning::default());
        player.jump(JUMP_VELOCITY);
        player.integrate(0.0, GRAVITY, floor());
        assert!(!player.on_ground);
        assert_eq!(player.vel_y, -JUMP_VELOCITY);
    }

    #[test]
    fn test_zero_dt_is_noop_on_ground() {
        let mut player = Player::new(&Tuning::default());
        player.integrate(0.0, GRAVITY, floor());
        assert_eq!(player.pos.y, floor());
        assert!(player.on_ground);
    }

    proptest! {
        #[test]
        fn never_below_ground_during_arc(
            dts in proptest::collection::vec(0.0f32..MAX_FRAME_DT, 1..200),
        ) {
            let floor_y = floor();
            let mut player = Player::new(&Tuning::default());
            player.jump(JUMP_VELOCITY);

            for dt in dts {
                let was_airborne = !player.on_ground;
                player.integrate(dt, GRAVITY, floor_y);
                prop_assert!(player.pos.y <= floor_y);
                if was_airborne && player.on_ground {
                    // Landing tick: clamped and at rest
                    prop_assert_eq!(player.pos.y, floor_y);
                    prop_assert_eq!(player.vel_y, 0.0);
                }
            }
        }
    }
}
