//! Frame driver
//!
//! Owns the game state and drives one frame per display refresh:
//! clamp the frame delta, scroll and draw the backdrop, step the simulation
//! while a run is active, draw the scene, update the HUD. The platform asks
//! for another frame only while [`FrameDriver::frame`] says so.

use crate::backdrop::Backdrop;
use crate::present::{Hud, Renderer};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, SessionPhase, TickInput, autopilot, tick};

/// External input, independent of the device that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Jump,
    Restart,
}

/// Whether the platform should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Halt,
}

/// Turns frame timestamps into clamped deltas
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    /// Seconds since the previous frame, clamped to `[0, max_dt]`.
    ///
    /// The first frame after construction or [`pause`](Self::pause) is 0.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }

    /// Forget the last timestamp so a stall isn't counted as frame time
    pub fn pause(&mut self) {
        self.last_ms = None;
    }
}

pub struct FrameDriver<R: Renderer, H: Hud> {
    state: GameState,
    backdrop: Backdrop,
    settings: Settings,
    clock: FrameClock,
    pending: TickInput,
    /// A frame is scheduled or the loop is running
    scheduled: bool,
    /// Let the demo autopilot press jump
    pub autopilot: bool,
    renderer: R,
    hud: H,
}

impl<R: Renderer, H: Hud> FrameDriver<R, H> {
    pub fn new(state: GameState, settings: Settings, renderer: R, hud: H) -> Self {
        // Scenery gets its own stream so cosmetics never shift gameplay RNG
        let backdrop = Backdrop::new(state.seed ^ 0x9E37_79B9_7F4A_7C15, &state.tuning);
        let clock = FrameClock::new(state.tuning.max_frame_dt);
        Self {
            state,
            backdrop,
            settings,
            clock,
            pending: TickInput::default(),
            scheduled: false,
            autopilot: false,
            renderer,
            hud,
        }
    }

    /// Queue a command for the next frame.
    ///
    /// Commands that can't apply in the current phase are dropped. Returns
    /// true when the loop is halted and the caller must schedule a frame.
    pub fn command(&mut self, command: Command) -> bool {
        let phase = self.state.phase;
        let accepted = match command {
            Command::Start => phase != SessionPhase::Running,
            Command::Restart => phase == SessionPhase::Ended,
            Command::Jump => phase == SessionPhase::Running,
        };
        if !accepted {
            return false;
        }

        self.pending.merge(TickInput {
            start: command == Command::Start,
            jump: command == Command::Jump,
            restart: command == Command::Restart,
        });
        self.request_frame()
    }

    /// Mark a frame as requested. Returns false if one already is, so the
    /// platform never runs two loops at once.
    pub fn request_frame(&mut self) -> bool {
        !std::mem::replace(&mut self.scheduled, true)
    }

    /// Run one frame at timestamp `now_ms` (milliseconds, monotonic)
    pub fn frame(&mut self, now_ms: f64) -> FrameControl {
        let dt = self.clock.delta(now_ms);
        let mut input = std::mem::take(&mut self.pending);
        if self.autopilot && autopilot::should_jump(&self.state) {
            input.jump = true;
        }

        if self.settings.effective_parallax() {
            self.backdrop.advance(dt, self.state.difficulty.speed);
        }
        self.renderer.draw_background(&self.backdrop);

        for event in tick(&mut self.state, &input, dt) {
            self.handle_event(event);
        }

        self.renderer.draw_obstacles(&self.state.field.obstacles);
        self.renderer.draw_player(&self.state.player);
        self.renderer.present();
        self.hud
            .show_score(self.state.display_score(), self.state.best_score());

        if self.state.is_running() {
            FrameControl::Continue
        } else {
            self.scheduled = false;
            self.clock.pause();
            FrameControl::Halt
        }
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Started { .. } => self.hud.hide_overlay(),
            GameEvent::Crashed {
                score,
                best,
                new_best,
            } => self.hud.show_game_over(score, best, new_best),
            GameEvent::Jumped => log::trace!("Jump at tick {}", self.state.time_ticks),
            GameEvent::ObstacleSpawned { width, height } => log::trace!(
                "Obstacle {}x{} at tick {}",
                width,
                height,
                self.state.time_ticks
            ),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    /// True while the loop is running or a frame has been requested
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }
}
