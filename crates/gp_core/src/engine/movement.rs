//! Left-stick movement
//!
//! Continuous-run mode holds the click-to-move button while the stick is out of
//! the deadzone and drifts the cursor in the stick direction. Classic mode only
//! moves the cursor.

use super::aim::{ensure_finite, PixelAccumulator};
use super::config::MovementConfig;
use crate::error::EngineFault;
use crate::input::{InputSink, Stick};

/// Low-pass factor applied to the stick direction each active tick.
pub const SMOOTH_FACTOR: f32 = 0.22;
/// Per-tick decay of the smoothed direction once the stick is released.
pub const RELEASE_DAMPING: f32 = 0.4;
/// Classic mode pixels per tick at full deflection, before sensitivity.
pub const CLASSIC_BASE_SPEED: f32 = 18.0;

#[derive(Debug, Clone)]
pub struct MovementEngine {
    config: MovementConfig,
    smooth_x: f32,
    smooth_y: f32,
    accum: PixelAccumulator,
    button_held: bool,
    idle_ticks: u32,
}

impl MovementEngine {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            config,
            smooth_x: 0.0,
            smooth_y: 0.0,
            accum: PixelAccumulator::default(),
            button_held: false,
            idle_ticks: 0,
        }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Swap settings; a held click-to-move button is released first.
    pub fn set_config(&mut self, config: MovementConfig, sink: &mut dyn InputSink) {
        self.reset(sink);
        self.config = config;
    }

    pub fn is_button_held(&self) -> bool {
        self.button_held
    }

    pub fn smoothed(&self) -> (f32, f32) {
        (self.smooth_x, self.smooth_y)
    }

    /// Advance one tick with the normalized left stick.
    pub fn update(&mut self, stick: Stick, sink: &mut dyn InputSink) -> Result<(), EngineFault> {
        let stick = ensure_finite(stick)?;
        let magnitude = stick.magnitude();
        let deadzone = self.config.deadzone;

        if magnitude < deadzone || magnitude == 0.0 {
            self.release(sink);
            self.smooth_x *= RELEASE_DAMPING;
            self.smooth_y *= RELEASE_DAMPING;
            return Ok(());
        }

        let rescaled = ((magnitude - deadzone) / (1.0 - deadzone)).clamp(0.0, 1.0);
        let eased = rescaled.powf(self.config.curve);
        let nx = stick.x / magnitude * eased;
        let ny = stick.y / magnitude * eased;

        self.smooth_x += (nx - self.smooth_x) * SMOOTH_FACTOR;
        self.smooth_y += (ny - self.smooth_y) * SMOOTH_FACTOR;

        if self.config.continuous_run {
            self.tick_continuous(eased, sink);
        } else {
            self.tick_classic(sink);
        }
        Ok(())
    }

    fn tick_continuous(&mut self, eased: f32, sink: &mut dyn InputSink) {
        if !self.button_held {
            sink.left_button_down();
            self.button_held = true;
            self.idle_ticks = 0;
        }

        let speed = self.config.run_speed * eased;
        let (dx, dy) = self.accum.push(self.smooth_x * speed, -self.smooth_y * speed);
        if dx != 0 || dy != 0 {
            sink.move_mouse_relative(dx, dy);
            self.idle_ticks = 0;
            return;
        }

        // A stationary cursor makes the game stop the character; re-press.
        self.idle_ticks += 1;
        if self.idle_ticks >= self.config.repress_after_ticks.max(1) {
            sink.left_button_up();
            sink.left_button_down();
            self.idle_ticks = 0;
        }
    }

    fn tick_classic(&mut self, sink: &mut dyn InputSink) {
        let speed = self.config.sensitivity * CLASSIC_BASE_SPEED;
        self.accum.emit(self.smooth_x * speed, -self.smooth_y * speed, sink);
    }

    fn release(&mut self, sink: &mut dyn InputSink) {
        if !self.button_held {
            return;
        }
        sink.left_button_up();
        self.button_held = false;
        self.idle_ticks = 0;
    }

    /// Release anything held and clear smoothing and carry.
    pub fn reset(&mut self, sink: &mut dyn InputSink) {
        self.release(sink);
        self.smooth_x = 0.0;
        self.smooth_y = 0.0;
        self.accum.reset();
        self.idle_ticks = 0;
    }
}

impl Default for MovementEngine {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, RecordingSink};

    fn run(engine: &mut MovementEngine, stick: Stick, ticks: usize, sink: &mut RecordingSink) {
        for _ in 0..ticks {
            engine.update(stick, sink).unwrap();
        }
    }

    #[test]
    fn test_continuous_run_holds_and_releases() {
        let mut engine = MovementEngine::default();
        let mut sink = RecordingSink::new();

        run(&mut engine, Stick::new(1.0, 0.0), 10, &mut sink);
        assert!(engine.is_button_held());
        assert_eq!(sink.count(|e| *e == InputEvent::LeftDown), 1);
        let (dx, dy) = sink.total_motion();
        assert!(dx > 0);
        assert_eq!(dy, 0);

        run(&mut engine, Stick::CENTER, 1, &mut sink);
        assert!(!engine.is_button_held());
        assert_eq!(sink.count(|e| *e == InputEvent::LeftUp), 1);
    }

    #[test]
    fn test_stick_up_moves_cursor_up() {
        let mut engine = MovementEngine::default();
        let mut sink = RecordingSink::new();
        run(&mut engine, Stick::new(0.0, 1.0), 20, &mut sink);
        assert!(sink.total_motion().1 < 0);
    }

    #[test]
    fn test_inside_deadzone_is_silent() {
        let mut engine = MovementEngine::default();
        let mut sink = RecordingSink::new();
        run(&mut engine, Stick::new(0.05, 0.05), 50, &mut sink);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_stationary_drift_represses() {
        let mut engine = MovementEngine::new(MovementConfig { run_speed: 0.0, ..Default::default() });
        let mut sink = RecordingSink::new();
        run(&mut engine, Stick::new(0.5, 0.0), 1 + 38, &mut sink);
        // Initial press plus one re-press after 38 motionless ticks.
        assert_eq!(sink.count(|e| *e == InputEvent::LeftDown), 2);
        assert_eq!(sink.count(|e| *e == InputEvent::LeftUp), 1);
    }

    #[test]
    fn test_classic_mode_never_clicks() {
        let cfg = MovementConfig { continuous_run: false, ..Default::default() };
        let mut engine = MovementEngine::new(cfg);
        let mut sink = RecordingSink::new();
        run(&mut engine, Stick::new(-1.0, 0.0), 30, &mut sink);
        assert!(sink.total_motion().0 < 0);
        assert!(sink.events().iter().all(|e| matches!(e, InputEvent::MoveMouse { .. })));
    }

    #[test]
    fn test_release_damps_smoothing() {
        let mut engine = MovementEngine::default();
        let mut sink = RecordingSink::new();
        run(&mut engine, Stick::new(1.0, 0.0), 5, &mut sink);
        let before = engine.smoothed().0;
        run(&mut engine, Stick::CENTER, 1, &mut sink);
        assert!((engine.smoothed().0 - before * RELEASE_DAMPING).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_input_is_a_fault() {
        let mut engine = MovementEngine::default();
        let mut sink = RecordingSink::new();
        assert!(engine.update(Stick::new(f32::NAN, 0.0), &mut sink).is_err());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_reset_releases_button() {
        let mut engine = MovementEngine::default();
        let mut sink = RecordingSink::new();
        run(&mut engine, Stick::new(1.0, 0.0), 3, &mut sink);
        engine.reset(&mut sink);
        assert!(!engine.is_button_held());
        assert_eq!(sink.events().last(), Some(&InputEvent::LeftUp));
    }
}
