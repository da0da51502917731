use std::time::Instant;

use super::model::{Macro, MacroStep};
use crate::input::KeyCode;

/// Shortest gap a recorded step can carry.
pub const MIN_RECORDED_DELAY_MS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Buffers timestamped steps between `start` and `stop`.
#[derive(Debug, Clone, Default)]
pub struct MacroRecorder {
    buffer: Vec<MacroStep>,
    last_event: Option<Instant>,
}

impl MacroRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.last_event.is_some()
    }

    pub fn recorded_steps(&self) -> usize {
        self.buffer.len()
    }

    pub fn steps(&self) -> &[MacroStep] {
        &self.buffer
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Begin recording; a second start while recording is ignored.
    pub fn start_at(&mut self, now: Instant) {
        if self.is_recording() {
            return;
        }
        self.buffer.clear();
        self.last_event = Some(now);
        log::debug!("Macro recording started");
    }

    pub fn record_key_press(&mut self, key: KeyCode) {
        self.record_key_press_at(key, Instant::now());
    }

    pub fn record_key_press_at(&mut self, key: KeyCode, at: Instant) {
        if let Some(delay_ms) = self.elapsed_since_last(at) {
            self.buffer.push(MacroStep::key_press(key, delay_ms));
        }
    }

    pub fn record_click(&mut self, button: MouseButton) {
        self.record_click_at(button, Instant::now());
    }

    pub fn record_click_at(&mut self, button: MouseButton, at: Instant) {
        if let Some(delay_ms) = self.elapsed_since_last(at) {
            let step = match button {
                MouseButton::Left => MacroStep::left_click(delay_ms),
                MouseButton::Right => MacroStep::right_click(delay_ms),
            };
            self.buffer.push(step);
        }
    }

    /// Package the buffer. Stopping while idle yields an empty macro.
    pub fn stop(&mut self, name: &str) -> Macro {
        if self.last_event.take().is_none() {
            return Macro::new(name, Vec::new());
        }
        let steps = std::mem::take(&mut self.buffer);
        log::debug!("Macro recording stopped: {} steps", steps.len());
        Macro::new(name, steps)
    }

    /// Drop everything recorded so far.
    pub fn cancel(&mut self) {
        self.last_event = None;
        self.buffer.clear();
    }

    fn elapsed_since_last(&mut self, at: Instant) -> Option<u32> {
        let last = self.last_event.as_mut()?;
        let elapsed = at.saturating_duration_since(*last).as_millis();
        *last = at;
        Some((elapsed.min(u32::MAX as u128) as u32).max(MIN_RECORDED_DELAY_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::model::MacroStepKind;
    use std::time::Duration;

    #[test]
    fn test_records_gaps_with_minimum() {
        let t0 = Instant::now();
        let mut rec = MacroRecorder::new();
        rec.start_at(t0);
        rec.record_key_press_at(KeyCode::A, t0 + Duration::from_millis(100));
        rec.record_click_at(MouseButton::Left, t0 + Duration::from_millis(110));
        rec.record_click_at(MouseButton::Right, t0 + Duration::from_millis(400));
        assert_eq!(rec.recorded_steps(), 3);

        let m = rec.stop("Test");
        let delays: Vec<u32> = m.steps.iter().map(|s| s.delay_ms).collect();
        assert_eq!(delays, vec![100, 50, 290]);
        assert_eq!(m.steps[1].kind, MacroStepKind::LeftClick);
        assert_eq!(m.total_duration_ms, 440);
        assert!(!rec.is_recording());
    }

    #[test]
    fn test_ignores_events_while_idle() {
        let mut rec = MacroRecorder::new();
        rec.record_key_press(KeyCode::Q);
        assert_eq!(rec.recorded_steps(), 0);
        assert!(rec.stop("Empty").is_empty());
    }

    #[test]
    fn test_cancel_discards() {
        let t0 = Instant::now();
        let mut rec = MacroRecorder::new();
        rec.start_at(t0);
        rec.record_key_press_at(KeyCode::E, t0 + Duration::from_millis(60));
        rec.cancel();
        assert!(!rec.is_recording());
        assert_eq!(rec.recorded_steps(), 0);
    }
}
