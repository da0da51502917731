//! Controller snapshot contract
//!
//! A `ControllerSource` yields one hardware-shaped `RawPadState` per tick; the
//! orchestrator normalizes it into a `GamepadSnapshot`. `ScriptedSource` plays a
//! fixed timeline for tests and the headless harness.

use serde::{Deserialize, Serialize};

use super::buttons::{Button, ButtonSet};

/// Trigger magnitude above which a trigger counts as held (out of 255).
pub const TRIGGER_THRESHOLD: u8 = 50;

/// Hardware-shaped controller state for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawPadState {
    pub left_thumb_x: i16,
    pub left_thumb_y: i16,
    pub right_thumb_x: i16,
    pub right_thumb_y: i16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub buttons: ButtonSet,
}

impl RawPadState {
    /// Build a raw frame from normalized stick values (inverse of `normalize_axis`).
    pub fn from_normalized(
        left: Stick,
        right: Stick,
        left_trigger: u8,
        right_trigger: u8,
        buttons: ButtonSet,
    ) -> Self {
        Self {
            left_thumb_x: denormalize_axis(left.x),
            left_thumb_y: denormalize_axis(left.y),
            right_thumb_x: denormalize_axis(right.x),
            right_thumb_y: denormalize_axis(right.y),
            left_trigger,
            right_trigger,
            buttons,
        }
    }
}

/// Positive raw values divide by the max-positive, negative by the max-negative,
/// so both directions reach exactly ±1.
pub fn normalize_axis(raw: i16) -> f32 {
    if raw >= 0 {
        raw as f32 / 32767.0
    } else {
        raw as f32 / 32768.0
    }
}

fn denormalize_axis(value: f32) -> i16 {
    let v = if value.is_finite() { value.clamp(-1.0, 1.0) } else { 0.0 };
    if v >= 0.0 {
        (v * 32767.0).round() as i16
    } else {
        (v * 32768.0).round() as i16
    }
}

/// A 2D stick vector, components in [-1, 1], +y up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stick {
    pub x: f32,
    pub y: f32,
}

impl Stick {
    pub const CENTER: Stick = Stick { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Normalized per-tick controller snapshot. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GamepadSnapshot {
    pub left: Stick,
    pub right: Stick,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub buttons: ButtonSet,
}

impl GamepadSnapshot {
    pub fn from_raw(raw: &RawPadState) -> Self {
        Self {
            left: Stick::new(normalize_axis(raw.left_thumb_x), normalize_axis(raw.left_thumb_y)),
            right: Stick::new(
                normalize_axis(raw.right_thumb_x),
                normalize_axis(raw.right_thumb_y),
            ),
            left_trigger: raw.left_trigger,
            right_trigger: raw.right_trigger,
            buttons: raw.buttons,
        }
    }

    pub fn l2_held(&self) -> bool {
        self.left_trigger > TRIGGER_THRESHOLD
    }

    pub fn r2_held(&self) -> bool {
        self.right_trigger > TRIGGER_THRESHOLD
    }

    pub fn pressed(&self, button: Button) -> bool {
        self.buttons.contains(button)
    }
}

/// External controller acquisition.
pub trait ControllerSource {
    fn is_connected(&self) -> bool;

    /// Read the current frame; `None` means the controller is gone.
    fn read(&mut self) -> Option<RawPadState>;

    fn name(&self) -> &str {
        "Controller"
    }
}

/// One segment of a scripted timeline, held for `hold_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptFrame {
    pub hold_ms: u32,
    pub left: Stick,
    pub right: Stick,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub buttons: Vec<Button>,
}

impl Default for ScriptFrame {
    fn default() -> Self {
        Self {
            hold_ms: 16,
            left: Stick::CENTER,
            right: Stick::CENTER,
            left_trigger: 0,
            right_trigger: 0,
            buttons: Vec::new(),
        }
    }
}

impl ScriptFrame {
    pub fn to_raw(&self) -> RawPadState {
        RawPadState::from_normalized(
            self.left,
            self.right,
            self.left_trigger,
            self.right_trigger,
            self.buttons.iter().copied().collect(),
        )
    }
}

/// Plays a scripted timeline tick by tick, then reports disconnection.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    ticks: Vec<RawPadState>,
    cursor: usize,
}

impl ScriptedSource {
    /// Expand frames into ticks; each frame lasts at least one tick.
    pub fn from_frames(frames: &[ScriptFrame], tick_ms: u32) -> Self {
        let tick_ms = tick_ms.max(1);
        let mut ticks = Vec::new();
        for frame in frames {
            let count = frame.hold_ms.div_ceil(tick_ms).max(1);
            let raw = frame.to_raw();
            ticks.extend(std::iter::repeat(raw).take(count as usize));
        }
        Self { ticks, cursor: 0 }
    }

    pub fn from_states(ticks: Vec<RawPadState>) -> Self {
        Self { ticks, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.ticks.len() - self.cursor
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

impl ControllerSource for ScriptedSource {
    fn is_connected(&self) -> bool {
        self.cursor < self.ticks.len()
    }

    fn read(&mut self) -> Option<RawPadState> {
        let state = self.ticks.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(state)
    }

    fn name(&self) -> &str {
        "Scripted Controller"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_axis_reaches_both_extremes() {
        assert_eq!(normalize_axis(i16::MAX), 1.0);
        assert_eq!(normalize_axis(i16::MIN), -1.0);
        assert_eq!(normalize_axis(0), 0.0);
    }

    #[test]
    fn test_trigger_threshold_is_exclusive() {
        let mut snap = GamepadSnapshot::default();
        snap.left_trigger = TRIGGER_THRESHOLD;
        assert!(!snap.l2_held());
        snap.left_trigger = TRIGGER_THRESHOLD + 1;
        assert!(snap.l2_held());
    }

    #[test]
    fn test_scripted_source_expands_and_disconnects() {
        let frames = vec![
            ScriptFrame { hold_ms: 32, buttons: vec![Button::A], ..Default::default() },
            ScriptFrame { hold_ms: 10, ..Default::default() },
        ];
        let mut source = ScriptedSource::from_frames(&frames, 16);
        assert_eq!(source.len(), 3);
        assert!(source.read().unwrap().buttons.contains(Button::A));
        assert!(source.read().unwrap().buttons.contains(Button::A));
        assert!(source.read().unwrap().buttons.is_empty());
        assert!(!source.is_connected());
        assert!(source.read().is_none());
    }

    #[test]
    fn test_from_normalized_round_trip_is_close() {
        let raw = RawPadState::from_normalized(
            Stick::new(0.5, -0.25),
            Stick::new(-1.0, 1.0),
            0,
            255,
            ButtonSet::EMPTY,
        );
        let snap = GamepadSnapshot::from_raw(&raw);
        assert!((snap.left.x - 0.5).abs() < 1e-4);
        assert!((snap.left.y + 0.25).abs() < 1e-4);
        assert_eq!(snap.right.x, -1.0);
        assert_eq!(snap.right.y, 1.0);
        assert!(snap.r2_held());
    }
}
