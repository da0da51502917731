//! Shared per-tick helpers for the stick-driven engines
//!
//! - `AimVector`: deadzone-rescaled stick direction
//! - `PixelAccumulator`: sub-pixel carry for relative cursor moves
//! - `Cooldown`: millisecond countdown advanced by the tick
//! - `DeferredKey`: click-then-key settle step, advanced by the tick instead of sleeping

use crate::error::EngineFault;
use crate::input::{InputSink, KeyCode, Stick};

/// Reject NaN/inf stick input before it reaches any accumulator.
pub fn ensure_finite(stick: Stick) -> Result<Stick, EngineFault> {
    if stick.is_finite() {
        Ok(stick)
    } else {
        Err(EngineFault::NonFiniteInput { x: stick.x, y: stick.y })
    }
}

/// Press edge: up last tick, down now.
#[inline]
pub fn rising(prev: bool, now: bool) -> bool {
    now && !prev
}

/// Stick direction with the deadzone removed; magnitude rescaled to (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AimVector {
    pub x: f32,
    pub y: f32,
}

impl AimVector {
    pub const ZERO: AimVector = AimVector { x: 0.0, y: 0.0 };

    /// `None` inside the deadzone.
    pub fn from_stick(stick: Stick, deadzone: f32) -> Option<Self> {
        let mag = stick.magnitude();
        if mag <= deadzone {
            return None;
        }
        let norm = ((mag - deadzone) / (1.0 - deadzone)).min(1.0);
        Some(Self { x: stick.x / mag * norm, y: stick.y / mag * norm })
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Screen-space delta: stick +y is up, screen +y is down.
    pub fn screen_delta(self, speed: f32) -> (f32, f32) {
        (self.x * speed, -self.y * speed)
    }
}

/// Carries fractional pixels across ticks so slow motion is not lost.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelAccumulator {
    x: f32,
    y: f32,
}

impl PixelAccumulator {
    /// Add a fractional delta and return the whole pixels ready to emit.
    pub fn push(&mut self, dx: f32, dy: f32) -> (i32, i32) {
        self.x += dx;
        self.y += dy;
        let mx = self.x.trunc();
        let my = self.y.trunc();
        self.x -= mx;
        self.y -= my;
        (mx as i32, my as i32)
    }

    /// Push and emit the move in one step.
    pub fn emit(&mut self, dx: f32, dy: f32, sink: &mut dyn InputSink) {
        let (mx, my) = self.push(dx, dy);
        if mx != 0 || my != 0 {
            sink.move_mouse_relative(mx, my);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn pending(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Millisecond countdown; ready at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cooldown {
    remaining_ms: u32,
}

impl Cooldown {
    pub fn start(&mut self, ms: u32) {
        self.remaining_ms = ms;
    }

    pub fn tick(&mut self, tick_ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(tick_ms);
    }

    pub fn ready(&self) -> bool {
        self.remaining_ms == 0
    }

    pub fn clear(&mut self) {
        self.remaining_ms = 0;
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }
}

/// A key tap waiting for its settle time after a click.
///
/// The click is issued by the caller; the tap goes out on the first tick at
/// which the settle time has elapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeferredKey {
    pending: Option<(KeyCode, u32)>,
}

impl DeferredKey {
    /// Queue `key`. A zero settle time taps immediately.
    pub fn arm(&mut self, key: KeyCode, settle_ms: u32, sink: &mut dyn InputSink) {
        if settle_ms == 0 {
            sink.tap_key(key);
            self.pending = None;
        } else {
            self.pending = Some((key, settle_ms));
        }
    }

    /// Returns true on the tick the key is tapped.
    pub fn advance(&mut self, tick_ms: u32, sink: &mut dyn InputSink) -> bool {
        let Some((key, remaining)) = self.pending else {
            return false;
        };
        if remaining <= tick_ms {
            sink.tap_key(key);
            self.pending = None;
            true
        } else {
            self.pending = Some((key, remaining - tick_ms));
            false
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, RecordingSink};

    #[test]
    fn test_aim_vector_deadzone_and_rescale() {
        assert!(AimVector::from_stick(Stick::new(0.1, 0.1), 0.2).is_none());
        let full = AimVector::from_stick(Stick::new(1.0, 0.0), 0.2).unwrap();
        assert!((full.x - 1.0).abs() < 1e-6);
        let half = AimVector::from_stick(Stick::new(0.0, 0.6), 0.2).unwrap();
        assert!((half.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_screen_delta_flips_y() {
        let aim = AimVector { x: 0.5, y: 1.0 };
        assert_eq!(aim.screen_delta(10.0), (5.0, -10.0));
    }

    #[test]
    fn test_accumulator_carries_fraction() {
        let mut acc = PixelAccumulator::default();
        let mut total = 0;
        for _ in 0..10 {
            total += acc.push(0.3, 0.0).0;
        }
        assert_eq!(total, 3);
        assert!(acc.pending().0 < 1.0);
    }

    #[test]
    fn test_accumulator_negative_direction() {
        let mut acc = PixelAccumulator::default();
        assert_eq!(acc.push(-0.6, 0.0), (0, 0));
        assert_eq!(acc.push(-0.6, 0.0), (-1, 0));
    }

    #[test]
    fn test_cooldown_saturates() {
        let mut cd = Cooldown::default();
        cd.start(20);
        cd.tick(16);
        assert!(!cd.ready());
        cd.tick(16);
        assert!(cd.ready());
        assert_eq!(cd.remaining_ms(), 0);
    }

    #[test]
    fn test_deferred_key_waits_for_settle() {
        let mut sink = RecordingSink::new();
        let mut deferred = DeferredKey::default();
        deferred.arm(KeyCode::Z, 20, &mut sink);
        assert!(sink.events().is_empty());
        assert!(!deferred.advance(16, &mut sink));
        assert!(deferred.advance(16, &mut sink));
        assert_eq!(sink.events(), &[InputEvent::TapKey { key: KeyCode::Z }]);
        assert!(!deferred.is_pending());
    }

    #[test]
    fn test_deferred_key_cancel() {
        let mut sink = RecordingSink::new();
        let mut deferred = DeferredKey::default();
        deferred.arm(KeyCode::C, 30, &mut sink);
        deferred.cancel();
        assert!(!deferred.advance(100, &mut sink));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite(Stick::new(0.5, -0.5)).is_ok());
        assert!(matches!(
            ensure_finite(Stick::new(f32::NAN, 0.0)),
            Err(EngineFault::NonFiniteInput { .. })
        ));
    }
}
