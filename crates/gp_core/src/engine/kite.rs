//! Ranged kiting loop
//!
//! Locking → Attacking → Retreating → Pivoting → Relocking → Attacking ...
//!
//! The right stick sets an aim vector; the last non-zero aim is kept for
//! phases that run with the stick centered. Retreat direction is frozen when
//! the retreat begins: X is the negated aim X, Y is the aim Y as-is, which in
//! screen space (+y down) points away from the aim.

use super::aim::{ensure_finite, AimVector, Cooldown, PixelAccumulator};
use super::config::KiteConfig;
use super::{AssistEngine, AssistInput};
use crate::error::EngineFault;
use crate::input::InputSink;

/// Aim speed multipliers per phase.
const LOCKING_AIM_SCALE: f32 = 1.5;
const ATTACKING_AIM_SCALE: f32 = 0.6;
const PIVOT_AIM_SCALE: f32 = 2.5;

/// Aim assumed before the stick has ever been deflected.
pub const INITIAL_AIM: AimVector = AimVector { x: 1.0, y: 0.0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KitePhase {
    #[default]
    Idle,
    Locking,
    Attacking,
    Retreating,
    Pivoting,
    Relocking,
}

impl KitePhase {
    pub fn label(self) -> &'static str {
        match self {
            KitePhase::Idle => "IDLE",
            KitePhase::Locking => "LOCKING",
            KitePhase::Attacking => "ATTACKING",
            KitePhase::Retreating => "RETREATING",
            KitePhase::Pivoting => "PIVOTING",
            KitePhase::Relocking => "RELOCKING",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KiteEngine {
    config: KiteConfig,
    phase: KitePhase,
    phase_timer: Cooldown,
    attack_cooldown: Cooldown,
    retreat_click: Cooldown,
    aim: AimVector,
    last_aim: AimVector,
    retreat_dir: (f32, f32),
    retreat_accum: PixelAccumulator,
    aim_accum: PixelAccumulator,
    attacks_this_cycle: u32,
    attacks_fired: u32,
    hold_ground: bool,
}

impl KiteEngine {
    pub fn new(config: KiteConfig) -> Self {
        Self { config, last_aim: INITIAL_AIM, ..Default::default() }
    }

    pub fn config(&self) -> &KiteConfig {
        &self.config
    }

    pub fn phase(&self) -> KitePhase {
        self.phase
    }

    /// Attack taps since the engine was toggled on.
    pub fn attacks_fired(&self) -> u32 {
        self.attacks_fired
    }

    pub fn last_aim(&self) -> AimVector {
        self.last_aim
    }

    /// Frozen retreat direction, unit length.
    pub fn retreat_direction(&self) -> (f32, f32) {
        self.retreat_dir
    }

    /// Start retreating now from any active phase.
    pub fn force_retreat(&mut self, sink: &mut dyn InputSink) {
        if self.phase == KitePhase::Idle {
            return;
        }
        self.begin_retreat(sink);
    }

    fn set_phase(&mut self, phase: KitePhase, duration_ms: u32) {
        self.phase = phase;
        self.phase_timer.start(duration_ms);
    }

    fn begin_retreat(&mut self, sink: &mut dyn InputSink) {
        let len = self.last_aim.length();
        self.retreat_dir = if len > 0.01 {
            (-self.last_aim.x / len, self.last_aim.y / len)
        } else {
            (-1.0, 0.0)
        };
        self.retreat_accum.reset();
        self.set_phase(KitePhase::Retreating, self.config.retreat_duration_ms);
        // Click-to-move right away, then on the retreat click period.
        sink.left_click();
        self.retreat_click.start(self.config.retreat_click_ms);
    }

    fn move_toward_aim(&mut self, speed: f32, sink: &mut dyn InputSink) {
        let aim = if self.aim.is_zero() { self.last_aim } else { self.aim };
        let (dx, dy) = aim.screen_delta(speed);
        self.aim_accum.emit(dx, dy, sink);
    }

    fn update_locking(&mut self, sink: &mut dyn InputSink) {
        self.move_toward_aim(self.config.aim_sensitivity * LOCKING_AIM_SCALE, sink);
        if self.phase_timer.ready() {
            sink.right_click();
            self.attacks_this_cycle = 0;
            self.set_phase(KitePhase::Attacking, 0);
        }
    }

    fn update_attacking(&mut self, sink: &mut dyn InputSink) {
        self.move_toward_aim(self.config.aim_sensitivity * ATTACKING_AIM_SCALE, sink);
        if self.attack_cooldown.ready() {
            sink.tap_key(self.config.attack_key);
            self.attack_cooldown.start(self.config.attack_interval_ms);
            self.attacks_this_cycle += 1;
            self.attacks_fired += 1;
        }
        if self.attacks_this_cycle >= self.config.attacks_before_retreat && !self.hold_ground {
            self.begin_retreat(sink);
        }
    }

    fn update_retreating(&mut self, tick_ms: u32, sink: &mut dyn InputSink) {
        if self.hold_ground {
            self.set_phase(KitePhase::Pivoting, self.config.pivot_duration_ms);
            return;
        }

        // Spread the configured cursor travel evenly over the retreat.
        let duration = self.config.retreat_duration_ms.max(1) as f32;
        let speed = self.config.retreat_cursor_dist * tick_ms as f32 / duration;
        let (dir_x, dir_y) = self.retreat_dir;
        self.retreat_accum.emit(dir_x * speed, dir_y * speed, sink);

        self.retreat_click.tick(tick_ms);
        if self.retreat_click.ready() {
            sink.left_click();
            self.retreat_click.start(self.config.retreat_click_ms);
        }

        if self.phase_timer.ready() {
            self.set_phase(KitePhase::Pivoting, self.config.pivot_duration_ms);
        }
    }

    fn update_pivoting(&mut self, sink: &mut dyn InputSink) {
        self.move_toward_aim(self.config.aim_sensitivity * PIVOT_AIM_SCALE, sink);
        if self.phase_timer.ready() {
            self.set_phase(KitePhase::Relocking, self.config.relock_delay_ms);
        }
    }

    fn update_relocking(&mut self, sink: &mut dyn InputSink) {
        if self.phase_timer.ready() {
            sink.right_click();
            self.attacks_this_cycle = 0;
            self.attack_cooldown.clear();
            self.set_phase(KitePhase::Attacking, 0);
        }
    }
}

impl AssistEngine for KiteEngine {
    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    fn is_active(&self) -> bool {
        self.phase != KitePhase::Idle
    }

    fn phase_label(&self) -> &'static str {
        self.phase.label()
    }

    fn toggle(&mut self) {
        let was_active = self.is_active();
        self.force_idle();
        if !was_active {
            self.set_phase(KitePhase::Locking, self.config.lock_delay_ms);
        }
    }

    fn force_idle(&mut self) {
        *self = Self::new(std::mem::take(&mut self.config));
    }

    fn update(
        &mut self,
        input: &AssistInput,
        tick_ms: u32,
        sink: &mut dyn InputSink,
    ) -> Result<(), EngineFault> {
        let right = ensure_finite(input.right)?;
        if self.phase == KitePhase::Idle {
            return Ok(());
        }
        self.hold_ground = input.r2_held;

        match AimVector::from_stick(right, self.config.aim_deadzone) {
            Some(aim) => {
                self.aim = aim;
                self.last_aim = aim;
            }
            None => self.aim = AimVector::ZERO,
        }

        if input.snap_pressed {
            sink.right_click();
            self.attacks_this_cycle = 0;
            self.set_phase(KitePhase::Attacking, 0);
        }

        self.phase_timer.tick(tick_ms);
        self.attack_cooldown.tick(tick_ms);

        // Manual retreat skips the attack-count threshold.
        if input.l2_held && matches!(self.phase, KitePhase::Attacking | KitePhase::Pivoting) {
            self.begin_retreat(sink);
            return Ok(());
        }

        match self.phase {
            KitePhase::Idle => {}
            KitePhase::Locking => self.update_locking(sink),
            KitePhase::Attacking => self.update_attacking(sink),
            KitePhase::Retreating => self.update_retreating(tick_ms, sink),
            KitePhase::Pivoting => self.update_pivoting(sink),
            KitePhase::Relocking => self.update_relocking(sink),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, KeyCode, RecordingSink, Stick};

    const TICK: u32 = 16;

    fn active_engine() -> KiteEngine {
        let mut engine = KiteEngine::new(KiteConfig { enabled: true, ..Default::default() });
        engine.toggle();
        engine
    }

    fn aim_right() -> AssistInput {
        AssistInput { right: Stick::new(1.0, 0.0), ..Default::default() }
    }

    /// Ticks until the phase changes, capped.
    fn ticks_until_change(engine: &mut KiteEngine, sink: &mut RecordingSink) -> u32 {
        let start = engine.phase();
        for n in 1..=500 {
            engine.update(&AssistInput::default(), TICK, sink).unwrap();
            if engine.phase() != start {
                return n;
            }
        }
        panic!("phase {:?} never changed", start);
    }

    #[test]
    fn test_full_kite_cycle() {
        let mut engine = active_engine();
        let mut sink = RecordingSink::new();
        assert_eq!(engine.phase(), KitePhase::Locking);

        // Aim once, then let go; last aim is kept.
        engine.update(&aim_right(), TICK, &mut sink).unwrap();
        assert!((engine.last_aim().x - 1.0).abs() < 1e-6);

        ticks_until_change(&mut engine, &mut sink);
        assert_eq!(engine.phase(), KitePhase::Attacking);

        sink.clear();
        ticks_until_change(&mut engine, &mut sink);
        assert_eq!(engine.phase(), KitePhase::Retreating);
        assert_eq!(sink.key_taps(KeyCode::Z), 3);
        assert_eq!(engine.retreat_direction(), (-1.0, 0.0));

        sink.clear();
        ticks_until_change(&mut engine, &mut sink);
        assert_eq!(engine.phase(), KitePhase::Pivoting);
        let (dx, dy) = sink.total_motion();
        assert!(dx <= -85 && dx >= -95, "retreat travel {}", dx);
        assert_eq!(dy, 0);
        assert!(sink.count(|e| *e == InputEvent::LeftClick) >= 3);

        ticks_until_change(&mut engine, &mut sink);
        assert_eq!(engine.phase(), KitePhase::Relocking);

        sink.clear();
        ticks_until_change(&mut engine, &mut sink);
        assert_eq!(engine.phase(), KitePhase::Attacking);
        assert_eq!(sink.events().last(), Some(&InputEvent::RightClick));
    }

    #[test]
    fn test_retreat_without_aim_history_goes_left() {
        let mut engine = active_engine();
        let mut sink = RecordingSink::new();
        ticks_until_change(&mut engine, &mut sink);
        ticks_until_change(&mut engine, &mut sink);
        assert_eq!(engine.phase(), KitePhase::Retreating);
        assert_eq!(engine.retreat_direction(), (-1.0, 0.0));

        sink.clear();
        ticks_until_change(&mut engine, &mut sink);
        let (dx, dy) = sink.total_motion();
        assert!(dx <= -85, "retreat travel {}", dx);
        assert_eq!(dy, 0);
    }

    #[test]
    fn test_retreat_y_keeps_aim_sign() {
        let mut engine = active_engine();
        let mut sink = RecordingSink::new();
        let up_left = AssistInput { right: Stick::new(-0.6, 0.8), ..Default::default() };
        engine.update(&up_left, TICK, &mut sink).unwrap();
        engine.force_retreat(&mut sink);
        let (x, y) = engine.retreat_direction();
        assert!(x > 0.0);
        assert!(y > 0.0);
    }

    #[test]
    fn test_hold_ground_keeps_attacking() {
        let mut engine = active_engine();
        let mut sink = RecordingSink::new();
        let hold = AssistInput { r2_held: true, ..aim_right() };
        for _ in 0..100 {
            engine.update(&hold, TICK, &mut sink).unwrap();
        }
        assert_eq!(engine.phase(), KitePhase::Attacking);
        assert!(engine.attacks_fired() > 3);
    }

    #[test]
    fn test_hold_ground_cuts_retreat_short() {
        let mut engine = active_engine();
        let mut sink = RecordingSink::new();
        engine.update(&aim_right(), TICK, &mut sink).unwrap();
        engine.force_retreat(&mut sink);
        let hold = AssistInput { r2_held: true, ..Default::default() };
        engine.update(&hold, TICK, &mut sink).unwrap();
        assert_eq!(engine.phase(), KitePhase::Pivoting);
    }

    #[test]
    fn test_manual_retreat_only_from_attacking_or_pivoting() {
        let mut engine = active_engine();
        let mut sink = RecordingSink::new();
        let retreat = AssistInput { l2_held: true, ..aim_right() };
        engine.update(&retreat, TICK, &mut sink).unwrap();
        assert_eq!(engine.phase(), KitePhase::Locking);

        let snap = AssistInput { snap_pressed: true, ..aim_right() };
        engine.update(&snap, TICK, &mut sink).unwrap();
        assert_eq!(engine.phase(), KitePhase::Attacking);
        engine.update(&retreat, TICK, &mut sink).unwrap();
        assert_eq!(engine.phase(), KitePhase::Retreating);
    }

    #[test]
    fn test_idle_engine_ignores_input() {
        let mut engine = KiteEngine::new(KiteConfig { enabled: true, ..Default::default() });
        let mut sink = RecordingSink::new();
        let snap = AssistInput { snap_pressed: true, ..aim_right() };
        engine.update(&snap, TICK, &mut sink).unwrap();
        assert_eq!(engine.phase(), KitePhase::Idle);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_toggle_off_on_resets() {
        let mut engine = active_engine();
        let mut sink = RecordingSink::new();
        let snap = AssistInput { snap_pressed: true, ..aim_right() };
        engine.update(&snap, TICK, &mut sink).unwrap();
        assert!(engine.attacks_fired() > 0);
        engine.toggle();
        engine.toggle();
        assert_eq!(engine.attacks_fired(), 0);
        assert_eq!(engine.last_aim(), INITIAL_AIM);
        assert_eq!(engine.phase(), KitePhase::Locking);
    }
}
