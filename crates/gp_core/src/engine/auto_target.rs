//! Melee auto-target
//!
//! Seeking taps the game's target-cycle key once and assumes the nearest
//! target got selected; Engaged waits briefly, then Attacking taps the attack
//! key on an interval and re-asserts the lock with a periodic right-click.
//! The right stick aims the cursor even while Idle, and a snap right-clicks
//! whatever is under it.

use super::aim::{ensure_finite, AimVector, Cooldown, PixelAccumulator};
use super::config::AutoTargetConfig;
use super::{AssistEngine, AssistInput};
use crate::error::EngineFault;
use crate::input::InputSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetPhase {
    #[default]
    Idle,
    Seeking,
    Engaged,
    Attacking,
}

impl TargetPhase {
    pub fn label(self) -> &'static str {
        match self {
            TargetPhase::Idle => "IDLE",
            TargetPhase::Seeking => "SEEKING TARGET",
            TargetPhase::Engaged => "TARGET LOCKED",
            TargetPhase::Attacking => "AUTO-ATTACKING",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AutoTargetEngine {
    config: AutoTargetConfig,
    phase: TargetPhase,
    target_locked: bool,
    tab_cooldown: Cooldown,
    attack_cooldown: Cooldown,
    relock_cooldown: Cooldown,
    select_cooldown: Cooldown,
    engaged_ms: u32,
    seek_cycles: u32,
    attacks_fired: u32,
    aim_accum: PixelAccumulator,
}

impl AutoTargetEngine {
    pub fn new(config: AutoTargetConfig) -> Self {
        Self { config, ..Default::default() }
    }

    pub fn config(&self) -> &AutoTargetConfig {
        &self.config
    }

    pub fn phase(&self) -> TargetPhase {
        self.phase
    }

    pub fn is_target_locked(&self) -> bool {
        self.target_locked
    }

    pub fn attacks_fired(&self) -> u32 {
        self.attacks_fired
    }

    /// Immediate target-cycle press, ignoring the cycle cooldown.
    pub fn manual_retarget(&mut self, sink: &mut dyn InputSink) {
        if self.phase == TargetPhase::Idle {
            return;
        }
        self.tab_cooldown.clear();
        self.tab_cycle(sink);
    }

    /// The current target died or left range.
    pub fn on_target_lost(&mut self) {
        self.target_locked = false;
        if self.phase == TargetPhase::Idle {
            return;
        }
        if self.config.auto_retarget {
            self.tab_cooldown.start(self.config.retarget_delay_ms);
            self.set_phase(TargetPhase::Seeking);
        } else {
            self.set_phase(TargetPhase::Idle);
        }
    }

    fn on_target_locked(&mut self) {
        self.target_locked = true;
        self.seek_cycles = 0;
        self.engaged_ms = 0;
        self.set_phase(TargetPhase::Engaged);
    }

    fn tab_cycle(&mut self, sink: &mut dyn InputSink) {
        sink.tap_key(self.config.cycle_key);
        self.tab_cooldown.start(self.config.tab_cycle_ms);
    }

    fn set_phase(&mut self, phase: TargetPhase) {
        self.phase = phase;
    }

    fn update_seeking(&mut self, sink: &mut dyn InputSink) {
        if !self.config.auto_retarget || !self.tab_cooldown.ready() {
            return;
        }
        self.tab_cycle(sink);
        self.seek_cycles += 1;
        // One cycle press selects the nearest target.
        if self.seek_cycles >= 1 {
            self.on_target_locked();
        }
    }

    fn update_engaged(&mut self, tick_ms: u32) {
        self.engaged_ms = self.engaged_ms.saturating_add(tick_ms);
        if self.config.auto_attack && self.engaged_ms >= self.config.engage_delay_ms {
            self.set_phase(TargetPhase::Attacking);
        }
    }

    fn update_attacking(&mut self, sink: &mut dyn InputSink) {
        if self.attack_cooldown.ready() {
            sink.tap_key(self.config.attack_key);
            self.attack_cooldown.start(self.config.attack_interval_ms);
            self.attacks_fired += 1;
        }
        if self.relock_cooldown.ready() {
            sink.right_click();
            self.relock_cooldown.start(self.config.relock_interval_ms);
        }
    }
}

impl AssistEngine for AutoTargetEngine {
    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    fn is_active(&self) -> bool {
        self.phase != TargetPhase::Idle
    }

    fn phase_label(&self) -> &'static str {
        self.phase.label()
    }

    fn toggle(&mut self) {
        if self.phase == TargetPhase::Idle {
            self.force_idle();
            self.set_phase(TargetPhase::Seeking);
        } else {
            self.force_idle();
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

        self.tab_cooldown.tick(tick_ms);
        self.attack_cooldown.tick(tick_ms);
        self.relock_cooldown.tick(tick_ms);
        self.select_cooldown.tick(tick_ms);

        let aim = AimVector::from_stick(right, self.config.aim_deadzone);
        if let Some(aim) = aim {
            let (dx, dy) = aim.screen_delta(self.config.aim_sensitivity);
            self.aim_accum.emit(dx, dy, sink);
        }

        if input.snap_pressed {
            sink.right_click();
            self.on_target_locked();
        }

        // Shoulder + stick: aim-then-select with a slower click.
        if input.shoulder_held && aim.is_some() && self.select_cooldown.ready() {
            sink.left_click();
            self.select_cooldown.start(self.config.directional_select_ms);
        }

        match self.phase {
            TargetPhase::Idle => {}
            TargetPhase::Seeking => self.update_seeking(sink),
            TargetPhase::Engaged => self.update_engaged(tick_ms),
            TargetPhase::Attacking => self.update_attacking(sink),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, KeyCode, RecordingSink, Stick};

    const TICK: u32 = 16;

    fn enabled() -> AutoTargetEngine {
        AutoTargetEngine::new(AutoTargetConfig { enabled: true, ..Default::default() })
    }

    fn run(engine: &mut AutoTargetEngine, input: AssistInput, ticks: u32, sink: &mut RecordingSink) {
        for _ in 0..ticks {
            engine.update(&input, TICK, sink).unwrap();
        }
    }

    #[test]
    fn test_seek_engage_attack() {
        let mut engine = enabled();
        let mut sink = RecordingSink::new();
        engine.toggle();
        assert_eq!(engine.phase(), TargetPhase::Seeking);

        run(&mut engine, AssistInput::default(), 1, &mut sink);
        assert_eq!(engine.phase(), TargetPhase::Engaged);
        assert_eq!(sink.key_taps(KeyCode::TAB), 1);

        // 150 ms engage delay: 10 ticks reach 160 ms
        run(&mut engine, AssistInput::default(), 9, &mut sink);
        assert_eq!(engine.phase(), TargetPhase::Engaged);
        run(&mut engine, AssistInput::default(), 1, &mut sink);
        assert_eq!(engine.phase(), TargetPhase::Attacking);

        sink.clear();
        // 60 ms interval over 960 ms: ticks 0, 4, 8, ... → 15 taps, one relock click
        run(&mut engine, AssistInput::default(), 60, &mut sink);
        assert_eq!(sink.key_taps(KeyCode::Z), 15);
        assert_eq!(sink.count(|e| *e == InputEvent::RightClick), 1);
    }

    #[test]
    fn test_snap_locks_from_any_phase() {
        let mut engine = enabled();
        let mut sink = RecordingSink::new();
        let snap = AssistInput { snap_pressed: true, ..Default::default() };
        engine.update(&snap, TICK, &mut sink).unwrap();
        assert_eq!(engine.phase(), TargetPhase::Engaged);
        assert!(engine.is_target_locked());
        assert_eq!(sink.events(), &[InputEvent::RightClick]);
    }

    #[test]
    fn test_target_lost_reseeks_after_delay() {
        let mut engine = enabled();
        let mut sink = RecordingSink::new();
        engine.toggle();
        run(&mut engine, AssistInput::default(), 20, &mut sink);
        engine.on_target_lost();
        assert_eq!(engine.phase(), TargetPhase::Seeking);

        sink.clear();
        // 300 ms pause: no cycle press for 18 ticks, then one on the 19th
        run(&mut engine, AssistInput::default(), 18, &mut sink);
        assert_eq!(sink.key_taps(KeyCode::TAB), 0);
        run(&mut engine, AssistInput::default(), 1, &mut sink);
        assert_eq!(sink.key_taps(KeyCode::TAB), 1);
        assert_eq!(engine.phase(), TargetPhase::Engaged);
    }

    #[test]
    fn test_target_lost_without_retarget_goes_idle() {
        let mut engine = AutoTargetEngine::new(AutoTargetConfig {
            enabled: true,
            auto_retarget: false,
            ..Default::default()
        });
        let mut sink = RecordingSink::new();
        engine.update(&AssistInput { snap_pressed: true, ..Default::default() }, TICK, &mut sink)
            .unwrap();
        engine.on_target_lost();
        assert_eq!(engine.phase(), TargetPhase::Idle);
    }

    #[test]
    fn test_directional_select_is_rate_limited() {
        let mut engine = enabled();
        let mut sink = RecordingSink::new();
        let input = AssistInput {
            right: Stick::new(1.0, 0.0),
            shoulder_held: true,
            ..Default::default()
        };
        // 200 ms limit over 400 ms → clicks at 0 and ~208 ms
        run(&mut engine, input, 25, &mut sink);
        assert_eq!(sink.count(|e| *e == InputEvent::LeftClick), 2);
        assert!(sink.total_motion().0 > 0);
    }

    #[test]
    fn test_manual_retarget_ignores_cooldown() {
        let mut engine = enabled();
        let mut sink = RecordingSink::new();
        engine.manual_retarget(&mut sink);
        assert!(sink.events().is_empty());
        engine.toggle();
        engine.manual_retarget(&mut sink);
        engine.manual_retarget(&mut sink);
        assert_eq!(sink.key_taps(KeyCode::TAB), 2);
    }

    #[test]
    fn test_toggle_off_on_resets_counters() {
        let mut engine = enabled();
        let mut sink = RecordingSink::new();
        engine.toggle();
        run(&mut engine, AssistInput::default(), 40, &mut sink);
        assert!(engine.attacks_fired() > 0);
        engine.toggle();
        engine.toggle();
        assert_eq!(engine.attacks_fired(), 0);
        assert_eq!(engine.phase(), TargetPhase::Seeking);
        assert!(engine.is_enabled());
    }

    #[test]
    fn test_nan_stick_is_fault() {
        let mut engine = enabled();
        let mut sink = RecordingSink::new();
        let input = AssistInput { right: Stick::new(f32::NAN, 1.0), ..Default::default() };
        assert!(engine.update(&input, TICK, &mut sink).is_err());
    }
}
