//! Party support
//!
//! Targeting mode aims at party members and heals on snap (right-click to
//! select, settle, heal key). Ground mode, selected while R2 is held, places
//! Sanctuary on snap instead. The shoulder button cycles party members, and
//! an optional timer sweeps the party on its own.
//!
//! Self-heal, resurrection, sanctuary and auto-cycle are single-shot phases:
//! they show for one tick and fall back to TargetingParty on the next.

use super::aim::{ensure_finite, AimVector, Cooldown, DeferredKey, PixelAccumulator};
use super::config::SupportConfig;
use super::{AssistEngine, AssistInput};
use crate::error::EngineFault;
use crate::input::InputSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SupportMode {
    #[default]
    Targeting,
    GroundTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SupportPhase {
    #[default]
    Idle,
    TargetingParty,
    Healing,
    SelfHealing,
    Rezzing,
    PlacingSanctuary,
    AutoCycling,
}

impl SupportPhase {
    pub fn label(self) -> &'static str {
        match self {
            SupportPhase::Idle => "IDLE",
            SupportPhase::TargetingParty => "TARGETING PARTY",
            SupportPhase::Healing => "HEALING",
            SupportPhase::SelfHealing => "SELF-HEAL",
            SupportPhase::Rezzing => "RESURRECTION",
            SupportPhase::PlacingSanctuary => "SANCTUARY",
            SupportPhase::AutoCycling => "AUTO-CYCLE",
        }
    }

    fn is_single_shot(self) -> bool {
        matches!(
            self,
            SupportPhase::SelfHealing
                | SupportPhase::Rezzing
                | SupportPhase::PlacingSanctuary
                | SupportPhase::AutoCycling
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct SupportEngine {
    config: SupportConfig,
    mode: SupportMode,
    phase: SupportPhase,
    heal_cooldown: Cooldown,
    tab_cooldown: Cooldown,
    auto_cycle_ms: u32,
    settle_key: DeferredKey,
    aim_accum: PixelAccumulator,
    has_target: bool,
    heal_count: u32,
    rezz_count: u32,
}

impl SupportEngine {
    pub fn new(config: SupportConfig) -> Self {
        Self { config, ..Default::default() }
    }

    pub fn config(&self) -> &SupportConfig {
        &self.config
    }

    pub fn mode(&self) -> SupportMode {
        self.mode
    }

    pub fn phase(&self) -> SupportPhase {
        self.phase
    }

    pub fn has_target(&self) -> bool {
        self.has_target
    }

    pub fn heal_count(&self) -> u32 {
        self.heal_count
    }

    pub fn rezz_count(&self) -> u32 {
        self.rezz_count
    }

    pub fn reset_counters(&mut self) {
        self.heal_count = 0;
        self.rezz_count = 0;
    }

    /// Resurrection on the current target. Counted even while idle; the
    /// phase only shows when the engine is active.
    pub fn cast_rezz(&mut self, sink: &mut dyn InputSink) {
        sink.tap_key(self.config.rezz_key);
        self.rezz_count += 1;
        if self.is_active() {
            self.phase = SupportPhase::Rezzing;
        }
    }

    fn aim_params(&self) -> (f32, f32) {
        match self.mode {
            SupportMode::GroundTarget => {
                (self.config.ground_aim_sensitivity, self.config.ground_aim_deadzone)
            }
            SupportMode::Targeting => {
                (self.config.target_aim_sensitivity, self.config.target_aim_deadzone)
            }
        }
    }

    fn snap_heal(&mut self, sink: &mut dyn InputSink) {
        sink.right_click();
        self.has_target = true;
        self.settle_key.arm(self.config.heal_key, self.config.heal_settle_ms, sink);
        self.heal_count += 1;
        self.heal_cooldown.start(self.config.heal_lock_ms);
        self.phase = SupportPhase::Healing;
    }

    fn place_sanctuary(&mut self, sink: &mut dyn InputSink) {
        sink.left_click();
        self.settle_key.arm(self.config.sanctuary_key, self.config.sanctuary_settle_ms, sink);
        self.phase = SupportPhase::PlacingSanctuary;
    }

    fn self_heal(&mut self, sink: &mut dyn InputSink) {
        sink.tap_key(self.config.self_heal_key);
        self.heal_count += 1;
        self.phase = SupportPhase::SelfHealing;
    }

    fn tab_cycle(&mut self, sink: &mut dyn InputSink) {
        sink.tap_key(self.config.cycle_key);
        self.tab_cooldown.start(self.config.tab_cycle_ms);
        self.has_target = true;
    }
}

impl AssistEngine for SupportEngine {
    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    fn is_active(&self) -> bool {
        self.phase != SupportPhase::Idle
    }

    fn phase_label(&self) -> &'static str {
        self.phase.label()
    }

    fn toggle(&mut self) {
        let was_active = self.is_active();
        self.force_idle();
        if !was_active {
            self.phase = SupportPhase::TargetingParty;
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
        if self.phase == SupportPhase::Idle {
            return Ok(());
        }
        let entry_phase = self.phase;

        self.settle_key.advance(tick_ms, sink);
        self.mode = if input.r2_held { SupportMode::GroundTarget } else { SupportMode::Targeting };

        let (sensitivity, deadzone) = self.aim_params();
        if let Some(aim) = AimVector::from_stick(right, deadzone) {
            let (dx, dy) = aim.screen_delta(sensitivity);
            self.aim_accum.emit(dx, dy, sink);
        }

        self.heal_cooldown.tick(tick_ms);
        self.tab_cooldown.tick(tick_ms);
        self.auto_cycle_ms = self.auto_cycle_ms.saturating_add(tick_ms);

        if input.self_heal_pressed {
            self.self_heal(sink);
        }

        if input.snap_pressed {
            match self.mode {
                SupportMode::GroundTarget => self.place_sanctuary(sink),
                SupportMode::Targeting => self.snap_heal(sink),
            }
        }

        if input.shoulder_pressed && self.tab_cooldown.ready() {
            self.tab_cycle(sink);
        }

        if self.config.auto_cycle && self.auto_cycle_ms >= self.config.auto_cycle_interval_ms {
            self.auto_cycle_ms = 0;
            self.tab_cycle(sink);
            self.phase = SupportPhase::AutoCycling;
        }

        // A phase entered this tick is shown for at least one status read.
        if self.phase != entry_phase {
            return Ok(());
        }
        match self.phase {
            SupportPhase::Healing if self.heal_cooldown.ready() => {
                self.phase = SupportPhase::TargetingParty;
            }
            phase if phase.is_single_shot() => self.phase = SupportPhase::TargetingParty,
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, KeyCode, RecordingSink, Stick};

    const TICK: u32 = 16;

    fn active_engine(config: SupportConfig) -> SupportEngine {
        let mut engine = SupportEngine::new(SupportConfig { enabled: true, ..config });
        engine.toggle();
        engine
    }

    fn run(engine: &mut SupportEngine, input: AssistInput, ticks: u32, sink: &mut RecordingSink) {
        for _ in 0..ticks {
            engine.update(&input, TICK, sink).unwrap();
        }
    }

    #[test]
    fn test_snap_heal_sequence() {
        let mut engine = active_engine(SupportConfig::default());
        let mut sink = RecordingSink::new();
        let snap = AssistInput { snap_pressed: true, ..Default::default() };
        engine.update(&snap, TICK, &mut sink).unwrap();
        assert_eq!(engine.phase(), SupportPhase::Healing);
        assert_eq!(engine.heal_count(), 1);
        assert_eq!(sink.events(), &[InputEvent::RightClick]);

        // 30 ms settle: heal key on the second tick after the click
        run(&mut engine, AssistInput::default(), 1, &mut sink);
        assert_eq!(sink.key_taps(KeyCode::Z), 0);
        run(&mut engine, AssistInput::default(), 1, &mut sink);
        assert_eq!(sink.key_taps(KeyCode::Z), 1);
        assert!(engine.has_target());
    }

    #[test]
    fn test_healing_holds_for_lock_time() {
        let mut engine = active_engine(SupportConfig::default());
        let mut sink = RecordingSink::new();
        engine.update(&AssistInput { snap_pressed: true, ..Default::default() }, TICK, &mut sink)
            .unwrap();
        // 500 ms lock: 31 ticks leave 4 ms
        run(&mut engine, AssistInput::default(), 31, &mut sink);
        assert_eq!(engine.phase(), SupportPhase::Healing);
        run(&mut engine, AssistInput::default(), 1, &mut sink);
        assert_eq!(engine.phase(), SupportPhase::TargetingParty);
    }

    #[test]
    fn test_sanctuary_in_ground_mode() {
        let mut engine = active_engine(SupportConfig::default());
        let mut sink = RecordingSink::new();
        let snap = AssistInput { snap_pressed: true, r2_held: true, ..Default::default() };
        engine.update(&snap, TICK, &mut sink).unwrap();
        assert_eq!(engine.mode(), SupportMode::GroundTarget);
        assert_eq!(engine.phase(), SupportPhase::PlacingSanctuary);
        assert_eq!(engine.phase_label(), "SANCTUARY");

        let ground = AssistInput { r2_held: true, ..Default::default() };
        run(&mut engine, ground, 1, &mut sink);
        assert_eq!(engine.phase(), SupportPhase::TargetingParty);
        assert_eq!(sink.events(), &[InputEvent::LeftClick]);
        run(&mut engine, ground, 1, &mut sink);
        assert_eq!(sink.events(), &[InputEvent::LeftClick, InputEvent::TapKey { key: KeyCode::C }]);
        assert_eq!(engine.heal_count(), 0);
    }

    #[test]
    fn test_self_heal_single_shot() {
        let mut engine = active_engine(SupportConfig::default());
        let mut sink = RecordingSink::new();
        let heal = AssistInput { self_heal_pressed: true, ..Default::default() };
        engine.update(&heal, TICK, &mut sink).unwrap();
        assert_eq!(engine.phase(), SupportPhase::SelfHealing);
        assert_eq!(engine.heal_count(), 1);
        run(&mut engine, AssistInput::default(), 1, &mut sink);
        assert_eq!(engine.phase(), SupportPhase::TargetingParty);
    }

    #[test]
    fn test_shoulder_cycles_party_with_cooldown() {
        let mut engine = active_engine(SupportConfig::default());
        let mut sink = RecordingSink::new();
        let press = AssistInput { shoulder_pressed: true, ..Default::default() };
        run(&mut engine, press, 1, &mut sink);
        run(&mut engine, press, 1, &mut sink);
        assert_eq!(sink.key_taps(KeyCode::TAB), 1);
        // 100 ms cooldown clears after 7 ticks
        run(&mut engine, AssistInput::default(), 5, &mut sink);
        run(&mut engine, press, 1, &mut sink);
        assert_eq!(sink.key_taps(KeyCode::TAB), 2);
    }

    #[test]
    fn test_auto_cycle_sweeps_on_interval() {
        let mut engine = active_engine(SupportConfig {
            auto_cycle: true,
            auto_cycle_interval_ms: 160,
            ..Default::default()
        });
        let mut sink = RecordingSink::new();
        run(&mut engine, AssistInput::default(), 9, &mut sink);
        assert_eq!(sink.key_taps(KeyCode::TAB), 0);
        run(&mut engine, AssistInput::default(), 1, &mut sink);
        assert_eq!(sink.key_taps(KeyCode::TAB), 1);
        assert_eq!(engine.phase(), SupportPhase::AutoCycling);
        run(&mut engine, AssistInput::default(), 1, &mut sink);
        assert_eq!(engine.phase(), SupportPhase::TargetingParty);
    }

    #[test]
    fn test_cast_rezz_counts_when_idle() {
        let mut engine = SupportEngine::new(SupportConfig::default());
        let mut sink = RecordingSink::new();
        engine.cast_rezz(&mut sink);
        assert_eq!(engine.rezz_count(), 1);
        assert_eq!(engine.phase(), SupportPhase::Idle);
        assert_eq!(sink.key_taps(KeyCode::X), 1);

        engine.toggle();
        engine.cast_rezz(&mut sink);
        assert_eq!(engine.phase(), SupportPhase::Rezzing);
    }

    #[test]
    fn test_target_aim_uses_target_sensitivity() {
        let mut engine = active_engine(SupportConfig::default());
        let mut sink = RecordingSink::new();
        let right = AssistInput { right: Stick::new(1.0, 0.0), ..Default::default() };
        run(&mut engine, right, 1, &mut sink);
        assert_eq!(sink.total_motion(), (22, 0));
    }

    #[test]
    fn test_toggle_off_resets_counters() {
        let mut engine = active_engine(SupportConfig::default());
        let mut sink = RecordingSink::new();
        engine.update(&AssistInput { snap_pressed: true, ..Default::default() }, TICK, &mut sink)
            .unwrap();
        engine.cast_rezz(&mut sink);
        engine.toggle();
        assert_eq!(engine.phase(), SupportPhase::Idle);
        assert_eq!(engine.heal_count(), 0);
        assert_eq!(engine.rezz_count(), 0);
    }

    #[test]
    fn test_reset_counters_keeps_phase() {
        let mut engine = active_engine(SupportConfig::default());
        let mut sink = RecordingSink::new();
        engine.cast_rezz(&mut sink);
        engine.reset_counters();
        assert_eq!(engine.rezz_count(), 0);
        assert_eq!(engine.phase(), SupportPhase::Rezzing);
    }
}
