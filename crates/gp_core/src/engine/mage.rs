//! Mage casting
//!
//! Ground mode aims a ground-targeted spell with the right stick and casts on
//! snap (click, settle, spell key). Bolt mode, selected while R2 is held,
//! locks the target with a right-click on snap and then repeats the bolt key
//! at the cast delay. L2 taps the defensive spell on its own cooldown.
//!
//! Casts are counted; past a threshold the status shows an SP warning. The
//! count is a hint only, nothing reads the game's SP.

use super::aim::{ensure_finite, AimVector, Cooldown, DeferredKey, PixelAccumulator};
use super::config::MageConfig;
use super::{AssistEngine, AssistInput};
use crate::error::EngineFault;
use crate::input::InputSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MageMode {
    #[default]
    Ground,
    Bolt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MagePhase {
    #[default]
    Idle,
    Aiming,
    Casting,
    BoltLocked,
    BoltSpamming,
}

impl MagePhase {
    pub fn label(self, mode: MageMode) -> &'static str {
        match (self, mode) {
            (MagePhase::Idle, _) => "IDLE",
            (MagePhase::Aiming, MageMode::Ground) => "AIMING GROUND",
            (MagePhase::Aiming, MageMode::Bolt) => "AIMING BOLT",
            (MagePhase::Casting, _) => "CASTING",
            (MagePhase::BoltLocked, _) => "BOLT LOCKED",
            (MagePhase::BoltSpamming, _) => "BOLT SPAMMING",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MageEngine {
    config: MageConfig,
    mode: MageMode,
    phase: MagePhase,
    cast_cooldown: Cooldown,
    defensive_cooldown: Cooldown,
    ground_key: DeferredKey,
    aim_accum: PixelAccumulator,
    cast_count: u32,
}

impl MageEngine {
    pub fn new(config: MageConfig) -> Self {
        Self { config, ..Default::default() }
    }

    pub fn config(&self) -> &MageConfig {
        &self.config
    }

    pub fn mode(&self) -> MageMode {
        self.mode
    }

    pub fn phase(&self) -> MagePhase {
        self.phase
    }

    pub fn cast_count(&self) -> u32 {
        self.cast_count
    }

    pub fn sp_warning(&self) -> bool {
        self.cast_count >= self.config.casts_before_sp_warning
    }

    pub fn reset_cast_count(&mut self) {
        self.cast_count = 0;
    }

    fn aim_params(&self) -> (f32, f32) {
        match self.mode {
            MageMode::Ground => (self.config.ground_aim_sensitivity, self.config.ground_aim_deadzone),
            MageMode::Bolt => (self.config.bolt_aim_sensitivity, self.config.bolt_aim_deadzone),
        }
    }

    fn cast_ground(&mut self, sink: &mut dyn InputSink) {
        sink.left_click();
        self.ground_key.arm(self.config.ground_spell_key, self.config.ground_settle_ms, sink);
        self.cast_cooldown.start(self.config.ground_cast_lock_ms);
        self.cast_count += 1;
        self.phase = MagePhase::Casting;
        log::debug!("ground cast #{}", self.cast_count);
    }

    fn lock_bolt_target(&mut self, sink: &mut dyn InputSink) {
        sink.right_click();
        self.cast_cooldown.clear();
        self.phase = MagePhase::BoltLocked;
    }

    fn spam_bolt(&mut self, sink: &mut dyn InputSink) {
        if !self.cast_cooldown.ready() {
            return;
        }
        sink.tap_key(self.config.bolt_key);
        self.cast_cooldown.start(self.config.bolt_cast_delay_ms);
        self.cast_count += 1;
    }
}

impl AssistEngine for MageEngine {
    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    fn is_active(&self) -> bool {
        self.phase != MagePhase::Idle
    }

    fn phase_label(&self) -> &'static str {
        self.phase.label(self.mode)
    }

    fn toggle(&mut self) {
        let was_active = self.is_active();
        self.force_idle();
        if !was_active {
            self.phase = MagePhase::Aiming;
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
        if self.phase == MagePhase::Idle {
            return Ok(());
        }

        self.ground_key.advance(tick_ms, sink);
        self.mode = if input.r2_held { MageMode::Bolt } else { MageMode::Ground };

        let (sensitivity, deadzone) = self.aim_params();
        if let Some(aim) = AimVector::from_stick(right, deadzone) {
            let (dx, dy) = aim.screen_delta(sensitivity);
            self.aim_accum.emit(dx, dy, sink);
        }

        self.cast_cooldown.tick(tick_ms);
        self.defensive_cooldown.tick(tick_ms);

        if input.l2_pressed && self.defensive_cooldown.ready() {
            sink.tap_key(self.config.defensive_key);
            self.defensive_cooldown.start(self.config.defensive_cooldown_ms);
            self.cast_count += 1;
        }

        if input.snap_pressed {
            match self.mode {
                MageMode::Ground => self.cast_ground(sink),
                MageMode::Bolt => self.lock_bolt_target(sink),
            }
        }

        match self.phase {
            MagePhase::Idle | MagePhase::Aiming => {}
            MagePhase::Casting => {
                if self.cast_cooldown.ready() {
                    self.phase = MagePhase::Aiming;
                }
            }
            MagePhase::BoltLocked => {
                self.phase = MagePhase::BoltSpamming;
                self.spam_bolt(sink);
            }
            MagePhase::BoltSpamming => self.spam_bolt(sink),
        }
        Ok(())
    }
}
