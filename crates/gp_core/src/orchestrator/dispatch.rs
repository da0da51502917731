//! One tick of engine work
//!
//! Fixed order per tick: layers, left stick → movement, right stick → owner
//! (or free-look), mode-toggle gesture, button dispatch, macro playback.
//! The previous snapshot is only replaced once everything has run.

use super::arbitration::{arbitrate, EngineKind, RightStickOwner};
use super::command::EngineCommand;
use super::status::{EngineStatus, StatusSnapshot};
use crate::debug_flags;
use crate::engine::aim::rising;
use crate::engine::config::LoopConfig;
use crate::engine::{
    AssistEngine, AssistInput, AutoTargetEngine, CombatEngine, KiteEngine, MageEngine,
    MovementEngine, SupportEngine,
};
use crate::input::{Button, GamepadSnapshot, InputSink};
use crate::profile::{GestureBindings, Profile};

#[derive(Debug)]
pub struct EngineSet {
    loop_config: LoopConfig,
    gestures: GestureBindings,
    pub(crate) movement: MovementEngine,
    pub(crate) combat: CombatEngine,
    pub(crate) auto_target: AutoTargetEngine,
    pub(crate) kite: KiteEngine,
    pub(crate) mage: MageEngine,
    pub(crate) support: SupportEngine,
    prev: GamepadSnapshot,
    owner: RightStickOwner,
    /// Phase labels at the end of the last tick, in precedence order.
    labels: [&'static str; 4],
    faults: u32,
}

impl EngineSet {
    pub fn from_profile(profile: &Profile) -> Self {
        let cfg = &profile.engine;
        let mut set = Self {
            loop_config: cfg.tick.clone(),
            gestures: profile.gestures,
            movement: MovementEngine::new(cfg.movement.clone()),
            combat: CombatEngine::new(profile.mappings.clone()),
            auto_target: AutoTargetEngine::new(cfg.auto_target.clone()),
            kite: KiteEngine::new(cfg.kite.clone()),
            mage: MageEngine::new(cfg.mage.clone()),
            support: SupportEngine::new(cfg.support.clone()),
            prev: GamepadSnapshot::default(),
            owner: RightStickOwner::FreeLook,
            labels: ["IDLE"; 4],
            faults: 0,
        };
        set.labels = set.current_labels();
        set
    }

    /// Swap in a new profile. Everything held is released and every engine
    /// starts over from Idle. The previous frame survives, so a button held
    /// through the swap is not seen as a fresh press.
    pub fn load_profile(&mut self, profile: &Profile, sink: &mut dyn InputSink) {
        self.movement.reset(sink);
        let (faults, prev, owner) = (self.faults, self.prev, self.owner);
        *self = Self::from_profile(profile);
        self.faults = faults;
        self.prev = prev;
        self.owner = owner;
    }

    pub fn tick_ms(&self) -> u32 {
        self.loop_config.tick_ms
    }

    pub fn owner(&self) -> RightStickOwner {
        self.owner
    }

    pub fn faults(&self) -> u32 {
        self.faults
    }

    pub fn engine(&self, kind: EngineKind) -> &dyn AssistEngine {
        match kind {
            EngineKind::Support => &self.support,
            EngineKind::Mage => &self.mage,
            EngineKind::Kite => &self.kite,
            EngineKind::AutoTarget => &self.auto_target,
        }
    }

    pub fn engine_mut(&mut self, kind: EngineKind) -> &mut dyn AssistEngine {
        match kind {
            EngineKind::Support => &mut self.support,
            EngineKind::Mage => &mut self.mage,
            EngineKind::Kite => &mut self.kite,
            EngineKind::AutoTarget => &mut self.auto_target,
        }
    }

    /// Forget the previous frame and release movement.
    pub fn start(&mut self, sink: &mut dyn InputSink) {
        self.movement.reset(sink);
        self.prev = GamepadSnapshot::default();
    }

    pub fn stop(&mut self, sink: &mut dyn InputSink) {
        self.movement.reset(sink);
        self.combat.reset();
        self.auto_target.force_idle();
    }

    pub fn apply(&mut self, command: EngineCommand, sink: &mut dyn InputSink) {
        log::debug!("command: {}", command.name());
        match command {
            EngineCommand::ToggleEnabled(kind) => {
                let engine = self.engine_mut(kind);
                let enabled = !engine.is_enabled();
                engine.set_enabled(enabled);
                if !enabled {
                    engine.force_idle();
                }
                log::info!("{} {}", kind, if enabled { "enabled" } else { "disabled" });
            }
            EngineCommand::TargetLost => self.auto_target.on_target_lost(),
            EngineCommand::ManualRetarget => self.auto_target.manual_retarget(sink),
            EngineCommand::ForceRetreat => self.kite.force_retreat(sink),
            EngineCommand::CastRezz => self.support.cast_rezz(sink),
            EngineCommand::ResetCastCount => self.mage.reset_cast_count(),
            EngineCommand::ResetSupportCounters => self.support.reset_counters(),
            EngineCommand::LoadProfile(profile) => match profile.validate() {
                Ok(()) => {
                    self.load_profile(&profile, sink);
                    log::info!("Profile '{}' loaded", profile.name);
                }
                Err(e) => log::warn!("Rejected profile '{}': {}", profile.name, e),
            },
        }
    }

    /// Run one tick against `snap`.
    pub fn step(&mut self, snap: &GamepadSnapshot, sink: &mut dyn InputSink) {
        let tick_ms = self.loop_config.tick_ms;
        let l2_held = snap.l2_held();
        let r2_held = snap.r2_held();
        self.combat.update_layers(l2_held, r2_held);

        if let Err(fault) = self.movement.update(snap.left, sink) {
            log::warn!("movement fault: {}; resetting", fault);
            self.movement.reset(sink);
            self.faults += 1;
        }

        self.owner = arbitrate(|kind| {
            let engine = self.engine(kind);
            engine.is_enabled() || engine.is_active()
        });
        match self.owner.engine() {
            Some(kind) => self.step_owner(kind, snap, l2_held, r2_held, sink),
            None => self.free_look(snap, sink),
        }

        for button in Button::ALL {
            let now = snap.pressed(button);
            if now || self.prev.pressed(button) {
                self.combat.process_button(button, now, tick_ms, sink);
            }
        }

        let finished = self.combat.update_macro_playback(tick_ms, sink);
        if finished > 0 {
            log::debug!("{} macro(s) finished", finished);
        }

        self.log_transitions();
        self.prev = *snap;
    }

    fn edge(&self, snap: &GamepadSnapshot, button: Button) -> bool {
        rising(self.prev.pressed(button), snap.pressed(button))
    }

    fn step_owner(
        &mut self,
        kind: EngineKind,
        snap: &GamepadSnapshot,
        l2_held: bool,
        r2_held: bool,
        sink: &mut dyn InputSink,
    ) {
        let g = self.gestures;
        let input = AssistInput {
            right: snap.right,
            snap_pressed: self.edge(snap, g.snap),
            shoulder_held: snap.pressed(g.shoulder),
            shoulder_pressed: self.edge(snap, g.shoulder),
            self_heal_pressed: self.edge(snap, g.self_heal),
            l2_held,
            l2_pressed: l2_held && !self.prev.l2_held(),
            r2_held,
        };
        // Melee toggles combat mode only when auto-attack is on.
        let toggle = self.edge(snap, g.mode_toggle)
            && (kind != EngineKind::AutoTarget || self.auto_target.config().auto_attack);
        let tick_ms = self.loop_config.tick_ms;

        let engine = self.engine_mut(kind);
        if let Err(fault) = engine.update(&input, tick_ms, sink) {
            log::warn!("{} fault: {}; forcing Idle", kind, fault);
            engine.force_idle();
            self.faults += 1;
            return;
        }
        if toggle {
            engine.toggle();
            log::info!("{} toggled {}", kind, if engine.is_active() { "on" } else { "off" });
        }
    }

    fn free_look(&mut self, snap: &GamepadSnapshot, sink: &mut dyn InputSink) {
        let right = snap.right;
        if !right.is_finite() || right.magnitude() <= self.loop_config.free_look_threshold {
            return;
        }
        let gain = self.loop_config.free_look_gain;
        let dx = (right.x * gain) as i32;
        let dy = (-right.y * gain) as i32;
        if dx != 0 || dy != 0 {
            sink.move_mouse_relative(dx, dy);
        }
    }

    fn current_labels(&self) -> [&'static str; 4] {
        EngineKind::PRECEDENCE.map(|kind| self.engine(kind).phase_label())
    }

    fn log_transitions(&mut self) {
        let labels = self.current_labels();
        for (i, kind) in EngineKind::PRECEDENCE.into_iter().enumerate() {
            if labels[i] == self.labels[i] {
                continue;
            }
            if debug_flags::trace_phases_enabled() {
                log::info!("{} phase: {} -> {}", kind, self.labels[i], labels[i]);
            } else {
                log::debug!("{} phase: {} -> {}", kind, self.labels[i], labels[i]);
            }
        }
        self.labels = labels;
    }

    /// Status for the tick that just ran.
    pub fn snapshot(&mut self, status: EngineStatus, controller: &str, tick: u64) -> StatusSnapshot {
        let phase = match self.owner.engine() {
            Some(kind) => self.engine(kind).phase_label(),
            None => "IDLE",
        };
        StatusSnapshot {
            status,
            controller: controller.to_string(),
            tick,
            left: self.prev.left,
            right: self.prev.right,
            layer: self.combat.layer().label(),
            owner: self.owner,
            phase,
            moving: self.movement.is_button_held(),
            target_locked: self.auto_target.is_target_locked(),
            kite_attacks: self.kite.attacks_fired(),
            mage_casts: self.mage.cast_count(),
            sp_warning: self.mage.sp_warning(),
            heal_count: self.support.heal_count(),
            rezz_count: self.support.rezz_count(),
            playing_macros: self.combat.playing_macros(),
            faults: self.faults,
        }
    }
}
