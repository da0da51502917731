//! Behavior engines
//!
//! - `movement`: left stick → click-to-move drift or cursor nudges
//! - `turbo` / `combat`: button dispatch with repeated fire and macros
//! - `auto_target`, `kite`, `mage`, `support`: phase machines that own the
//!   right stick while selected by the orchestrator
//!
//! Engines never read the clock; every update receives the tick length.

pub mod aim;
pub mod auto_target;
pub mod combat;
pub mod config;
pub mod kite;
pub mod mage;
pub mod movement;
pub mod support;
pub mod turbo;

pub use auto_target::{AutoTargetEngine, TargetPhase};
pub use combat::CombatEngine;
pub use config::EngineConfig;
pub use kite::{KiteEngine, KitePhase};
pub use mage::{MageEngine, MageMode, MagePhase};
pub use movement::MovementEngine;
pub use support::{SupportEngine, SupportMode, SupportPhase};
pub use turbo::{TurboConfig, TurboMode, TurboState};

use crate::error::EngineFault;
use crate::input::{InputSink, Stick};

/// Right-stick and gesture input for the engine that owns the stick this tick.
/// `*_pressed` fields are press edges against the previous frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AssistInput {
    pub right: Stick,
    pub snap_pressed: bool,
    pub shoulder_held: bool,
    pub shoulder_pressed: bool,
    pub self_heal_pressed: bool,
    pub l2_held: bool,
    pub l2_pressed: bool,
    pub r2_held: bool,
}

/// Common surface of the four right-stick engines.
pub trait AssistEngine {
    /// Profile allows this engine to claim the right stick.
    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Toggled on and not Idle.
    fn is_active(&self) -> bool;

    fn phase_label(&self) -> &'static str;

    /// Mode-toggle gesture: Idle → first phase, anything else → Idle.
    fn toggle(&mut self);

    /// Drop to Idle and zero every counter and timer.
    fn force_idle(&mut self);

    fn update(
        &mut self,
        input: &AssistInput,
        tick_ms: u32,
        sink: &mut dyn InputSink,
    ) -> Result<(), EngineFault>;
}
