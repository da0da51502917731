//! Commands from outside the tick thread.
//!
//! Sent through the orchestrator's channel and applied at the start of the
//! next tick, before any input is read.

use super::arbitration::EngineKind;
use crate::profile::Profile;

#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Flip whether the profile lets this engine claim the right stick.
    /// Disabling also drops the engine to Idle.
    ToggleEnabled(EngineKind),
    /// The auto-target's current target died or left range.
    TargetLost,
    /// Immediate target-cycle press on the auto-target engine.
    ManualRetarget,
    /// Kite: start retreating now.
    ForceRetreat,
    /// Support: resurrection on the current target.
    CastRezz,
    ResetCastCount,
    ResetSupportCounters,
    LoadProfile(Box<Profile>),
}

impl EngineCommand {
    pub fn name(&self) -> &'static str {
        match self {
            EngineCommand::ToggleEnabled(_) => "toggle_enabled",
            EngineCommand::TargetLost => "target_lost",
            EngineCommand::ManualRetarget => "manual_retarget",
            EngineCommand::ForceRetreat => "force_retreat",
            EngineCommand::CastRezz => "cast_rezz",
            EngineCommand::ResetCastCount => "reset_cast_count",
            EngineCommand::ResetSupportCounters => "reset_support_counters",
            EngineCommand::LoadProfile(_) => "load_profile",
        }
    }
}
