//! Per-tick status snapshot for presentation.

use serde::Serialize;
use std::fmt;

use super::arbitration::RightStickOwner;
use crate::input::Stick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    #[default]
    Stopped,
    Running,
    NoController,
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            EngineStatus::Stopped => "Stopped",
            EngineStatus::Running => "Running",
            EngineStatus::NoController => "No controller",
        };
        f.write_str(text)
    }
}

/// Immutable telemetry published once per tick. Only the right-stick owner's
/// phase is reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub status: EngineStatus,
    pub controller: String,
    pub tick: u64,

    // === Input ===
    pub left: Stick,
    pub right: Stick,
    pub layer: &'static str,

    // === Engines ===
    pub owner: RightStickOwner,
    pub phase: &'static str,
    pub moving: bool,
    pub target_locked: bool,
    pub kite_attacks: u32,
    pub mage_casts: u32,
    pub sp_warning: bool,
    pub heal_count: u32,
    pub rezz_count: u32,
    pub playing_macros: usize,
    /// Engine faults degraded to Idle since start.
    pub faults: u32,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            status: EngineStatus::Stopped,
            controller: String::new(),
            tick: 0,
            left: Stick::CENTER,
            right: Stick::CENTER,
            layer: "Base Layer",
            owner: RightStickOwner::FreeLook,
            phase: "IDLE",
            moving: false,
            target_locked: false,
            kite_attacks: 0,
            mage_casts: 0,
            sp_warning: false,
            heal_count: 0,
            rezz_count: 0,
            playing_macros: 0,
            faults: 0,
        }
    }
}

impl StatusSnapshot {
    /// One-line summary for logs and the CLI.
    pub fn summary(&self) -> String {
        format!(
            "[{}] tick {} | layer {} | {} {} | kite {} | casts {}{} | heals {} rezz {}",
            self.status,
            self.tick,
            self.layer,
            self.owner.label(),
            self.phase,
            self.kite_attacks,
            self.mage_casts,
            if self.sp_warning { " (low SP?)" } else { "" },
            self.heal_count,
            self.rezz_count,
        )
    }
}
