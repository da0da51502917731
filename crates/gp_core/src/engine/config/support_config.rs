//! Support Configuration

use serde::{Deserialize, Serialize};

use crate::input::KeyCode;

/// Party heal, sanctuary and resurrection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportConfig {
    /// Engine may own the right stick and accept the mode toggle (default: false)
    pub enabled: bool,

    // === Keys ===
    pub heal_key: KeyCode,
    pub self_heal_key: KeyCode,
    pub rezz_key: KeyCode,
    pub sanctuary_key: KeyCode,
    /// Party target-cycle key (default: Tab)
    pub cycle_key: KeyCode,

    // === Timing ===
    /// Healing phase hold before returning to TargetingParty, ms (default: 500)
    pub heal_lock_ms: u32,
    /// Settle time between the target click and the heal key, ms (default: 30)
    pub heal_settle_ms: u32,
    /// Settle time between the ground click and the sanctuary key, ms (default: 20)
    pub sanctuary_settle_ms: u32,
    /// Cooldown of the shoulder party cycle, ms (default: 100)
    pub tab_cycle_ms: u32,
    pub auto_cycle: bool,
    /// Auto-cycle sweep period, ms (default: 3000)
    pub auto_cycle_interval_ms: u32,

    // === Aim ===
    pub ground_aim_sensitivity: f32,
    pub ground_aim_deadzone: f32,
    pub target_aim_sensitivity: f32,
    pub target_aim_deadzone: f32,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            heal_key: KeyCode::Z,
            self_heal_key: KeyCode::Z,
            rezz_key: KeyCode::X,
            sanctuary_key: KeyCode::C,
            cycle_key: KeyCode::TAB,
            heal_lock_ms: 500,
            heal_settle_ms: 30,
            sanctuary_settle_ms: 20,
            tab_cycle_ms: 100,
            auto_cycle: false,
            auto_cycle_interval_ms: 3000,
            ground_aim_sensitivity: 18.0,
            ground_aim_deadzone: 0.15,
            target_aim_sensitivity: 22.0,
            target_aim_deadzone: 0.15,
        }
    }
}
