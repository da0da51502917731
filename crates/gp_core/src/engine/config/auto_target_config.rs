//! Melee Auto-Target Configuration

use serde::{Deserialize, Serialize};

use crate::input::KeyCode;

/// Melee auto-target parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoTargetConfig {
    /// Engine may own the right stick and accept the mode toggle (default: false)
    pub enabled: bool,
    /// Engaged advances to Attacking (default: true)
    pub auto_attack: bool,
    /// Seeking cycles targets and target loss re-enters Seeking (default: true)
    pub auto_retarget: bool,

    // === Keys ===
    /// Basic attack key (default: Z)
    pub attack_key: KeyCode,
    /// Game's target-cycle key (default: Tab)
    pub cycle_key: KeyCode,

    // === Timing ===
    /// Interval between attack key taps, ms (default: 60)
    pub attack_interval_ms: u32,
    /// Cooldown between target-cycle presses, ms (default: 80)
    pub tab_cycle_ms: u32,
    /// Delay in Engaged before Attacking, ms (default: 150)
    pub engage_delay_ms: u32,
    /// Right-click lock re-assert period while Attacking, ms (default: 3000)
    pub relock_interval_ms: u32,
    /// Wait after target loss before the next cycle press, ms (default: 300)
    pub retarget_delay_ms: u32,
    /// Rate limit of the shoulder directional select click, ms (default: 200)
    pub directional_select_ms: u32,

    // === Aim ===
    /// Cursor speed per tick at full deflection (default: 22.0)
    pub aim_sensitivity: f32,
    /// Right-stick deadzone (default: 0.20)
    pub aim_deadzone: f32,
}

impl Default for AutoTargetConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            auto_attack: true,
            auto_retarget: true,
            attack_key: KeyCode::Z,
            cycle_key: KeyCode::TAB,
            attack_interval_ms: 60,
            tab_cycle_ms: 80,
            engage_delay_ms: 150,
            relock_interval_ms: 3000,
            retarget_delay_ms: 300,
            directional_select_ms: 200,
            aim_sensitivity: 22.0,
            aim_deadzone: 0.20,
        }
    }
}
