//! Mage Configuration

use serde::{Deserialize, Serialize};

use crate::input::KeyCode;

/// Ground-target and bolt-spam parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MageConfig {
    /// Engine may own the right stick and accept the mode toggle (default: false)
    pub enabled: bool,

    // === Ground mode ===
    /// Ground-target spell key (default: Z)
    pub ground_spell_key: KeyCode,
    pub ground_aim_sensitivity: f32,
    pub ground_aim_deadzone: f32,
    /// Animation lock after a ground cast, ms (default: 600)
    pub ground_cast_lock_ms: u32,
    /// Settle time between the ground click and the spell key, ms (default: 20)
    pub ground_settle_ms: u32,

    // === Bolt mode ===
    /// Bolt spell key (default: V)
    pub bolt_key: KeyCode,
    /// Spacing between bolt casts, cast time included, ms (default: 1200)
    pub bolt_cast_delay_ms: u32,
    pub bolt_aim_sensitivity: f32,
    pub bolt_aim_deadzone: f32,

    // === Defensive ===
    /// Defensive quick-cast key (default: C)
    pub defensive_key: KeyCode,
    /// Rate limit of the defensive cast, ms (default: 800)
    pub defensive_cooldown_ms: u32,

    /// Casts before the advisory SP warning lights (default: 15)
    pub casts_before_sp_warning: u32,
}

impl Default for MageConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ground_spell_key: KeyCode::Z,
            ground_aim_sensitivity: 18.0,
            ground_aim_deadzone: 0.15,
            ground_cast_lock_ms: 600,
            ground_settle_ms: 20,
            bolt_key: KeyCode::V,
            bolt_cast_delay_ms: 1200,
            bolt_aim_sensitivity: 20.0,
            bolt_aim_deadzone: 0.15,
            defensive_key: KeyCode::C,
            defensive_cooldown_ms: 800,
            casts_before_sp_warning: 15,
        }
    }
}
