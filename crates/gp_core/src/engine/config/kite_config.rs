//! Ranged Kite Configuration

use serde::{Deserialize, Serialize};

use crate::input::KeyCode;

/// Ranged kiting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KiteConfig {
    /// Engine may own the right stick and accept the mode toggle (default: false)
    pub enabled: bool,
    /// Ranged attack key (default: Z)
    pub attack_key: KeyCode,

    // === Cycle ===
    /// Interval between attack taps, ms (default: 55)
    pub attack_interval_ms: u32,
    /// Attacks fired before retreating (default: 3)
    pub attacks_before_retreat: u32,
    /// Delay in Locking before the lock click, ms (default: 200)
    pub lock_delay_ms: u32,
    /// Time spent running away, ms (default: 600)
    pub retreat_duration_ms: u32,
    /// Time spent swinging the cursor back, ms (default: 180)
    pub pivot_duration_ms: u32,
    /// Pause before re-locking, ms (default: 120)
    pub relock_delay_ms: u32,
    /// Click-to-move period while retreating, ms (default: 180)
    pub retreat_click_ms: u32,

    // === Cursor ===
    /// Cursor travel over a whole retreat, pixels (default: 90.0)
    pub retreat_cursor_dist: f32,
    /// Aim speed per tick at full deflection (default: 20.0)
    pub aim_sensitivity: f32,
    /// Right-stick deadzone (default: 0.18)
    pub aim_deadzone: f32,
}

impl Default for KiteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            attack_key: KeyCode::Z,
            attack_interval_ms: 55,
            attacks_before_retreat: 3,
            lock_delay_ms: 200,
            retreat_duration_ms: 600,
            pivot_duration_ms: 180,
            relock_delay_ms: 120,
            retreat_click_ms: 180,
            retreat_cursor_dist: 90.0,
            aim_sensitivity: 20.0,
            aim_deadzone: 0.18,
        }
    }
}
