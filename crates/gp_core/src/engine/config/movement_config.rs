//! Movement Configuration

use serde::{Deserialize, Serialize};

/// Left-stick movement parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // === Shaping ===
    /// Stick magnitude below which the stick is ignored (default: 0.12)
    pub deadzone: f32,
    /// Easing exponent applied to the rescaled magnitude (default: 1.5)
    pub curve: f32,

    // === Classic mode ===
    /// Cursor speed multiplier in classic mode (default: 1.2)
    pub sensitivity: f32,

    // === Continuous-run mode ===
    /// Hold the click-to-move button while the stick is active (default: true)
    pub continuous_run: bool,
    /// Cursor drift per tick at full deflection, pixels (default: 5.0)
    pub run_speed: f32,
    /// Idle ticks with zero drift before the held button is re-pressed (default: 38, ~600 ms)
    pub repress_after_ticks: u32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.12,
            curve: 1.5,
            sensitivity: 1.2,
            continuous_run: true,
            run_speed: 5.0,
            repress_after_ticks: 38,
        }
    }
}
