//! # Engine Configuration Module
//!
//! Every tuning constant for the behavior engines lives here, grouped per engine.
//!
//! ## Presets
//! - `melee()`: auto-target on
//! - `ranged()`: kite on
//! - `mage()`: mage on
//! - `support()`: support on, party auto-cycle on
//!
//! ```rust
//! use gp_core::engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let ranged = EngineConfig::ranged();
//! assert!(ranged.kite.enabled && !config.kite.enabled);
//! ```

mod auto_target_config;
mod kite_config;
mod mage_config;
mod movement_config;
mod support_config;

pub use auto_target_config::AutoTargetConfig;
pub use kite_config::KiteConfig;
pub use mage_config::MageConfig;
pub use movement_config::MovementConfig;
pub use support_config::SupportConfig;

use serde::{Deserialize, Serialize};

/// Tick loop parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Fixed tick length, ms (default: 16, ~60 Hz)
    pub tick_ms: u32,
    /// Right-stick magnitude for the free-look nudge (default: 0.15)
    pub free_look_threshold: f32,
    /// Free-look pixels per tick at full deflection (default: 8.0)
    pub free_look_gain: f32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self { tick_ms: 16, free_look_threshold: 0.15, free_look_gain: 8.0 }
    }
}

/// All engine settings of a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub tick: LoopConfig,
    pub movement: MovementConfig,
    pub auto_target: AutoTargetConfig,
    pub kite: KiteConfig,
    pub mage: MageConfig,
    pub support: SupportConfig,
}

impl EngineConfig {
    /// Melee: auto-target with auto-attack and retarget
    pub fn melee() -> Self {
        let mut cfg = Self::default();
        cfg.auto_target.enabled = true;
        cfg.auto_target.auto_attack = true;
        cfg.auto_target.auto_retarget = true;
        cfg
    }

    /// Ranged: kiting loop, slightly faster run drift
    pub fn ranged() -> Self {
        let mut cfg = Self::default();
        cfg.kite.enabled = true;
        cfg.movement.run_speed = 6.0;
        cfg
    }

    /// Mage: ground/bolt casting
    pub fn mage() -> Self {
        let mut cfg = Self::default();
        cfg.mage.enabled = true;
        cfg
    }

    /// Support: party heals with periodic sweep
    pub fn support() -> Self {
        let mut cfg = Self::default();
        cfg.support.enabled = true;
        cfg.support.auto_cycle = true;
        cfg
    }

    /// Reject settings no engine can run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.tick.tick_ms == 0 {
            return Err("tick_ms must be positive".to_string());
        }
        let deadzones = [
            ("movement.deadzone", self.movement.deadzone),
            ("auto_target.aim_deadzone", self.auto_target.aim_deadzone),
            ("kite.aim_deadzone", self.kite.aim_deadzone),
            ("mage.ground_aim_deadzone", self.mage.ground_aim_deadzone),
            ("mage.bolt_aim_deadzone", self.mage.bolt_aim_deadzone),
            ("support.ground_aim_deadzone", self.support.ground_aim_deadzone),
            ("support.target_aim_deadzone", self.support.target_aim_deadzone),
        ];
        for (name, value) in deadzones {
            if !(0.0..1.0).contains(&value) {
                return Err(format!("{} must be in [0, 1), got {}", name, value));
            }
        }
        if !(self.movement.curve.is_finite() && self.movement.curve > 0.0) {
            return Err(format!("movement.curve must be positive, got {}", self.movement.curve));
        }
        if self.kite.retreat_duration_ms == 0 {
            return Err("kite.retreat_duration_ms must be positive".to_string());
        }
        Ok(())
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.tick.tick_ms, 16);
        assert!((cfg.movement.deadzone - 0.12).abs() < 1e-6);
        assert_eq!(cfg.kite.attacks_before_retreat, 3);
        assert_eq!(cfg.mage.bolt_cast_delay_ms, 1200);
        assert!(!cfg.auto_target.enabled);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_presets_enable_one_engine_each() {
        let presets = [
            EngineConfig::melee(),
            EngineConfig::ranged(),
            EngineConfig::mage(),
            EngineConfig::support(),
        ];
        for cfg in &presets {
            let enabled = [
                cfg.auto_target.enabled,
                cfg.kite.enabled,
                cfg.mage.enabled,
                cfg.support.enabled,
            ];
            assert_eq!(enabled.iter().filter(|e| **e).count(), 1);
            assert!(cfg.validate().is_ok());
        }
    }

    #[test]
    fn test_validate_rejects_bad_deadzone() {
        let mut cfg = EngineConfig::default();
        cfg.kite.aim_deadzone = 1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"kite":{"enabled":true}}"#).unwrap();
        assert!(cfg.kite.enabled);
        assert_eq!(cfg.kite.attack_interval_ms, 55);
        assert_eq!(cfg.support.auto_cycle_interval_ms, 3000);
    }

    #[test]
    fn test_config_serialization() {
        let cfg = EngineConfig::support();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cfg);
    }
}
