//! # gp_core - Gamepad Play-Assist Engine
//!
//! Turns a gamepad into mouse and keyboard input for a click-to-move action
//! RPG. A fixed-rate orchestrator reads one controller snapshot per tick and
//! drives the behavior engines, which emit synthetic input through an
//! `InputSink`.
//!
//! ## Features
//! - Left-stick click-to-move with drift and anti-stall re-press
//! - Layered button mappings (base / L2 / R2) with four turbo modes
//! - Macro recording, JSON files, tick-driven playback
//! - Melee auto-target, ranged kiting, mage casting and party support phase machines
//! - Deterministic: engines never read the clock, only the tick length

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Method naming conventions - would require API changes
#![allow(clippy::should_implement_trait)]

pub mod debug_flags;
pub mod engine;
pub mod error;
pub mod input;
pub mod macros;
pub mod orchestrator;
pub mod profile;

// Re-export error types
pub use error::{ConfigError, EngineFault, MacroError, Result};

// Re-export input model
pub use input::{
    Button, ControllerSource, GamepadSnapshot, InputEvent, InputSink, KeyCode, Layer,
    LayeredButton, RecordingSink, ScriptFrame, ScriptedSource, Stick,
};

// Re-export engines
pub use engine::{AssistEngine, EngineConfig, TurboConfig, TurboMode};

// Re-export macros
pub use macros::{Macro, MacroLibrary, MacroPlayer, MacroRecorder, MacroStep};

// Re-export orchestrator
pub use orchestrator::{EngineCommand, EngineKind, EngineStatus, Orchestrator, StatusSnapshot};

// Re-export profiles
pub use profile::{ButtonAction, ButtonMappings, PlayStyle, Profile};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_builtin_profile_runs_headless() {
        let frames = [
            ScriptFrame { buttons: vec![Button::LeftThumb], ..Default::default() },
            ScriptFrame { hold_ms: 480, right: Stick::new(1.0, 0.0), ..Default::default() },
        ];
        let source = ScriptedSource::from_frames(&frames, 16);
        let profile = Profile::builtin("ranged").unwrap();
        let mut orchestrator = Orchestrator::new(source, RecordingSink::new(), profile);
        assert_eq!(orchestrator.run_until_disconnected(), 31);
        assert_eq!(orchestrator.status().status, EngineStatus::NoController);
        assert!(orchestrator.sink().key_taps(KeyCode::Z) > 0);
    }
}
