//! Macro record/playback
//!
//! - `model`: `Macro`/`MacroStep`, JSON file format and delay transforms
//! - `recorder`: timestamps discrete inputs into steps
//! - `player`: tick-driven playback
//! - `library`: path-keyed cache of loaded macros

pub mod library;
pub mod model;
pub mod player;
pub mod recorder;

pub use library::MacroLibrary;
pub use model::{Macro, MacroStep, MacroStepKind, NOISE_FLOOR_MS};
pub use player::MacroPlayer;
pub use recorder::{MacroRecorder, MouseButton, MIN_RECORDED_DELAY_MS};
