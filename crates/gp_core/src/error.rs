use thiserror::Error;

/// Profile and configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown preset: {name}")]
    UnknownPreset { name: String },
}

/// Macro file and transform errors.
#[derive(Error, Debug)]
pub enum MacroError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed macro: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid speed multiplier: {multiplier}")]
    InvalidMultiplier { multiplier: f32 },

    #[error("Macro has no steps")]
    Empty,
}

impl MacroError {
    /// Whether retrying the same operation later could succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MacroError::Io(_))
    }
}

/// A per-tick failure inside a specialized engine. The orchestrator degrades the
/// engine to Idle instead of stopping the loop.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EngineFault {
    #[error("non-finite stick input ({x}, {y})")]
    NonFiniteInput { x: f32, y: f32 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
