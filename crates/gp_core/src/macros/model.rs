use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{rename, File};
use std::io::Write;
use std::path::Path;

use crate::error::MacroError;
use crate::input::{InputSink, KeyCode};

/// Delays below this are treated as recording noise by `optimize`, and no
/// rescaled delay goes below it.
pub const NOISE_FLOOR_MS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MacroStepKind {
    #[default]
    KeyPress,
    LeftClick,
    RightClick,
    Delay,
}

/// One step; `delay_ms` is the wait *before* it executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroStep {
    #[serde(rename = "type")]
    pub kind: MacroStepKind,
    pub key: KeyCode,
    pub delay_ms: u32,
}

impl MacroStep {
    pub fn key_press(key: KeyCode, delay_ms: u32) -> Self {
        Self { kind: MacroStepKind::KeyPress, key, delay_ms }
    }

    pub fn left_click(delay_ms: u32) -> Self {
        Self { kind: MacroStepKind::LeftClick, key: KeyCode::NONE, delay_ms }
    }

    pub fn right_click(delay_ms: u32) -> Self {
        Self { kind: MacroStepKind::RightClick, key: KeyCode::NONE, delay_ms }
    }

    pub fn delay(delay_ms: u32) -> Self {
        Self { kind: MacroStepKind::Delay, key: KeyCode::NONE, delay_ms }
    }

    /// Emit this step's input, if any.
    pub fn execute(&self, sink: &mut dyn InputSink) {
        match self.kind {
            MacroStepKind::KeyPress if !self.key.is_none() => sink.tap_key(self.key),
            MacroStepKind::KeyPress | MacroStepKind::Delay => {}
            MacroStepKind::LeftClick => sink.left_click(),
            MacroStepKind::RightClick => sink.right_click(),
        }
    }
}

impl fmt::Display for MacroStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            MacroStepKind::KeyPress => write!(f, "Press {} ({}ms)", self.key, self.delay_ms),
            MacroStepKind::LeftClick => write!(f, "Left Click ({}ms)", self.delay_ms),
            MacroStepKind::RightClick => write!(f, "Right Click ({}ms)", self.delay_ms),
            MacroStepKind::Delay => write!(f, "Wait {}ms", self.delay_ms),
        }
    }
}

/// A recorded input sequence. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macro {
    pub name: String,
    pub steps: Vec<MacroStep>,
    pub total_duration_ms: u32,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Default for Macro {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            steps: Vec::new(),
            total_duration_ms: 0,
            description: String::new(),
            created_at: Utc::now(),
        }
    }
}

impl Macro {
    pub fn new(name: impl Into<String>, steps: Vec<MacroStep>) -> Self {
        let total_duration_ms = sum_delays(&steps);
        Self { name: name.into(), steps, total_duration_ms, ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Drop steps whose delay is below the noise floor.
    pub fn optimize(&self) -> Macro {
        let steps: Vec<MacroStep> =
            self.steps.iter().copied().filter(|s| s.delay_ms >= NOISE_FLOOR_MS).collect();
        self.derive(self.name.clone(), steps)
    }

    /// Divide every delay by `multiplier` (2.0 = twice as fast).
    pub fn speed_up(&self, multiplier: f32) -> Result<Macro, MacroError> {
        let multiplier = check_multiplier(multiplier)?;
        let steps = self.rescaled(|d| d as f32 / multiplier);
        Ok(self.derive(format!("{} (Fast)", self.name), steps))
    }

    /// Multiply every delay by `multiplier` (2.0 = twice as slow).
    pub fn slow_down(&self, multiplier: f32) -> Result<Macro, MacroError> {
        let multiplier = check_multiplier(multiplier)?;
        let steps = self.rescaled(|d| d as f32 * multiplier);
        Ok(self.derive(format!("{} (Slow)", self.name), steps))
    }

    fn rescaled(&self, scale: impl Fn(u32) -> f32) -> Vec<MacroStep> {
        self.steps
            .iter()
            .map(|s| MacroStep {
                delay_ms: (scale(s.delay_ms).min(u32::MAX as f32) as u32).max(NOISE_FLOOR_MS),
                ..*s
            })
            .collect()
    }

    fn derive(&self, name: String, steps: Vec<MacroStep>) -> Macro {
        Macro {
            name,
            total_duration_ms: sum_delays(&steps),
            steps,
            description: self.description.clone(),
            created_at: self.created_at,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Macro, MacroError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, MacroError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Macro, MacroError> {
        let json = std::fs::read_to_string(path)?;
        let macro_ = Self::from_json_str(&json)?;
        log::debug!("Loaded macro '{}' ({} steps) from {:?}", macro_.name, macro_.steps.len(), path);
        Ok(macro_)
    }

    /// Write to a temp file then rename over the target.
    pub fn save(&self, path: &Path) -> Result<(), MacroError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = self.to_json_string()?;
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        rename(&temp_path, path)?;
        log::debug!("Saved macro '{}' to {:?}", self.name, path);
        Ok(())
    }
}

fn sum_delays(steps: &[MacroStep]) -> u32 {
    steps.iter().fold(0u32, |acc, s| acc.saturating_add(s.delay_ms))
}

fn check_multiplier(multiplier: f32) -> Result<f32, MacroError> {
    if multiplier.is_finite() && multiplier > 0.0 {
        Ok(multiplier)
    } else {
        Err(MacroError::InvalidMultiplier { multiplier })
    }
}
