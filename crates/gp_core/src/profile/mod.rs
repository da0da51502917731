//! Profiles
//!
//! A profile is everything a session needs: engine tuning, which physical
//! buttons act as gestures, and the button → action table. Stored as JSON;
//! every field has a default so partial files load.

pub mod mapping;
pub mod presets;

pub use mapping::{ActionKind, ActionTrigger, ButtonAction, ButtonMappings};

use serde::{Deserialize, Serialize};
use std::fs::{rename, File};
use std::io::Write;
use std::path::Path;

use crate::engine::config::EngineConfig;
use crate::error::{ConfigError, Result};
use crate::input::Button;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayStyle {
    #[default]
    Melee,
    Ranged,
    Mage,
    Support,
}

impl PlayStyle {
    pub fn name(self) -> &'static str {
        match self {
            PlayStyle::Melee => "Melee",
            PlayStyle::Ranged => "Ranged",
            PlayStyle::Mage => "Mage",
            PlayStyle::Support => "Support",
        }
    }
}

/// Physical buttons the specialized engines read as gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureBindings {
    /// Turns the owning engine on/off (default: LeftThumb)
    pub mode_toggle: Button,
    /// Commits the current aim (default: RightThumb)
    pub snap: Button,
    /// Directional select / party cycle (default: RightShoulder)
    pub shoulder: Button,
    /// Support self-heal (default: LeftShoulder)
    pub self_heal: Button,
}

impl Default for GestureBindings {
    fn default() -> Self {
        Self {
            mode_toggle: Button::LeftThumb,
            snap: Button::RightThumb,
            shoulder: Button::RightShoulder,
            self_heal: Button::LeftShoulder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub description: String,
    pub play_style: PlayStyle,
    pub version: String,
    pub is_builtin: bool,
    pub engine: EngineConfig,
    pub gestures: GestureBindings,
    pub mappings: ButtonMappings,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "New Profile".to_string(),
            description: String::new(),
            play_style: PlayStyle::Melee,
            version: "1.0".to_string(),
            is_builtin: false,
            engine: EngineConfig::default(),
            gestures: GestureBindings::default(),
            mappings: ButtonMappings::default(),
        }
    }
}

impl Profile {
    /// Parse and validate.
    pub fn from_json_str(json: &str) -> Result<Profile> {
        let profile: Profile = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate().map_err(ConfigError::Invalid)?;
        let g = &self.gestures;
        if g.mode_toggle == g.snap {
            return Err(ConfigError::Invalid(format!(
                "mode toggle and snap share button {}",
                g.snap
            )));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Profile> {
        let json = std::fs::read_to_string(path)?;
        let profile = Self::from_json_str(&json)?;
        log::info!("Loaded profile '{}' from {:?}", profile.name, path);
        Ok(profile)
    }

    /// Write to a temp file then rename over the target.
    pub fn save(&self, path: &Path) -> Result<()> {
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
        log::info!("Saved profile '{}' to {:?}", self.name, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_profile_loads() {
        let profile = Profile::from_json_str(r#"{"name": "Mine", "engine": {"mage": {"enabled": true}}}"#)
            .unwrap();
        assert_eq!(profile.name, "Mine");
        assert!(profile.engine.mage.enabled);
        assert_eq!(profile.gestures, GestureBindings::default());
        assert!(profile.mappings.is_empty());
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let err = Profile::from_json_str(r#"{"engine": {"tick": {"tick_ms": 0}}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Profile::from_json_str(r#"{"gestures": {"snap": "LeftThumb"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        assert!(matches!(Profile::from_json_str("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profiles").join("ranged.json");
        let original = Profile::builtin("ranged").unwrap();
        original.save(&path).unwrap();
        let loaded = Profile::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = Profile::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
