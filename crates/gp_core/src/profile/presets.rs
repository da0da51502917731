//! Built-in profiles, one per play style.

use super::{ActionKind, ButtonAction, ButtonMappings, PlayStyle, Profile};
use crate::engine::config::EngineConfig;
use crate::engine::turbo::TurboConfig;
use crate::error::{ConfigError, Result};
use crate::input::{Button, KeyCode, Layer, LayeredButton};

const BUILTIN_NAMES: [&str; 4] = ["melee", "ranged", "mage", "support"];

impl Profile {
    pub fn builtin_names() -> &'static [&'static str] {
        &BUILTIN_NAMES
    }

    /// Built-in profile by name (case-insensitive).
    pub fn builtin(name: &str) -> Result<Profile> {
        let profile = match name.trim().to_ascii_lowercase().as_str() {
            "melee" => melee(),
            "ranged" => ranged(),
            "mage" => mage(),
            "support" => support(),
            _ => return Err(ConfigError::UnknownPreset { name: name.to_string() }),
        };
        Ok(profile)
    }
}

fn base(button: Button) -> LayeredButton {
    LayeredButton::base(button)
}

fn l2(button: Button) -> LayeredButton {
    LayeredButton::new(Layer::L2, button)
}

fn r2(button: Button) -> LayeredButton {
    LayeredButton::new(Layer::R2, button)
}

/// Bindings every style shares: potions on the L2 d-pad, utility on R2.
fn common_mappings() -> Vec<(LayeredButton, ButtonAction)> {
    vec![
        (base(Button::Start), ButtonAction::key(KeyCode::ESCAPE, "Menu")),
        (l2(Button::DPadUp), ButtonAction::key(KeyCode::NUM1, "Potion")),
        (l2(Button::DPadDown), ButtonAction::key(KeyCode::NUM2, "SP Potion")),
        (l2(Button::DPadLeft), ButtonAction::key(KeyCode::NUM3, "Fly Wing")),
        (l2(Button::DPadRight), ButtonAction::key(KeyCode::NUM4, "Teleport")),
        (r2(Button::A), ButtonAction::click(ActionKind::LeftClick, "Click Move")),
        (r2(Button::B), ButtonAction::key(KeyCode::TAB, "Target Next")),
        (r2(Button::X), ButtonAction::key(KeyCode::ALT, "Sit/Stand")),
        (r2(Button::Y), ButtonAction::scroll(120, "Zoom In")),
    ]
}

fn with_common(specific: Vec<(LayeredButton, ButtonAction)>) -> ButtonMappings {
    common_mappings().into_iter().chain(specific).collect()
}

fn melee() -> Profile {
    Profile {
        name: "Melee".to_string(),
        description: "Close-range DPS with auto-target and auto-attack".to_string(),
        play_style: PlayStyle::Melee,
        is_builtin: true,
        engine: EngineConfig::melee(),
        mappings: with_common(vec![
            (
                base(Button::A),
                ButtonAction::key(KeyCode::Z, "Basic Attack").with_turbo(TurboConfig::standard(60)),
            ),
            (base(Button::B), ButtonAction::key(KeyCode::X, "Bash")),
            (
                base(Button::X),
                ButtonAction::key(KeyCode::C, "Combo Strike").with_turbo(TurboConfig::burst(60, 3, 400)),
            ),
            (base(Button::Y), ButtonAction::key(KeyCode::V, "Provoke")),
            (base(Button::LeftShoulder), ButtonAction::key(KeyCode::F2, "Endure")),
            (base(Button::DPadUp), ButtonAction::key(KeyCode::F5, "Two-Hand Quicken")),
            (base(Button::DPadDown), ButtonAction::key(KeyCode::F6, "Berserk")),
            (l2(Button::A), ButtonAction::key(KeyCode::B, "Magnum Break")),
        ]),
        ..Default::default()
    }
}

fn ranged() -> Profile {
    Profile {
        name: "Ranged".to_string(),
        description: "Long-range DPS with the kite loop".to_string(),
        play_style: PlayStyle::Ranged,
        is_builtin: true,
        engine: EngineConfig::ranged(),
        mappings: with_common(vec![
            (
                base(Button::A),
                ButtonAction::key(KeyCode::Z, "Double Strafe").with_turbo(TurboConfig::standard(55)),
            ),
            (base(Button::B), ButtonAction::key(KeyCode::X, "Arrow Shower")),
            (base(Button::X), ButtonAction::key(KeyCode::C, "Falcon Assault")),
            (
                base(Button::Y),
                ButtonAction::key(KeyCode::V, "Sharp Shooting")
                    .with_turbo(TurboConfig::rhythmic(vec![120, 120, 400])),
            ),
            (base(Button::LeftShoulder), ButtonAction::click(ActionKind::RightClick, "Lock Target")),
            (base(Button::DPadUp), ButtonAction::key(KeyCode::F5, "True Sight")),
            (l2(Button::A), ButtonAction::key(KeyCode::B, "Ankle Snare")),
            (l2(Button::B), ButtonAction::key(KeyCode::N, "Sandman")),
        ]),
        ..Default::default()
    }
}

fn mage() -> Profile {
    Profile {
        name: "Mage".to_string(),
        description: "Ground AoE and bolt casting".to_string(),
        play_style: PlayStyle::Mage,
        is_builtin: true,
        engine: EngineConfig::mage(),
        mappings: with_common(vec![
            (base(Button::A), ButtonAction::key(KeyCode::Z, "Storm Gust")),
            (base(Button::B), ButtonAction::key(KeyCode::X, "Lord of Vermilion")),
            (
                base(Button::Y),
                ButtonAction::key(KeyCode::V, "Fire Bolt").with_turbo(TurboConfig::adaptive(300, 150, 6)),
            ),
            (base(Button::LeftShoulder), ButtonAction::key(KeyCode::F2, "Quagmire")),
            (l2(Button::A), ButtonAction::key(KeyCode::B, "Heaven's Drive")),
            (l2(Button::X), ButtonAction::key(KeyCode::M, "Double Casting")),
        ]),
        ..Default::default()
    }
}

fn support() -> Profile {
    let mut engine = EngineConfig::support();
    engine.movement.run_speed = 4.0;
    Profile {
        name: "Support".to_string(),
        description: "Party healing, sanctuary and resurrection".to_string(),
        play_style: PlayStyle::Support,
        is_builtin: true,
        engine,
        mappings: with_common(vec![
            (base(Button::A), ButtonAction::key(KeyCode::Z, "Heal")),
            (base(Button::B), ButtonAction::key(KeyCode::X, "Resurrection")),
            (base(Button::X), ButtonAction::key(KeyCode::C, "Sanctuary")),
            (base(Button::Y), ButtonAction::key(KeyCode::F, "Blessing")),
            (base(Button::DPadUp), ButtonAction::key(KeyCode::F5, "Increase AGI")),
            (base(Button::DPadDown), ButtonAction::key(KeyCode::F6, "Kyrie Eleison")),
            (l2(Button::A), ButtonAction::key(KeyCode::B, "Magnificat")),
        ]),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_builtins_load_and_validate() {
        for name in Profile::builtin_names() {
            let profile = Profile::builtin(name).unwrap();
            assert!(profile.is_builtin);
            assert!(profile.validate().is_ok(), "{}", name);
            assert!(!profile.mappings.is_empty());
        }
    }

    #[test]
    fn test_builtin_is_case_insensitive() {
        assert_eq!(Profile::builtin("Ranged").unwrap().play_style, PlayStyle::Ranged);
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(matches!(
            Profile::builtin("berserker"),
            Err(ConfigError::UnknownPreset { .. })
        ));
    }

    #[test]
    fn test_style_specific_binding_overrides_nothing_common() {
        let profile = Profile::builtin("melee").unwrap();
        let a = profile.mappings.get(base(Button::A)).unwrap();
        assert!(a.turbo().is_some());
        assert_eq!(profile.mappings.get(r2(Button::B)).unwrap().key, KeyCode::TAB);
    }
}
