//! Button → action bindings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::engine::turbo::TurboConfig;
use crate::input::{InputSink, KeyCode, LayeredButton};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActionKind {
    #[default]
    Key,
    LeftClick,
    RightClick,
    Scroll,
}

/// How a press is turned into fires. Turbo and macro are exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTrigger {
    /// One fire per press edge
    #[default]
    Single,
    /// Repeated fire while held
    Turbo(TurboConfig),
    /// Press edge starts the macro stored at this path
    Macro(PathBuf),
}

/// One binding's action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonAction {
    pub kind: ActionKind,
    /// Key tapped for `ActionKind::Key` (default: F1)
    pub key: KeyCode,
    /// Wheel delta for `ActionKind::Scroll` (default: 120)
    pub scroll_delta: i32,
    pub label: String,
    pub trigger: ActionTrigger,
}

impl Default for ButtonAction {
    fn default() -> Self {
        Self {
            kind: ActionKind::Key,
            key: KeyCode::F1,
            scroll_delta: 120,
            label: String::new(),
            trigger: ActionTrigger::Single,
        }
    }
}

impl ButtonAction {
    pub fn key(key: KeyCode, label: &str) -> Self {
        Self { kind: ActionKind::Key, key, label: label.to_string(), ..Default::default() }
    }

    pub fn click(kind: ActionKind, label: &str) -> Self {
        Self { kind, key: KeyCode::NONE, label: label.to_string(), ..Default::default() }
    }

    pub fn scroll(delta: i32, label: &str) -> Self {
        Self {
            kind: ActionKind::Scroll,
            key: KeyCode::NONE,
            scroll_delta: delta,
            label: label.to_string(),
            ..Default::default()
        }
    }

    pub fn with_turbo(mut self, turbo: TurboConfig) -> Self {
        self.trigger = ActionTrigger::Turbo(turbo);
        self
    }

    pub fn with_macro(mut self, path: impl Into<PathBuf>) -> Self {
        self.trigger = ActionTrigger::Macro(path.into());
        self
    }

    pub fn turbo(&self) -> Option<&TurboConfig> {
        match &self.trigger {
            ActionTrigger::Turbo(cfg) => Some(cfg),
            _ => None,
        }
    }

    pub fn macro_path(&self) -> Option<&PathBuf> {
        match &self.trigger {
            ActionTrigger::Macro(path) if !path.as_os_str().is_empty() => Some(path),
            _ => None,
        }
    }

    /// Exactly one actuator call.
    pub fn fire(&self, sink: &mut dyn InputSink) {
        match self.kind {
            ActionKind::Key => sink.tap_key(self.key),
            ActionKind::LeftClick => sink.left_click(),
            ActionKind::RightClick => sink.right_click(),
            ActionKind::Scroll => sink.scroll_wheel(self.scroll_delta),
        }
    }
}

/// Layered button → action table of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonMappings {
    map: BTreeMap<LayeredButton, ButtonAction>,
}

impl ButtonMappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: LayeredButton) -> Option<&ButtonAction> {
        self.map.get(&key)
    }

    pub fn insert(&mut self, key: LayeredButton, action: ButtonAction) -> Option<ButtonAction> {
        self.map.insert(key, action)
    }

    pub fn remove(&mut self, key: LayeredButton) -> Option<ButtonAction> {
        self.map.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LayeredButton, &ButtonAction)> {
        self.map.iter()
    }
}

impl FromIterator<(LayeredButton, ButtonAction)> for ButtonMappings {
    fn from_iter<I: IntoIterator<Item = (LayeredButton, ButtonAction)>>(iter: I) -> Self {
        Self { map: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::turbo::TurboMode;
    use crate::input::{Button, InputEvent, Layer, RecordingSink};

    #[test]
    fn test_fire_is_one_call() {
        let mut sink = RecordingSink::new();
        ButtonAction::key(KeyCode::Z, "Attack").fire(&mut sink);
        ButtonAction::click(ActionKind::RightClick, "Lock").fire(&mut sink);
        ButtonAction::scroll(-120, "Zoom").fire(&mut sink);
        assert_eq!(
            sink.events(),
            &[
                InputEvent::TapKey { key: KeyCode::Z },
                InputEvent::RightClick,
                InputEvent::Scroll { delta: -120 },
            ]
        );
    }

    #[test]
    fn test_trigger_exclusivity() {
        let action = ButtonAction::key(KeyCode::Q, "Q")
            .with_turbo(TurboConfig::standard(80))
            .with_macro("combo.json");
        assert!(action.turbo().is_none());
        assert_eq!(action.macro_path().unwrap().to_str(), Some("combo.json"));
    }

    #[test]
    fn test_mappings_json_shape() {
        let json = r#"{
            "A": {"key": 90, "label": "Attack", "trigger": {"turbo": {"mode": "Burst", "burst_count": 3}}},
            "L2+B": {"kind": "RightClick"},
            "R2+X": {"trigger": {"macro": "macros/buff.json"}}
        }"#;
        let mappings: ButtonMappings = serde_json::from_str(json).unwrap();
        assert_eq!(mappings.len(), 3);

        let a = mappings.get(LayeredButton::base(Button::A)).unwrap();
        let turbo = a.turbo().unwrap();
        assert_eq!(turbo.mode, TurboMode::Burst);
        assert_eq!(turbo.burst_count, 3);
        assert_eq!(turbo.interval_ms, 100);

        let b = mappings.get(LayeredButton::new(Layer::L2, Button::B)).unwrap();
        assert_eq!(b.kind, ActionKind::RightClick);
        assert!(mappings.get(LayeredButton::new(Layer::R2, Button::X)).unwrap().macro_path().is_some());
    }
}
