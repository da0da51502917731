//! Combat dispatch
//!
//! Resolves a physical button under the current trigger layer to its binding
//! and fires it once, through the turbo resolver, or by starting a macro.
//! Turbo records and macro players live in fixed arenas keyed by
//! `LayeredButton`, sized once and reset on profile load.

use super::turbo::TurboState;
use crate::input::{Button, ButtonArena, InputSink, Layer, LayeredButton};
use crate::macros::{MacroLibrary, MacroPlayer};
use crate::profile::{ActionTrigger, ButtonMappings};

#[derive(Debug, Default)]
pub struct CombatEngine {
    mappings: ButtonMappings,
    layer: Layer,
    turbo: ButtonArena<TurboState>,
    players: ButtonArena<MacroPlayer>,
    /// Binding each physical button is currently holding down.
    held: [Option<LayeredButton>; Button::COUNT],
    library: MacroLibrary,
}

impl CombatEngine {
    pub fn new(mappings: ButtonMappings) -> Self {
        Self { mappings, ..Default::default() }
    }

    /// Replace the binding table; all per-binding state starts over.
    pub fn load_mappings(&mut self, mappings: ButtonMappings) {
        self.mappings = mappings;
        self.reset();
        self.library.clear();
    }

    pub fn mappings(&self) -> &ButtonMappings {
        &self.mappings
    }

    pub fn library_mut(&mut self) -> &mut MacroLibrary {
        &mut self.library
    }

    pub fn update_layers(&mut self, l2_held: bool, r2_held: bool) {
        self.layer = Layer::from_triggers(l2_held, r2_held);
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn turbo_state(&self, key: LayeredButton) -> &TurboState {
        self.turbo.get(key)
    }

    /// Feed one button for this tick. Called for press edges, release edges,
    /// and every tick a button stays held.
    pub fn process_button(
        &mut self,
        button: Button,
        pressed: bool,
        tick_ms: u32,
        sink: &mut dyn InputSink,
    ) {
        let key = LayeredButton::new(self.layer, button);

        // A layer change under a held button releases the old binding.
        let slot = &mut self.held[button.ordinal()];
        if let Some(previous) = *slot {
            if previous != key {
                self.turbo.get_mut(previous).release();
            }
        }
        *slot = pressed.then_some(key);

        let state = self.turbo.get_mut(key);
        let Some(action) = self.mappings.get(key) else {
            state.was_pressed = pressed;
            return;
        };
        let press_edge = pressed && !state.was_pressed;

        match &action.trigger {
            ActionTrigger::Macro(_) => {
                state.was_pressed = pressed;
                if !press_edge {
                    return;
                }
                let Some(path) = action.macro_path() else {
                    return;
                };
                if let Some(macro_) = self.library.load(path) {
                    self.players.get_mut(key).play(macro_);
                }
            }
            ActionTrigger::Turbo(config) => {
                let fires = state.advance(config, pressed, tick_ms);
                for _ in 0..fires {
                    action.fire(sink);
                }
            }
            ActionTrigger::Single => {
                state.was_pressed = pressed;
                if press_edge {
                    action.fire(sink);
                }
            }
        }
    }

    /// Advance every playing macro; returns how many finished this tick.
    pub fn update_macro_playback(&mut self, tick_ms: u32, sink: &mut dyn InputSink) -> usize {
        self.players
            .iter_mut()
            .filter(|p| p.is_playing())
            .map(|p| p.update(tick_ms, sink))
            .filter(|done| *done)
            .count()
    }

    pub fn playing_macros(&mut self) -> usize {
        self.players.iter_mut().filter(|p| p.is_playing()).count()
    }

    /// Clear turbo records, stop macros, forget held buttons.
    pub fn reset(&mut self) {
        self.turbo.reset();
        self.players.iter_mut().for_each(MacroPlayer::stop);
        self.held = [None; Button::COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::turbo::TurboConfig;
    use crate::input::{InputEvent, KeyCode, RecordingSink};
    use crate::macros::{Macro, MacroStep};
    use crate::profile::{ActionKind, ButtonAction};

    const TICK: u32 = 16;

    fn engine_with(bindings: Vec<(LayeredButton, ButtonAction)>) -> CombatEngine {
        CombatEngine::new(bindings.into_iter().collect())
    }

    fn hold(engine: &mut CombatEngine, button: Button, ticks: u32, sink: &mut RecordingSink) {
        for _ in 0..ticks {
            engine.process_button(button, true, TICK, sink);
        }
    }

    #[test]
    fn test_single_fires_on_press_edge_only() {
        let mut engine = engine_with(vec![(
            LayeredButton::base(Button::A),
            ButtonAction::key(KeyCode::Z, "Attack"),
        )]);
        let mut sink = RecordingSink::new();
        hold(&mut engine, Button::A, 10, &mut sink);
        engine.process_button(Button::A, false, TICK, &mut sink);
        hold(&mut engine, Button::A, 1, &mut sink);
        assert_eq!(sink.key_taps(KeyCode::Z), 2);
    }

    #[test]
    fn test_unmapped_button_is_silent() {
        let mut engine = CombatEngine::default();
        let mut sink = RecordingSink::new();
        hold(&mut engine, Button::Y, 5, &mut sink);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_layer_selects_binding() {
        let mut engine = engine_with(vec![
            (LayeredButton::base(Button::B), ButtonAction::key(KeyCode::X, "Base")),
            (
                LayeredButton::new(Layer::L2, Button::B),
                ButtonAction::click(ActionKind::RightClick, "L2"),
            ),
        ]);
        let mut sink = RecordingSink::new();
        engine.update_layers(true, true);
        hold(&mut engine, Button::B, 1, &mut sink);
        assert_eq!(sink.events(), &[InputEvent::RightClick]);
    }

    #[test]
    fn test_turbo_fires_while_held() {
        let mut engine = engine_with(vec![(
            LayeredButton::base(Button::A),
            ButtonAction::key(KeyCode::Z, "Attack").with_turbo(TurboConfig::standard(100)),
        )]);
        let mut sink = RecordingSink::new();
        // 63 ticks = 1008 ms
        hold(&mut engine, Button::A, 63, &mut sink);
        assert_eq!(sink.key_taps(KeyCode::Z), 10);
    }

    #[test]
    fn test_layer_change_releases_old_binding() {
        let turbo = TurboConfig::adaptive(200, 50, 10);
        let mut engine = engine_with(vec![
            (
                LayeredButton::base(Button::X),
                ButtonAction::key(KeyCode::C, "Base").with_turbo(turbo.clone()),
            ),
            (
                LayeredButton::new(Layer::R2, Button::X),
                ButtonAction::key(KeyCode::V, "R2").with_turbo(turbo),
            ),
        ]);
        let mut sink = RecordingSink::new();
        hold(&mut engine, Button::X, 40, &mut sink);
        assert!(engine.turbo_state(LayeredButton::base(Button::X)).adaptive_step > 0);

        engine.update_layers(false, true);
        hold(&mut engine, Button::X, 1, &mut sink);
        assert_eq!(*engine.turbo_state(LayeredButton::base(Button::X)), TurboState::default());
        assert!(engine.turbo_state(LayeredButton::new(Layer::R2, Button::X)).was_pressed);
    }

    #[test]
    fn test_macro_starts_once_per_press() {
        let path = std::path::PathBuf::from("virtual/combo.json");
        let mut engine = engine_with(vec![(
            LayeredButton::base(Button::Y),
            ButtonAction::key(KeyCode::NONE, "Combo").with_macro(path.clone()),
        )]);
        engine.library_mut().insert(
            path,
            Macro::new("Combo", vec![MacroStep::key_press(KeyCode::Q, 50), MacroStep::left_click(50)]),
        );
        let mut sink = RecordingSink::new();

        hold(&mut engine, Button::Y, 3, &mut sink);
        assert!(sink.events().is_empty());
        assert_eq!(engine.playing_macros(), 1);

        let mut completed = 0;
        for _ in 0..20 {
            completed += engine.update_macro_playback(TICK, &mut sink);
        }
        assert_eq!(completed, 1);
        assert_eq!(sink.events(), &[InputEvent::TapKey { key: KeyCode::Q }, InputEvent::LeftClick]);
    }

    #[test]
    fn test_missing_macro_is_skipped() {
        let mut engine = engine_with(vec![(
            LayeredButton::base(Button::Y),
            ButtonAction::key(KeyCode::NONE, "Combo").with_macro("does/not/exist.json"),
        )]);
        let mut sink = RecordingSink::new();
        hold(&mut engine, Button::Y, 1, &mut sink);
        assert_eq!(engine.playing_macros(), 0);
        assert!(sink.events().is_empty());
    }
}
