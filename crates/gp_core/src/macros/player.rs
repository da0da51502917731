use std::sync::Arc;

use super::model::Macro;
use crate::input::InputSink;

/// Replays a macro on the tick timer. Each step waits its own delay, measured
/// from the previous step.
#[derive(Debug, Clone, Default)]
pub struct MacroPlayer {
    current: Option<Arc<Macro>>,
    index: usize,
    timer_ms: u32,
}

impl MacroPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref().map(|m| m.name.as_str())
    }

    /// Start playback. Ignored while already playing or for an empty macro.
    pub fn play(&mut self, macro_: Arc<Macro>) -> bool {
        if self.is_playing() || macro_.is_empty() {
            return false;
        }
        log::debug!("Macro '{}' playback started", macro_.name);
        self.current = Some(macro_);
        self.index = 0;
        self.timer_ms = 0;
        true
    }

    pub fn stop(&mut self) {
        self.current = None;
        self.index = 0;
        self.timer_ms = 0;
    }

    /// Advance by one tick, executing every step that has come due. Returns
    /// true on the tick playback completes.
    pub fn update(&mut self, tick_ms: u32, sink: &mut dyn InputSink) -> bool {
        let Some(current) = self.current.clone() else {
            return false;
        };
        self.timer_ms = self.timer_ms.saturating_add(tick_ms);
        while let Some(step) = current.steps.get(self.index) {
            if self.timer_ms < step.delay_ms {
                break;
            }
            self.timer_ms -= step.delay_ms;
            step.execute(sink);
            self.index += 1;
        }
        if self.index >= current.steps.len() {
            log::debug!("Macro '{}' playback completed", current.name);
            self.stop();
            return true;
        }
        false
    }
}
