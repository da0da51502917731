//! Turbo Resolver
//!
//! Decides, per tick, how many times a held turbo button fires.
//!
//! ## Modes
//! - **Standard**: fixed interval
//! - **Burst**: `burst_count` fires at `interval_ms`, then a `burst_pause_ms` pause
//! - **Rhythmic**: cycle through `rhythm_pattern`; empty pattern behaves as Standard
//! - **Adaptive**: interval slides from the slow end to the fast end over
//!   `adaptive_steps` consecutive fires
//!
//! Held time carries its remainder past each fire, so over `T` ms of holding a
//! Standard turbo fires exactly `⌊T / interval⌋` times regardless of tick size.
//! Every interval is clamped to `MIN_INTERVAL_MS`.

use serde::{Deserialize, Serialize};

/// Safety floor for every turbo interval.
pub const MIN_INTERVAL_MS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TurboMode {
    #[default]
    Standard,
    Burst,
    Rhythmic,
    Adaptive,
}

/// Turbo timing for one binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurboConfig {
    pub mode: TurboMode,
    /// Fire interval, ms (default: 100)
    pub interval_ms: u32,

    // === Burst ===
    /// Fires per burst (default: 5)
    pub burst_count: u32,
    /// Pause after a burst, ms (default: 500)
    pub burst_pause_ms: u32,

    // === Rhythmic ===
    /// Ordered intervals, ms (default: empty)
    pub rhythm_pattern: Vec<u32>,

    // === Adaptive ===
    /// Interval at step 0, ms (default: 200)
    pub adaptive_min_ms: u32,
    /// Interval at the last step, ms (default: 50)
    pub adaptive_max_ms: u32,
    /// Fires needed to reach full speed (default: 10)
    pub adaptive_steps: u32,
}

impl Default for TurboConfig {
    fn default() -> Self {
        Self {
            mode: TurboMode::Standard,
            interval_ms: 100,
            burst_count: 5,
            burst_pause_ms: 500,
            rhythm_pattern: Vec::new(),
            adaptive_min_ms: 200,
            adaptive_max_ms: 50,
            adaptive_steps: 10,
        }
    }
}

impl TurboConfig {
    pub fn standard(interval_ms: u32) -> Self {
        Self { interval_ms, ..Default::default() }
    }

    pub fn burst(interval_ms: u32, burst_count: u32, burst_pause_ms: u32) -> Self {
        Self { mode: TurboMode::Burst, interval_ms, burst_count, burst_pause_ms, ..Default::default() }
    }

    pub fn rhythmic(pattern: Vec<u32>) -> Self {
        Self { mode: TurboMode::Rhythmic, rhythm_pattern: pattern, ..Default::default() }
    }

    pub fn adaptive(slow_ms: u32, fast_ms: u32, steps: u32) -> Self {
        Self {
            mode: TurboMode::Adaptive,
            adaptive_min_ms: slow_ms,
            adaptive_max_ms: fast_ms,
            adaptive_steps: steps,
            ..Default::default()
        }
    }

    /// Base interval after the floor clamp.
    pub fn interval(&self) -> u32 {
        self.interval_ms.max(MIN_INTERVAL_MS)
    }

    /// Rhythm interval at `index` (wrapping), or `None` without a pattern.
    pub fn rhythm_interval(&self, index: usize) -> Option<u32> {
        if self.rhythm_pattern.is_empty() {
            return None;
        }
        let ms = self.rhythm_pattern[index % self.rhythm_pattern.len()];
        Some(ms.max(MIN_INTERVAL_MS))
    }

    /// Adaptive interval at `step`: linear from the slow end (step 0) to the
    /// fast end (step = `adaptive_steps`), never below the fast end.
    pub fn adaptive_interval(&self, step: u32) -> u32 {
        let slow = self.adaptive_min_ms.max(self.adaptive_max_ms).max(MIN_INTERVAL_MS);
        let fast = self.adaptive_min_ms.min(self.adaptive_max_ms).max(MIN_INTERVAL_MS);
        if self.adaptive_steps == 0 {
            return fast;
        }
        let progress = (step.min(self.adaptive_steps) as f32) / (self.adaptive_steps as f32);
        let interval = slow as f32 - progress * (slow - fast) as f32;
        (interval.round() as u32).clamp(fast, slow)
    }
}

/// Per-binding turbo record; lives in the combat engine's button arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurboState {
    pub was_pressed: bool,
    pub hold_ms: u32,
    pub burst_counter: u32,
    pub in_burst_pause: bool,
    pub rhythm_index: usize,
    pub adaptive_step: u32,
}

impl TurboState {
    /// Advance one tick; returns how many times the action fires now.
    pub fn advance(&mut self, config: &TurboConfig, pressed: bool, tick_ms: u32) -> u32 {
        if !pressed {
            self.release();
            return 0;
        }
        self.was_pressed = true;
        self.hold_ms = self.hold_ms.saturating_add(tick_ms);

        match config.mode {
            TurboMode::Standard => self.fire_fixed(config.interval()),
            TurboMode::Burst => self.advance_burst(config),
            TurboMode::Rhythmic if config.rhythm_pattern.is_empty() => {
                self.fire_fixed(config.interval())
            }
            TurboMode::Rhythmic => self.advance_rhythmic(config),
            TurboMode::Adaptive => self.advance_adaptive(config),
        }
    }

    /// Back to initial values; a released button starts from scratch.
    pub fn release(&mut self) {
        *self = Self::default();
    }

    fn fire_fixed(&mut self, interval: u32) -> u32 {
        let mut fires = 0;
        while self.hold_ms >= interval {
            self.hold_ms -= interval;
            fires += 1;
        }
        fires
    }

    fn advance_burst(&mut self, config: &TurboConfig) -> u32 {
        let interval = config.interval();
        let burst_count = config.burst_count.max(1);
        let mut fires = 0;
        loop {
            if self.in_burst_pause {
                if self.hold_ms < config.burst_pause_ms {
                    break;
                }
                self.hold_ms -= config.burst_pause_ms;
                self.in_burst_pause = false;
                self.burst_counter = 0;
            } else {
                if self.hold_ms < interval {
                    break;
                }
                self.hold_ms -= interval;
                fires += 1;
                self.burst_counter += 1;
                if self.burst_counter >= burst_count {
                    // Pause is measured from the last fire of the burst.
                    self.in_burst_pause = true;
                    self.burst_counter = 0;
                    self.hold_ms = 0;
                }
            }
        }
        fires
    }

    fn advance_rhythmic(&mut self, config: &TurboConfig) -> u32 {
        let mut fires = 0;
        while let Some(interval) = config.rhythm_interval(self.rhythm_index) {
            if self.hold_ms < interval {
                break;
            }
            self.hold_ms -= interval;
            fires += 1;
            self.rhythm_index = (self.rhythm_index + 1) % config.rhythm_pattern.len();
        }
        fires
    }

    fn advance_adaptive(&mut self, config: &TurboConfig) -> u32 {
        let mut fires = 0;
        loop {
            let interval = config.adaptive_interval(self.adaptive_step);
            if self.hold_ms < interval {
                break;
            }
            self.hold_ms -= interval;
            fires += 1;
            if self.adaptive_step < config.adaptive_steps {
                self.adaptive_step += 1;
            }
        }
        fires
    }
}
