//! Headless harness
//!
//! Replays a scripted controller timeline through the orchestrator without
//! sleeping, collecting every actuator call with the tick it happened on.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use gp_core::input::{InputEvent, InputSink, KeyCode, ScriptFrame, ScriptedSource};
use gp_core::orchestrator::{EngineStatus, Orchestrator, StatusSnapshot};
use gp_core::{Macro, Profile};

/// Profile used when neither a file nor a preset is given.
pub const DEFAULT_PRESET: &str = "melee";

/// One actuator call and the tick it was issued on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedEvent {
    pub tick: u64,
    #[serde(flatten)]
    pub event: InputEvent,
}

/// Records calls stamped with the current tick.
#[derive(Debug, Default)]
pub struct TickStampedSink {
    tick: u64,
    events: Vec<TimedEvent>,
}

impl TickStampedSink {
    pub fn next_tick(&mut self) {
        self.tick += 1;
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TimedEvent> {
        self.events
    }

    fn push(&mut self, event: InputEvent) {
        self.events.push(TimedEvent { tick: self.tick, event });
    }
}

impl InputSink for TickStampedSink {
    fn move_mouse_relative(&mut self, dx: i32, dy: i32) {
        if dx != 0 || dy != 0 {
            self.push(InputEvent::MoveMouse { dx, dy });
        }
    }

    fn left_click(&mut self) {
        self.push(InputEvent::LeftClick);
    }

    fn right_click(&mut self) {
        self.push(InputEvent::RightClick);
    }

    fn left_button_down(&mut self) {
        self.push(InputEvent::LeftDown);
    }

    fn left_button_up(&mut self) {
        self.push(InputEvent::LeftUp);
    }

    fn tap_key(&mut self, key: KeyCode) {
        self.push(InputEvent::TapKey { key });
    }

    fn scroll_wheel(&mut self, delta: i32) {
        self.push(InputEvent::Scroll { delta });
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub profile: String,
    pub ticks: u64,
    pub event_counts: BTreeMap<&'static str, usize>,
    pub final_status: StatusSnapshot,
    #[serde(skip)]
    pub events: Vec<TimedEvent>,
}

impl SimulationReport {
    pub fn print_summary(&self) {
        println!("Profile:  {}", self.profile);
        println!("Ticks:    {}", self.ticks);
        println!("Events:   {}", self.events.len());
        for (kind, count) in &self.event_counts {
            println!("  {:<12} {}", kind, count);
        }
        println!("Status:   {}", self.final_status.summary());
    }
}

/// Script file: a JSON array of frames.
pub fn load_script(path: &Path) -> Result<Vec<ScriptFrame>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    let frames: Vec<ScriptFrame> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse script {}", path.display()))?;
    Ok(frames)
}

/// Profile file wins over preset; neither means the default preset.
pub fn resolve_profile(profile: Option<&Path>, preset: Option<&str>) -> Result<Profile> {
    if let Some(path) = profile {
        return Profile::load(path)
            .with_context(|| format!("Failed to load profile {}", path.display()));
    }
    let name = preset.unwrap_or(DEFAULT_PRESET);
    Profile::builtin(name).with_context(|| format!("Failed to resolve preset '{}'", name))
}

/// Run the whole script through a fresh orchestrator.
pub fn simulate(frames: &[ScriptFrame], profile: Profile) -> SimulationReport {
    let tick_ms = profile.engine.tick.tick_ms;
    let profile_name = profile.name.clone();
    let source = ScriptedSource::from_frames(frames, tick_ms);
    let mut orchestrator = Orchestrator::new(source, TickStampedSink::default(), profile);

    if orchestrator.start() == EngineStatus::Running {
        while orchestrator.tick() == EngineStatus::Running {
            orchestrator.sink_mut().next_tick();
        }
    }

    let final_status = orchestrator.status().clone();
    let ticks = orchestrator.ticks();
    let events = orchestrator.into_sink().into_events();
    let mut event_counts = BTreeMap::new();
    for timed in &events {
        *event_counts.entry(timed.event.kind()).or_insert(0) += 1;
    }
    log::info!("Simulated {} ticks, {} events", ticks, events.len());

    SimulationReport { profile: profile_name, ticks, event_counts, final_status, events }
}

pub fn write_events(path: &Path, events: &[TimedEvent]) -> Result<()> {
    let json = serde_json::to_string_pretty(events)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write events to {}", path.display()))?;
    Ok(())
}

/// Delay transforms offered by `gp macro`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MacroTransform {
    Optimize,
    SpeedUp(f32),
    SlowDown(f32),
}

pub fn transform_macro(macro_: &Macro, transform: MacroTransform) -> Result<Macro> {
    let out = match transform {
        MacroTransform::Optimize => macro_.optimize(),
        MacroTransform::SpeedUp(factor) => macro_.speed_up(factor)?,
        MacroTransform::SlowDown(factor) => macro_.slow_down(factor)?,
    };
    log::info!(
        "'{}': {} steps, {} ms -> '{}': {} steps, {} ms",
        macro_.name,
        macro_.steps.len(),
        macro_.total_duration_ms,
        out.name,
        out.steps.len(),
        out.total_duration_ms
    );
    Ok(out)
}

pub fn describe_macro(macro_: &Macro) -> String {
    let mut text = format!(
        "{} ({} steps, {} ms, created {})\n",
        macro_.name,
        macro_.steps.len(),
        macro_.total_duration_ms,
        macro_.created_at.format("%Y-%m-%d %H:%M")
    );
    if !macro_.description.is_empty() {
        text.push_str(&format!("  {}\n", macro_.description));
    }
    for (i, step) in macro_.steps.iter().enumerate() {
        text.push_str(&format!("  {:>3}. {}\n", i + 1, step));
    }
    text
}
