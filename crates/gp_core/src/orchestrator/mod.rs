//! Orchestrator
//!
//! Owns the controller source, the actuator and every engine, and advances
//! them on a fixed tick. External control goes through `EngineCommand`s that
//! are drained at the start of each tick; status goes out as an immutable
//! `StatusSnapshot` after each tick.
//!
//! ## Usage
//! ```no_run
//! use gp_core::input::{RecordingSink, ScriptedSource};
//! use gp_core::orchestrator::Orchestrator;
//! use gp_core::profile::Profile;
//!
//! let profile = Profile::builtin("ranged").unwrap();
//! let source = ScriptedSource::from_frames(&[], 16);
//! let mut orchestrator = Orchestrator::new(source, RecordingSink::new(), profile);
//! let ticks = orchestrator.run_until_disconnected();
//! println!("{} ticks, {}", ticks, orchestrator.status().summary());
//! ```

pub mod arbitration;
pub mod command;
pub mod dispatch;
pub mod status;


pub use arbitration::{arbitrate, EngineKind, RightStickOwner};
pub use command::EngineCommand;
pub use dispatch::EngineSet;
pub use status::{EngineStatus, StatusSnapshot};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::{Duration, Instant};

use crate::debug_flags;
use crate::engine::{AutoTargetEngine, CombatEngine, KiteEngine, MageEngine, MovementEngine, SupportEngine};
use crate::error::Result;
use crate::input::{ControllerSource, GamepadSnapshot, InputSink, LoggingSink};
use crate::profile::Profile;

pub struct Orchestrator<S, A> {
    source: S,
    sink: A,
    trace_inputs: bool,
    profile: Profile,
    engines: EngineSet,
    status: EngineStatus,
    tick_count: u64,
    commands_tx: Sender<EngineCommand>,
    commands_rx: Receiver<EngineCommand>,
    subscribers: Vec<Sender<StatusSnapshot>>,
    last_status: StatusSnapshot,
}

impl<S: ControllerSource, A: InputSink> Orchestrator<S, A> {
    pub fn new(source: S, sink: A, profile: Profile) -> Self {
        let (commands_tx, commands_rx) = channel();
        let trace_inputs = debug_flags::trace_inputs_enabled();
        if trace_inputs {
            log::info!("Input tracing enabled");
        }
        Self {
            engines: EngineSet::from_profile(&profile),
            source,
            sink,
            trace_inputs,
            profile,
            status: EngineStatus::Stopped,
            tick_count: 0,
            commands_tx,
            commands_rx,
            subscribers: Vec::new(),
            last_status: StatusSnapshot::default(),
        }
    }

    // === Accessors ===

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut A {
        &mut self.sink
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_sink(self) -> A {
        self.sink
    }

    pub fn engines(&self) -> &EngineSet {
        &self.engines
    }

    pub fn movement(&self) -> &MovementEngine {
        &self.engines.movement
    }

    pub fn combat(&self) -> &CombatEngine {
        &self.engines.combat
    }

    pub fn auto_target(&self) -> &AutoTargetEngine {
        &self.engines.auto_target
    }

    pub fn kite(&self) -> &KiteEngine {
        &self.engines.kite
    }

    pub fn mage(&self) -> &MageEngine {
        &self.engines.mage
    }

    pub fn support(&self) -> &SupportEngine {
        &self.engines.support
    }

    pub fn ticks(&self) -> u64 {
        self.tick_count
    }

    // === Lifecycle ===

    pub fn is_running(&self) -> bool {
        self.status == EngineStatus::Running
    }

    /// Start ticking. Refuses without a connected controller.
    pub fn start(&mut self) -> EngineStatus {
        if self.is_running() {
            return self.status;
        }
        if !self.source.is_connected() {
            log::warn!("No controller connected; not starting");
            self.status = EngineStatus::NoController;
            self.publish();
            return self.status;
        }
        self.with_sink(|engines, sink| engines.start(sink));
        self.status = EngineStatus::Running;
        log::info!("Engine started with '{}' on {}", self.profile.name, self.source.name());
        self.publish();
        self.status
    }

    /// Stop ticking; releases movement and drops auto-target to Idle.
    pub fn stop(&mut self) {
        self.with_sink(|engines, sink| engines.stop(sink));
        if self.status == EngineStatus::Running {
            self.status = EngineStatus::Stopped;
        }
        log::info!("Engine stopped after {} ticks", self.tick_count);
        self.publish();
    }

    // === Control ===

    /// Sender for commands applied at the start of the next tick.
    pub fn command_sender(&self) -> Sender<EngineCommand> {
        self.commands_tx.clone()
    }

    /// Last published status.
    pub fn status(&self) -> &StatusSnapshot {
        &self.last_status
    }

    /// Receiver fed one snapshot per tick. Dropped receivers are pruned.
    pub fn subscribe_status(&mut self) -> Receiver<StatusSnapshot> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Validate and apply a profile immediately.
    pub fn load_profile(&mut self, profile: Profile) -> Result<()> {
        profile.validate()?;
        self.with_sink(|engines, sink| engines.load_profile(&profile, sink));
        log::info!("Profile '{}' loaded", profile.name);
        self.profile = profile;
        Ok(())
    }

    // === Tick ===

    /// Read the controller and run one tick. A missing controller stops the
    /// loop with `NoController`.
    pub fn tick(&mut self) -> EngineStatus {
        if !self.is_running() {
            return self.status;
        }
        let raw = if self.source.is_connected() { self.source.read() } else { None };
        let Some(raw) = raw else {
            log::warn!("Controller disconnected after {} ticks", self.tick_count);
            self.with_sink(|engines, sink| engines.stop(sink));
            self.status = EngineStatus::NoController;
            self.publish();
            return self.status;
        };
        self.process_snapshot(&GamepadSnapshot::from_raw(&raw));
        self.status
    }

    /// Run one tick against an already-normalized snapshot.
    pub fn process_snapshot(&mut self, snapshot: &GamepadSnapshot) {
        while let Ok(command) = self.commands_rx.try_recv() {
            if let EngineCommand::LoadProfile(profile) = &command {
                if profile.validate().is_ok() {
                    self.profile = (**profile).clone();
                }
            }
            self.with_sink(|engines, sink| engines.apply(command, sink));
        }
        self.with_sink(|engines, sink| engines.step(snapshot, sink));
        self.tick_count += 1;
        self.publish();
    }

    /// Fixed-rate loop until `stop` is set or the controller goes away.
    pub fn run(&mut self, stop: &AtomicBool) -> EngineStatus {
        if self.start() != EngineStatus::Running {
            return self.status;
        }
        let period = Duration::from_millis(u64::from(self.engines.tick_ms()));
        let mut next = Instant::now();
        while !stop.load(Ordering::Relaxed) {
            if self.tick() != EngineStatus::Running {
                return self.status;
            }
            next += period;
            let now = Instant::now();
            if next > now {
                std::thread::sleep(next - now);
            } else {
                // Behind schedule: resync instead of bursting.
                next = now;
            }
        }
        self.stop();
        self.status
    }

    /// Tick back to back (no sleeping) until the source runs dry. Returns the
    /// number of ticks run.
    pub fn run_until_disconnected(&mut self) -> u64 {
        let start = self.tick_count;
        if self.start() == EngineStatus::Running {
            while self.tick() == EngineStatus::Running {}
        }
        self.tick_count - start
    }

    fn with_sink<R>(&mut self, f: impl FnOnce(&mut EngineSet, &mut dyn InputSink) -> R) -> R {
        if self.trace_inputs {
            let mut traced = LoggingSink::new(&mut self.sink);
            f(&mut self.engines, &mut traced)
        } else {
            f(&mut self.engines, &mut self.sink)
        }
    }

    fn publish(&mut self) {
        let snapshot = self.engines.snapshot(self.status, self.source.name(), self.tick_count);
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
        self.last_status = snapshot;
    }
}
