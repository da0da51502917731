//! gp - headless harness for the gamepad assist engine
//!
//! Usage:
//!   gp simulate --script timeline.json --preset ranged --events out.json
//!   gp preset --name support --out support.json
//!   gp macro speed-up --in combo.json --out fast.json --factor 2

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use gp_cli::{
    describe_macro, load_script, resolve_profile, simulate, transform_macro, write_events,
    MacroTransform,
};
use gp_core::{Macro, Profile};

#[derive(Parser)]
#[command(name = "gp")]
#[command(about = "Drive the gamepad assist engine from scripted input", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted controller timeline and report what the engine emitted
    Simulate {
        /// JSON array of script frames
        #[arg(long)]
        script: PathBuf,

        /// Profile JSON file
        #[arg(long, conflicts_with = "preset")]
        profile: Option<PathBuf>,

        /// Built-in preset (melee, ranged, mage, support)
        #[arg(long)]
        preset: Option<String>,

        /// Write the tick-stamped event log here
        #[arg(long)]
        events: Option<PathBuf>,
    },
    /// Print or save a built-in preset
    Preset {
        #[arg(long)]
        name: String,

        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Inspect or transform a macro file
    Macro {
        #[command(subcommand)]
        action: MacroAction,
    },
}

#[derive(Subcommand)]
enum MacroAction {
    /// List the steps of a macro
    Show {
        #[arg(long)]
        r#in: PathBuf,
    },
    /// Drop sub-30 ms noise steps
    Optimize {
        #[arg(long)]
        r#in: PathBuf,

        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Divide every delay by the factor
    SpeedUp {
        #[arg(long)]
        r#in: PathBuf,

        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long, default_value_t = 2.0)]
        factor: f32,
    },
    /// Multiply every delay by the factor
    SlowDown {
        #[arg(long)]
        r#in: PathBuf,

        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long, default_value_t = 2.0)]
        factor: f32,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { script, profile, preset, events } => {
            let frames = load_script(&script)?;
            let profile = resolve_profile(profile.as_deref(), preset.as_deref())?;
            println!("Simulating {} frames from {}", frames.len(), script.display());

            let report = simulate(&frames, profile);
            report.print_summary();

            if let Some(path) = events {
                write_events(&path, &report.events)?;
                println!("Wrote {} events to {}", report.events.len(), path.display());
            }
        }
        Commands::Preset { name, out } => {
            let profile = Profile::builtin(&name)
                .with_context(|| format!("Unknown preset '{}'", name))?;
            match out {
                Some(path) => {
                    profile.save(&path)?;
                    println!("Saved '{}' to {}", profile.name, path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&profile)?),
            }
        }
        Commands::Macro { action } => run_macro_action(action)?,
    }

    Ok(())
}

fn run_macro_action(action: MacroAction) -> Result<()> {
    let (input, out, transform) = match action {
        MacroAction::Show { r#in } => {
            let macro_ = load_macro(&r#in)?;
            print!("{}", describe_macro(&macro_));
            return Ok(());
        }
        MacroAction::Optimize { r#in, out } => (r#in, out, MacroTransform::Optimize),
        MacroAction::SpeedUp { r#in, out, factor } => (r#in, out, MacroTransform::SpeedUp(factor)),
        MacroAction::SlowDown { r#in, out, factor } => {
            (r#in, out, MacroTransform::SlowDown(factor))
        }
    };

    let macro_ = load_macro(&input)?;
    let result = transform_macro(&macro_, transform)?;
    match out {
        Some(path) => {
            result
                .save(&path)
                .with_context(|| format!("Failed to write macro {}", path.display()))?;
            println!("Saved '{}' to {}", result.name, path.display());
        }
        None => println!("{}", result.to_json_string()?),
    }
    Ok(())
}

fn load_macro(path: &Path) -> Result<Macro> {
    Macro::load(path).with_context(|| format!("Failed to load macro {}", path.display()))
}
