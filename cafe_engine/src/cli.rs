use std::path::PathBuf;

use anyhow::{bail, Result};
use cafe_session::ControlScheme;
use clap::Parser;

use crate::session::{DEFAULT_TICK_MS, MAX_TICK_MS};

pub const DEFAULT_MAX_TICKS: u64 = 50_000;

#[derive(Parser, Debug)]
#[command(
    about = "Headless host for the birthday cafe story: boots a session and plays it from scripted input",
    version
)]
pub struct Args {
    /// Milliseconds of simulated time per tick (1 to 1000)
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Input sources live for the session (keyboard, touch, both)
    #[arg(long, default_value_t = ControlScheme::Keyboard)]
    pub control_scheme: ControlScheme,

    /// Optional JSON asset manifest; the built-in manifest is used otherwise
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// JSON input script to play instead of the built-in walkthrough
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Stop after this many ticks even if the script has more input
    #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
    pub max_ticks: u64,

    /// Print the boot summary and exit without ticking the session
    #[arg(long)]
    pub inspect: bool,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,

    /// Path to write every render call as JSON
    #[arg(long)]
    pub render_log_json: Option<PathBuf>,

    /// Path to write every audio call as JSON
    #[arg(long)]
    pub audio_log_json: Option<PathBuf>,

    /// Path to write the location transition log as JSON
    #[arg(long)]
    pub event_log_json: Option<PathBuf>,

    /// Path to write the per-tick actor trajectory as JSON
    #[arg(long)]
    pub movement_log_json: Option<PathBuf>,

    /// Path to write the final registry snapshot as JSON
    #[arg(long)]
    pub registry_json: Option<PathBuf>,

    /// Path to write the script that was played as JSON
    #[arg(long)]
    pub script_json: Option<PathBuf>,
}

#[derive(Debug)]
pub enum Command {
    Play(PlayArgs),
    Inspect(InspectArgs),
}

#[derive(Debug)]
pub struct PlayArgs {
    pub tick_ms: u64,
    pub control_scheme: ControlScheme,
    pub manifest: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub max_ticks: u64,
    pub render_log_json: Option<PathBuf>,
    pub audio_log_json: Option<PathBuf>,
    pub event_log_json: Option<PathBuf>,
    pub movement_log_json: Option<PathBuf>,
    pub registry_json: Option<PathBuf>,
    pub script_json: Option<PathBuf>,
}

#[derive(Debug)]
pub struct InspectArgs {
    pub control_scheme: ControlScheme,
    pub manifest: Option<PathBuf>,
    pub registry_json: Option<PathBuf>,
}

pub fn parse() -> Result<(Command, bool)> {
    let args = Args::parse();
    let verbose = args.verbose;
    Ok((args.into_command()?, verbose))
}

impl Args {
    pub fn into_command(self) -> Result<Command> {
        if self.tick_ms == 0 {
            bail!("--tick-ms must be at least 1");
        }
        if self.tick_ms > MAX_TICK_MS {
            bail!(
                "--tick-ms {} is longer than the {MAX_TICK_MS} ms limit",
                self.tick_ms
            );
        }

        if self.inspect {
            if self.script.is_some() {
                bail!("--script has no effect with --inspect");
            }
            Ok(Command::Inspect(InspectArgs {
                control_scheme: self.control_scheme,
                manifest: self.manifest,
                registry_json: self.registry_json,
            }))
        } else {
            Ok(Command::Play(PlayArgs {
                tick_ms: self.tick_ms,
                control_scheme: self.control_scheme,
                manifest: self.manifest,
                script: self.script,
                max_ticks: self.max_ticks,
                render_log_json: self.render_log_json,
                audio_log_json: self.audio_log_json,
                event_log_json: self.event_log_json,
                movement_log_json: self.movement_log_json,
                registry_json: self.registry_json,
                script_json: self.script_json,
            }))
        }
    }
}
