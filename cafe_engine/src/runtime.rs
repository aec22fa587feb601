use std::{fs, path::Path};

use anyhow::{Context, Result};
use cafe_session::registry::PHOTO_COUNT_KEY;
use cafe_session::{AssetManifest, BootSummary, RegistrySnapshot};
use log::{info, warn};
use serde::Serialize;

use crate::audio_bridge::RecordingAudio;
use crate::cli::{Command, InspectArgs, PlayArgs};
use crate::location::LocationId;
use crate::machine::TransitionRecord;
use crate::render::RecordingRenderer;
use crate::script::InputScript;
use crate::session::{EngineConfig, SessionController};

pub fn execute(command: Command) -> Result<()> {
    match command {
        Command::Play(args) => play(args),
        Command::Inspect(args) => inspect(args),
    }
}

#[derive(Serialize)]
struct TransitionLog<'a> {
    transitions: &'a [TransitionRecord],
    ignored_requests: u64,
    replays: u32,
}

#[derive(Serialize)]
struct RegistryReport<'a> {
    current: RegistrySnapshot,
    finished_sessions: &'a [RegistrySnapshot],
}

fn load_manifest(path: Option<&Path>) -> Result<AssetManifest> {
    match path {
        Some(path) => AssetManifest::from_json_file(path),
        None => Ok(AssetManifest::builtin()),
    }
}

fn inspect(args: InspectArgs) -> Result<()> {
    let manifest = load_manifest(args.manifest.as_deref())?;
    let config = EngineConfig {
        control_scheme: args.control_scheme,
        manifest,
        ..EngineConfig::default()
    };
    let (controller, summary) =
        SessionController::boot(config, RecordingRenderer::new(), RecordingAudio::new());
    print_boot_summary(&summary);

    if let Some(path) = args.registry_json.as_ref() {
        let report = RegistryReport {
            current: controller.registry().snapshot(),
            finished_sessions: controller.finished_sessions(),
        };
        write_json(path, &report, "registry snapshot")?;
    }
    Ok(())
}

fn play(args: PlayArgs) -> Result<()> {
    let manifest = load_manifest(args.manifest.as_deref())?;
    let config = EngineConfig {
        tick_ms: args.tick_ms,
        control_scheme: args.control_scheme,
        manifest,
    };
    let renderer = RecordingRenderer::new();
    let audio = RecordingAudio::new();
    let (mut controller, summary) = SessionController::boot(config, renderer.clone(), audio.clone());
    print_boot_summary(&summary);

    let script = match args.script.as_ref() {
        Some(path) => InputScript::from_json_file(path)?,
        None => {
            let photos = controller
                .registry()
                .read_int(PHOTO_COUNT_KEY)
                .and_then(|count| u32::try_from(count).ok())
                .unwrap_or_default();
            InputScript::walkthrough(controller.tick_ms(), photos)
        }
    };
    if let Some(path) = args.script_json.as_ref() {
        write_json(path, &script, "input script")?;
    }

    let scripted = script.total_ticks();
    if scripted > args.max_ticks {
        warn!(
            "script covers {scripted} ticks; stopping after --max-ticks {}",
            args.max_ticks
        );
    }
    let limit = usize::try_from(args.max_ticks).unwrap_or(usize::MAX);
    let mut visited = vec![controller.current_location()];
    for input in script.inputs().take(limit) {
        controller.tick(input);
        let location = controller.current_location();
        if visited.last() != Some(&location) {
            info!("tick {}: now in {location}", controller.ticks());
            visited.push(location);
        }
    }

    print_run_summary(&controller, &visited);

    if let Some(path) = args.render_log_json.as_ref() {
        write_json(path, &renderer.events(), "render event log")?;
    }
    if let Some(path) = args.audio_log_json.as_ref() {
        write_json(path, &audio.events(), "audio event log")?;
    }
    if let Some(path) = args.event_log_json.as_ref() {
        let log = TransitionLog {
            transitions: controller.transitions(),
            ignored_requests: controller.ignored_transition_requests(),
            replays: controller.replays(),
        };
        write_json(path, &log, "transition log")?;
    }
    if let Some(path) = args.movement_log_json.as_ref() {
        write_json(path, controller.movement_trace(), "movement log")?;
    }
    if let Some(path) = args.registry_json.as_ref() {
        let report = RegistryReport {
            current: controller.registry().snapshot(),
            finished_sessions: controller.finished_sessions(),
        };
        write_json(path, &report, "registry snapshot")?;
    }

    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, what: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serializing {what} to JSON"))?;
    fs::write(path, json).with_context(|| format!("writing {what} to {}", path.display()))?;
    println!("Saved {what} to {}", path.display());
    Ok(())
}

fn print_boot_summary(summary: &BootSummary) {
    println!(
        "Session {} | controls: {} | first location: {}",
        summary.session, summary.control_scheme, summary.first_location
    );
    println!(
        "Resources -> sprites: {} | audio cues: {} | photos: {}",
        summary.resource_counts.sprites,
        summary.resource_counts.audio_cues,
        summary.resource_counts.photos
    );
    println!("\nBoot stages:");
    for (index, stage) in summary.stages.iter().enumerate() {
        println!("  {:>2}. {}", index + 1, stage.describe());
    }
}

fn print_run_summary(
    controller: &SessionController<RecordingRenderer, RecordingAudio>,
    visited: &[LocationId],
) {
    let path: Vec<&str> = visited.iter().map(LocationId::name).collect();
    println!(
        "\nPlayed {} ticks ({} ms simulated)",
        controller.ticks(),
        controller.now_ms()
    );
    println!("Locations: {}", path.join(" -> "));
    println!(
        "Transitions: {} started | {} requests ignored | {} replays",
        controller.transitions().len(),
        controller.ignored_transition_requests(),
        controller.replays()
    );

    let sessions = controller
        .finished_sessions()
        .iter()
        .cloned()
        .chain(std::iter::once(controller.registry().snapshot()));
    for snapshot in sessions {
        let drink = snapshot
            .selected_drink
            .map(|drink| drink.name())
            .unwrap_or("none");
        let found: Vec<&str> = snapshot
            .found_curiosities
            .iter()
            .map(|id| id.slug())
            .collect();
        println!(
            "  session {}: drink {drink} | curiosities {}/{} [{}] | letter read: {}",
            snapshot.session,
            found.len(),
            cafe_session::CURIOSITY_COUNT,
            found.join(", "),
            snapshot.letter_read
        );
    }
}
