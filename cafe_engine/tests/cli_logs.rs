use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tempfile::tempdir;

#[derive(Debug, Deserialize)]
struct TransitionRecord {
    from: String,
    to: String,
    fade_ms: u64,
    requested_at_ms: u64,
    completed_at_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TransitionLog {
    transitions: Vec<TransitionRecord>,
    ignored_requests: u64,
    replays: u32,
}

#[derive(Debug, Deserialize)]
struct RegistrySnapshot {
    session: u32,
    selected_drink: Option<String>,
    found_curiosities: Vec<String>,
    letter_read: bool,
}

#[derive(Debug, Deserialize)]
struct RegistryReport {
    current: RegistrySnapshot,
    finished_sessions: Vec<RegistrySnapshot>,
}

#[derive(Debug, Deserialize)]
struct MovementSample {
    tick: u64,
    location: String,
    position: [f32; 2],
    texture: String,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str().context("temporary path is not valid UTF-8")
}

#[test]
fn walkthrough_writes_consistent_logs() -> Result<()> {
    let temp_dir = tempdir().context("creating temporary directory for run logs")?;
    let events = temp_dir.path().join("events.json");
    let registry = temp_dir.path().join("registry.json");
    let movement = temp_dir.path().join("movement.json");
    let audio = temp_dir.path().join("audio.json");

    let status = Command::new(env!("CARGO_BIN_EXE_cafe_engine"))
        .args([
            "--event-log-json",
            path_arg(&events)?,
            "--registry-json",
            path_arg(&registry)?,
            "--movement-log-json",
            path_arg(&movement)?,
            "--audio-log-json",
            path_arg(&audio)?,
        ])
        .status()
        .context("executing cafe_engine walkthrough")?;
    assert!(status.success(), "cafe_engine exited with {status:?}");

    let log: TransitionLog = read_json(&events)?;
    let route: Vec<(&str, &str)> = log
        .transitions
        .iter()
        .map(|record| (record.from.as_str(), record.to.as_str()))
        .collect();
    assert_eq!(route.first(), Some(&("boot", "street")));
    assert!(route.contains(&("entrance", "cafe-interior")));
    assert_eq!(route.last(), Some(&("end", "street")));
    assert_eq!(log.replays, 1);
    assert!(log.ignored_requests > 0);
    for record in &log.transitions {
        let completed = record
            .completed_at_ms
            .context("every transition in the walkthrough completes")?;
        assert!(completed >= record.requested_at_ms + record.fade_ms);
    }

    let report: RegistryReport = read_json(&registry)?;
    assert_eq!(report.finished_sessions.len(), 1);
    let finished = &report.finished_sessions[0];
    assert_eq!(finished.selected_drink.as_deref(), Some("palestinian-mint"));
    assert_eq!(finished.found_curiosities.len(), 7);
    assert!(finished.letter_read);
    assert_eq!(report.current.session, finished.session + 1);
    assert!(report.current.found_curiosities.is_empty());

    let samples: Vec<MovementSample> = read_json(&movement)?;
    assert!(!samples.is_empty());
    assert!(samples.windows(2).all(|pair| pair[0].tick < pair[1].tick));
    assert!(samples
        .iter()
        .filter(|sample| sample.location == "street")
        .all(|sample| sample.position[1] == 620.0));
    assert!(samples.iter().any(|sample| sample.texture.starts_with("walk-")));

    let audio_events: Vec<serde_json::Value> = read_json(&audio)?;
    assert!(audio_events
        .iter()
        .any(|event| event["kind"] == "play" && event["cue"] == "birthday-music"));
    Ok(())
}

#[test]
fn inspect_prints_boot_summary_without_ticking() -> Result<()> {
    let temp_dir = tempdir().context("creating temporary directory")?;
    let registry = temp_dir.path().join("registry.json");

    let output = Command::new(env!("CARGO_BIN_EXE_cafe_engine"))
        .args([
            "--inspect",
            "--control-scheme",
            "touch",
            "--registry-json",
            path_arg(&registry)?,
        ])
        .output()
        .context("executing cafe_engine --inspect")?;
    assert!(output.status.success(), "cafe_engine exited with {:?}", output.status);

    let stdout = String::from_utf8(output.stdout).context("stdout is UTF-8")?;
    assert!(stdout.contains("controls: touch"));
    assert!(stdout.contains("photos: 52"));

    let report: RegistryReport = read_json(&registry)?;
    assert_eq!(report.current.session, 1);
    assert!(report.current.selected_drink.is_none());
    assert!(report.finished_sessions.is_empty());
    Ok(())
}

#[test]
fn malformed_script_is_reported() -> Result<()> {
    let temp_dir = tempdir().context("creating temporary directory")?;
    let script = temp_dir.path().join("script.json");
    fs::write(&script, r#"{"segments":[{"ticks":0}]}"#)?;

    let output = Command::new(env!("CARGO_BIN_EXE_cafe_engine"))
        .args(["--script", path_arg(&script)?])
        .output()
        .context("executing cafe_engine with a bad script")?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("zero ticks"), "unexpected stderr: {stderr}");
    Ok(())
}
