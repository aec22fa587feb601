use cafe_engine::audio_bridge::{AudioEvent, AudioHandle, AudioSink, PlayParams};
use cafe_engine::error::CollaboratorError;
use cafe_engine::render::Renderer;
use cafe_engine::{
    EngineConfig, InputScript, LocationId, RecordingAudio, RecordingRenderer, RenderEvent,
    SessionController,
};
use cafe_session::{ControlScheme, CuriosityId, DrinkId, CURIOSITY_COUNT};
use glam::Vec2;

const PHOTOS: u32 = 52;

fn config(scheme: ControlScheme, tick_ms: u64) -> EngineConfig {
    EngineConfig {
        tick_ms,
        control_scheme: scheme,
        ..EngineConfig::default()
    }
}

fn play<R: Renderer, A: AudioSink>(controller: &mut SessionController<R, A>, script: &InputScript) {
    for input in script.inputs() {
        controller.tick(input);
    }
}

fn visited(records: &[cafe_engine::TransitionRecord]) -> Vec<(LocationId, LocationId)> {
    records.iter().map(|record| (record.from, record.to)).collect()
}

const FULL_PASS: [(LocationId, LocationId); 9] = [
    (LocationId::Boot, LocationId::Street),
    (LocationId::Street, LocationId::Entrance),
    (LocationId::Entrance, LocationId::CafeInterior),
    (LocationId::CafeInterior, LocationId::Table),
    (LocationId::Table, LocationId::Celebration),
    (LocationId::Celebration, LocationId::Letter),
    (LocationId::Letter, LocationId::Exploration),
    (LocationId::Exploration, LocationId::End),
    (LocationId::End, LocationId::Street),
];

#[test]
fn walkthrough_finds_everything_and_replays() {
    let renderer = RecordingRenderer::new();
    let audio = RecordingAudio::new();
    let (mut controller, summary) = SessionController::boot(
        config(ControlScheme::Keyboard, 16),
        renderer.clone(),
        audio.clone(),
    );
    assert_eq!(summary.resource_counts.photos, PHOTOS as usize);

    play(&mut controller, &InputScript::walkthrough(16, PHOTOS));

    assert_eq!(visited(controller.transitions()), FULL_PASS.to_vec());
    assert!(controller
        .transitions()
        .iter()
        .all(|record| record.completed_at_ms.is_some()));
    assert_eq!(controller.current_location(), LocationId::Street);
    assert_eq!(controller.replays(), 1);

    let finished = &controller.finished_sessions()[0];
    assert_eq!(finished.selected_drink, Some(DrinkId::ALL[2]));
    assert_eq!(finished.found_curiosities.len(), CURIOSITY_COUNT);
    assert_eq!(finished.found_curiosities[0], CuriosityId::Piano);
    assert!(finished.letter_read);
    assert!(finished.complete);

    let registry = controller.registry();
    assert_eq!(registry.found_count(), 0);
    assert_eq!(registry.selected_drink(), None);
    assert!(!registry.letter_read());
    assert_eq!(registry.generation(), finished.session + 1);

    assert_eq!(renderer.texts_for("completion").len(), 1);
    let photos = renderer
        .events()
        .iter()
        .filter(|event| matches!(event, RenderEvent::Effect { name, .. } if name.starts_with("photo-")))
        .count();
    assert_eq!(photos, PHOTOS as usize);
    assert!(renderer
        .prompts()
        .iter()
        .any(|prompt| prompt == "Press SPACE to play again"));
}

#[test]
fn walkthrough_holds_at_coarse_ticks_with_both_sources() {
    let renderer = RecordingRenderer::new();
    let (mut controller, _) = SessionController::boot(
        config(ControlScheme::Both, 33),
        renderer,
        RecordingAudio::new(),
    );
    play(&mut controller, &InputScript::walkthrough(33, PHOTOS));

    assert_eq!(visited(controller.transitions()), FULL_PASS.to_vec());
    let finished = &controller.finished_sessions()[0];
    assert_eq!(finished.found_curiosities.len(), CURIOSITY_COUNT);
    assert!(finished.letter_read);
}

#[test]
fn touch_scheme_prompts_name_the_touch_button() {
    let renderer = RecordingRenderer::new();
    let (mut controller, _) = SessionController::boot(
        config(ControlScheme::Touch, 16),
        renderer.clone(),
        RecordingAudio::new(),
    );
    play(&mut controller, &InputScript::walkthrough(16, PHOTOS));

    assert_eq!(controller.replays(), 1);
    let prompts = renderer.prompts();
    assert!(prompts.iter().any(|prompt| prompt == "Press A to enter"));
    assert!(prompts.iter().all(|prompt| !prompt.contains("SPACE")));
    assert!(renderer
        .texts_for("controls")
        .iter()
        .all(|hint| hint == "Use on-screen controls to move"));
}

#[test]
fn scoped_music_is_silenced_then_stopped_on_exit() {
    let audio = RecordingAudio::new();
    let (mut controller, _) = SessionController::boot(
        config(ControlScheme::Keyboard, 16),
        RecordingRenderer::new(),
        audio.clone(),
    );
    play(&mut controller, &InputScript::walkthrough(16, PHOTOS));

    let events = audio.events();
    let cafe_music = events
        .iter()
        .find_map(|event| match event {
            AudioEvent::Play { cue, handle, .. } if cue == "cafe-music" => Some(*handle),
            _ => None,
        })
        .expect("cafe music started");
    let muted = events
        .iter()
        .position(|event| *event == AudioEvent::Volume { handle: cafe_music, volume: 0.0 })
        .expect("music faded before leaving");
    let stopped = events
        .iter()
        .position(|event| *event == AudioEvent::Stop { handle: cafe_music })
        .expect("music stopped with the location");
    assert!(muted < stopped);

    let plays = events
        .iter()
        .filter(|event| matches!(event, AudioEvent::Play { looped: true, .. }))
        .count();
    let stops = events
        .iter()
        .filter(|event| matches!(event, AudioEvent::Stop { .. }))
        .count();
    assert_eq!(plays, stops, "every looped cue is stopped by its location");
    assert!(audio.played_cues().iter().any(|cue| cue == "confetti-pop"));
}

#[test]
fn movement_trace_walks_and_idles() {
    let (mut controller, _) = SessionController::boot(
        config(ControlScheme::Keyboard, 16),
        RecordingRenderer::new(),
        RecordingAudio::new(),
    );
    play(&mut controller, &InputScript::walkthrough(16, PHOTOS));

    let street: Vec<_> = controller
        .movement_trace()
        .iter()
        .filter(|sample| sample.location == LocationId::Street)
        .collect();
    assert!(street.iter().any(|sample| sample.texture == "walk-right-1"));
    assert!(street.iter().any(|sample| sample.texture == "walk-right-2"));
    assert!(street.iter().all(|sample| sample.position[1] == 620.0));
    let furthest = street
        .iter()
        .map(|sample| sample.position[0])
        .fold(0.0_f32, f32::max);
    assert!(furthest >= 3200.0);

    let exploring: Vec<_> = controller
        .movement_trace()
        .iter()
        .filter(|sample| sample.location == LocationId::Exploration)
        .collect();
    assert!(exploring.iter().any(|sample| sample.texture.starts_with("walk-up")));
    assert!(exploring.iter().any(|sample| sample.texture.starts_with("idle-")));
}

struct FailingAudio;

impl AudioSink for FailingAudio {
    fn play(&mut self, _cue: &str, _params: PlayParams) -> Result<AudioHandle, CollaboratorError> {
        Err(CollaboratorError::new("audio", "play", "device unplugged"))
    }

    fn stop(&mut self, _handle: AudioHandle) -> Result<(), CollaboratorError> {
        Err(CollaboratorError::new("audio", "stop", "device unplugged"))
    }

    fn set_volume(&mut self, _handle: AudioHandle, _volume: f32) -> Result<(), CollaboratorError> {
        Err(CollaboratorError::new("audio", "set_volume", "device unplugged"))
    }
}

struct FailingRenderer;

impl FailingRenderer {
    fn fail(operation: &'static str) -> Result<(), CollaboratorError> {
        Err(CollaboratorError::new("renderer", operation, "surface lost"))
    }
}

impl Renderer for FailingRenderer {
    fn fade_out(&mut self, _duration_ms: u64) -> Result<(), CollaboratorError> {
        Self::fail("fade_out")
    }

    fn fade_in(&mut self, _duration_ms: u64) -> Result<(), CollaboratorError> {
        Self::fail("fade_in")
    }

    fn draw_actor(&mut self, _position: Vec2, _texture: &str) -> Result<(), CollaboratorError> {
        Self::fail("draw_actor")
    }

    fn show_prompt(&mut self, _text: &str, _anchor: Vec2) -> Result<(), CollaboratorError> {
        Self::fail("show_prompt")
    }

    fn hide_prompt(&mut self) -> Result<(), CollaboratorError> {
        Self::fail("hide_prompt")
    }

    fn show_text(&mut self, _key: &str, _text: &str) -> Result<(), CollaboratorError> {
        Self::fail("show_text")
    }

    fn hide_text(&mut self, _key: &str) -> Result<(), CollaboratorError> {
        Self::fail("hide_text")
    }

    fn effect(&mut self, _name: &str, _at: Option<Vec2>) -> Result<(), CollaboratorError> {
        Self::fail("effect")
    }
}

#[test]
fn broken_collaborators_do_not_stall_the_story() {
    let (mut controller, _) = SessionController::boot(
        config(ControlScheme::Keyboard, 16),
        FailingRenderer,
        FailingAudio,
    );
    play(&mut controller, &InputScript::walkthrough(16, PHOTOS));

    assert_eq!(visited(controller.transitions()), FULL_PASS.to_vec());
    let finished = &controller.finished_sessions()[0];
    assert_eq!(finished.selected_drink, Some(DrinkId::ALL[2]));
    assert_eq!(finished.found_curiosities.len(), CURIOSITY_COUNT);
}
