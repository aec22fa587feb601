use cafe_session::{ControlScheme, SessionRegistry};
use glam::Vec2;
use log::{error, warn};
use serde::Serialize;

use super::{LocationId, TransitionRequest};
use crate::audio_bridge::{AudioHandle, AudioSink, PlayParams};
use crate::error::CollaboratorError;
use crate::interaction::PromptChange;
use crate::movement::Actor;
use crate::render::Renderer;

/// Requests a location raises for the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSignal {
    Replay,
}

/// Everything the session lends the machine for one tick.
pub struct Services<'a> {
    pub registry: &'a mut SessionRegistry,
    pub renderer: &'a mut dyn Renderer,
    pub audio: &'a mut dyn AudioSink,
    pub scheme: ControlScheme,
    pub now_ms: u64,
    pub tick_ms: u64,
}

/// Outgoing requests gathered while a location runs.
#[derive(Debug, Default)]
pub(crate) struct Outbox {
    pub(crate) transitions: Vec<TransitionRequest>,
    pub(crate) signals: Vec<SessionSignal>,
}

/// The view a location gets of the session: the registry, the collaborators,
/// the clock, and a way to ask for the next location.
///
/// Collaborator failures stop here. They are logged and the story carries on.
pub struct LocationContext<'a> {
    registry: &'a mut SessionRegistry,
    renderer: &'a mut dyn Renderer,
    audio: &'a mut dyn AudioSink,
    scheme: ControlScheme,
    now_ms: u64,
    tick_ms: u64,
    scoped_audio: &'a mut Vec<AudioHandle>,
    outbox: &'a mut Outbox,
    current: LocationId,
}

impl<'a> LocationContext<'a> {
    pub(crate) fn new(
        services: &'a mut Services<'_>,
        scoped_audio: &'a mut Vec<AudioHandle>,
        outbox: &'a mut Outbox,
        current: LocationId,
    ) -> Self {
        Self {
            registry: &mut *services.registry,
            renderer: &mut *services.renderer,
            audio: &mut *services.audio,
            scheme: services.scheme,
            now_ms: services.now_ms,
            tick_ms: services.tick_ms,
            scoped_audio,
            outbox,
            current,
        }
    }

    pub fn location(&self) -> LocationId {
        self.current
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    pub fn scheme(&self) -> ControlScheme {
        self.scheme
    }

    pub fn action_label(&self) -> &'static str {
        self.scheme.action_label()
    }

    pub fn registry(&self) -> &SessionRegistry {
        &*self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SessionRegistry {
        &mut *self.registry
    }

    /// Ask the machine to move to `to`. Targets off the story graph are a
    /// programming error.
    pub fn request_transition(&mut self, to: LocationId, fade_ms: u64) {
        match TransitionRequest::with_fade(self.current, to, fade_ms) {
            Ok(request) => self.outbox.transitions.push(request),
            Err(err) => {
                error!("refusing transition request from {}: {err}", self.current);
                debug_assert!(false, "illegal transition requested: {err}");
            }
        }
    }

    pub fn signal(&mut self, signal: SessionSignal) {
        self.outbox.signals.push(signal);
    }

    pub fn fade_in(&mut self, duration_ms: u64) {
        let result = self.renderer.fade_in(duration_ms);
        self.cosmetic(result);
    }

    pub fn draw_actor(&mut self, actor: &Actor) {
        let result = self
            .renderer
            .draw_actor(actor.position(), &actor.texture_key());
        self.cosmetic(result);
    }

    pub fn show_prompt(&mut self, text: &str, anchor: Vec2) {
        let result = self.renderer.show_prompt(text, anchor);
        self.cosmetic(result);
    }

    pub fn hide_prompt(&mut self) {
        let result = self.renderer.hide_prompt();
        self.cosmetic(result);
    }

    pub fn apply_prompt(&mut self, change: Option<PromptChange>) {
        match change {
            Some(PromptChange::Show { text, anchor }) => self.show_prompt(&text, anchor),
            Some(PromptChange::Hide) => self.hide_prompt(),
            None => {}
        }
    }

    pub fn show_text(&mut self, key: &str, text: &str) {
        let result = self.renderer.show_text(key, text);
        self.cosmetic(result);
    }

    pub fn hide_text(&mut self, key: &str) {
        let result = self.renderer.hide_text(key);
        self.cosmetic(result);
    }

    pub fn effect(&mut self, name: &str, at: Option<Vec2>) {
        let result = self.renderer.effect(name, at);
        self.cosmetic(result);
    }

    /// Start a cue that lives as long as the current location. The machine
    /// stops it on teardown.
    pub fn play_scoped(&mut self, cue: &str, params: PlayParams) -> Option<AudioHandle> {
        let result = self.audio.play(cue, params);
        let handle = self.cosmetic(result)?;
        self.scoped_audio.push(handle);
        Some(handle)
    }

    /// Fire-and-forget sound effect.
    pub fn play_sfx(&mut self, cue: &str, volume: f32) {
        let result = self.audio.play(cue, PlayParams::sfx(volume));
        self.cosmetic(result);
    }

    pub fn set_volume(&mut self, handle: AudioHandle, volume: f32) {
        let result = self.audio.set_volume(handle, volume);
        self.cosmetic(result);
    }

    fn cosmetic<T>(&self, result: Result<T, CollaboratorError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("{}: continuing after {err}", self.current);
                None
            }
        }
    }
}
