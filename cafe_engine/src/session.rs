use cafe_session::{
    run_boot_pipeline, AssetManifest, BootRequest, BootSummary, ControlScheme, RegistrySnapshot,
    SessionRegistry,
};
use log::{error, info};
use serde::Serialize;

use crate::audio_bridge::AudioSink;
use crate::error::EngineError;
use crate::input::{InputPoller, RawInput};
use crate::location::{LocationId, Services, SessionSignal, TransitionRequest, DEFAULT_FADE_MS};
use crate::machine::{LocationMachine, TransitionRecord};
use crate::render::Renderer;

pub const DEFAULT_TICK_MS: u64 = 16;
/// Longest tick the controller will simulate. Longer ticks are clamped.
pub const MAX_TICK_MS: u64 = 1000;

/// Values resolved once at startup and handed to the session controller.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub tick_ms: u64,
    pub control_scheme: ControlScheme,
    pub manifest: AssetManifest,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            control_scheme: ControlScheme::default(),
            manifest: AssetManifest::builtin(),
        }
    }
}

/// Actor position captured at the end of a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementSample {
    pub tick: u64,
    pub at_ms: u64,
    pub location: LocationId,
    pub position: [f32; 2],
    pub texture: String,
}

/// Boots the session, owns the registry and the location machine, and drives
/// both from polled input one tick at a time.
pub struct SessionController<R: Renderer, A: AudioSink> {
    registry: SessionRegistry,
    renderer: R,
    audio: A,
    scheme: ControlScheme,
    tick_ms: u64,
    poller: InputPoller,
    machine: LocationMachine,
    now_ms: u64,
    ticks: u64,
    replays: u32,
    finished_sessions: Vec<RegistrySnapshot>,
    settled_transitions: usize,
    trace: Vec<MovementSample>,
}

impl<R: Renderer, A: AudioSink> SessionController<R, A> {
    /// Run the boot pipeline and enter the boot location.
    pub fn boot(config: EngineConfig, renderer: R, audio: A) -> (Self, BootSummary) {
        let mut registry = SessionRegistry::new();
        let summary = run_boot_pipeline(
            &mut registry,
            BootRequest {
                control_scheme: config.control_scheme,
            },
            &config.manifest,
        );
        let mut controller = Self {
            registry,
            renderer,
            audio,
            scheme: config.control_scheme,
            tick_ms: config.tick_ms.clamp(1, MAX_TICK_MS),
            poller: InputPoller::new(config.control_scheme),
            machine: LocationMachine::new(),
            now_ms: 0,
            ticks: 0,
            replays: 0,
            finished_sessions: Vec::new(),
            settled_transitions: 0,
            trace: Vec::new(),
        };
        let signals = {
            let mut services = Services {
                registry: &mut controller.registry,
                renderer: &mut controller.renderer,
                audio: &mut controller.audio,
                scheme: controller.scheme,
                now_ms: controller.now_ms,
                tick_ms: controller.tick_ms,
            };
            controller.machine.start(&mut services)
        };
        controller.settle_accepted_transitions();
        controller.handle_signals(signals);
        (controller, summary)
    }

    /// Advance the clock by one tick and feed this tick's input through.
    pub fn tick(&mut self, raw: RawInput) {
        self.now_ms += self.tick_ms;
        self.ticks += 1;
        let input = self.poller.poll(raw);
        let signals = {
            let mut services = Services {
                registry: &mut self.registry,
                renderer: &mut self.renderer,
                audio: &mut self.audio,
                scheme: self.scheme,
                now_ms: self.now_ms,
                tick_ms: self.tick_ms,
            };
            self.machine.tick(&mut services, &input)
        };
        self.settle_accepted_transitions();
        self.handle_signals(signals);
        self.capture_sample();
    }

    /// Move to `to` through the machine's transition primitive. `Ok(false)`
    /// means a transition was already in flight and this one was dropped.
    /// Leaving End for Street is a replay however it is requested.
    pub fn transition(&mut self, to: LocationId, fade_ms: u64) -> Result<bool, EngineError> {
        let request = TransitionRequest::with_fade(self.machine.current_id(), to, fade_ms)?;
        let accepted = {
            let mut services = Services {
                registry: &mut self.registry,
                renderer: &mut self.renderer,
                audio: &mut self.audio,
                scheme: self.scheme,
                now_ms: self.now_ms,
                tick_ms: self.tick_ms,
            };
            self.machine.transition(request, &mut services)
        };
        self.settle_accepted_transitions();
        Ok(accepted)
    }

    /// Start over from the street. The registry is reset as soon as the
    /// transition is accepted; a dropped request leaves it untouched.
    pub fn replay(&mut self) -> Result<bool, EngineError> {
        let current = self.machine.current_id();
        if current != LocationId::End {
            return Err(EngineError::IllegalTransition {
                from: current,
                to: LocationId::Street,
            });
        }
        self.transition(LocationId::Street, DEFAULT_FADE_MS)
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn current_location(&self) -> LocationId {
        self.machine.current_id()
    }

    pub fn is_transitioning(&self) -> bool {
        self.machine.is_transitioning()
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        self.machine.transitions()
    }

    pub fn ignored_transition_requests(&self) -> u64 {
        self.machine.ignored_requests()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    pub fn replays(&self) -> u32 {
        self.replays
    }

    /// Registry snapshots taken just before each replay reset.
    pub fn finished_sessions(&self) -> &[RegistrySnapshot] {
        &self.finished_sessions
    }

    pub fn movement_trace(&self) -> &[MovementSample] {
        &self.trace
    }

    /// Position of the actor in the current location, if it has one.
    pub fn actor_position(&self) -> Option<glam::Vec2> {
        self.machine.current().actor().map(|actor| actor.position())
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Apply session-level effects of transitions the machine accepted since
    /// the last call. End -> Street resets the registry before Street enters.
    fn settle_accepted_transitions(&mut self) {
        let accepted = self.machine.transitions();
        let replay_edges = accepted[self.settled_transitions.min(accepted.len())..]
            .iter()
            .filter(|record| record.from == LocationId::End && record.to == LocationId::Street)
            .count();
        self.settled_transitions = accepted.len();
        for _ in 0..replay_edges {
            self.finished_sessions.push(self.registry.snapshot());
            self.registry.initialize_session();
            self.replays += 1;
            info!(
                "replay accepted, registry reset for session {}",
                self.registry.generation()
            );
        }
    }

    fn handle_signals(&mut self, signals: Vec<SessionSignal>) {
        for signal in signals {
            match signal {
                SessionSignal::Replay => {
                    if let Err(err) = self.replay() {
                        error!("replay signal refused: {err}");
                    }
                }
            }
        }
    }

    fn capture_sample(&mut self) {
        let location = self.machine.current_id();
        if let Some(actor) = self.machine.current().actor() {
            self.trace.push(MovementSample {
                tick: self.ticks,
                at_ms: self.now_ms,
                location,
                position: actor.position().to_array(),
                texture: actor.texture_key(),
            });
        }
    }
}
