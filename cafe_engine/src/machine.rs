use log::{debug, info, warn};
use serde::Serialize;

use crate::audio_bridge::AudioHandle;
use crate::input::TickInput;
use crate::location::{
    Location, LocationContext, LocationId, Outbox, Services, SessionSignal, TransitionRequest,
};

/// One entry of the transition log written by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    pub from: LocationId,
    pub to: LocationId,
    pub fade_ms: u64,
    pub requested_at_ms: u64,
    pub completed_at_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MachineState {
    Running,
    FadingOut {
        request: TransitionRequest,
        complete_at_ms: u64,
    },
}

/// Owns the current location and the single transition primitive.
///
/// A transition fades out, feeds the outgoing location neutral input until
/// the fade completes, tears it down (its own `exit`, then every scoped audio
/// handle it started), and enters the target, which fades itself in. Requests
/// raised while a fade is in flight are dropped.
pub struct LocationMachine {
    current: Box<dyn Location>,
    state: MachineState,
    scoped_audio: Vec<AudioHandle>,
    log: Vec<TransitionRecord>,
    ignored_requests: u64,
}

impl Default for LocationMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationMachine {
    pub fn new() -> Self {
        Self {
            current: LocationId::Boot.instantiate(),
            state: MachineState::Running,
            scoped_audio: Vec::new(),
            log: Vec::new(),
            ignored_requests: 0,
        }
    }

    /// Enter the initial location.
    pub fn start(&mut self, services: &mut Services<'_>) -> Vec<SessionSignal> {
        info!("entering {}", self.current.id());
        let mut outbox = Outbox::default();
        {
            let id = self.current.id();
            let mut ctx = LocationContext::new(services, &mut self.scoped_audio, &mut outbox, id);
            self.current.enter(&mut ctx);
        }
        self.dispatch(outbox, services)
    }

    pub fn current_id(&self) -> LocationId {
        self.current.id()
    }

    pub fn current(&self) -> &dyn Location {
        self.current.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, MachineState::FadingOut { .. })
    }

    pub fn pending_target(&self) -> Option<LocationId> {
        match self.state {
            MachineState::FadingOut { request, .. } => Some(request.to),
            MachineState::Running => None,
        }
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.log
    }

    pub fn transitions_started(&self) -> usize {
        self.log.len()
    }

    pub fn ignored_requests(&self) -> u64 {
        self.ignored_requests
    }

    pub fn scoped_audio(&self) -> &[AudioHandle] {
        &self.scoped_audio
    }

    /// Start the fade towards `request.to`. Returns false when the request
    /// was dropped: a transition is already in flight, or the request was
    /// built for a location that is no longer current.
    pub fn transition(&mut self, request: TransitionRequest, services: &mut Services<'_>) -> bool {
        if let MachineState::FadingOut { request: active, .. } = self.state {
            debug!(
                "ignoring transition {} -> {} while {} -> {} is in flight",
                request.from, request.to, active.from, active.to
            );
            self.ignored_requests += 1;
            return false;
        }
        if request.from != self.current.id() {
            debug!(
                "ignoring stale transition {} -> {} (current: {})",
                request.from,
                request.to,
                self.current.id()
            );
            self.ignored_requests += 1;
            return false;
        }

        info!(
            "transition {} -> {} ({} ms fade)",
            request.from, request.to, request.fade_ms
        );
        if let Err(err) = services.renderer.fade_out(request.fade_ms) {
            warn!("{}: continuing after {err}", request.from);
        }
        self.state = MachineState::FadingOut {
            request,
            complete_at_ms: services.now_ms + request.fade_ms,
        };
        self.log.push(TransitionRecord {
            from: request.from,
            to: request.to,
            fade_ms: request.fade_ms,
            requested_at_ms: services.now_ms,
            completed_at_ms: None,
        });
        true
    }

    /// Advance one tick: finish a due fade, or update the current location.
    pub fn tick(&mut self, services: &mut Services<'_>, input: &TickInput) -> Vec<SessionSignal> {
        let input = match self.state {
            MachineState::FadingOut {
                request,
                complete_at_ms,
            } => {
                if services.now_ms >= complete_at_ms {
                    return self.complete(request, services);
                }
                TickInput::neutral()
            }
            MachineState::Running => *input,
        };

        let mut outbox = Outbox::default();
        {
            let id = self.current.id();
            let mut ctx = LocationContext::new(services, &mut self.scoped_audio, &mut outbox, id);
            self.current.update(&mut ctx, &input);
        }
        self.dispatch(outbox, services)
    }

    fn complete(&mut self, request: TransitionRequest, services: &mut Services<'_>) -> Vec<SessionSignal> {
        let mut outbox = Outbox::default();
        {
            let mut ctx =
                LocationContext::new(services, &mut self.scoped_audio, &mut outbox, request.from);
            self.current.exit(&mut ctx);
        }
        for handle in self.scoped_audio.drain(..) {
            if let Err(err) = services.audio.stop(handle) {
                warn!("{}: continuing after {err}", request.from);
            }
        }
        info!("left {}", request.from);
        if let Some(record) = self.log.last_mut() {
            record.completed_at_ms = Some(services.now_ms);
        }

        self.state = MachineState::Running;
        self.current = request.to.instantiate();
        info!("entering {}", request.to);
        {
            let mut ctx =
                LocationContext::new(services, &mut self.scoped_audio, &mut outbox, request.to);
            self.current.enter(&mut ctx);
        }
        // Anything the outgoing location asked for on its way out is moot.
        outbox
            .transitions
            .retain(|pending| pending.from == request.to);
        self.dispatch(outbox, services)
    }

    fn dispatch(&mut self, outbox: Outbox, services: &mut Services<'_>) -> Vec<SessionSignal> {
        for request in outbox.transitions {
            self.transition(request, services);
        }
        outbox.signals
    }
}
