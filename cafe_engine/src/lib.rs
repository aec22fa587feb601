//! Tick-driven engine for the birthday cafe story: a linear chain of
//! locations joined by fade transitions, an actor that walks and interacts,
//! and a session registry that carries choices between locations.

pub mod audio_bridge;
pub mod cli;
pub mod error;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod location;
pub mod machine;
pub mod movement;
pub mod render;
pub mod runtime;
pub mod scheduler;
pub mod script;
pub mod session;

pub use audio_bridge::{AudioEvent, AudioHandle, AudioSink, PlayParams, RecordingAudio};
pub use error::{CollaboratorError, EngineError};
pub use input::{Buttons, RawInput, TickInput};
pub use location::{LocationId, TransitionRequest};
pub use machine::{LocationMachine, TransitionRecord};
pub use render::{RecordingRenderer, RenderEvent, Renderer};
pub use script::InputScript;
pub use session::{EngineConfig, MovementSample, SessionController};
