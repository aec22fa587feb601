use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::Serialize;

use crate::error::EngineError;
use crate::input::TickInput;
use crate::movement::Actor;

mod boot;
mod cafe;
mod celebration;
mod context;
mod end;
mod entrance;
mod exploration;
mod letter;
mod street;
mod table;

pub use boot::BootLocation;
pub use cafe::CafeInteriorLocation;
pub use celebration::CelebrationLocation;
pub(crate) use context::Outbox;
pub use context::{LocationContext, Services, SessionSignal};
pub use end::EndLocation;
pub use entrance::EntranceLocation;
pub use exploration::ExplorationLocation;
pub use letter::{LetterLocation, LETTER_TEXT, TYPEWRITER_MS};
pub use street::StreetLocation;
pub use table::TableLocation;

/// Fade used when a location has no reason to pick another.
pub const DEFAULT_FADE_MS: u64 = 1000;

/// Anchor for prompts that belong to the screen rather than a spot.
pub(crate) const SCREEN_PROMPT: Vec2 = Vec2::new(640.0, 670.0);

/// Named states of the story graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationId {
    Boot,
    Street,
    Entrance,
    CafeInterior,
    Table,
    Celebration,
    Letter,
    Exploration,
    End,
}

impl LocationId {
    pub const ALL: [LocationId; 9] = [
        LocationId::Boot,
        LocationId::Street,
        LocationId::Entrance,
        LocationId::CafeInterior,
        LocationId::Table,
        LocationId::Celebration,
        LocationId::Letter,
        LocationId::Exploration,
        LocationId::End,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LocationId::Boot => "boot",
            LocationId::Street => "street",
            LocationId::Entrance => "entrance",
            LocationId::CafeInterior => "cafe-interior",
            LocationId::Table => "table",
            LocationId::Celebration => "celebration",
            LocationId::Letter => "letter",
            LocationId::Exploration => "exploration",
            LocationId::End => "end",
        }
    }

    /// Outgoing edges of the fixed story graph.
    pub fn successors(&self) -> &'static [LocationId] {
        match self {
            LocationId::Boot => &[LocationId::Street],
            LocationId::Street => &[LocationId::Entrance],
            LocationId::Entrance => &[LocationId::CafeInterior],
            LocationId::CafeInterior => &[LocationId::Table],
            LocationId::Table => &[LocationId::Celebration],
            LocationId::Celebration => &[LocationId::Letter],
            LocationId::Letter => &[LocationId::Exploration],
            LocationId::Exploration => &[LocationId::End],
            LocationId::End => &[LocationId::Street],
        }
    }

    pub fn can_reach(&self, target: LocationId) -> bool {
        self.successors().contains(&target)
    }

    /// Build a fresh handler for this location.
    pub fn instantiate(&self) -> Box<dyn Location> {
        match self {
            LocationId::Boot => Box::new(BootLocation::new()),
            LocationId::Street => Box::new(StreetLocation::new()),
            LocationId::Entrance => Box::new(EntranceLocation::new()),
            LocationId::CafeInterior => Box::new(CafeInteriorLocation::new()),
            LocationId::Table => Box::new(TableLocation::new()),
            LocationId::Celebration => Box::new(CelebrationLocation::new()),
            LocationId::Letter => Box::new(LetterLocation::new()),
            LocationId::Exploration => Box::new(ExplorationLocation::new()),
            LocationId::End => Box::new(EndLocation::new()),
        }
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LocationId {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        LocationId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| EngineError::UnknownLocation(value.to_string()))
    }
}

/// A validated edge of the story graph plus the fade to run across it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionRequest {
    pub from: LocationId,
    pub to: LocationId,
    pub fade_ms: u64,
}

impl TransitionRequest {
    pub fn new(from: LocationId, to: LocationId) -> Result<Self, EngineError> {
        Self::with_fade(from, to, DEFAULT_FADE_MS)
    }

    pub fn with_fade(from: LocationId, to: LocationId, fade_ms: u64) -> Result<Self, EngineError> {
        if !from.can_reach(to) {
            return Err(EngineError::IllegalTransition { from, to });
        }
        Ok(Self { from, to, fade_ms })
    }
}

/// One state handler of the story. Handlers never touch each other; anything
/// that must outlive a location goes through the registry on the context.
pub trait Location {
    fn id(&self) -> LocationId;

    /// Build entities, start location-scoped audio, run the fade-in.
    fn enter(&mut self, ctx: &mut LocationContext<'_>);

    /// One tick. While a transition is fading out the handler still ticks
    /// but only ever sees neutral input.
    fn update(&mut self, ctx: &mut LocationContext<'_>, input: &TickInput);

    /// Cancel timers and drop entities. Scoped audio is stopped by the
    /// machine after this returns.
    fn exit(&mut self, ctx: &mut LocationContext<'_>);

    fn actor(&self) -> Option<&Actor> {
        None
    }
}
