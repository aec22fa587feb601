use glam::Vec2;
use log::info;

use super::{Location, LocationContext, LocationId, DEFAULT_FADE_MS};
use crate::geometry::Rect;
use crate::input::TickInput;
use crate::movement::{Actor, AxisMode, Facing, MovementController};
use crate::scheduler::Scheduler;

pub const STREET_WIDTH: f32 = 3840.0;
pub const STREET_SPAWN: Vec2 = Vec2::new(100.0, 620.0);
/// Crossing this x-coordinate walks the actor up to the cafe.
pub const ENTRANCE_THRESHOLD_X: f32 = 3200.0;
const SPEED: f32 = 150.0;

const INTRO_TEXT: &str = "It's your birthday...\nsomething special awaits";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Beat {
    ShowIntro,
    HideIntro,
    ShowHint,
}

/// Side-scrolling walk along the street towards the cafe.
#[derive(Debug)]
pub struct StreetLocation {
    actor: Actor,
    scheduler: Scheduler<Beat>,
}

impl StreetLocation {
    pub fn new() -> Self {
        let bounds = Rect::new(
            Vec2::new(0.0, STREET_SPAWN.y),
            Vec2::new(STREET_WIDTH, STREET_SPAWN.y),
        );
        Self {
            actor: Actor::spawn(
                STREET_SPAWN,
                bounds,
                MovementController::facing(SPEED, AxisMode::HorizontalOnly, Facing::Right),
            ),
            scheduler: Scheduler::new(),
        }
    }
}

impl Default for StreetLocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for StreetLocation {
    fn id(&self) -> LocationId {
        LocationId::Street
    }

    fn enter(&mut self, ctx: &mut LocationContext<'_>) {
        ctx.fade_in(DEFAULT_FADE_MS);
        let now = ctx.now_ms();
        self.scheduler.after(now, 500, Beat::ShowIntro);
        self.scheduler.after(now, 500 + 1500 + 3000, Beat::HideIntro);
        self.scheduler.after(now, 2000, Beat::ShowHint);
        ctx.draw_actor(&self.actor);
    }

    fn update(&mut self, ctx: &mut LocationContext<'_>, input: &TickInput) {
        for beat in self.scheduler.drain_due(ctx.now_ms()) {
            match beat {
                Beat::ShowIntro => ctx.show_text("intro", INTRO_TEXT),
                Beat::HideIntro => ctx.hide_text("intro"),
                Beat::ShowHint => {
                    let hint = ctx.scheme().movement_hint();
                    ctx.show_text("controls", hint);
                }
            }
        }

        self.actor.advance(input.held, ctx.tick_ms(), None);
        ctx.draw_actor(&self.actor);

        // No local latch: while the fade runs the actor stays past the line
        // and the machine drops the repeated requests.
        if self.actor.position().x >= ENTRANCE_THRESHOLD_X {
            ctx.request_transition(LocationId::Entrance, DEFAULT_FADE_MS);
        }
    }

    fn exit(&mut self, ctx: &mut LocationContext<'_>) {
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            info!("street: dropped {cancelled} pending beats");
        }
        ctx.hide_text("intro");
        ctx.hide_text("controls");
    }

    fn actor(&self) -> Option<&Actor> {
        Some(&self.actor)
    }
}
