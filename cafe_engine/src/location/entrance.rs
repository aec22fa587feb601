use glam::Vec2;

use super::{Location, LocationContext, LocationId, DEFAULT_FADE_MS};
use crate::geometry::Rect;
use crate::input::TickInput;
use crate::interaction::{InteractionPoint, ProximityDetector};
use crate::movement::{Actor, AxisMode, Facing, MovementController};
use crate::scheduler::Scheduler;

const SPAWN: Vec2 = Vec2::new(200.0, 620.0);
const DOOR: Vec2 = Vec2::new(640.0, 620.0);
const DOOR_RADIUS: f32 = 80.0;
const ENTER_FADE_MS: u64 = 1200;
const WALK_IN_DELAY_MS: u64 = 300;
const SPEED: f32 = 150.0;
const VIEW_WIDTH: f32 = 1280.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Door;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Beat {
    WalkIn,
}

/// The cafe front: walk to the door and press action to go inside.
#[derive(Debug)]
pub struct EntranceLocation {
    actor: Actor,
    door: ProximityDetector<Door>,
    scheduler: Scheduler<Beat>,
    entering: bool,
}

impl EntranceLocation {
    pub fn new() -> Self {
        let bounds = Rect::new(Vec2::new(0.0, SPAWN.y), Vec2::new(VIEW_WIDTH, SPAWN.y));
        Self {
            actor: Actor::spawn(
                SPAWN,
                bounds,
                MovementController::facing(SPEED, AxisMode::HorizontalOnly, Facing::Right),
            ),
            door: ProximityDetector::new(Vec::new()),
            scheduler: Scheduler::new(),
            entering: false,
        }
    }
}

impl Default for EntranceLocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for EntranceLocation {
    fn id(&self) -> LocationId {
        LocationId::Entrance
    }

    fn enter(&mut self, ctx: &mut LocationContext<'_>) {
        let prompt = format!("Press {} to enter", ctx.action_label());
        self.door = ProximityDetector::new(vec![
            InteractionPoint::new(Door, DOOR, DOOR_RADIUS, prompt).single_use(),
        ]);
        ctx.fade_in(DEFAULT_FADE_MS);
        ctx.draw_actor(&self.actor);
    }

    fn update(&mut self, ctx: &mut LocationContext<'_>, input: &TickInput) {
        for beat in self.scheduler.drain_due(ctx.now_ms()) {
            match beat {
                Beat::WalkIn => ctx.effect("walk-in", Some(DOOR)),
            }
        }
        if self.entering {
            return;
        }

        self.actor.advance(input.held, ctx.tick_ms(), None);
        ctx.draw_actor(&self.actor);

        let proximity = self.door.evaluate(self.actor.position(), input.action_pressed());
        ctx.apply_prompt(proximity.prompt);
        if proximity.triggered.is_some() {
            self.entering = true;
            self.actor.halt();
            ctx.effect("door-open", Some(DOOR));
            self.scheduler.after(ctx.now_ms(), WALK_IN_DELAY_MS, Beat::WalkIn);
            ctx.request_transition(LocationId::CafeInterior, ENTER_FADE_MS);
        }
    }

    fn exit(&mut self, ctx: &mut LocationContext<'_>) {
        self.scheduler.cancel_all();
        if self.door.release() {
            ctx.hide_prompt();
        }
    }

    fn actor(&self) -> Option<&Actor> {
        Some(&self.actor)
    }
}
