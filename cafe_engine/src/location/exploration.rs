use cafe_session::{CuriosityId, CuriosityRecord, CURIOSITY_COUNT};
use glam::Vec2;
use log::info;

use super::cafe::{CAFE_FLOOR, CAFE_SPEED};
use super::{Location, LocationContext, LocationId, DEFAULT_FADE_MS, SCREEN_PROMPT};
use crate::geometry::{Obstacles, Rect};
use crate::input::TickInput;
use crate::interaction::{InteractionPoint, ProximityDetector};
use crate::movement::{Actor, AxisMode, Facing, MovementController};
use crate::scheduler::{Scheduler, TimerId};

pub const EXPLORATION_SPAWN: Vec2 = Vec2::new(640.0, 527.0);
pub const CURIOSITY_RADIUS: f32 = 70.0;
pub const EXIT: Vec2 = Vec2::new(340.0, 487.0);
pub const EXIT_RADIUS: f32 = 50.0;
const COMPLETION_DELAY_MS: u64 = 3000;
const COMPLETION_CONTINUE_MS: u64 = 3000;
const DISCOVERY_HOLD_MS: u64 = 3000;
const WELCOME_HOLD_MS: u64 = 3500;

/// Where each curiosity sits in the cafe.
pub fn curiosity_position(id: CuriosityId) -> Vec2 {
    match id {
        CuriosityId::EvilEye => Vec2::new(420.0, 223.0),
        CuriosityId::Piano => Vec2::new(670.0, 308.0),
        CuriosityId::Flag => Vec2::new(550.0, 218.0),
        CuriosityId::Plant => Vec2::new(360.0, 253.0),
        CuriosityId::Espresso => Vec2::new(890.0, 258.0),
        CuriosityId::Moon => Vec2::new(820.0, 228.0),
        CuriosityId::Books => Vec2::new(670.0, 223.0),
    }
}

/// Furniture the actor walks around.
pub fn furniture() -> Obstacles {
    let block = |x: f32, y: f32, w: f32, h: f32| Rect::from_center(Vec2::new(x, y), Vec2::new(w, h));
    Obstacles::new(vec![
        block(890.0, 263.0, 90.0, 50.0),
        block(880.0, 472.0, 100.0, 60.0),
        block(800.0, 462.0, 40.0, 40.0),
        block(410.0, 482.0, 80.0, 50.0),
        block(540.0, 482.0, 80.0, 50.0),
        block(670.0, 482.0, 80.0, 50.0),
        block(410.0, 382.0, 75.0, 45.0),
        block(540.0, 382.0, 75.0, 45.0),
        block(345.0, 507.0, 30.0, 30.0),
        block(945.0, 507.0, 25.0, 25.0),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorationPoint {
    Curiosity(CuriosityId),
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Beat {
    HideWelcome,
    HideDiscovery,
    Completion,
    CompletionContinue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Roaming,
    /// Completion overlay up; `ready` once it can be dismissed.
    Celebrating { ready: bool },
    Leaving,
}

/// Free roam of the cafe after the letter, hunting the seven curiosities.
#[derive(Debug)]
pub struct ExplorationLocation {
    actor: Actor,
    obstacles: Obstacles,
    points: ProximityDetector<ExplorationPoint>,
    scheduler: Scheduler<Beat>,
    discovery_timer: Option<TimerId>,
    phase: Phase,
}

impl ExplorationLocation {
    pub fn new() -> Self {
        Self {
            actor: Actor::spawn(
                EXPLORATION_SPAWN,
                CAFE_FLOOR,
                MovementController::facing(CAFE_SPEED, AxisMode::Free, Facing::Right),
            ),
            obstacles: furniture(),
            points: ProximityDetector::new(Vec::new()),
            scheduler: Scheduler::new(),
            discovery_timer: None,
            phase: Phase::Roaming,
        }
    }

    fn discover(&mut self, ctx: &mut LocationContext<'_>, id: CuriosityId) {
        let found = match ctx.registry_mut().record_curiosity_found(id) {
            CuriosityRecord::Added { found, completed_now } => {
                if completed_now {
                    info!("exploration: every curiosity found");
                    self.scheduler
                        .after(ctx.now_ms(), COMPLETION_DELAY_MS, Beat::Completion);
                }
                found
            }
            CuriosityRecord::AlreadyFound => return,
        };
        info!("exploration: found {id} ({found}/{CURIOSITY_COUNT})");
        ctx.effect("sparkle", Some(curiosity_position(id)));
        ctx.show_text(
            "discovery",
            &format!(
                "Found: {}!\n{}\n{found}/{CURIOSITY_COUNT} found",
                id.name(),
                id.message()
            ),
        );
        ctx.show_text("counter", &counter_text(found));
        if let Some(timer) = self.discovery_timer.take() {
            self.scheduler.cancel(timer);
        }
        self.discovery_timer = Some(self.scheduler.after(
            ctx.now_ms(),
            DISCOVERY_HOLD_MS,
            Beat::HideDiscovery,
        ));
    }

    fn on_beat(&mut self, ctx: &mut LocationContext<'_>, beat: Beat) {
        match beat {
            Beat::HideWelcome => ctx.hide_text("welcome"),
            Beat::HideDiscovery => {
                self.discovery_timer = None;
                ctx.hide_text("discovery");
            }
            Beat::Completion => {
                if self.phase != Phase::Roaming || !ctx.registry_mut().claim_completion_celebration()
                {
                    return;
                }
                self.phase = Phase::Celebrating { ready: false };
                self.actor.halt();
                if self.points.release() {
                    ctx.hide_prompt();
                }
                ctx.show_text(
                    "completion",
                    "You found all Easter Eggs!\nYou truly know this cafe well!",
                );
                ctx.effect("confetti", None);
                self.scheduler
                    .after(ctx.now_ms(), COMPLETION_CONTINUE_MS, Beat::CompletionContinue);
            }
            Beat::CompletionContinue => {
                if let Phase::Celebrating { .. } = self.phase {
                    self.phase = Phase::Celebrating { ready: true };
                    let prompt = format!("Press {} to continue", ctx.action_label());
                    ctx.show_prompt(&prompt, SCREEN_PROMPT);
                }
            }
        }
    }
}

fn counter_text(found: usize) -> String {
    format!("Easter Eggs: {found}/{CURIOSITY_COUNT}")
}

impl Default for ExplorationLocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for ExplorationLocation {
    fn id(&self) -> LocationId {
        LocationId::Exploration
    }

    fn enter(&mut self, ctx: &mut LocationContext<'_>) {
        let label = ctx.action_label();
        let mut points: Vec<InteractionPoint<ExplorationPoint>> = CuriosityId::ALL
            .into_iter()
            .map(|id| {
                InteractionPoint::new(
                    ExplorationPoint::Curiosity(id),
                    curiosity_position(id),
                    CURIOSITY_RADIUS,
                    format!("Press {label} to interact"),
                )
                .single_use()
            })
            .collect();
        points.push(InteractionPoint::new(
            ExplorationPoint::Exit,
            EXIT,
            EXIT_RADIUS,
            format!("Press {label} to exit"),
        ));
        self.points = ProximityDetector::new(points);
        for id in ctx.registry().found_curiosities().to_vec() {
            self.points.mark_consumed(&ExplorationPoint::Curiosity(id));
        }

        ctx.fade_in(DEFAULT_FADE_MS);
        let found = ctx.registry().found_count();
        ctx.show_text("counter", &counter_text(found));
        ctx.show_text("welcome", "Feel free to explore!");
        self.scheduler
            .after(ctx.now_ms(), WELCOME_HOLD_MS, Beat::HideWelcome);
        ctx.draw_actor(&self.actor);
    }

    fn update(&mut self, ctx: &mut LocationContext<'_>, input: &TickInput) {
        for beat in self.scheduler.drain_due(ctx.now_ms()) {
            self.on_beat(ctx, beat);
        }

        match self.phase {
            Phase::Leaving => return,
            Phase::Celebrating { ready } => {
                if ready && input.action_pressed() {
                    self.phase = Phase::Roaming;
                    ctx.hide_prompt();
                    ctx.hide_text("completion");
                }
                return;
            }
            Phase::Roaming => {}
        }

        self.actor
            .advance(input.held, ctx.tick_ms(), Some(&self.obstacles));
        ctx.draw_actor(&self.actor);

        let proximity = self.points.evaluate(self.actor.position(), input.action_pressed());
        ctx.apply_prompt(proximity.prompt);
        match proximity.triggered {
            Some(ExplorationPoint::Curiosity(id)) => self.discover(ctx, id),
            Some(ExplorationPoint::Exit) => {
                self.phase = Phase::Leaving;
                self.actor.halt();
                if self.points.release() {
                    ctx.hide_prompt();
                }
                ctx.request_transition(LocationId::End, DEFAULT_FADE_MS);
            }
            None => {}
        }
    }

    fn exit(&mut self, ctx: &mut LocationContext<'_>) {
        self.scheduler.cancel_all();
        self.discovery_timer = None;
        ctx.hide_text("counter");
        ctx.hide_text("discovery");
    }

    fn actor(&self) -> Option<&Actor> {
        Some(&self.actor)
    }
}
