use cafe_session::DrinkId;
use glam::Vec2;
use log::info;

use super::{Location, LocationContext, LocationId, DEFAULT_FADE_MS};
use crate::audio_bridge::{AudioHandle, PlayParams};
use crate::geometry::Rect;
use crate::input::{Buttons, TickInput};
use crate::interaction::{InteractionPoint, ProximityDetector};
use crate::movement::{Actor, AxisMode, Facing, MovementController};
use crate::scheduler::Scheduler;

/// Interior walls of the cafe, shared with the exploration pass.
pub const CAFE_BOX: Rect = Rect {
    min: Vec2::new(320.0, 168.0),
    max: Vec2::new(960.0, 552.0),
};
/// Where the actor may stand inside the cafe box.
pub const CAFE_FLOOR: Rect = Rect {
    min: Vec2::new(CAFE_BOX.min.x + 20.0, CAFE_BOX.min.y + 100.0),
    max: Vec2::new(CAFE_BOX.max.x - 20.0, CAFE_BOX.max.y - 25.0),
};
pub const CAFE_SPEED: f32 = 130.0;

const SPAWN: Vec2 = Vec2::new(380.0, 502.0);
const COUNTER: Vec2 = Vec2::new(640.0, 318.0);
const COUNTER_RADIUS: f32 = 120.0;
const TABLE: Vec2 = Vec2::new(420.0, 472.0);
const TABLE_RADIUS: f32 = 70.0;

const MENU_COLUMNS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spot {
    Counter,
    Table,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Beat {
    HideWelcome,
    HideBarista,
    OfferSeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ordering,
    Menu,
    Waiting,
    Seating,
    Leaving,
}

/// Cursor over the drink board, laid out two drinks per row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrinkMenu {
    cursor: usize,
}

impl DrinkMenu {
    pub fn selected(&self) -> DrinkId {
        DrinkId::ALL[self.cursor]
    }

    /// Move on direction edges; returns true when the cursor changed.
    pub fn navigate(&mut self, pressed: Buttons) -> bool {
        let rows = DrinkId::ALL.len().div_ceil(MENU_COLUMNS);
        let (mut row, mut column) = (self.cursor / MENU_COLUMNS, self.cursor % MENU_COLUMNS);
        if pressed.up && row > 0 {
            row -= 1;
        }
        if pressed.down && row + 1 < rows {
            row += 1;
        }
        if pressed.left && column > 0 {
            column -= 1;
        }
        if pressed.right && column + 1 < MENU_COLUMNS {
            column += 1;
        }
        let next = (row * MENU_COLUMNS + column).min(DrinkId::ALL.len() - 1);
        let changed = next != self.cursor;
        self.cursor = next;
        changed
    }

    pub fn render(&self) -> String {
        let mut lines = vec!["Choose Your Drink".to_string()];
        for (index, drink) in DrinkId::ALL.iter().enumerate() {
            let marker = if index == self.cursor { '>' } else { ' ' };
            lines.push(format!("{marker} {} - {}", drink.name(), drink.description()));
        }
        lines.join("\n")
    }
}

/// Inside the cafe: order at the counter, then walk to a table.
#[derive(Debug)]
pub struct CafeInteriorLocation {
    actor: Actor,
    spots: ProximityDetector<Spot>,
    scheduler: Scheduler<Beat>,
    menu: DrinkMenu,
    phase: Phase,
    music: Vec<AudioHandle>,
}

impl CafeInteriorLocation {
    pub fn new() -> Self {
        Self {
            actor: Actor::spawn(
                SPAWN,
                CAFE_FLOOR,
                MovementController::facing(CAFE_SPEED, AxisMode::Free, Facing::Up),
            ),
            spots: ProximityDetector::new(Vec::new()),
            scheduler: Scheduler::new(),
            menu: DrinkMenu::default(),
            phase: Phase::Ordering,
            music: Vec::new(),
        }
    }

    fn open_menu(&mut self, ctx: &mut LocationContext<'_>) {
        self.phase = Phase::Menu;
        self.actor.halt();
        if self.spots.release() {
            ctx.hide_prompt();
        }
        ctx.show_text("menu", &self.menu.render());
    }

    fn confirm_order(&mut self, ctx: &mut LocationContext<'_>) {
        let drink = self.menu.selected();
        info!("cafe: ordered {drink}");
        ctx.play_sfx("menu-click", 0.4);
        ctx.registry_mut().record_choice(drink);
        ctx.hide_text("menu");
        ctx.play_sfx("coffee-brewing", 0.25);
        ctx.show_text("barista", "Excellent choice!\nHave a seat.");
        let now = ctx.now_ms();
        self.scheduler.after(now, 2500, Beat::HideBarista);
        self.scheduler.after(now, 3000, Beat::OfferSeat);
        self.spots.set_enabled(&Spot::Counter, false);
        self.phase = Phase::Waiting;
    }

    fn on_beat(&mut self, ctx: &mut LocationContext<'_>, beat: Beat) {
        match beat {
            Beat::HideWelcome => ctx.hide_text("welcome"),
            Beat::HideBarista => ctx.hide_text("barista"),
            Beat::OfferSeat => {
                ctx.show_text("hint", "Walk to a table");
                self.spots.set_enabled(&Spot::Table, true);
                self.phase = Phase::Seating;
            }
        }
    }
}

impl Default for CafeInteriorLocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for CafeInteriorLocation {
    fn id(&self) -> LocationId {
        LocationId::CafeInterior
    }

    fn enter(&mut self, ctx: &mut LocationContext<'_>) {
        let label = ctx.action_label();
        self.spots = ProximityDetector::new(vec![
            InteractionPoint::new(
                Spot::Counter,
                COUNTER,
                COUNTER_RADIUS,
                format!("Press {label} to order"),
            ),
            InteractionPoint::new(
                Spot::Table,
                TABLE,
                TABLE_RADIUS,
                format!("Press {label} to sit"),
            )
            .single_use()
            .disabled(),
        ]);
        ctx.fade_in(DEFAULT_FADE_MS);
        self.music = [("cafe-music", 0.3), ("cafe-chatter", 0.15)]
            .into_iter()
            .filter_map(|(cue, volume)| ctx.play_scoped(cue, PlayParams::music(volume)))
            .collect();
        ctx.show_text("welcome", "Welcome to Cafe Alaa!");
        self.scheduler.after(ctx.now_ms(), 3000, Beat::HideWelcome);
        ctx.draw_actor(&self.actor);
    }

    fn update(&mut self, ctx: &mut LocationContext<'_>, input: &TickInput) {
        for beat in self.scheduler.drain_due(ctx.now_ms()) {
            self.on_beat(ctx, beat);
        }

        match self.phase {
            Phase::Leaving => return,
            Phase::Menu => {
                if input.action_pressed() {
                    self.confirm_order(ctx);
                } else if self.menu.navigate(input.pressed) {
                    ctx.play_sfx("menu-click", 0.4);
                    ctx.show_text("menu", &self.menu.render());
                }
                return;
            }
            Phase::Ordering | Phase::Waiting | Phase::Seating => {}
        }

        self.actor.advance(input.held, ctx.tick_ms(), None);
        ctx.draw_actor(&self.actor);

        let proximity = self.spots.evaluate(self.actor.position(), input.action_pressed());
        ctx.apply_prompt(proximity.prompt);
        match proximity.triggered {
            Some(Spot::Counter) => self.open_menu(ctx),
            Some(Spot::Table) => {
                self.phase = Phase::Leaving;
                self.actor.halt();
                ctx.hide_text("hint");
                for handle in self.music.clone() {
                    ctx.set_volume(handle, 0.0);
                }
                ctx.request_transition(LocationId::Table, DEFAULT_FADE_MS);
            }
            None => {}
        }
    }

    fn exit(&mut self, ctx: &mut LocationContext<'_>) {
        self.scheduler.cancel_all();
        self.music.clear();
        if self.spots.release() {
            ctx.hide_prompt();
        }
    }

    fn actor(&self) -> Option<&Actor> {
        Some(&self.actor)
    }
}
