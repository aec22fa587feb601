use cafe_session::registry::PHOTO_COUNT_KEY;
use log::{debug, info};

use super::{Location, LocationContext, LocationId, DEFAULT_FADE_MS};
use crate::audio_bridge::{AudioHandle, PlayParams};
use crate::input::TickInput;
use crate::scheduler::Scheduler;

/// Used when boot did not record how many photos were loaded.
pub const FALLBACK_PHOTO_COUNT: u32 = 48;
pub const MEMORY_LANE_DELAY_MS: u64 = 3500;
pub const PHOTO_INTERVAL_MS: u64 = 600;
const CLOSING_PAUSE_MS: u64 = 2000;
const CLOSING_HOLD_MS: u64 = 3000;
const LEAVE_FADE_MS: u64 = 1500;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Beat {
    MemoryLane,
    Photo,
    Closing,
    Leave,
}

/// Seated at the table: the drink arrives and the memory lane plays out.
/// Nothing here reacts to input.
#[derive(Debug, Default)]
pub struct TableLocation {
    scheduler: Scheduler<Beat>,
    photo_count: u32,
    photos_shown: u32,
    music: Option<AudioHandle>,
}

impl TableLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn photos_shown(&self) -> u32 {
        self.photos_shown
    }

    fn on_beat(&mut self, ctx: &mut LocationContext<'_>, beat: Beat) {
        match beat {
            Beat::MemoryLane => {
                ctx.hide_text("intro");
                ctx.show_text("title", "Memory Lane");
                let now = ctx.now_ms();
                self.scheduler
                    .repeat(now, PHOTO_INTERVAL_MS, self.photo_count, Beat::Photo);
                let closing = u64::from(self.photo_count) * PHOTO_INTERVAL_MS + CLOSING_PAUSE_MS;
                self.scheduler.after(now, closing, Beat::Closing);
            }
            Beat::Photo => {
                debug!("table: photo {}", self.photos_shown);
                ctx.effect(&format!("photo-{}", self.photos_shown), None);
                self.photos_shown += 1;
            }
            Beat::Closing => {
                ctx.hide_text("title");
                ctx.show_text("closing", "So many beautiful memories...");
                self.scheduler.after(ctx.now_ms(), CLOSING_HOLD_MS, Beat::Leave);
            }
            Beat::Leave => {
                if let Some(handle) = self.music {
                    ctx.set_volume(handle, 0.0);
                }
                ctx.request_transition(LocationId::Celebration, LEAVE_FADE_MS);
            }
        }
    }
}

impl Location for TableLocation {
    fn id(&self) -> LocationId {
        LocationId::Table
    }

    fn enter(&mut self, ctx: &mut LocationContext<'_>) {
        self.photo_count = ctx
            .registry()
            .read_int(PHOTO_COUNT_KEY)
            .and_then(|count| u32::try_from(count).ok())
            .unwrap_or(FALLBACK_PHOTO_COUNT);
        let drink = ctx.registry().selected_drink();
        info!(
            "table: serving {} with {} photos",
            drink.map(|drink| drink.slug()).unwrap_or("nothing"),
            self.photo_count
        );

        ctx.fade_in(DEFAULT_FADE_MS);
        self.music = ctx.play_scoped("cafe-music", PlayParams::music(0.25));
        ctx.show_text("intro", "Your coffee is being prepared...");
        if let Some(drink) = drink {
            ctx.show_text("drink", drink.name());
        }
        self.scheduler
            .after(ctx.now_ms(), MEMORY_LANE_DELAY_MS, Beat::MemoryLane);
    }

    fn update(&mut self, ctx: &mut LocationContext<'_>, _input: &TickInput) {
        for beat in self.scheduler.drain_due(ctx.now_ms()) {
            self.on_beat(ctx, beat);
        }
    }

    fn exit(&mut self, ctx: &mut LocationContext<'_>) {
        self.scheduler.cancel_all();
        self.music = None;
        ctx.hide_text("closing");
        ctx.hide_text("drink");
    }
}
