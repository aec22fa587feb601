use log::info;

use super::{Location, LocationContext, LocationId};
use crate::input::TickInput;
use crate::scheduler::Scheduler;

const LOADING_HOLD_MS: u64 = 500;
const FADE_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Beat {
    Start,
}

/// Loading beat shown once the boot pipeline has finished.
#[derive(Debug, Default)]
pub struct BootLocation {
    scheduler: Scheduler<Beat>,
}

impl BootLocation {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Location for BootLocation {
    fn id(&self) -> LocationId {
        LocationId::Boot
    }

    fn enter(&mut self, ctx: &mut LocationContext<'_>) {
        ctx.show_text("loading", "Loading...");
        self.scheduler.after(ctx.now_ms(), LOADING_HOLD_MS, Beat::Start);
    }

    fn update(&mut self, ctx: &mut LocationContext<'_>, _input: &TickInput) {
        for beat in self.scheduler.drain_due(ctx.now_ms()) {
            match beat {
                Beat::Start => {
                    info!("loading beat finished, starting the story");
                    ctx.request_transition(LocationId::Street, FADE_MS);
                }
            }
        }
    }

    fn exit(&mut self, ctx: &mut LocationContext<'_>) {
        self.scheduler.cancel_all();
        ctx.hide_text("loading");
    }
}
