use log::info;

use super::{Location, LocationContext, LocationId, SCREEN_PROMPT, SessionSignal};
use crate::input::TickInput;
use crate::scheduler::Scheduler;

const FADE_IN_MS: u64 = 1500;
const PLAY_AGAIN_DELAY_MS: u64 = 5000;

const CREDITS: [(u64, &str, &str); 3] = [
    (500, "thanks", "Thank You For Playing!"),
    (1500, "birthday", "Happy Birthday, Alaa!"),
    (2500, "signature", "Made with love, just for you"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Beat {
    Credit(usize),
    OfferReplay,
}

/// Closing credits; action asks the session to start over.
#[derive(Debug, Default)]
pub struct EndLocation {
    scheduler: Scheduler<Beat>,
    can_restart: bool,
}

impl EndLocation {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Location for EndLocation {
    fn id(&self) -> LocationId {
        LocationId::End
    }

    fn enter(&mut self, ctx: &mut LocationContext<'_>) {
        ctx.fade_in(FADE_IN_MS);
        let now = ctx.now_ms();
        for (index, (delay, _, _)) in CREDITS.iter().enumerate() {
            self.scheduler.after(now, *delay, Beat::Credit(index));
        }
        self.scheduler
            .after(now, PLAY_AGAIN_DELAY_MS, Beat::OfferReplay);
        let registry = ctx.registry();
        info!(
            "end: session {} finished with {} curiosities, letter read: {}",
            registry.generation(),
            registry.found_count(),
            registry.letter_read()
        );
    }

    fn update(&mut self, ctx: &mut LocationContext<'_>, input: &TickInput) {
        for beat in self.scheduler.drain_due(ctx.now_ms()) {
            match beat {
                Beat::Credit(index) => {
                    let (_, key, text) = CREDITS[index];
                    ctx.show_text(key, text);
                }
                Beat::OfferReplay => {
                    self.can_restart = true;
                    let prompt = format!("Press {} to play again", ctx.action_label());
                    ctx.show_prompt(&prompt, SCREEN_PROMPT);
                }
            }
        }

        if self.can_restart && input.action_pressed() {
            self.can_restart = false;
            ctx.hide_prompt();
            ctx.signal(SessionSignal::Replay);
        }
    }

    fn exit(&mut self, ctx: &mut LocationContext<'_>) {
        self.scheduler.cancel_all();
        for (_, key, _) in CREDITS {
            ctx.hide_text(key);
        }
    }
}
