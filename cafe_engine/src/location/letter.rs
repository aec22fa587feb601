use log::info;

use super::{Location, LocationContext, LocationId, DEFAULT_FADE_MS, SCREEN_PROMPT};
use crate::input::TickInput;
use crate::scheduler::{Scheduler, TimerId};

const PROMPT_DELAY_MS: u64 = 3000;
const OPEN_DELAY_MS: u64 = 1000;
/// One character is revealed per interval.
pub const TYPEWRITER_MS: u64 = 30;

pub const LETTER_TEXT: &str = "Dear Alaa,

Happy Birthday!

On this special day, I wanted to create something
unique just for you. A little digital cafe where
your memories could come alive.

You've accomplished so much - your incredible GPA,
your Master's in Psychology, and most importantly,
the beautiful person you are.

May this year bring you all the happiness,
success, and love you deserve.

Here's to new adventures, warm coffee,
and making more wonderful memories.

With warmth and admiration,
Someone who thinks you're amazing ♥";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Beat {
    OfferEnvelope,
    StartTyping,
    TypeCharacter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Sealed,
    Opening,
    Typing,
    Read,
    Leaving,
}

/// An envelope from the barista; the letter types itself out once opened.
#[derive(Debug)]
pub struct LetterLocation {
    scheduler: Scheduler<Beat>,
    phase: Phase,
    revealed: usize,
    total: usize,
    typing_timer: Option<TimerId>,
}

impl LetterLocation {
    pub fn new() -> Self {
        Self {
            scheduler: Scheduler::new(),
            phase: Phase::Waiting,
            revealed: 0,
            total: LETTER_TEXT.chars().count(),
            typing_timer: None,
        }
    }

    fn type_character(&mut self, ctx: &mut LocationContext<'_>) {
        if self.phase != Phase::Typing {
            return;
        }
        self.revealed += 1;
        let shown: String = LETTER_TEXT.chars().take(self.revealed).collect();
        ctx.show_text("letter", &shown);
        if self.revealed < self.total {
            return;
        }
        if let Some(timer) = self.typing_timer.take() {
            self.scheduler.cancel(timer);
        }
        self.phase = Phase::Read;
        ctx.registry_mut().mark_letter_read();
        info!("letter: finished typing {} characters", self.total);
        let prompt = format!("Press {} to continue", ctx.action_label());
        ctx.show_prompt(&prompt, SCREEN_PROMPT);
    }
}

impl Default for LetterLocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for LetterLocation {
    fn id(&self) -> LocationId {
        LocationId::Letter
    }

    fn enter(&mut self, ctx: &mut LocationContext<'_>) {
        ctx.fade_in(DEFAULT_FADE_MS);
        ctx.show_text("intro", "The barista left something for you...");
        self.scheduler
            .after(ctx.now_ms(), PROMPT_DELAY_MS, Beat::OfferEnvelope);
    }

    fn update(&mut self, ctx: &mut LocationContext<'_>, input: &TickInput) {
        for beat in self.scheduler.drain_due(ctx.now_ms()) {
            match beat {
                Beat::OfferEnvelope => {
                    self.phase = Phase::Sealed;
                    let prompt = format!("Press {} to read the letter", ctx.action_label());
                    ctx.show_prompt(&prompt, SCREEN_PROMPT);
                }
                Beat::StartTyping => {
                    self.phase = Phase::Typing;
                    self.typing_timer =
                        Some(self.scheduler.every(ctx.now_ms(), TYPEWRITER_MS, Beat::TypeCharacter));
                }
                Beat::TypeCharacter => self.type_character(ctx),
            }
        }

        if !input.action_pressed() {
            return;
        }
        match self.phase {
            Phase::Sealed => {
                self.phase = Phase::Opening;
                ctx.hide_prompt();
                ctx.hide_text("intro");
                ctx.effect("envelope-open", None);
                self.scheduler
                    .after(ctx.now_ms(), OPEN_DELAY_MS, Beat::StartTyping);
            }
            Phase::Read => {
                self.phase = Phase::Leaving;
                ctx.hide_prompt();
                ctx.request_transition(LocationId::Exploration, DEFAULT_FADE_MS);
            }
            Phase::Waiting | Phase::Opening | Phase::Typing | Phase::Leaving => {}
        }
    }

    fn exit(&mut self, ctx: &mut LocationContext<'_>) {
        self.scheduler.cancel_all();
        self.typing_timer = None;
        ctx.hide_text("letter");
    }
}
