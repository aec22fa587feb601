use glam::Vec2;

use super::{Location, LocationContext, LocationId, DEFAULT_FADE_MS, SCREEN_PROMPT};
use crate::audio_bridge::{AudioHandle, PlayParams};
use crate::input::TickInput;
use crate::scheduler::{Scheduler, TimerId};

const FADE_IN_MS: u64 = 1500;
const TITLE_DELAY_MS: u64 = 1000;
const COLOR_CYCLE_MS: u64 = 500;
const CANDLE_PROMPT_DELAY_MS: u64 = 2000;
const CONFETTI_DELAY_MS: u64 = 800;
const CONTINUE_DELAY_MS: u64 = 3500;
const CANDLE: Vec2 = Vec2::new(640.0, 420.0);

const TITLE_COLORS: [&str; 5] = ["#D4735E", "#D4AF37", "#A8B5A0", "#6B5B95", "#FFB6C1"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Beat {
    Title,
    CycleColor,
    LightCandle,
    Confetti,
    AllowContinue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    CandleLit,
    Applause,
    Continue,
    Leaving,
}

/// Birthday cake: blow out the candle, enjoy the confetti, move on.
#[derive(Debug)]
pub struct CelebrationLocation {
    scheduler: Scheduler<Beat>,
    phase: Phase,
    color_index: usize,
    color_timer: Option<TimerId>,
    music: Option<AudioHandle>,
}

impl CelebrationLocation {
    pub fn new() -> Self {
        Self {
            scheduler: Scheduler::new(),
            phase: Phase::Waiting,
            color_index: 0,
            color_timer: None,
            music: None,
        }
    }

    fn on_beat(&mut self, ctx: &mut LocationContext<'_>, beat: Beat) {
        let now = ctx.now_ms();
        match beat {
            Beat::Title => {
                ctx.show_text("title", "Happy Birthday Alaa!");
                self.color_timer = Some(self.scheduler.every(now, COLOR_CYCLE_MS, Beat::CycleColor));
                self.scheduler
                    .after(now, CANDLE_PROMPT_DELAY_MS, Beat::LightCandle);
            }
            Beat::CycleColor => {
                self.color_index = (self.color_index + 1) % TITLE_COLORS.len();
                ctx.effect(&format!("title-color {}", TITLE_COLORS[self.color_index]), None);
            }
            Beat::LightCandle => {
                self.phase = Phase::CandleLit;
                let prompt = format!("Press {} to blow out the candle", ctx.action_label());
                ctx.show_prompt(&prompt, SCREEN_PROMPT);
            }
            Beat::Confetti => {
                ctx.effect("confetti", None);
                ctx.play_sfx("confetti-pop", 0.5);
                ctx.show_text("applause", "* APPLAUSE *");
                self.scheduler
                    .after(now, CONTINUE_DELAY_MS, Beat::AllowContinue);
            }
            Beat::AllowContinue => {
                self.phase = Phase::Continue;
                ctx.hide_text("applause");
                let prompt = format!("Press {} to continue", ctx.action_label());
                ctx.show_prompt(&prompt, SCREEN_PROMPT);
            }
        }
    }
}

impl Default for CelebrationLocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Location for CelebrationLocation {
    fn id(&self) -> LocationId {
        LocationId::Celebration
    }

    fn enter(&mut self, ctx: &mut LocationContext<'_>) {
        ctx.fade_in(FADE_IN_MS);
        self.music = ctx.play_scoped("birthday-music", PlayParams::music(0.4));
        self.scheduler.after(ctx.now_ms(), TITLE_DELAY_MS, Beat::Title);
    }

    fn update(&mut self, ctx: &mut LocationContext<'_>, input: &TickInput) {
        for beat in self.scheduler.drain_due(ctx.now_ms()) {
            self.on_beat(ctx, beat);
        }
        if !input.action_pressed() {
            return;
        }
        match self.phase {
            Phase::CandleLit => {
                self.phase = Phase::Applause;
                ctx.hide_prompt();
                ctx.effect("candle-out", Some(CANDLE));
                self.scheduler
                    .after(ctx.now_ms(), CONFETTI_DELAY_MS, Beat::Confetti);
            }
            Phase::Continue => {
                self.phase = Phase::Leaving;
                ctx.hide_prompt();
                if let Some(timer) = self.color_timer.take() {
                    self.scheduler.cancel(timer);
                }
                if let Some(handle) = self.music {
                    ctx.set_volume(handle, 0.0);
                }
                ctx.request_transition(LocationId::Letter, DEFAULT_FADE_MS);
            }
            Phase::Waiting | Phase::Applause | Phase::Leaving => {}
        }
    }

    fn exit(&mut self, ctx: &mut LocationContext<'_>) {
        self.scheduler.cancel_all();
        self.color_timer = None;
        self.music = None;
        ctx.hide_text("title");
    }
}
