use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::input::{Buttons, RawInput};
use crate::location::{LETTER_TEXT, TYPEWRITER_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeldKey {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    Keyboard,
    Touch,
}

/// A run of identical ticks. `action` is held on the first tick only, so
/// every segment with `action` set yields exactly one press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSegment {
    pub ticks: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hold: Vec<HeldKey>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub action: bool,
    /// Source the buttons come from; absent means both.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<InputSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ScriptSegment {
    fn buttons(&self, first_tick: bool) -> Buttons {
        let mut buttons = Buttons {
            action: self.action && first_tick,
            ..Buttons::NONE
        };
        for key in &self.hold {
            match key {
                HeldKey::Up => buttons.up = true,
                HeldKey::Down => buttons.down = true,
                HeldKey::Left => buttons.left = true,
                HeldKey::Right => buttons.right = true,
            }
        }
        buttons
    }

    fn raw_input(&self, first_tick: bool) -> RawInput {
        let buttons = self.buttons(first_tick);
        match self.source {
            Some(InputSource::Keyboard) => RawInput::keyboard(buttons),
            Some(InputSource::Touch) => RawInput {
                keyboard: Buttons::NONE,
                touch: buttons,
            },
            None => RawInput {
                keyboard: buttons,
                touch: buttons,
            },
        }
    }
}

/// Recorded input fed to the session one tick at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputScript {
    pub segments: Vec<ScriptSegment>,
}

impl InputScript {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read input script: {}", path.display()))?;
        let script: InputScript = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse input script json: {}", path.display()))?;
        script
            .validate()
            .with_context(|| format!("rejecting input script {}", path.display()))?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.ticks == 0 {
                return Err(EngineError::InvalidScript {
                    index,
                    reason: "segment covers zero ticks".into(),
                });
            }
            let held = |key| segment.hold.contains(&key);
            if (held(HeldKey::Up) && held(HeldKey::Down))
                || (held(HeldKey::Left) && held(HeldKey::Right))
            {
                log::debug!("script segment {index} holds opposite directions; they cancel");
            }
        }
        Ok(())
    }

    pub fn total_ticks(&self) -> u64 {
        self.segments
            .iter()
            .map(|segment| u64::from(segment.ticks))
            .sum()
    }

    /// Per-tick input, one entry per scripted tick.
    pub fn inputs(&self) -> impl Iterator<Item = RawInput> + '_ {
        self.segments.iter().flat_map(|segment| {
            (0..segment.ticks).map(move |tick| segment.raw_input(tick == 0))
        })
    }

    /// A full pass through the story, from the loading screen to the replay
    /// prompt and back onto the street, finding all seven curiosities.
    pub fn walkthrough(tick_ms: u64, photo_count: u32) -> Self {
        let letter_ms = LETTER_TEXT.chars().count() as u64 * TYPEWRITER_MS;
        let table_ms = 1_000 + 3_500 + u64::from(photo_count) * 600 + 2_000 + 3_000 + 1_500 + 300;

        let mut script = WalkthroughBuilder::new(tick_ms);
        script
            .wait(1_200, "loading screen")
            .hold(&[HeldKey::Right], 21_000, "walk the street")
            .wait(1_300, "fade to the entrance")
            .hold(&[HeldKey::Right], 2_900, "walk to the door")
            .press("enter the cafe")
            .wait(1_500, "fade to the interior")
            .hold(&[HeldKey::Right], 2_000, "cross the floor")
            .hold(&[HeldKey::Up], 1_250, "approach the counter")
            .press("open the menu")
            .tap(HeldKey::Down, "pick the third drink")
            .press("order")
            .wait(3_200, "barista brews")
            .hold(&[HeldKey::Left], 1_700, "walk back")
            .hold(&[HeldKey::Down], 1_000, "approach the table")
            .press("sit down")
            .wait(table_ms, "memory lane")
            .wait(3_300, "title and candle")
            .press("blow out the candle")
            .wait(4_500, "confetti")
            .press("continue to the letter")
            .wait(1_300, "fade to the letter")
            .wait(3_300, "envelope appears")
            .press("open the envelope")
            .wait(1_000 + letter_ms + 500, "typewriter")
            .press("finish the letter")
            .wait(1_300, "fade to exploration")
            .hold(&[HeldKey::Right], 615, "step past the table")
            .hold(&[HeldKey::Up], 2_000, "walk to the back wall")
            .hold(&[HeldKey::Left], 160, "line up with the piano")
            .press("piano")
            .press("books")
            .hold(&[HeldKey::Right], 846, "walk to the window")
            .press("moon")
            .hold(&[HeldKey::Right], 600, "walk into the espresso bar")
            .press("espresso")
            .hold(&[HeldKey::Left], 2_262, "walk to the flag")
            .press("flag")
            .hold(&[HeldKey::Left], 1_000, "walk to the evil eye")
            .press("evil eye")
            .hold(&[HeldKey::Left], 1_000, "walk to the plant")
            .press("plant")
            .wait(3_200, "completion overlay")
            .wait(3_300, "completion prompt")
            .press("dismiss the overlay")
            .hold(&[HeldKey::Down], 1_700, "walk to the exit")
            .press("leave")
            .wait(1_300, "fade to the credits")
            .wait(5_300, "credits roll")
            .press("play again")
            .wait(1_500, "back to the street");
        script.finish()
    }
}

struct WalkthroughBuilder {
    tick_ms: u64,
    segments: Vec<ScriptSegment>,
}

impl WalkthroughBuilder {
    fn new(tick_ms: u64) -> Self {
        Self {
            tick_ms: tick_ms.max(1),
            segments: Vec::new(),
        }
    }

    fn ticks_for(&self, ms: u64) -> u32 {
        u32::try_from(ms.div_ceil(self.tick_ms).max(1)).unwrap_or(u32::MAX)
    }

    fn push(&mut self, ticks: u32, hold: &[HeldKey], action: bool, note: &str) -> &mut Self {
        self.segments.push(ScriptSegment {
            ticks,
            hold: hold.to_vec(),
            action,
            source: None,
            note: Some(note.to_string()),
        });
        self
    }

    fn wait(&mut self, ms: u64, note: &str) -> &mut Self {
        let ticks = self.ticks_for(ms);
        self.push(ticks, &[], false, note)
    }

    fn hold(&mut self, keys: &[HeldKey], ms: u64, note: &str) -> &mut Self {
        let ticks = self.ticks_for(ms);
        self.push(ticks, keys, false, note)
    }

    /// One action tick followed by a release tick, so the next press is a
    /// fresh edge.
    fn press(&mut self, note: &str) -> &mut Self {
        self.push(2, &[], true, note)
    }

    fn tap(&mut self, key: HeldKey, note: &str) -> &mut Self {
        self.push(1, &[key], false, note).push(1, &[], false, "release")
    }

    fn finish(&mut self) -> InputScript {
        InputScript {
            segments: std::mem::take(&mut self.segments),
        }
    }
}
