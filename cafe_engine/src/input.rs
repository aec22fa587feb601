use serde::{Deserialize, Serialize};

pub use cafe_session::ControlScheme;

/// Held state of the four directions and the action button for one source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons {
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub down: bool,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub action: bool,
}

impl Buttons {
    pub const NONE: Buttons = Buttons {
        up: false,
        down: false,
        left: false,
        right: false,
        action: false,
    };

    fn union(self, other: Buttons) -> Buttons {
        Buttons {
            up: self.up || other.up,
            down: self.down || other.down,
            left: self.left || other.left,
            right: self.right || other.right,
            action: self.action || other.action,
        }
    }

    /// Buttons held now that were not held in `previous`.
    fn rising_from(self, previous: Buttons) -> Buttons {
        Buttons {
            up: self.up && !previous.up,
            down: self.down && !previous.down,
            left: self.left && !previous.left,
            right: self.right && !previous.right,
            action: self.action && !previous.action,
        }
    }

    pub fn any_direction(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// One tick of polled state from every input source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    #[serde(default)]
    pub keyboard: Buttons,
    #[serde(default)]
    pub touch: Buttons,
}

impl RawInput {
    pub fn keyboard(buttons: Buttons) -> Self {
        Self {
            keyboard: buttons,
            touch: Buttons::NONE,
        }
    }
}

/// Input as a location sees it: merged held state plus this tick's edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub held: Buttons,
    pub pressed: Buttons,
}

impl TickInput {
    /// What a location receives while its input is disabled.
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn action_pressed(&self) -> bool {
        self.pressed.action
    }
}

/// Merges the live input sources and derives "just pressed" edges.
#[derive(Debug, Clone)]
pub struct InputPoller {
    scheme: ControlScheme,
    previous: Buttons,
}

impl InputPoller {
    pub fn new(scheme: ControlScheme) -> Self {
        Self {
            scheme,
            previous: Buttons::NONE,
        }
    }

    pub fn scheme(&self) -> ControlScheme {
        self.scheme
    }

    pub fn poll(&mut self, raw: RawInput) -> TickInput {
        let mut held = Buttons::NONE;
        if self.scheme.keyboard_enabled() {
            held = held.union(raw.keyboard);
        }
        if self.scheme.touch_enabled() {
            held = held.union(raw.touch);
        }
        let pressed = held.rising_from(self.previous);
        self.previous = held;
        TickInput { held, pressed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action() -> Buttons {
        Buttons {
            action: true,
            ..Buttons::NONE
        }
    }

    #[test]
    fn action_edge_fires_once_while_held() {
        let mut poller = InputPoller::new(ControlScheme::Keyboard);
        let first = poller.poll(RawInput::keyboard(action()));
        let second = poller.poll(RawInput::keyboard(action()));
        assert!(first.action_pressed());
        assert!(second.held.action);
        assert!(!second.action_pressed());

        poller.poll(RawInput::default());
        assert!(poller.poll(RawInput::keyboard(action())).action_pressed());
    }

    #[test]
    fn disabled_source_is_ignored() {
        let mut poller = InputPoller::new(ControlScheme::Keyboard);
        let input = poller.poll(RawInput {
            keyboard: Buttons::NONE,
            touch: Buttons {
                left: true,
                ..Buttons::NONE
            },
        });
        assert!(!input.held.left);
    }

    #[test]
    fn both_sources_merge() {
        let mut poller = InputPoller::new(ControlScheme::Both);
        let input = poller.poll(RawInput {
            keyboard: Buttons {
                up: true,
                ..Buttons::NONE
            },
            touch: action(),
        });
        assert!(input.held.up);
        assert!(input.pressed.action);
    }

    #[test]
    fn touch_and_keyboard_holding_action_is_one_press() {
        let mut poller = InputPoller::new(ControlScheme::Both);
        assert!(poller.poll(RawInput::keyboard(action())).action_pressed());
        let overlapping = poller.poll(RawInput {
            keyboard: action(),
            touch: action(),
        });
        assert!(!overlapping.action_pressed());
    }
}
