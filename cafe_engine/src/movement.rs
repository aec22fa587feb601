use std::fmt;

use glam::Vec2;
use serde::Serialize;

use crate::geometry::{Obstacles, Rect};
use crate::input::Buttons;

/// Walk frames alternate on this cadence while the actor moves.
pub const WALK_FRAME_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which axes a location lets the actor move along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisMode {
    HorizontalOnly,
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WalkFrame {
    #[default]
    First,
    Second,
}

impl WalkFrame {
    fn toggled(self) -> Self {
        match self {
            WalkFrame::First => WalkFrame::Second,
            WalkFrame::Second => WalkFrame::First,
        }
    }

    fn number(self) -> u8 {
        match self {
            WalkFrame::First => 1,
            WalkFrame::Second => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnimationState {
    Idle { facing: Facing },
    Walking { facing: Facing, frame: WalkFrame },
}

impl AnimationState {
    /// Sprite key in the asset manifest, e.g. `idle-down` or `walk-left-2`.
    pub fn texture_key(&self) -> String {
        match self {
            AnimationState::Idle { facing } => format!("idle-{facing}"),
            AnimationState::Walking { facing, frame } => {
                format!("walk-{facing}-{}", frame.number())
            }
        }
    }
}

/// Result of one controller step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStep {
    pub velocity: Vec2,
    pub animation: AnimationState,
}

/// Turns held directions into velocity and a walk/idle animation state.
///
/// Opposite directions held together cancel on that axis. Facing is only
/// recomputed from a non-zero resolved velocity: an axis that just started
/// moving this tick takes over, vertical wins when both start together, and
/// otherwise the previous facing is kept if it still matches the motion.
#[derive(Debug, Clone)]
pub struct MovementController {
    speed: f32,
    mode: AxisMode,
    facing: Facing,
    previous_velocity: Vec2,
    frame: WalkFrame,
    frame_elapsed_ms: u64,
}

impl MovementController {
    pub fn new(speed: f32, mode: AxisMode) -> Self {
        Self::facing(speed, mode, Facing::Down)
    }

    pub fn facing(speed: f32, mode: AxisMode, facing: Facing) -> Self {
        Self {
            speed,
            mode,
            facing,
            previous_velocity: Vec2::ZERO,
            frame: WalkFrame::First,
            frame_elapsed_ms: 0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn current_facing(&self) -> Facing {
        self.facing
    }

    pub fn step(&mut self, held: Buttons, dt_ms: u64) -> MovementStep {
        let velocity = self.resolve_velocity(held);
        if velocity == Vec2::ZERO {
            self.previous_velocity = Vec2::ZERO;
            self.frame = WalkFrame::First;
            self.frame_elapsed_ms = 0;
            return MovementStep {
                velocity,
                animation: AnimationState::Idle {
                    facing: self.facing,
                },
            };
        }

        self.facing = self.resolve_facing(velocity);
        if self.previous_velocity != Vec2::ZERO {
            self.frame_elapsed_ms += dt_ms;
            while self.frame_elapsed_ms >= WALK_FRAME_MS {
                self.frame_elapsed_ms -= WALK_FRAME_MS;
                self.frame = self.frame.toggled();
            }
        }
        self.previous_velocity = velocity;
        MovementStep {
            velocity,
            animation: AnimationState::Walking {
                facing: self.facing,
                frame: self.frame,
            },
        }
    }

    /// Drop any motion state, e.g. while a menu freezes the actor.
    pub fn halt(&mut self) -> AnimationState {
        self.previous_velocity = Vec2::ZERO;
        self.frame = WalkFrame::First;
        self.frame_elapsed_ms = 0;
        AnimationState::Idle {
            facing: self.facing,
        }
    }

    fn resolve_velocity(&self, held: Buttons) -> Vec2 {
        let x = axis(held.left, held.right);
        let y = match self.mode {
            AxisMode::HorizontalOnly => 0.0,
            AxisMode::Free => axis(held.up, held.down),
        };
        Vec2::new(x, y) * self.speed
    }

    fn resolve_facing(&self, velocity: Vec2) -> Facing {
        let horizontal = (velocity.x != 0.0).then(|| {
            if velocity.x < 0.0 {
                Facing::Left
            } else {
                Facing::Right
            }
        });
        let vertical = (velocity.y != 0.0).then(|| {
            if velocity.y < 0.0 {
                Facing::Up
            } else {
                Facing::Down
            }
        });
        let fresh_x = velocity.x != 0.0 && velocity.x != self.previous_velocity.x;
        let fresh_y = velocity.y != 0.0 && velocity.y != self.previous_velocity.y;

        match (horizontal, vertical) {
            (Some(h), None) => h,
            (None, Some(v)) => v,
            (Some(h), Some(v)) => {
                if fresh_y {
                    v
                } else if fresh_x {
                    h
                } else if self.facing == h || self.facing == v {
                    self.facing
                } else {
                    v
                }
            }
            (None, None) => self.facing,
        }
    }
}

fn axis(negative: bool, positive: bool) -> f32 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// The player character inside one location.
#[derive(Debug, Clone)]
pub struct Actor {
    position: Vec2,
    bounds: Rect,
    controller: MovementController,
    animation: AnimationState,
}

impl Actor {
    pub fn spawn(position: Vec2, bounds: Rect, controller: MovementController) -> Self {
        let animation = AnimationState::Idle {
            facing: controller.current_facing(),
        };
        Self {
            position: bounds.clamp(position),
            bounds,
            controller,
            animation,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn facing(&self) -> Facing {
        self.controller.current_facing()
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.animation, AnimationState::Walking { .. })
    }

    /// Integrate one tick of held input, then clamp into the play area and,
    /// when given, slide along blocking obstacles.
    pub fn advance(&mut self, held: Buttons, dt_ms: u64, obstacles: Option<&Obstacles>) -> Vec2 {
        let step = self.controller.step(held, dt_ms);
        self.animation = step.animation;
        let dt = dt_ms as f32 / 1000.0;
        let target = self.bounds.clamp(self.position + step.velocity * dt);
        self.position = match obstacles {
            Some(obstacles) => obstacles.resolve(self.position, target),
            None => target,
        };
        self.position
    }

    pub fn halt(&mut self) {
        self.animation = self.controller.halt();
    }

    pub fn texture_key(&self) -> String {
        self.animation.texture_key()
    }
}
