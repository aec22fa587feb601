use glam::Vec2;
use serde::Serialize;

/// Axis-aligned rectangle used for play areas and blocking furniture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Inclusive containment; used for play-area checks.
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Exclusive containment; an actor may stand on an obstacle's edge.
    pub fn blocks(&self, point: Vec2) -> bool {
        point.cmpgt(self.min).all() && point.cmplt(self.max).all()
    }
}

/// Static blocking geometry enforced after velocity integration.
#[derive(Debug, Clone, Default)]
pub struct Obstacles {
    rects: Vec<Rect>,
}

impl Obstacles {
    pub fn new(rects: Vec<Rect>) -> Self {
        Self { rects }
    }

    pub fn is_blocked(&self, point: Vec2) -> bool {
        self.rects.iter().any(|rect| rect.blocks(point))
    }

    /// Resolve a step from `from` to `to`. A blocked step keeps whichever
    /// single-axis slide stays free; otherwise the actor stays put.
    pub fn resolve(&self, from: Vec2, to: Vec2) -> Vec2 {
        if !self.is_blocked(to) {
            return to;
        }
        let slide_x = Vec2::new(to.x, from.y);
        if !self.is_blocked(slide_x) {
            return slide_x;
        }
        let slide_y = Vec2::new(from.x, to.y);
        if !self.is_blocked(slide_y) {
            return slide_y;
        }
        from
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}
