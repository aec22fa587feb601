use glam::Vec2;

/// A trigger zone the actor can interact with.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionPoint<K> {
    pub key: K,
    pub center: Vec2,
    pub radius: f32,
    pub prompt: String,
    /// Consumed on trigger and never offered again.
    pub single_use: bool,
    consumed: bool,
    enabled: bool,
}

impl<K> InteractionPoint<K> {
    pub fn new(key: K, center: Vec2, radius: f32, prompt: impl Into<String>) -> Self {
        Self {
            key,
            center,
            radius,
            prompt: prompt.into(),
            single_use: false,
            consumed: false,
            enabled: true,
        }
    }

    pub fn single_use(mut self) -> Self {
        self.single_use = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    fn is_candidate(&self) -> bool {
        self.enabled && !self.consumed
    }

    /// Strictly inside the radius; a point sitting exactly on the boundary
    /// is out of range.
    fn in_range(&self, position: Vec2) -> Option<f32> {
        let distance = position.distance(self.center);
        (distance < self.radius).then_some(distance)
    }
}

/// What the caller should do with the prompt after an evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptChange {
    Show { text: String, anchor: Vec2 },
    Hide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Proximity<K> {
    pub active: Option<K>,
    pub triggered: Option<K>,
    pub prompt: Option<PromptChange>,
}

impl<K> Default for Proximity<K> {
    fn default() -> Self {
        Self {
            active: None,
            triggered: None,
            prompt: None,
        }
    }
}

/// Picks the single active interaction point for the actor each tick and
/// reports action presses against it.
#[derive(Debug, Clone)]
pub struct ProximityDetector<K> {
    points: Vec<InteractionPoint<K>>,
    active: Option<usize>,
    prompt_visible: bool,
}

impl<K: Clone + PartialEq> ProximityDetector<K> {
    pub fn new(points: Vec<InteractionPoint<K>>) -> Self {
        Self {
            points,
            active: None,
            prompt_visible: false,
        }
    }

    pub fn points(&self) -> &[InteractionPoint<K>] {
        &self.points
    }

    pub fn active(&self) -> Option<&K> {
        self.active.map(|index| &self.points[index].key)
    }

    pub fn prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    /// Nearest eligible point strictly within its radius; ties keep the
    /// earlier declaration.
    pub fn nearest(&self, position: Vec2) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, point) in self.points.iter().enumerate() {
            if !point.is_candidate() {
                continue;
            }
            if let Some(distance) = point.in_range(position) {
                match best {
                    Some((_, closest)) if closest <= distance => {}
                    _ => best = Some((index, distance)),
                }
            }
        }
        best.map(|(index, _)| index)
    }

    /// Re-evaluate against the (already clamped) actor position, then handle
    /// this tick's action edge.
    pub fn evaluate(&mut self, position: Vec2, action_pressed: bool) -> Proximity<K> {
        let nearest = self.nearest(position);
        let mut outcome = Proximity::default();

        if nearest != self.active || (nearest.is_some() && !self.prompt_visible) {
            outcome.prompt = match nearest {
                Some(index) => {
                    self.prompt_visible = true;
                    let point = &self.points[index];
                    Some(PromptChange::Show {
                        text: point.prompt.clone(),
                        anchor: point.center,
                    })
                }
                None if self.prompt_visible => {
                    self.prompt_visible = false;
                    Some(PromptChange::Hide)
                }
                None => None,
            };
            self.active = nearest;
        }

        if let (Some(index), true) = (self.active, action_pressed) {
            let point = &mut self.points[index];
            outcome.triggered = Some(point.key.clone());
            if point.single_use {
                point.consumed = true;
                self.active = None;
                if self.prompt_visible {
                    self.prompt_visible = false;
                    outcome.prompt = Some(PromptChange::Hide);
                }
            }
        }

        outcome.active = self.active.map(|index| self.points[index].key.clone());
        outcome
    }

    /// Forget the active point; returns true when a prompt was showing and
    /// should be hidden.
    pub fn release(&mut self) -> bool {
        self.active = None;
        std::mem::replace(&mut self.prompt_visible, false)
    }

    pub fn set_enabled(&mut self, key: &K, enabled: bool) {
        for point in self.points.iter_mut().filter(|point| &point.key == key) {
            point.enabled = enabled;
        }
    }

    pub fn mark_consumed(&mut self, key: &K) {
        for point in self.points.iter_mut().filter(|point| &point.key == key) {
            point.consumed = true;
        }
    }

    pub fn remaining(&self) -> usize {
        self.points.iter().filter(|point| point.is_candidate()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Spot {
        Counter,
        Table,
        Plant,
    }

    fn detector() -> ProximityDetector<Spot> {
        ProximityDetector::new(vec![
            InteractionPoint::new(Spot::Counter, Vec2::new(0.0, 0.0), 50.0, "order"),
            InteractionPoint::new(Spot::Table, Vec2::new(100.0, 0.0), 70.0, "sit"),
            InteractionPoint::new(Spot::Plant, Vec2::new(0.0, 100.0), 50.0, "look").single_use(),
        ])
    }

    #[test]
    fn point_center_is_active_for_any_positive_radius() {
        let mut detector =
            ProximityDetector::new(vec![InteractionPoint::new(Spot::Plant, Vec2::ONE, 0.01, "x")]);
        let outcome = detector.evaluate(Vec2::ONE, false);
        assert_eq!(outcome.active, Some(Spot::Plant));
    }

    #[test]
    fn boundary_distance_is_exclusive() {
        let mut detector = detector();
        let outcome = detector.evaluate(Vec2::new(0.0, -50.0), false);
        assert_eq!(outcome.active, None);
        assert_eq!(outcome.prompt, None);
        let outcome = detector.evaluate(Vec2::new(0.0, -49.9), false);
        assert_eq!(outcome.active, Some(Spot::Counter));
    }

    #[test]
    fn nearest_point_wins_and_ties_keep_declaration_order() {
        let detector = detector();
        assert_eq!(detector.nearest(Vec2::new(60.0, 0.0)), Some(1));
        assert_eq!(detector.nearest(Vec2::new(40.0, 0.0)), Some(0));
        let tied = ProximityDetector::new(vec![
            InteractionPoint::new(Spot::Counter, Vec2::new(-10.0, 0.0), 50.0, "a"),
            InteractionPoint::new(Spot::Table, Vec2::new(10.0, 0.0), 50.0, "b"),
        ]);
        assert_eq!(tied.nearest(Vec2::ZERO), Some(0));
    }

    #[test]
    fn prompt_shows_once_and_hides_on_leave() {
        let mut detector = detector();
        let first = detector.evaluate(Vec2::new(5.0, 0.0), false);
        assert_eq!(
            first.prompt,
            Some(PromptChange::Show {
                text: "order".into(),
                anchor: Vec2::ZERO
            })
        );
        assert_eq!(detector.evaluate(Vec2::new(6.0, 0.0), false).prompt, None);
        assert_eq!(
            detector.evaluate(Vec2::new(500.0, 0.0), false).prompt,
            Some(PromptChange::Hide)
        );
        assert_eq!(detector.evaluate(Vec2::new(501.0, 0.0), false).prompt, None);
    }

    #[test]
    fn single_use_points_are_consumed_on_trigger() {
        let mut detector = detector();
        let position = Vec2::new(0.0, 95.0);
        let outcome = detector.evaluate(position, true);
        assert_eq!(outcome.triggered, Some(Spot::Plant));
        assert_eq!(outcome.active, None);
        assert_eq!(outcome.prompt, Some(PromptChange::Hide));
        let again = detector.evaluate(position, true);
        assert_eq!(again.triggered, None);
        assert_eq!(detector.remaining(), 2);
    }

    #[test]
    fn reusable_points_trigger_on_every_press() {
        let mut detector = detector();
        assert_eq!(detector.evaluate(Vec2::ZERO, true).triggered, Some(Spot::Counter));
        assert_eq!(detector.evaluate(Vec2::ZERO, false).triggered, None);
        assert_eq!(detector.evaluate(Vec2::ZERO, true).triggered, Some(Spot::Counter));
    }

    #[test]
    fn disabled_points_are_skipped_until_enabled() {
        let mut detector = ProximityDetector::new(vec![
            InteractionPoint::new(Spot::Table, Vec2::ZERO, 70.0, "sit").disabled(),
        ]);
        assert_eq!(detector.evaluate(Vec2::ZERO, true).triggered, None);
        detector.set_enabled(&Spot::Table, true);
        assert_eq!(detector.evaluate(Vec2::ZERO, true).triggered, Some(Spot::Table));
    }

    #[test]
    fn release_reports_visible_prompt() {
        let mut detector = detector();
        detector.evaluate(Vec2::ZERO, false);
        assert!(detector.release());
        assert!(!detector.release());
        // prompt comes back on the next evaluation
        assert!(matches!(
            detector.evaluate(Vec2::ZERO, false).prompt,
            Some(PromptChange::Show { .. })
        ));
    }
}
