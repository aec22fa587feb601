/// Handle returned when an action is scheduled; used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<A> {
    id: TimerId,
    due_ms: u64,
    interval_ms: u64,
    /// Firings left; `None` repeats until cancelled.
    remaining: Option<u32>,
    action: A,
}

/// Deferred actions keyed by due time on the tick clock. Each location owns
/// one, so dropping or clearing it is how pending beats get cancelled when
/// the location is torn down.
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    entries: Vec<Entry<A>>,
    next_id: u64,
    fired: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            fired: 0,
        }
    }
}

impl<A: Clone> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `action` once, `delay_ms` after `now_ms`.
    pub fn after(&mut self, now_ms: u64, delay_ms: u64, action: A) -> TimerId {
        self.push(now_ms + delay_ms, delay_ms, Some(1), action)
    }

    /// Fire `action` every `interval_ms` until cancelled.
    pub fn every(&mut self, now_ms: u64, interval_ms: u64, action: A) -> TimerId {
        let interval_ms = interval_ms.max(1);
        self.push(now_ms + interval_ms, interval_ms, None, action)
    }

    /// Fire `action` `count` times, `interval_ms` apart, starting one
    /// interval from now.
    pub fn repeat(&mut self, now_ms: u64, interval_ms: u64, count: u32, action: A) -> Option<TimerId> {
        if count == 0 {
            return None;
        }
        let interval_ms = interval_ms.max(1);
        Some(self.push(now_ms + interval_ms, interval_ms, Some(count), action))
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }

    /// Drop every pending action and report how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.entries.len();
        self.entries.clear();
        cancelled
    }

    /// Pop every action due at or before `now_ms`, ordered by due time and
    /// then by scheduling order. Repeating entries that fell behind during a
    /// long tick fire once per missed interval.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<A> {
        let mut due: Vec<(u64, TimerId, A)> = Vec::new();
        for entry in &mut self.entries {
            while entry.due_ms <= now_ms && entry.remaining != Some(0) {
                due.push((entry.due_ms, entry.id, entry.action.clone()));
                entry.due_ms += entry.interval_ms;
                if let Some(remaining) = entry.remaining.as_mut() {
                    *remaining -= 1;
                }
                if entry.interval_ms == 0 {
                    break;
                }
            }
        }
        self.entries.retain(|entry| entry.remaining != Some(0));
        due.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        self.fired += due.len() as u64;
        due.into_iter().map(|(_, _, action)| action).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }

    fn push(&mut self, due_ms: u64, interval_ms: u64, remaining: Option<u32>, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due_ms,
            interval_ms,
            remaining,
            action,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Beat {
        Intro,
        Hint,
        Blink,
        Photo,
    }

    #[test]
    fn one_shots_fire_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.after(0, 2000, Beat::Hint);
        scheduler.after(0, 500, Beat::Intro);
        assert!(scheduler.drain_due(499).is_empty());
        assert_eq!(scheduler.drain_due(500), vec![Beat::Intro]);
        assert_eq!(scheduler.drain_due(5000), vec![Beat::Hint]);
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.fired(), 2);
    }

    #[test]
    fn same_due_time_keeps_scheduling_order() {
        let mut scheduler = Scheduler::new();
        scheduler.after(0, 100, Beat::Hint);
        scheduler.after(0, 100, Beat::Intro);
        assert_eq!(scheduler.drain_due(100), vec![Beat::Hint, Beat::Intro]);
    }

    #[test]
    fn repeating_entries_catch_up_inside_long_tick() {
        let mut scheduler = Scheduler::new();
        scheduler.every(0, 200, Beat::Blink);
        assert_eq!(scheduler.drain_due(650), vec![Beat::Blink, Beat::Blink, Beat::Blink]);
        assert_eq!(scheduler.drain_due(799), Vec::<Beat>::new());
        assert_eq!(scheduler.drain_due(800), vec![Beat::Blink]);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn bounded_repeat_expires() {
        let mut scheduler = Scheduler::new();
        scheduler.repeat(0, 600, 3, Beat::Photo).expect("non-zero count");
        assert_eq!(scheduler.drain_due(10_000).len(), 3);
        assert!(scheduler.is_empty());
        assert!(scheduler.repeat(0, 600, 0, Beat::Photo).is_none());
    }

    #[test]
    fn cancelled_actions_never_fire() {
        let mut scheduler = Scheduler::new();
        let intro = scheduler.after(0, 100, Beat::Intro);
        scheduler.every(0, 100, Beat::Blink);
        assert!(scheduler.cancel(intro));
        assert!(!scheduler.cancel(intro));
        assert_eq!(scheduler.drain_due(100), vec![Beat::Blink]);
        assert_eq!(scheduler.cancel_all(), 1);
        assert!(scheduler.drain_due(10_000).is_empty());
    }
}
