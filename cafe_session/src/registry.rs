use std::collections::BTreeMap;

use serde::Serialize;

use crate::content::{CuriosityId, DrinkId, CURIOSITY_COUNT};

/// Boot-time fact holding how many memory-lane photos were loaded.
pub const PHOTO_COUNT_KEY: &str = "photo_count";
/// Boot-time fact holding the resolved control scheme label.
pub const CONTROL_SCHEME_KEY: &str = "control_scheme";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RegistryValue {
    String(String),
    Int(i64),
    Bool(bool),
}

/// Outcome of recording a curiosity discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuriosityRecord {
    Added { found: usize, completed_now: bool },
    AlreadyFound,
}

/// Cross-location session state. Owned by the session controller and handed
/// to locations by reference; the only state that survives a transition.
///
/// The three story entries (drink, curiosities, letter) are cleared by
/// [`SessionRegistry::initialize_session`]. Boot facts written through the
/// `write_*` helpers describe the loaded content and survive a replay.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    selected_drink: Option<DrinkId>,
    found_curiosities: Vec<CuriosityId>,
    letter_read: bool,
    completion_celebrated: bool,
    generation: u32,
    facts: BTreeMap<String, RegistryValue>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            selected_drink: None,
            found_curiosities: Vec::with_capacity(CURIOSITY_COUNT),
            letter_read: false,
            completion_celebrated: false,
            generation: 0,
            facts: BTreeMap::new(),
        }
    }

    pub fn initialize_session(&mut self) {
        self.selected_drink = None;
        self.found_curiosities.clear();
        self.letter_read = false;
        self.completion_celebrated = false;
        self.generation += 1;
        log::info!("registry initialized (session {})", self.generation);
    }

    pub fn record_choice(&mut self, drink: DrinkId) {
        if let Some(previous) = self.selected_drink.replace(drink) {
            log::debug!("registry choice {previous} replaced by {drink}");
        }
        log::info!("registry choice {drink}");
    }

    pub fn record_curiosity_found(&mut self, id: CuriosityId) -> CuriosityRecord {
        if self.found_curiosities.contains(&id) {
            log::debug!("registry curiosity {id} already recorded");
            return CuriosityRecord::AlreadyFound;
        }
        let was_complete = self.is_session_complete();
        self.found_curiosities.push(id);
        let found = self.found_curiosities.len();
        let completed_now = !was_complete && self.is_session_complete();
        log::info!("registry curiosity {id} ({found}/{CURIOSITY_COUNT})");
        CuriosityRecord::Added {
            found,
            completed_now,
        }
    }

    pub fn mark_letter_read(&mut self) {
        if !self.letter_read {
            log::info!("registry letter read");
        }
        self.letter_read = true;
    }

    pub fn is_session_complete(&self) -> bool {
        self.found_curiosities.len() >= CURIOSITY_COUNT
    }

    /// Returns `true` the first time it is called after completion, and
    /// `false` on every later call until the next session starts.
    pub fn claim_completion_celebration(&mut self) -> bool {
        if !self.is_session_complete() || self.completion_celebrated {
            return false;
        }
        self.completion_celebrated = true;
        true
    }

    pub fn selected_drink(&self) -> Option<DrinkId> {
        self.selected_drink
    }

    pub fn found_curiosities(&self) -> &[CuriosityId] {
        &self.found_curiosities
    }

    pub fn found_count(&self) -> usize {
        self.found_curiosities.len()
    }

    pub fn has_found(&self, id: CuriosityId) -> bool {
        self.found_curiosities.contains(&id)
    }

    pub fn letter_read(&self) -> bool {
        self.letter_read
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn read_string(&self, key: &str) -> Option<&str> {
        match self.facts.get(key) {
            Some(RegistryValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn read_int(&self, key: &str) -> Option<i64> {
        match self.facts.get(key) {
            Some(RegistryValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn read_bool(&self, key: &str) -> Option<bool> {
        match self.facts.get(key) {
            Some(RegistryValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn write_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.facts
            .insert(key.into(), RegistryValue::String(value.into()));
    }

    pub fn write_int(&mut self, key: impl Into<String>, value: i64) {
        self.facts.insert(key.into(), RegistryValue::Int(value));
    }

    pub fn write_bool(&mut self, key: impl Into<String>, value: bool) {
        self.facts.insert(key.into(), RegistryValue::Bool(value));
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            session: self.generation,
            selected_drink: self.selected_drink,
            found_curiosities: self.found_curiosities.clone(),
            letter_read: self.letter_read,
            complete: self.is_session_complete(),
            facts: self.facts.clone(),
        }
    }
}

/// Read-only export of the registry for run reports.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySnapshot {
    pub session: u32,
    pub selected_drink: Option<DrinkId>,
    pub found_curiosities: Vec<CuriosityId>,
    pub letter_read: bool,
    pub complete: bool,
    pub facts: BTreeMap<String, RegistryValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_session_clears_story_entries() {
        let mut registry = SessionRegistry::new();
        registry.record_choice(DrinkId::SeoulMatcha);
        registry.record_curiosity_found(CuriosityId::Moon);
        registry.mark_letter_read();

        registry.initialize_session();
        assert_eq!(registry.selected_drink(), None);
        assert!(registry.found_curiosities().is_empty());
        assert!(!registry.letter_read());
        assert!(!registry.is_session_complete());
    }

    #[test]
    fn duplicate_curiosity_is_idempotent() {
        let mut registry = SessionRegistry::new();
        assert_eq!(
            registry.record_curiosity_found(CuriosityId::Piano),
            CuriosityRecord::Added {
                found: 1,
                completed_now: false
            }
        );
        assert_eq!(
            registry.record_curiosity_found(CuriosityId::Piano),
            CuriosityRecord::AlreadyFound
        );
        assert_eq!(registry.found_count(), 1);
    }

    #[test]
    fn found_order_is_insertion_order() {
        let mut registry = SessionRegistry::new();
        registry.record_curiosity_found(CuriosityId::Books);
        registry.record_curiosity_found(CuriosityId::EvilEye);
        registry.record_curiosity_found(CuriosityId::Flag);
        assert_eq!(
            registry.found_curiosities(),
            &[CuriosityId::Books, CuriosityId::EvilEye, CuriosityId::Flag]
        );
    }

    #[test]
    fn completion_flips_once_on_seventh_curiosity() {
        let mut registry = SessionRegistry::new();
        let mut flips = 0;
        for (index, id) in CuriosityId::ALL.into_iter().enumerate() {
            let before = registry.is_session_complete();
            let record = registry.record_curiosity_found(id);
            let after = registry.is_session_complete();
            if !before && after {
                flips += 1;
                assert_eq!(index, CURIOSITY_COUNT - 1);
                assert_eq!(
                    record,
                    CuriosityRecord::Added {
                        found: CURIOSITY_COUNT,
                        completed_now: true
                    }
                );
            }
        }
        for id in CuriosityId::ALL {
            assert_eq!(
                registry.record_curiosity_found(id),
                CuriosityRecord::AlreadyFound
            );
        }
        assert_eq!(flips, 1);
        assert_eq!(registry.found_count(), CURIOSITY_COUNT);
    }

    #[test]
    fn completion_celebration_is_claimed_once_per_session() {
        let mut registry = SessionRegistry::new();
        assert!(!registry.claim_completion_celebration());
        for id in CuriosityId::ALL {
            registry.record_curiosity_found(id);
        }
        assert!(registry.claim_completion_celebration());
        assert!(!registry.claim_completion_celebration());

        registry.initialize_session();
        for id in CuriosityId::ALL {
            registry.record_curiosity_found(id);
        }
        assert!(registry.claim_completion_celebration());
    }

    #[test]
    fn boot_facts_survive_replay() {
        let mut registry = SessionRegistry::new();
        registry.write_int(PHOTO_COUNT_KEY, 52);
        registry.write_string(CONTROL_SCHEME_KEY, "keyboard");
        registry.write_bool("debug", true);
        registry.initialize_session();
        assert_eq!(registry.read_int(PHOTO_COUNT_KEY), Some(52));
        assert_eq!(registry.read_string(CONTROL_SCHEME_KEY), Some("keyboard"));
        assert_eq!(registry.read_bool("debug"), Some(true));
        assert_eq!(registry.read_int(CONTROL_SCHEME_KEY), None);
    }

    #[test]
    fn snapshot_serializes_slugs() {
        let mut registry = SessionRegistry::new();
        registry.record_choice(DrinkId::CosmicColdBrew);
        registry.record_curiosity_found(CuriosityId::Espresso);
        let json = serde_json::to_value(registry.snapshot()).expect("snapshot json");
        assert_eq!(json["selected_drink"], "cosmic-cold-brew");
        assert_eq!(json["found_curiosities"][0], "espresso");
        assert_eq!(json["complete"], false);
    }
}
