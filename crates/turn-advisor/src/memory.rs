//! Sticky target memory.
//!
//! Each NPC keeps attacking the player it picked on an earlier turn until that
//! player leaves the fight. Memory lives for exactly one encounter and is
//! keyed per encounter so two fights never see each other's targets.

use std::collections::{HashMap, HashSet};

use combat_events::EncounterId;

/// Maps NPC id -> id of the player it is currently targeting.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TargetMemory {
    targets: HashMap<String, String>,
}

impl TargetMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_sticky(&self, npc_id: &str) -> Option<&str> {
        self.targets.get(npc_id).map(String::as_str)
    }

    pub fn set_sticky(&mut self, npc_id: impl Into<String>, player_id: impl Into<String>) {
        self.targets.insert(npc_id.into(), player_id.into());
    }

    /// Drops the NPC's entry when its stored target is not among `living_player_ids`.
    ///
    /// Returns true when an entry was removed.
    pub fn invalidate_if_absent(
        &mut self,
        npc_id: &str,
        living_player_ids: &HashSet<&str>,
    ) -> bool {
        let stale = self
            .targets
            .get(npc_id)
            .is_some_and(|target| !living_player_ids.contains(target.as_str()));
        if stale {
            self.targets.remove(npc_id);
        }
        stale
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Target memories for every encounter currently running.
#[derive(Debug, Default)]
pub struct EncounterMemories {
    encounters: HashMap<EncounterId, TargetMemory>,
}

impl EncounterMemories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking an encounter with an empty memory.
    ///
    /// An encounter that is already tracked keeps its memory.
    pub fn begin(&mut self, encounter: EncounterId) {
        self.encounters.entry(encounter).or_default();
    }

    /// Returns the encounter's memory, creating it if the encounter is new.
    pub fn memory_mut(&mut self, encounter: EncounterId) -> &mut TargetMemory {
        self.encounters.entry(encounter).or_default()
    }

    pub fn memory(&self, encounter: EncounterId) -> Option<&TargetMemory> {
        self.encounters.get(&encounter)
    }

    /// Clears and forgets the encounter's memory.
    ///
    /// Returns false if the encounter was not being tracked.
    pub fn end(&mut self, encounter: EncounterId) -> bool {
        match self.encounters.remove(&encounter) {
            Some(mut memory) => {
                memory.clear();
                true
            }
            None => false,
        }
    }

    pub fn active_count(&self) -> usize {
        self.encounters.len()
    }
}
