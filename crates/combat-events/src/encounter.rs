//! Encounter identity and the notifications a host emits while combat runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies one bounded combat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncounterId(pub Uuid);

impl EncounterId {
    /// Generates a fresh random encounter id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notification delivered by the host's combat tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatNotification {
    /// The active combatant changed.
    TurnStarted {
        encounter: EncounterId,
        combatant_id: String,
        #[serde(default)]
        round: u32,
    },
    /// The encounter was torn down.
    EncounterEnded { encounter: EncounterId },
}

impl CombatNotification {
    pub fn turn_started(
        encounter: EncounterId,
        combatant_id: impl Into<String>,
        round: u32,
    ) -> Self {
        CombatNotification::TurnStarted {
            encounter,
            combatant_id: combatant_id.into(),
            round,
        }
    }

    pub fn encounter_ended(encounter: EncounterId) -> Self {
        CombatNotification::EncounterEnded { encounter }
    }

    /// Returns the encounter this notification belongs to.
    pub fn encounter(&self) -> EncounterId {
        match self {
            CombatNotification::TurnStarted { encounter, .. } => *encounter,
            CombatNotification::EncounterEnded { encounter } => *encounter,
        }
    }
}
