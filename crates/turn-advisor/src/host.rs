//! Contracts with the host platform.
//!
//! The advisor never reads the host's scene graph or chat directly. A
//! [`SceneProvider`] hands it classified entities once per turn and a
//! [`MessageSink`] takes the finished advisory. Delivery failures stay on the
//! sink's side of the fence: sinks log them and the core never sees them.

use std::io::Write;

use combat_events::{EncounterId, Entity, TokenRecord};

use crate::advisory::Advisory;

/// Classified combatants of one encounter at one moment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub players: Vec<Entity>,
    pub npcs: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits entities into players and NPCs, preserving order.
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let (npcs, players): (Vec<Entity>, Vec<Entity>) =
            entities.into_iter().partition(Entity::is_npc);
        Self { players, npcs }
    }

    /// Classifies raw host records, dropping the ones that fail validation.
    pub fn from_records(records: &[TokenRecord]) -> Self {
        Self::from_entities(records.iter().filter_map(|record| match record.classify() {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::debug!("Skipping token: {}", e);
                None
            }
        }))
    }

    /// Finds a combatant of either kind by id.
    pub fn find(&self, id: &str) -> Option<&Entity> {
        self.npcs
            .iter()
            .chain(self.players.iter())
            .find(|entity| entity.id == id)
    }

    /// Players still standing.
    pub fn living_players(&self) -> Vec<Entity> {
        self.players
            .iter()
            .filter(|p| !p.health().is_down())
            .cloned()
            .collect()
    }
}

/// Supplies the current combatants of an encounter.
pub trait SceneProvider {
    fn scene(&self, encounter: EncounterId) -> Scene;
}

impl SceneProvider for Scene {
    fn scene(&self, _encounter: EncounterId) -> Scene {
        self.clone()
    }
}

/// Receives finished advisories for restricted delivery.
pub trait MessageSink {
    fn deliver(&mut self, advisory: &Advisory);
}

/// Keeps every delivered advisory in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub delivered: Vec<Advisory>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.delivered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delivered.is_empty()
    }

    pub fn last(&self) -> Option<&Advisory> {
        self.delivered.last()
    }
}

impl MessageSink for RecordingSink {
    fn deliver(&mut self, advisory: &Advisory) {
        self.delivered.push(advisory.clone());
    }
}

/// Writes each advisory as a whisper block to any writer (stdout in the CLI).
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MessageSink for WriterSink<W> {
    fn deliver(&mut self, advisory: &Advisory) {
        let result = writeln!(
            self.writer,
            "[whisper to GM] {} (round {})\n{}\n",
            advisory.speaker, advisory.round, advisory.content
        );
        if let Err(e) = result {
            tracing::warn!("Failed to deliver advisory {}: {}", advisory.advisory_id, e);
        }
    }
}
