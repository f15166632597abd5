//! Scripted encounters.
//!
//! A [`Scenario`] lists the tokens on the scene and the turn order, plus the
//! moves, damage and departures that happen before each turn. Replaying it
//! drives an [`Advisor`] exactly as a host's combat tracker would.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use combat_events::record::CHARACTER_ACTOR_TYPE;
use combat_events::{CombatNotification, EncounterId, Health, Position, TokenRecord};

use crate::dice::Dice;
use crate::engine::SkipReason;
use crate::host::{MessageSink, Scene, SceneProvider};
use crate::{Advisor, TurnOutcome};

/// Errors that can occur while loading a scenario.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One combatant's turn and the scene changes leading up to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptedTurn {
    /// Token whose turn starts
    pub combatant: String,
    #[serde(default)]
    pub round: u32,
    /// New positions by token id
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub moves: HashMap<String, Position>,
    /// New current hit points by token id
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub hp: HashMap<String, i32>,
    /// Tokens that leave the scene
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
}

impl ScriptedTurn {
    pub fn new(combatant: impl Into<String>, round: u32) -> Self {
        Self {
            combatant: combatant.into(),
            round,
            ..Self::default()
        }
    }
}

/// A complete scripted encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    /// Fixed encounter id; a random one is generated when absent
    #[serde(default)]
    pub encounter: Option<EncounterId>,
    pub tokens: Vec<TokenRecord>,
    pub turns: Vec<ScriptedTurn>,
    /// Send an encounter-end notification after the last turn
    #[serde(default = "default_end_encounter")]
    pub end_encounter: bool,
}

fn default_end_encounter() -> bool {
    true
}

impl Scenario {
    /// Loads a scenario from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses a scenario from a JSON string.
    pub fn from_str(content: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Scene provider backed by mutable token records.
#[derive(Debug, Clone, Default)]
pub struct ScriptedScene {
    records: Vec<TokenRecord>,
}

impl ScriptedScene {
    pub fn new(records: Vec<TokenRecord>) -> Self {
        Self { records }
    }

    /// Applies a turn's moves, damage and removals.
    ///
    /// Player records without hit points start from the default health a
    /// classified player gets. Other records without hit points ignore damage.
    pub fn apply(&mut self, turn: &ScriptedTurn) {
        self.records
            .retain(|r| r.id.as_ref().map_or(true, |id| !turn.removed.contains(id)));

        for record in &mut self.records {
            let Some(id) = record.id.as_deref() else {
                continue;
            };
            if let Some(position) = turn.moves.get(id) {
                record.x = Some(position.x);
                record.y = Some(position.y);
            }
            if let Some(&current) = turn.hp.get(id) {
                let is_player = record.actor_type.as_deref() == Some(CHARACTER_ACTOR_TYPE);
                if record.hp.is_none() && is_player {
                    record.hp = Some(Health::default());
                }
                match record.hp.as_mut() {
                    Some(hp) => hp.current = current,
                    None => tracing::debug!("Ignoring hp change for {}: no hit points", id),
                }
            }
        }
    }

    pub fn records(&self) -> &[TokenRecord] {
        &self.records
    }
}

impl SceneProvider for ScriptedScene {
    fn scene(&self, _encounter: EncounterId) -> Scene {
        Scene::from_records(&self.records)
    }
}

/// Result of replaying a scenario.
#[derive(Debug, Clone)]
pub struct ReplaySummary {
    pub encounter: EncounterId,
    /// One outcome per notification, in order
    pub outcomes: Vec<TurnOutcome>,
}

impl ReplaySummary {
    pub fn advised(&self) -> usize {
        self.outcomes.iter().filter(|o| o.advisory().is_some()).count()
    }

    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.skip_reason() == Some(reason))
            .count()
    }
}

/// Replays a scenario through the advisor.
pub fn run_scenario<S, D>(
    advisor: &mut Advisor,
    scenario: &Scenario,
    sink: &mut S,
    dice: &mut D,
) -> ReplaySummary
where
    S: MessageSink + ?Sized,
    D: Dice + ?Sized,
{
    let encounter = scenario.encounter.unwrap_or_else(EncounterId::generate);
    let mut scene = ScriptedScene::new(scenario.tokens.clone());
    let mut outcomes = Vec::with_capacity(scenario.turns.len() + 1);

    advisor.begin_encounter(encounter);
    for turn in &scenario.turns {
        scene.apply(turn);
        let notification =
            CombatNotification::turn_started(encounter, turn.combatant.clone(), turn.round);
        outcomes.push(advisor.handle(&notification, &scene, sink, dice));
    }

    if scenario.end_encounter {
        let notification = CombatNotification::encounter_ended(encounter);
        outcomes.push(advisor.handle(&notification, &scene, sink, dice));
    }

    ReplaySummary { encounter, outcomes }
}
