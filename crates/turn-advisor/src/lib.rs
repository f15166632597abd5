//! NPC turn advisor: combat suggestions whispered to the game master.
//!
//! The advisor sits between a tabletop host's combat tracker and its chat.
//! When an NPC's turn starts it picks a target player and an offensive
//! action, then hands a formatted suggestion to a game-master-only sink.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  TurnStarted   ┌─────────┐  Advisory   ┌─────────────┐
//! │ combat track │ ─────────────▶ │ Advisor │ ──────────▶ │ MessageSink │
//! └──────────────┘                └─────────┘             └─────────────┘
//!                                      ▲
//!                                      │ Scene (once per turn)
//!                                ┌───────────────┐
//!                                │ SceneProvider │
//!                                └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`spatial`]: Straight-line distance and closest-player lookup
//! - [`memory`]: Sticky targets, kept per encounter
//! - [`dice`]: Injectable randomness
//! - [`actions`]: Offensive action selection
//! - [`policy`]: Intelligence tiers
//! - [`engine`]: The decision itself
//! - [`advisory`]: Advisory text
//! - [`host`]: Scene provider and message sink contracts
//! - [`log`]: JSON Lines advisory log
//! - [`replay`]: Scripted encounters

pub mod actions;
pub mod advisory;
pub mod config;
pub mod dice;
pub mod engine;
pub mod host;
pub mod log;
pub mod memory;
pub mod policy;
pub mod replay;
pub mod spatial;

// Re-export decision types
pub use engine::{Decision, DecisionEngine, MovePlan, Reaction, SkipReason, TargetRef};

// Re-export advisory types
pub use advisory::{format_advisory, generate_advisory_id, Advisory, AdvisoryFormatter, Audience};

// Re-export config types
pub use config::{default_config_toml, AdvisorConfig, AdvisoryConfig, ConfigError, PolicyConfig};

// Re-export collaborator contracts
pub use host::{MessageSink, RecordingSink, Scene, SceneProvider, WriterSink};

pub use actions::{pick_action, pick_ranged_action};
pub use dice::{Dice, RngDice, ScriptedDice};
pub use log::{AdvisoryLogReader, AdvisoryLogWriter, LogError};
pub use memory::{EncounterMemories, TargetMemory};
pub use policy::Tier;
pub use replay::{run_scenario, ReplayError, ReplaySummary, Scenario, ScriptedScene, ScriptedTurn};
pub use spatial::distance;

use std::path::Path;

use combat_events::{CombatNotification, EncounterId};
use thiserror::Error;

/// Errors that can occur in advisor operations.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Log error: {0}")]
    Log(#[from] LogError),

    #[error("Replay error: {0}")]
    Replay(#[from] ReplayError),
}

/// What came of one notification.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// An advisory was delivered
    Advised(Advisory),
    /// The turn produced nothing to say
    Skipped(SkipReason),
    /// The encounter's memory was cleared
    EncounterClosed { was_active: bool },
}

impl TurnOutcome {
    pub fn advisory(&self) -> Option<&Advisory> {
        match self {
            TurnOutcome::Advised(advisory) => Some(advisory),
            _ => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            TurnOutcome::Skipped(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Turns combat notifications into game-master advisories.
///
/// The Advisor owns one [`TargetMemory`] per running encounter. Hosts feed it
/// notifications strictly in order; each turn reads the scene once, runs the
/// [`DecisionEngine`], formats the result and delivers it to the sink.
#[derive(Debug)]
pub struct Advisor {
    /// Configuration settings
    config: AdvisorConfig,
    /// Tiered decision policy
    engine: DecisionEngine,
    /// Advisory text renderer
    formatter: AdvisoryFormatter,
    /// Sticky targets per encounter
    memories: EncounterMemories,
    /// Advisories delivered so far
    advisories_issued: u64,
}

impl Advisor {
    /// Creates an Advisor after validating the configuration.
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Creates an Advisor from a configuration file.
    pub fn from_config_file(path: &Path) -> Result<Self, AdvisorError> {
        let config = AdvisorConfig::from_file(path)?;
        Self::new(config)
    }

    /// Creates an Advisor with default configuration.
    pub fn with_defaults() -> Self {
        Self::build(AdvisorConfig::default())
    }

    fn build(config: AdvisorConfig) -> Self {
        Self {
            engine: DecisionEngine::new(config.policy.clone()),
            formatter: AdvisoryFormatter::new(config.advisory.clone()),
            config,
            memories: EncounterMemories::new(),
            advisories_issued: 0,
        }
    }

    /// Starts an encounter with empty target memory.
    pub fn begin_encounter(&mut self, encounter: EncounterId) {
        tracing::info!("Encounter {} started", encounter);
        self.memories.begin(encounter);
    }

    /// Clears and forgets the encounter's target memory.
    pub fn end_encounter(&mut self, encounter: EncounterId) -> bool {
        let was_active = self.memories.end(encounter);
        tracing::info!("Encounter {} ended (tracked: {})", encounter, was_active);
        was_active
    }

    /// Processes a single host notification.
    ///
    /// Turn notifications read the scene exactly once. Unknown combatants,
    /// player turns, empty player lists and NPCs without offensive actions
    /// are skipped silently; nothing is delivered for them.
    pub fn handle<P, S, D>(
        &mut self,
        notification: &CombatNotification,
        provider: &P,
        sink: &mut S,
        dice: &mut D,
    ) -> TurnOutcome
    where
        P: SceneProvider + ?Sized,
        S: MessageSink + ?Sized,
        D: Dice + ?Sized,
    {
        match notification {
            CombatNotification::TurnStarted {
                encounter,
                combatant_id,
                round,
            } => self.take_turn(*encounter, combatant_id, *round, provider, sink, dice),
            CombatNotification::EncounterEnded { encounter } => TurnOutcome::EncounterClosed {
                was_active: self.end_encounter(*encounter),
            },
        }
    }

    fn take_turn<P, S, D>(
        &mut self,
        encounter: EncounterId,
        combatant_id: &str,
        round: u32,
        provider: &P,
        sink: &mut S,
        dice: &mut D,
    ) -> TurnOutcome
    where
        P: SceneProvider + ?Sized,
        S: MessageSink + ?Sized,
        D: Dice + ?Sized,
    {
        let scene = provider.scene(encounter);

        let Some(npc) = scene.find(combatant_id) else {
            return skip(combatant_id, SkipReason::UnresolvableCombatant);
        };
        if !npc.is_npc() {
            return skip(combatant_id, SkipReason::NotAnNpc);
        }

        let players = if self.config.policy.ignore_downed_players {
            scene.living_players()
        } else {
            scene.players.clone()
        };

        let memory = self.memories.memory_mut(encounter);
        let decision = match self.engine.evaluate(npc, &players, &scene.npcs, memory, dice) {
            Ok(decision) => decision,
            Err(reason) => return skip(combatant_id, reason),
        };

        let content = self.formatter.format(npc, &decision);
        let advisory = Advisory::new(
            generate_advisory_id(round, self.advisories_issued),
            encounter,
            npc.id.clone(),
            content,
        )
        .with_round(round)
        .with_speaker(self.config.advisory.speaker.clone());

        sink.deliver(&advisory);
        self.advisories_issued += 1;

        tracing::info!(
            "Advised {} ({} tier): {} -> {} with {}",
            npc.name,
            decision.tier,
            decision.reaction,
            decision.target.name,
            decision.action.name
        );

        TurnOutcome::Advised(advisory)
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Returns the target memory of a running encounter.
    pub fn target_memory(&self, encounter: EncounterId) -> Option<&TargetMemory> {
        self.memories.memory(encounter)
    }

    /// Returns the number of encounters with live memory.
    pub fn active_encounters(&self) -> usize {
        self.memories.active_count()
    }

    /// Returns the number of advisories delivered so far.
    pub fn advisories_issued(&self) -> u64 {
        self.advisories_issued
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn skip(combatant_id: &str, reason: SkipReason) -> TurnOutcome {
    tracing::debug!("No advisory for {}: {}", combatant_id, reason);
    TurnOutcome::Skipped(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_events::{fixtures, Action, Entity, Position};
    use std::io::Write;

    fn sample_scene() -> Scene {
        Scene::from_records(&fixtures::sample_records())
    }

    #[test]
    fn test_advisor_creation() {
        let advisor = Advisor::with_defaults();
        assert_eq!(advisor.active_encounters(), 0);
        assert_eq!(advisor.advisories_issued(), 0);
    }

    #[test]
    fn test_advisor_rejects_invalid_config() {
        let mut config = AdvisorConfig::default();
        config.policy.grid_unit_ft = 0;

        assert!(matches!(Advisor::new(config), Err(AdvisorError::Config(_))));
    }

    #[test]
    fn test_from_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[advisory]\nspeaker = \"Oracle\"\n\n[policy]\naid_chance = 1.0").unwrap();

        let advisor = Advisor::from_config_file(file.path()).unwrap();
        assert_eq!(advisor.config().advisory.speaker, "Oracle");
        assert_eq!(advisor.config().policy.aid_chance, 1.0);
    }

    #[test]
    fn test_from_config_file_rejects_invalid_policy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[policy]\ngrid_unit_ft = 0").unwrap();

        let err = Advisor::from_config_file(file.path()).unwrap_err();
        assert!(matches!(err, AdvisorError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_edge_errors_convert() {
        fn load(path: &Path) -> Result<Scenario, AdvisorError> {
            Ok(Scenario::from_file(path)?)
        }
        fn open_log(path: &Path) -> Result<AdvisoryLogWriter, AdvisorError> {
            Ok(AdvisoryLogWriter::open(path)?)
        }

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(&dir.path().join("missing.json")),
            Err(AdvisorError::Replay(ReplayError::Io(_)))
        ));
        // A directory cannot be opened as a log file
        assert!(matches!(
            open_log(dir.path()),
            Err(AdvisorError::Log(LogError::Io(_)))
        ));
    }

    #[test]
    fn test_npc_turn_delivers_advisory() {
        let mut advisor = Advisor::with_defaults();
        let encounter = EncounterId::generate();
        let scene = sample_scene();
        let mut sink = RecordingSink::new();
        let mut dice = ScriptedDice::new();

        let outcome = advisor.handle(
            &CombatNotification::turn_started(encounter, "tok_wolf", 1),
            &scene,
            &mut sink,
            &mut dice,
        );

        let advisory = outcome.advisory().unwrap();
        assert_eq!(advisory.audience, Audience::GameMasterOnly);
        assert_eq!(advisory.round, 1);
        assert_eq!(advisory.advisory_id, "adv_1_0000");
        assert!(advisory.content.contains("Use @UUID[Item.wolf-bite]{Bite} on Aria"));
        assert!(advisory.content.contains("Dire Wolf attacks closest target"));
        assert_eq!(sink.len(), 1);
        assert_eq!(advisor.advisories_issued(), 1);
        assert_eq!(
            advisor.target_memory(encounter).unwrap().get_sticky("tok_wolf"),
            Some("tok_aria")
        );
    }

    #[test]
    fn test_player_turn_is_ignored() {
        let mut advisor = Advisor::with_defaults();
        let mut sink = RecordingSink::new();

        let outcome = advisor.handle(
            &CombatNotification::turn_started(EncounterId::generate(), "tok_aria", 1),
            &sample_scene(),
            &mut sink,
            &mut ScriptedDice::new(),
        );

        assert_eq!(outcome.skip_reason(), Some(SkipReason::NotAnNpc));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_unclassifiable_combatant_is_ignored() {
        let mut advisor = Advisor::with_defaults();
        let mut sink = RecordingSink::new();
        let scene = sample_scene();

        for id in ["tok_statue", "tok_chest", "tok_missing"] {
            let outcome = advisor.handle(
                &CombatNotification::turn_started(EncounterId::generate(), id, 1),
                &scene,
                &mut sink,
                &mut ScriptedDice::new(),
            );
            assert_eq!(outcome.skip_reason(), Some(SkipReason::UnresolvableCombatant));
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn test_no_players_is_skipped() {
        let mut advisor = Advisor::with_defaults();
        let scene = Scene::from_entities(vec![Entity::npc("tok_gob", "Goblin", Position::origin())
            .with_action(Action::weapon("Scimitar", "Item.scim", 5))]);
        let mut sink = RecordingSink::new();

        let outcome = advisor.handle(
            &CombatNotification::turn_started(EncounterId::generate(), "tok_gob", 1),
            &scene,
            &mut sink,
            &mut ScriptedDice::new(),
        );

        assert_eq!(outcome.skip_reason(), Some(SkipReason::NoPlayers));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_downed_players_are_not_targeted() {
        let mut advisor = Advisor::with_defaults();
        let scene = Scene::from_entities(vec![
            Entity::player("tok_aria", "Aria", Position::new(5.0, 0.0)).with_health(0, 24),
            Entity::player("tok_bren", "Bren", Position::new(300.0, 0.0)),
            Entity::npc("tok_gob", "Goblin", Position::origin())
                .with_intelligence(3)
                .with_action(Action::weapon("Scimitar", "Item.scim", 5)),
        ]);
        let mut sink = RecordingSink::new();

        let outcome = advisor.handle(
            &CombatNotification::turn_started(EncounterId::generate(), "tok_gob", 1),
            &scene,
            &mut sink,
            &mut ScriptedDice::new(),
        );

        assert!(outcome.advisory().unwrap().content.contains("on Bren"));
    }

    #[test]
    fn test_encounter_end_clears_memory() {
        let mut advisor = Advisor::with_defaults();
        let encounter = EncounterId::generate();
        let scene = sample_scene();
        let mut sink = RecordingSink::new();
        let mut dice = ScriptedDice::new();

        advisor.begin_encounter(encounter);
        advisor.handle(
            &CombatNotification::turn_started(encounter, "tok_wolf", 1),
            &scene,
            &mut sink,
            &mut dice,
        );
        assert_eq!(advisor.active_encounters(), 1);

        let outcome = advisor.handle(
            &CombatNotification::encounter_ended(encounter),
            &scene,
            &mut sink,
            &mut dice,
        );

        assert_eq!(outcome, TurnOutcome::EncounterClosed { was_active: true });
        assert!(advisor.target_memory(encounter).is_none());
        assert_eq!(advisor.active_encounters(), 0);
    }

    #[test]
    fn test_speaker_comes_from_config() {
        let mut config = AdvisorConfig::default();
        config.advisory.speaker = "Whispering Oracle".to_string();
        let mut advisor = Advisor::new(config).unwrap();
        let mut sink = RecordingSink::new();

        advisor.handle(
            &CombatNotification::turn_started(EncounterId::generate(), "tok_wolf", 2),
            &sample_scene(),
            &mut sink,
            &mut ScriptedDice::new(),
        );

        assert_eq!(sink.last().unwrap().speaker, "Whispering Oracle");
    }
}
