//! Advisory text generation.
//!
//! Turns a [`Decision`] into the whisper the game master reads. Formatting is
//! pure; delivering the text is the job of a [`MessageSink`](crate::host::MessageSink).

use serde::{Deserialize, Serialize};

use combat_events::{AbilityScores, EncounterId, Entity};

use crate::config::AdvisoryConfig;
use crate::engine::Decision;

/// Who may read an advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    /// Whispered to the game master only
    #[default]
    GameMasterOnly,
}

/// A formatted suggestion ready for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    /// Unique identifier
    pub advisory_id: String,
    /// Encounter the advisory belongs to
    pub encounter: EncounterId,
    /// Combat round the turn started in
    pub round: u32,
    /// NPC the advice is for
    pub npc_id: String,
    /// Name shown as the message author
    pub speaker: String,
    /// Restricted audience marker
    pub audience: Audience,
    /// The rendered text
    pub content: String,
}

impl Advisory {
    /// Creates a new game-master-only advisory.
    pub fn new(
        advisory_id: impl Into<String>,
        encounter: EncounterId,
        npc_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            advisory_id: advisory_id.into(),
            encounter,
            round: 0,
            npc_id: npc_id.into(),
            speaker: AdvisoryConfig::default().speaker,
            audience: Audience::GameMasterOnly,
            content: content.into(),
        }
    }

    /// Sets the combat round.
    pub fn with_round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }

    /// Sets the speaker.
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = speaker.into();
        self
    }
}

/// Generates an advisory ID.
pub fn generate_advisory_id(round: u32, sequence: u64) -> String {
    format!("adv_{}_{:04}", round, sequence)
}

/// Renders a signed ability modifier, e.g. `+2`, `+0`, `-1`.
pub fn signed_modifier(score: i32) -> String {
    format!("{:+}", AbilityScores::modifier(score))
}

/// Renders decisions as multi-line advisory text.
#[derive(Debug, Clone, Default)]
pub struct AdvisoryFormatter {
    config: AdvisoryConfig,
}

impl AdvisoryFormatter {
    pub fn new(config: AdvisoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdvisoryConfig {
        &self.config
    }

    /// Formats the decision for `npc`.
    ///
    /// Lines: header, movement, action with an embedded item link, ability
    /// modifiers (unless disabled), reaction.
    pub fn format(&self, npc: &Entity, decision: &Decision) -> String {
        let mut lines = Vec::with_capacity(5);

        lines.push(format!("{}'s turn ({} tier)", npc.name, decision.tier));
        lines.push(format!("Move: {}", decision.move_description));
        lines.push(format!(
            "Action: Use @UUID[{}]{{{}}} on {}",
            decision.action.identifier, decision.action.name, decision.target.name
        ));

        if self.config.include_attributes {
            let modifiers: Vec<String> = npc
                .attributes
                .abilities
                .labeled()
                .iter()
                .map(|(label, score)| format!("{} {}", label, signed_modifier(*score)))
                .collect();
            lines.push(format!("Attributes: {}", modifiers.join(", ")));
        }

        lines.push(format!("Reaction: {} {}", npc.name, decision.reaction));

        lines.join("\n")
    }
}

/// Formats a decision with the default settings.
pub fn format_advisory(npc: &Entity, decision: &Decision) -> String {
    AdvisoryFormatter::default().format(npc, decision)
}
