//! Raw Token Records
//!
//! Hosts hand over loosely-typed token data where any field may be missing.
//! A [`TokenRecord`] is only turned into an [`Entity`] after every field the
//! advisor depends on has been checked; a record that lacks one is reported as
//! unclassifiable instead of being read as a silent default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AbilityScores, Action, ActionKind, Attributes, Entity, EntityKind, Health, Position};

/// Actor type string hosts use for non-player characters.
pub const NPC_ACTOR_TYPE: &str = "npc";

/// Actor type string hosts use for player characters.
pub const CHARACTER_ACTOR_TYPE: &str = "character";

/// Errors raised when a token record cannot be classified.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("token {token} is missing required field `{field}`")]
    MissingField { token: String, field: &'static str },

    #[error("token {token} has unsupported actor type `{actor_type}`")]
    UnknownActorType { token: String, actor_type: String },
}

/// An item entry as exposed by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub range: Option<u32>,
}

impl ActionRecord {
    /// Converts the entry to an [`Action`], or `None` when it cannot be linked.
    pub fn to_action(&self) -> Option<Action> {
        let name = self.name.as_ref()?;
        let identifier = self.id.as_ref()?;
        let kind = match self.item_type.as_deref() {
            Some("weapon") => ActionKind::Weapon,
            Some("spell") => ActionKind::Spell,
            _ => ActionKind::Other,
        };
        Some(Action::new(
            name.clone(),
            identifier.clone(),
            kind,
            self.range.unwrap_or(0),
        ))
    }
}

/// A token as exposed by the host scene, before classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub actor_type: Option<String>,
    #[serde(default)]
    pub abilities: Option<AbilityScores>,
    #[serde(default)]
    pub hp: Option<Health>,
    #[serde(default)]
    pub speed: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ActionRecord>,
}

impl TokenRecord {
    /// Validates the record and builds the corresponding entity.
    ///
    /// Players only need identity, position and actor type. NPCs additionally
    /// need ability scores and hit points because the decision policy reads
    /// both. Item entries without a name or id are dropped.
    pub fn classify(&self) -> Result<Entity, ClassifyError> {
        let token = self.id.clone().unwrap_or_else(|| "<unknown>".to_string());
        let missing = |field: &'static str| ClassifyError::MissingField {
            token: token.clone(),
            field,
        };

        let id = self.id.clone().ok_or_else(|| missing("id"))?;
        let name = self.name.clone().ok_or_else(|| missing("name"))?;
        let x = self.x.ok_or_else(|| missing("x"))?;
        let y = self.y.ok_or_else(|| missing("y"))?;
        let actor_type = self.actor_type.as_deref().ok_or_else(|| missing("actor_type"))?;

        let kind = match actor_type {
            NPC_ACTOR_TYPE => EntityKind::Npc,
            CHARACTER_ACTOR_TYPE => EntityKind::Player,
            other => {
                return Err(ClassifyError::UnknownActorType {
                    token: token.clone(),
                    actor_type: other.to_string(),
                })
            }
        };

        let (abilities, health) = match kind {
            EntityKind::Npc => (
                self.abilities.ok_or_else(|| missing("abilities"))?,
                self.hp.ok_or_else(|| missing("hp"))?,
            ),
            EntityKind::Player => (
                self.abilities.unwrap_or_default(),
                self.hp.unwrap_or_default(),
            ),
        };

        let mut attributes = Attributes {
            abilities,
            health,
            ..Attributes::default()
        };
        if let Some(speed) = self.speed {
            attributes.speed = speed;
        }

        Ok(Entity {
            id,
            name,
            position: Position::new(x, y),
            kind,
            attributes,
            actions: self.items.iter().filter_map(ActionRecord::to_action).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npc_record() -> TokenRecord {
        TokenRecord {
            id: Some("tok_gob".to_string()),
            name: Some("Goblin".to_string()),
            x: Some(100.0),
            y: Some(50.0),
            actor_type: Some("npc".to_string()),
            abilities: Some(AbilityScores {
                intelligence: 6,
                ..AbilityScores::default()
            }),
            hp: Some(Health::new(7, 7)),
            speed: Some(30),
            items: vec![
                ActionRecord {
                    name: Some("Scimitar".to_string()),
                    id: Some("Item.scim".to_string()),
                    item_type: Some("weapon".to_string()),
                    range: Some(5),
                },
                ActionRecord {
                    name: Some("Nimble Escape".to_string()),
                    id: Some("Item.esc".to_string()),
                    item_type: Some("feat".to_string()),
                    range: None,
                },
            ],
        }
    }

    #[test]
    fn test_classify_npc() {
        let entity = npc_record().classify().unwrap();

        assert!(entity.is_npc());
        assert_eq!(entity.position, Position::new(100.0, 50.0));
        assert_eq!(entity.intelligence(), 6);
        assert_eq!(entity.actions.len(), 2);
        assert_eq!(entity.actions[0].kind, ActionKind::Weapon);
        assert_eq!(entity.actions[1].kind, ActionKind::Other);
    }

    #[test]
    fn test_classify_player_uses_defaults() {
        let record = TokenRecord {
            id: Some("tok_aria".to_string()),
            name: Some("Aria".to_string()),
            x: Some(0.0),
            y: Some(0.0),
            actor_type: Some("character".to_string()),
            ..TokenRecord::default()
        };
        let entity = record.classify().unwrap();

        assert!(entity.is_player());
        assert_eq!(entity.health(), Health::default());
        assert_eq!(entity.speed(), 30);
    }

    #[test]
    fn test_npc_without_abilities_is_unclassifiable() {
        let record = TokenRecord {
            abilities: None,
            ..npc_record()
        };

        assert_eq!(
            record.classify(),
            Err(ClassifyError::MissingField {
                token: "tok_gob".to_string(),
                field: "abilities",
            })
        );
    }

    #[test]
    fn test_missing_actor_type() {
        let record = TokenRecord {
            actor_type: None,
            ..npc_record()
        };
        let err = record.classify().unwrap_err();
        assert_eq!(
            err.to_string(),
            "token tok_gob is missing required field `actor_type`"
        );
    }

    #[test]
    fn test_unknown_actor_type() {
        let record = TokenRecord {
            actor_type: Some("vehicle".to_string()),
            ..npc_record()
        };

        assert!(matches!(
            record.classify(),
            Err(ClassifyError::UnknownActorType { .. })
        ));
    }

    #[test]
    fn test_unnamed_items_are_dropped() {
        let mut record = npc_record();
        record.items.push(ActionRecord {
            name: None,
            id: Some("Item.ghost".to_string()),
            item_type: Some("weapon".to_string()),
            range: Some(5),
        });

        let entity = record.classify().unwrap();
        assert_eq!(entity.actions.len(), 2);
    }

    #[test]
    fn test_record_deserializes_item_type_field() {
        let json = r#"{"name": "Shortbow", "id": "Item.bow", "type": "weapon", "range": 80}"#;
        let record: ActionRecord = serde_json::from_str(json).unwrap();

        let action = record.to_action().unwrap();
        assert_eq!(action.kind, ActionKind::Weapon);
        assert_eq!(action.range, 80);
    }
}
