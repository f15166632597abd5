//! Entity Types
//!
//! Classified combat participants: player characters and NPCs, with the
//! ability scores, health, movement and actions the advisor reasons about.

use serde::{Deserialize, Serialize};

use crate::Position;

/// Which side of the table controls the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Npc,
}

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl AbilityScores {
    /// Converts a raw score to its modifier, rounding toward negative infinity.
    ///
    /// ```
    /// use combat_events::AbilityScores;
    ///
    /// assert_eq!(AbilityScores::modifier(10), 0);
    /// assert_eq!(AbilityScores::modifier(15), 2);
    /// assert_eq!(AbilityScores::modifier(3), -4);
    /// ```
    pub fn modifier(score: i32) -> i32 {
        (score - 10).div_euclid(2)
    }

    /// Returns each score with its short label, in sheet order.
    pub fn labeled(&self) -> [(&'static str, i32); 6] {
        [
            ("STR", self.strength),
            ("DEX", self.dexterity),
            ("CON", self.constitution),
            ("INT", self.intelligence),
            ("WIS", self.wisdom),
            ("CHA", self.charisma),
        ]
    }
}

/// Hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(current: i32, max: i32) -> Self {
        Self { current, max }
    }

    /// True when current health is strictly below `ratio * max`.
    pub fn is_below(&self, ratio: f64) -> bool {
        f64::from(self.current) < ratio * f64::from(self.max)
    }

    pub fn is_down(&self) -> bool {
        self.current <= 0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(10, 10)
    }
}

/// Ability scores, health and movement speed of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default)]
    pub abilities: AbilityScores,
    #[serde(default)]
    pub health: Health,
    /// Walking speed in feet per turn
    #[serde(default = "default_speed")]
    pub speed: u32,
}

fn default_speed() -> u32 {
    30
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            abilities: AbilityScores::default(),
            health: Health::default(),
            speed: default_speed(),
        }
    }
}

/// Category of an action on an actor's sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Weapon,
    Spell,
    Other,
}

impl ActionKind {
    /// Weapons and spells count as offensive; everything else does not.
    pub fn is_offensive(self) -> bool {
        matches!(self, ActionKind::Weapon | ActionKind::Spell)
    }
}

/// An item or feature the entity can use on its turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    /// Host reference used to link the action from chat (e.g. an item UUID)
    pub identifier: String,
    pub kind: ActionKind,
    /// Reach or range in feet
    #[serde(default)]
    pub range: u32,
}

impl Action {
    pub fn new(
        name: impl Into<String>,
        identifier: impl Into<String>,
        kind: ActionKind,
        range: u32,
    ) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            kind,
            range,
        }
    }

    pub fn weapon(name: impl Into<String>, identifier: impl Into<String>, range: u32) -> Self {
        Self::new(name, identifier, ActionKind::Weapon, range)
    }

    pub fn spell(name: impl Into<String>, identifier: impl Into<String>, range: u32) -> Self {
        Self::new(name, identifier, ActionKind::Spell, range)
    }

    pub fn other(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::new(name, identifier, ActionKind::Other, 0)
    }

    pub fn is_offensive(&self) -> bool {
        self.kind.is_offensive()
    }
}

/// A classified token taking part in an encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub kind: EntityKind,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

impl Entity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: EntityKind,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            kind,
            attributes: Attributes::default(),
            actions: Vec::new(),
        }
    }

    /// Creates a player character at the given position.
    pub fn player(id: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Self::new(id, name, EntityKind::Player, position)
    }

    /// Creates an NPC at the given position.
    pub fn npc(id: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Self::new(id, name, EntityKind::Npc, position)
    }

    pub fn with_abilities(mut self, abilities: AbilityScores) -> Self {
        self.attributes.abilities = abilities;
        self
    }

    pub fn with_intelligence(mut self, intelligence: i32) -> Self {
        self.attributes.abilities.intelligence = intelligence;
        self
    }

    pub fn with_health(mut self, current: i32, max: i32) -> Self {
        self.attributes.health = Health::new(current, max);
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.attributes.speed = speed;
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn is_npc(&self) -> bool {
        self.kind == EntityKind::Npc
    }

    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }

    pub fn intelligence(&self) -> i32 {
        self.attributes.abilities.intelligence
    }

    pub fn health(&self) -> Health {
        self.attributes.health
    }

    /// Movement speed in feet.
    pub fn speed(&self) -> u32 {
        self.attributes.speed
    }
}
