//! Decision engine: target, movement, reaction and action for one NPC turn.
//!
//! The engine is a pure, synchronous computation over a snapshot of the
//! scene. Its only state is the encounter's [`TargetMemory`], passed in by the
//! caller, and its only nondeterminism is the injected [`Dice`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use combat_events::{Action, Entity, Position};

use crate::actions::{pick_action, pick_ranged_action};
use crate::config::PolicyConfig;
use crate::dice::Dice;
use crate::memory::TargetMemory;
use crate::policy::Tier;
use crate::spatial::{closest, distance};

/// Why a turn produced no advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No player is available to target
    NoPlayers,
    /// The NPC has no weapon or spell to suggest
    NoOffensiveAction,
    /// The active combatant could not be found or classified
    UnresolvableCombatant,
    /// The active combatant is a player character
    NotAnNpc,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoPlayers => write!(f, "no players to target"),
            SkipReason::NoOffensiveAction => write!(f, "no offensive action available"),
            SkipReason::UnresolvableCombatant => write!(f, "combatant could not be resolved"),
            SkipReason::NotAnNpc => write!(f, "combatant is not an NPC"),
        }
    }
}

/// The player an NPC is told to go after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRef {
    pub id: String,
    pub name: String,
    pub position: Position,
}

impl From<&Entity> for TargetRef {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id.clone(),
            name: entity.name.clone(),
            position: entity.position,
        }
    }
}

/// Movement available this turn relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovePlan {
    /// Whole grid squares the NPC can cover
    pub spaces: u32,
    /// Straight-line distance to the target in canvas units
    pub distance: f64,
    /// Target already within engagement range
    pub in_reach: bool,
}

/// How the NPC behaves this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reaction {
    AttackClosest,
    RangedAttack,
    ClosestNoRanged,
    AidAlly { ally_id: String, ally_name: String },
    Flee,
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reaction::AttackClosest => write!(f, "attacks closest target"),
            Reaction::RangedAttack => write!(f, "uses a ranged attack"),
            Reaction::ClosestNoRanged => {
                write!(f, "attacks closest target due to lack of ranged options")
            }
            Reaction::AidAlly { ally_name, .. } => {
                write!(f, "switches target to aid {} who is at low health", ally_name)
            }
            Reaction::Flee => write!(f, "attempts to flee due to low health"),
        }
    }
}

/// Suggested play for one NPC turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub npc_id: String,
    pub tier: Tier,
    pub target: TargetRef,
    pub movement: MovePlan,
    pub move_description: String,
    pub action: Action,
    pub reaction: Reaction,
}

impl Decision {
    /// Human-readable reaction note.
    pub fn reaction_note(&self) -> String {
        self.reaction.to_string()
    }
}

/// Applies the tiered policy to an NPC's turn.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    policy: PolicyConfig,
}

impl DecisionEngine {
    pub fn new(policy: PolicyConfig) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Computes the decision for `npc`, or `None` when there is nothing to suggest.
    pub fn decide<D: Dice + ?Sized>(
        &self,
        npc: &Entity,
        players: &[Entity],
        all_npcs: &[Entity],
        memory: &mut TargetMemory,
        dice: &mut D,
    ) -> Option<Decision> {
        self.evaluate(npc, players, all_npcs, memory, dice).ok()
    }

    /// Like [`decide`](Self::decide), but reports why no decision was made.
    ///
    /// Steps, in order:
    /// 1. Resolve the sticky target, falling back to the closest player
    /// 2. Pick the tier from intelligence and apply its rule
    /// 3. Plan movement toward the final target
    /// 4. Pick an offensive action; without one the whole decision is withheld
    pub fn evaluate<D: Dice + ?Sized>(
        &self,
        npc: &Entity,
        players: &[Entity],
        all_npcs: &[Entity],
        memory: &mut TargetMemory,
        dice: &mut D,
    ) -> Result<Decision, SkipReason> {
        // 1. Resolve target
        let resolved = self.resolve_target(npc, players, memory)?;

        // 2. Tier rule
        let tier = Tier::for_intelligence(npc.intelligence(), &self.policy);
        let (target, reaction) = match tier {
            Tier::Low => (resolved, Reaction::AttackClosest),
            Tier::Mid => {
                let ranged = pick_ranged_action(npc, self.policy.ranged_min_range_ft, dice);
                let reaction = if ranged.is_some() {
                    Reaction::RangedAttack
                } else {
                    Reaction::ClosestNoRanged
                };
                (resolved, reaction)
            }
            Tier::High => self.high_tier(npc, resolved, players, all_npcs, dice),
        };

        // 3. Movement
        let movement = self.plan_movement(npc, target);
        let move_description = describe_movement(&movement, &target.name);

        // 4. Action
        let action = pick_action(npc, dice).ok_or(SkipReason::NoOffensiveAction)?;

        Ok(Decision {
            npc_id: npc.id.clone(),
            tier,
            target: TargetRef::from(target),
            movement,
            move_description,
            action: action.clone(),
            reaction,
        })
    }

    /// Returns the NPC's sticky target if it is still present, else the closest player.
    fn resolve_target<'p>(
        &self,
        npc: &Entity,
        players: &'p [Entity],
        memory: &mut TargetMemory,
    ) -> Result<&'p Entity, SkipReason> {
        if players.is_empty() {
            return Err(SkipReason::NoPlayers);
        }

        let living: HashSet<&str> = players.iter().map(|p| p.id.as_str()).collect();
        memory.invalidate_if_absent(&npc.id, &living);

        let sticky = memory
            .get_sticky(&npc.id)
            .and_then(|id| players.iter().find(|p| p.id == id));
        if let Some(player) = sticky {
            return Ok(player);
        }

        let nearest = closest(npc.position, players).ok_or(SkipReason::NoPlayers)?;
        memory.set_sticky(npc.id.clone(), nearest.id.clone());
        Ok(nearest)
    }

    fn high_tier<'p, D: Dice + ?Sized>(
        &self,
        npc: &Entity,
        resolved: &'p Entity,
        players: &'p [Entity],
        all_npcs: &[Entity],
        dice: &mut D,
    ) -> (&'p Entity, Reaction) {
        let wounded: Vec<&Entity> = all_npcs
            .iter()
            .filter(|ally| {
                ally.id != npc.id && ally.health().is_below(self.policy.ally_low_health_ratio)
            })
            .collect();

        if !wounded.is_empty() && dice.chance(self.policy.aid_chance) {
            let ally = wounded
                .get(dice.pick(wounded.len()))
                .copied()
                .unwrap_or(wounded[0]);
            let target = closest(ally.position, players).unwrap_or(resolved);
            return (
                target,
                Reaction::AidAlly {
                    ally_id: ally.id.clone(),
                    ally_name: ally.name.clone(),
                },
            );
        }

        if npc.health().is_below(self.policy.flee_health_ratio) {
            (resolved, Reaction::Flee)
        } else {
            (resolved, Reaction::AttackClosest)
        }
    }

    fn plan_movement(&self, npc: &Entity, target: &Entity) -> MovePlan {
        let distance = distance(npc.position, target.position);
        MovePlan {
            spaces: npc.speed() / self.policy.grid_unit_ft.max(1),
            distance,
            in_reach: distance <= self.policy.engagement_range,
        }
    }
}

fn describe_movement(movement: &MovePlan, target_name: &str) -> String {
    if movement.in_reach {
        format!(
            "Hold position near {} ({} spaces of movement available)",
            target_name, movement.spaces
        )
    } else {
        format!("Move up to {} spaces toward {}", movement.spaces, target_name)
    }
}
