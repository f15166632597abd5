//! Offensive action selection.

use combat_events::{Action, Entity};

use crate::dice::Dice;

/// Picks one of the NPC's weapons or spells uniformly at random.
///
/// Returns `None` when the NPC has no offensive action, which callers treat
/// as "nothing to suggest" rather than an error.
pub fn pick_action<'a, D: Dice + ?Sized>(npc: &'a Entity, dice: &mut D) -> Option<&'a Action> {
    pick_from(npc.actions.iter().filter(|a| a.is_offensive()).collect(), dice)
}

/// Like [`pick_action`], restricted to actions whose range exceeds `min_range` feet.
pub fn pick_ranged_action<'a, D: Dice + ?Sized>(
    npc: &'a Entity,
    min_range: u32,
    dice: &mut D,
) -> Option<&'a Action> {
    pick_from(
        npc.actions
            .iter()
            .filter(|a| a.is_offensive() && a.range > min_range)
            .collect(),
        dice,
    )
}

fn pick_from<'a, D: Dice + ?Sized>(
    candidates: Vec<&'a Action>,
    dice: &mut D,
) -> Option<&'a Action> {
    if candidates.is_empty() {
        return None;
    }
    let index = dice.pick(candidates.len());
    candidates.get(index).copied()
}
