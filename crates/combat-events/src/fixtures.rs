//! Sample data fixtures for testing.
//!
//! This module provides a ready-made scene for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // combat-events = { path = "../combat-events", features = ["test-fixtures"] }
//!
//! use combat_events::fixtures;
//!
//! let records = fixtures::sample_records();
//! let entities = fixtures::sample_entities();
//! ```

use crate::{Entity, TokenRecord};

/// Returns the raw token records of the sample scene.
///
/// Contains 7 tokens:
/// - 2 player characters (Aria, Bren)
/// - 3 classifiable NPCs (Dire Wolf int 3, Goblin Archer int 6, Cult Fanatic int 10)
/// - 1 NPC without ability scores or hit points (unclassifiable)
/// - 1 token with an unsupported actor type
pub fn sample_records() -> Vec<TokenRecord> {
    let json = include_str!("../tests/fixtures/sample_scene.json");
    serde_json::from_str(json).expect("Failed to parse sample_scene.json")
}

/// Returns every classifiable entity of the sample scene, in scene order.
pub fn sample_entities() -> Vec<Entity> {
    sample_records()
        .iter()
        .filter_map(|record| record.classify().ok())
        .collect()
}

/// Returns a specific entity by token id from the sample scene.
pub fn get_entity(token_id: &str) -> Option<Entity> {
    sample_entities().into_iter().find(|e| e.id == token_id)
}

/// Returns the player characters of the sample scene.
pub fn sample_players() -> Vec<Entity> {
    sample_entities().into_iter().filter(Entity::is_player).collect()
}

/// Returns the classifiable NPCs of the sample scene.
pub fn sample_npcs() -> Vec<Entity> {
    sample_entities().into_iter().filter(Entity::is_npc).collect()
}
