//! Shared combat types for the NPC turn advisor.
//!
//! This crate contains pure data structures with no decision logic: token
//! positions, classified entities and their actions, the raw host records they
//! are classified from, and the notifications a host emits during an
//! encounter. It is a dependency for every other crate in the workspace.

pub mod encounter;
pub mod entity;
pub mod position;
pub mod record;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export position types
pub use position::Position;

// Re-export entity types
pub use entity::{AbilityScores, Action, ActionKind, Attributes, Entity, EntityKind, Health};

// Re-export record types
pub use record::{ActionRecord, ClassifyError, TokenRecord};

// Re-export encounter types
pub use encounter::{CombatNotification, EncounterId};
