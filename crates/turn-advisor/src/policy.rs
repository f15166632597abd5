//! Intelligence-tiered behavior policy.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::PolicyConfig;

/// Behavior tier selected from an NPC's intelligence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Attacks whatever is closest
    Low,
    /// Prefers ranged attacks when it has one
    Mid,
    /// Aids wounded allies and flees when hurt
    High,
}

impl Tier {
    /// Classifies an intelligence score. Boundaries are inclusive on the lower tier.
    pub fn for_intelligence(intelligence: i32, policy: &PolicyConfig) -> Self {
        if intelligence <= policy.low_max_intelligence {
            Tier::Low
        } else if intelligence <= policy.mid_max_intelligence {
            Tier::Mid
        } else {
            Tier::High
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Low => write!(f, "low"),
            Tier::Mid => write!(f, "mid"),
            Tier::High => write!(f, "high"),
        }
    }
}
