//! Score to tier mapping.

use serde::{Deserialize, Serialize};

use super::urgency::UrgencyScore;

const HIGH_THRESHOLD: UrgencyScore = 150;
const MEDIUM_THRESHOLD: UrgencyScore = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    /// Tiers in urgent-first order.
    pub const ALL: [PriorityTier; 3] = [PriorityTier::High, PriorityTier::Medium, PriorityTier::Low];

    pub fn index(self) -> usize {
        match self {
            PriorityTier::High => 0,
            PriorityTier::Medium => 1,
            PriorityTier::Low => 2,
        }
    }
}

/// `>= 150` high, `50..150` medium, below 50 low.
pub fn classify(score: UrgencyScore) -> PriorityTier {
    if score >= HIGH_THRESHOLD {
        PriorityTier::High
    } else if score >= MEDIUM_THRESHOLD {
        PriorityTier::Medium
    } else {
        PriorityTier::Low
    }
}
