//! Urgency scoring and tier classification.
//!
//! [`urgency`] turns a filtered task into an integer score; [`tier`] maps
//! that score onto a [`PriorityTier`].

pub mod tier;
pub mod urgency;

pub use tier::{classify, PriorityTier};
pub use urgency::{breakdown, score, UrgencyBreakdown, UrgencyScore};
