//! Query result and its assembly from collected buckets.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::criteria::TierOrder;
use crate::filter::RuleKind;
use crate::quota::{Buckets, Collected, TierCounts};
use crate::record::{ProjectRecord, TaskRecord};
use crate::scoring::{PriorityTier, UrgencyScore};

/// A task that made it into the result, with its score and tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedTask {
    #[serde(flatten)]
    pub task: TaskRecord,
    pub urgency: UrgencyScore,
    pub tier: PriorityTier,
}

/// Summary counters for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStats {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total_filtered: usize,
    pub budget: usize,
    pub capacities: TierCounts,
    pub scanned: usize,
    pub rejected: usize,
    pub rejected_by_rule: BTreeMap<RuleKind, usize>,
    pub dropped_by_quota: usize,
    pub dropped_as_duplicate: usize,
    pub early_terminated: bool,
    pub projects: usize,
}

impl QueryStats {
    pub fn counts(&self) -> TierCounts {
        TierCounts {
            high: self.high,
            medium: self.medium,
            low: self.low,
        }
    }
}

/// Ordered tasks, ordered projects and stats for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub tasks: Vec<RankedTask>,
    pub projects: Vec<ProjectRecord>,
    pub stats: QueryStats,
    /// Whatever stats the provider precomputed, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_stats: Option<serde_json::Value>,
}

/// Scan bookkeeping gathered by the engine before assembly.
#[derive(Debug, Clone, Default)]
pub struct ScanTally {
    pub scanned: usize,
    pub rejected_by_rule: BTreeMap<RuleKind, usize>,
    pub dropped_as_duplicate: usize,
    pub early_terminated: bool,
}

impl ScanTally {
    pub fn reject(&mut self, rule: RuleKind) {
        *self.rejected_by_rule.entry(rule).or_default() += 1;
    }
}

/// Tier concatenation order for a preference.
pub fn tier_sequence(order: TierOrder) -> [PriorityTier; 3] {
    match order {
        TierOrder::UrgentFirst => [PriorityTier::High, PriorityTier::Medium, PriorityTier::Low],
        TierOrder::Natural => [PriorityTier::Low, PriorityTier::Medium, PriorityTier::High],
    }
}

/// Concatenate tier buckets and attach projects and stats.
///
/// No re-sorting happens here: within a tier, scan order is kept.
pub fn assemble(
    collected: Collected<RankedTask>,
    projects: Vec<ProjectRecord>,
    order: TierOrder,
    budget: usize,
    tally: ScanTally,
) -> QueryResult {
    let Collected {
        buckets,
        counts,
        capacities,
        dropped,
    } = collected;

    let tasks = match buckets {
        Buckets::Tiered(mut buckets) => tier_sequence(order)
            .into_iter()
            .flat_map(|tier| std::mem::take(&mut buckets[tier.index()]))
            .collect(),
        Buckets::Flat(bucket) => bucket,
    };

    let stats = QueryStats {
        high: counts.high,
        medium: counts.medium,
        low: counts.low,
        total_filtered: counts.total(),
        budget,
        capacities,
        scanned: tally.scanned,
        rejected: tally.rejected_by_rule.values().sum(),
        rejected_by_rule: tally.rejected_by_rule,
        dropped_by_quota: dropped,
        dropped_as_duplicate: tally.dropped_as_duplicate,
        early_terminated: tally.early_terminated,
        projects: projects.len(),
    };

    QueryResult {
        tasks,
        projects,
        stats,
        provider_stats: None,
    }
}
