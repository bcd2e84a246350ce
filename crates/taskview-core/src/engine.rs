//! Single-pass query engine.
//!
//! Per task: `Scanned -> Rejected(rule) | Accepted -> Scored -> Classified ->
//! Included | DroppedByQuota`. When the caller enables duplicate collapsing, an
//! accepted task may also end as `DroppedAsDuplicate` before scoring. Each record is visited at
//! most once and scanning stops as soon as the collector is full.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::criteria::FilterCriteria;
use crate::filter::{filter_projects, PredicatePipeline, Verdict};
use crate::quota::{Admission, QuotaCollector};
use crate::record::{ProjectRecord, TaskRecord};
use crate::result::{assemble, QueryResult, RankedTask, ScanTally};
use crate::scoring::{classify, score};

/// Runs filtering, scoring and quota collection over already-fetched records.
///
/// Performs no I/O; `now` is frozen for the whole run.
pub struct QueryEngine<'a> {
    criteria: &'a FilterCriteria,
    now: DateTime<Utc>,
}

impl<'a> QueryEngine<'a> {
    pub fn new(criteria: &'a FilterCriteria, now: DateTime<Utc>) -> Self {
        Self { criteria, now }
    }

    pub fn run<T, P>(&self, tasks: T, projects: P) -> QueryResult
    where
        T: IntoIterator<Item = TaskRecord>,
        P: IntoIterator<Item = ProjectRecord>,
    {
        let criteria = self.criteria;
        let pipeline = PredicatePipeline::new(criteria);
        let mut collector = QuotaCollector::new(criteria.budget, criteria.quota_mode);
        let mut seen: HashSet<(String, Option<String>)> = HashSet::new();
        let mut tally = ScanTally::default();

        for task in tasks {
            if collector.is_full() {
                tally.early_terminated = true;
                break;
            }
            tally.scanned += 1;

            if let Verdict::Rejected(rule) = pipeline.evaluate(&task) {
                debug!(task_id = %task.id, rule = ?rule, "task rejected");
                tally.reject(rule);
                continue;
            }

            if criteria.collapse_duplicates
                && !seen.insert((task.name.clone(), task.project.clone()))
            {
                debug!(task_id = %task.id, "task dropped as duplicate");
                tally.dropped_as_duplicate += 1;
                continue;
            }

            let urgency = score(&task, self.now);
            let tier = classify(urgency);
            let task_id = task.id.clone();
            let ranked = RankedTask { task, urgency, tier };
            if collector.offer(ranked, tier) == Admission::DroppedByQuota {
                debug!(task_id = %task_id, tier = ?tier, "task dropped by quota");
            }
        }

        let projects = filter_projects(projects, criteria);
        let result = assemble(
            collector.finish(),
            projects,
            criteria.tier_order,
            criteria.budget,
            tally,
        );

        info!(
            scanned = result.stats.scanned,
            accepted = result.stats.total_filtered,
            high = result.stats.high,
            medium = result.stats.medium,
            low = result.stats.low,
            early_terminated = result.stats.early_terminated,
            "query evaluated"
        );
        result
    }
}
