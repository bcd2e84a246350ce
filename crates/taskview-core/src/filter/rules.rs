//! Static filter rule table.
//!
//! Rules are ordered by their estimated exclusion rate, highest first, so the
//! predicates most likely to reject a record run before the rest. The order is
//! fixed here and never recomputed per query.

use serde::Serialize;

use crate::criteria::FilterCriteria;

/// Identifies one predicate of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    ProjectName,
    FlaggedOnly,
    MinDuration,
    MaxDuration,
    DueDatePresence,
    TagMembership,
    HideCompleted,
}

/// A named predicate with its selectivity estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterRule {
    pub kind: RuleKind,
    pub name: &'static str,
    /// Expected fraction of records excluded, in [0, 1].
    pub exclusion_rate: f32,
    /// Evaluation position; rules run in ascending order.
    pub order: u8,
}

/// The canonical rule table, already in evaluation order.
pub static RULE_TABLE: [FilterRule; 7] = [
    FilterRule {
        kind: RuleKind::ProjectName,
        name: "project-name",
        exclusion_rate: 0.90,
        order: 1,
    },
    FilterRule {
        kind: RuleKind::FlaggedOnly,
        name: "flagged-only",
        exclusion_rate: 0.85,
        order: 2,
    },
    FilterRule {
        kind: RuleKind::MinDuration,
        name: "min-duration",
        exclusion_rate: 0.70,
        order: 3,
    },
    FilterRule {
        kind: RuleKind::MaxDuration,
        name: "max-duration",
        exclusion_rate: 0.60,
        order: 4,
    },
    FilterRule {
        kind: RuleKind::DueDatePresence,
        name: "due-date-presence",
        exclusion_rate: 0.50,
        order: 5,
    },
    FilterRule {
        kind: RuleKind::TagMembership,
        name: "tag-membership",
        exclusion_rate: 0.40,
        order: 6,
    },
    FilterRule {
        kind: RuleKind::HideCompleted,
        name: "hide-completed",
        exclusion_rate: 0.30,
        order: 7,
    },
];

/// All rules in evaluation order.
pub fn rules() -> &'static [FilterRule] {
    &RULE_TABLE
}

impl RuleKind {
    /// Whether the criterion backing this rule is set.
    pub fn is_enabled(self, criteria: &FilterCriteria) -> bool {
        match self {
            RuleKind::ProjectName => criteria.project.is_some(),
            RuleKind::FlaggedOnly => criteria.flagged_only,
            RuleKind::MinDuration => criteria.min_estimated_minutes.is_some(),
            RuleKind::MaxDuration => criteria.max_estimated_minutes.is_some(),
            RuleKind::DueDatePresence => criteria.has_due_date.is_some(),
            RuleKind::TagMembership => !criteria.tags.is_empty(),
            RuleKind::HideCompleted => criteria.hide_completed,
        }
    }
}

/// Rules whose criterion is set, in table order. Unset rules are skipped entirely.
pub fn enabled_rules(criteria: &FilterCriteria) -> impl Iterator<Item = &'static FilterRule> + '_ {
    RULE_TABLE.iter().filter(move |rule| rule.kind.is_enabled(criteria))
}
