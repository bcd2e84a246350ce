//! Short-circuiting predicate pipeline.

use crate::criteria::FilterCriteria;
use crate::filter::rules::{enabled_rules, FilterRule, RuleKind};
use crate::record::TaskRecord;

/// Outcome of running one task through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    /// Rejected by the first failing rule; later rules were not evaluated.
    Rejected(RuleKind),
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Applies the enabled rules of the table to one task at a time.
///
/// Holds no state between records.
pub struct PredicatePipeline<'a> {
    criteria: &'a FilterCriteria,
    rules: Vec<&'static FilterRule>,
}

impl<'a> PredicatePipeline<'a> {
    pub fn new(criteria: &'a FilterCriteria) -> Self {
        Self {
            criteria,
            rules: enabled_rules(criteria).collect(),
        }
    }

    /// Rules that will be evaluated, in order.
    pub fn active_rules(&self) -> &[&'static FilterRule] {
        &self.rules
    }

    pub fn evaluate(&self, task: &TaskRecord) -> Verdict {
        self.rules
            .iter()
            .find(|rule| !self.check(rule.kind, task))
            .map_or(Verdict::Accepted, |rule| Verdict::Rejected(rule.kind))
    }

    /// A value the predicate needs but the task lacks counts as a failure.
    fn check(&self, kind: RuleKind, task: &TaskRecord) -> bool {
        let criteria = self.criteria;
        match kind {
            RuleKind::ProjectName => {
                task.project.is_some() && task.project == criteria.project
            }
            RuleKind::FlaggedOnly => task.flagged,
            RuleKind::MinDuration => match (task.estimated_minutes, criteria.min_estimated_minutes) {
                (Some(minutes), Some(min)) => minutes >= min,
                _ => false,
            },
            RuleKind::MaxDuration => match (task.estimated_minutes, criteria.max_estimated_minutes) {
                (Some(minutes), Some(max)) => minutes <= max,
                _ => false,
            },
            RuleKind::DueDatePresence => criteria.has_due_date == Some(task.due.is_some()),
            RuleKind::TagMembership => task.tags.iter().any(|tag| criteria.tags.contains(tag)),
            RuleKind::HideCompleted => !task.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pipeline_verdict(criteria: &FilterCriteria, task: &TaskRecord) -> Verdict {
        PredicatePipeline::new(criteria).evaluate(task)
    }

    #[test]
    fn default_criteria_reject_completed_only() {
        let criteria = FilterCriteria::default();
        assert_eq!(pipeline_verdict(&criteria, &TaskRecord::new("1", "open")), Verdict::Accepted);
        assert_eq!(
            pipeline_verdict(&criteria, &TaskRecord::new("2", "done").completed()),
            Verdict::Rejected(RuleKind::HideCompleted)
        );
    }

    #[test]
    fn missing_estimate_fails_min_duration() {
        let criteria = FilterCriteria {
            min_estimated_minutes: Some(30),
            ..Default::default()
        };
        assert_eq!(
            pipeline_verdict(&criteria, &TaskRecord::new("1", "no estimate")),
            Verdict::Rejected(RuleKind::MinDuration)
        );
        assert_eq!(
            pipeline_verdict(&criteria, &TaskRecord::new("2", "long").with_estimate(45)),
            Verdict::Accepted
        );
        assert_eq!(
            pipeline_verdict(&criteria, &TaskRecord::new("3", "short").with_estimate(20)),
            Verdict::Rejected(RuleKind::MinDuration)
        );
    }

    #[test]
    fn max_duration_is_inclusive() {
        let criteria = FilterCriteria {
            max_estimated_minutes: Some(30),
            ..Default::default()
        };
        assert!(pipeline_verdict(&criteria, &TaskRecord::new("1", "a").with_estimate(30)).is_accepted());
        assert_eq!(
            pipeline_verdict(&criteria, &TaskRecord::new("2", "b").with_estimate(31)),
            Verdict::Rejected(RuleKind::MaxDuration)
        );
    }

    #[test]
    fn first_failing_rule_wins() {
        let criteria = FilterCriteria {
            project: Some("Garden".into()),
            flagged_only: true,
            ..Default::default()
        };
        let task = TaskRecord::new("1", "elsewhere").with_project("Kitchen").completed();
        assert_eq!(pipeline_verdict(&criteria, &task), Verdict::Rejected(RuleKind::ProjectName));

        let task = TaskRecord::new("2", "unflagged").with_project("Garden").completed();
        assert_eq!(pipeline_verdict(&criteria, &task), Verdict::Rejected(RuleKind::FlaggedOnly));
    }

    #[test]
    fn project_rule_requires_a_project() {
        let criteria = FilterCriteria {
            project: Some("Garden".into()),
            ..Default::default()
        };
        assert_eq!(
            pipeline_verdict(&criteria, &TaskRecord::new("1", "inbox")),
            Verdict::Rejected(RuleKind::ProjectName)
        );
        assert!(pipeline_verdict(&criteria, &TaskRecord::new("2", "weed").with_project("Garden")).is_accepted());
    }

    #[test]
    fn due_presence_both_directions() {
        let with_due = TaskRecord::new("1", "due").with_due(Utc::now());
        let without_due = TaskRecord::new("2", "someday");

        let wants_due = FilterCriteria {
            has_due_date: Some(true),
            ..Default::default()
        };
        assert!(pipeline_verdict(&wants_due, &with_due).is_accepted());
        assert_eq!(
            pipeline_verdict(&wants_due, &without_due),
            Verdict::Rejected(RuleKind::DueDatePresence)
        );

        let wants_none = FilterCriteria {
            has_due_date: Some(false),
            ..Default::default()
        };
        assert!(pipeline_verdict(&wants_none, &without_due).is_accepted());
        assert!(!pipeline_verdict(&wants_none, &with_due).is_accepted());
    }

    #[test]
    fn tags_must_intersect() {
        let criteria = FilterCriteria {
            tags: vec!["errand".into(), "phone".into()],
            ..Default::default()
        };
        assert!(pipeline_verdict(&criteria, &TaskRecord::new("1", "call").with_tags(["phone"])).is_accepted());
        assert_eq!(
            pipeline_verdict(&criteria, &TaskRecord::new("2", "read").with_tags(["home"])),
            Verdict::Rejected(RuleKind::TagMembership)
        );
        assert_eq!(
            pipeline_verdict(&criteria, &TaskRecord::new("3", "untagged")),
            Verdict::Rejected(RuleKind::TagMembership)
        );
    }

    #[test]
    fn disabled_rules_are_not_active() {
        let criteria = FilterCriteria {
            hide_completed: false,
            ..Default::default()
        };
        let pipeline = PredicatePipeline::new(&criteria);
        assert!(pipeline.active_rules().is_empty());
        assert!(pipeline.evaluate(&TaskRecord::new("1", "done").completed()).is_accepted());
    }
}
