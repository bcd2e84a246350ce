//! Caller-supplied filter and quota configuration.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Result budget used when the caller does not supply one.
pub const DEFAULT_BUDGET: usize = 500;

/// Order in which tier buckets are concatenated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TierOrder {
    /// high, medium, low
    #[default]
    UrgentFirst,
    /// low, medium, high
    Natural,
}

/// How the budget is split across tiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuotaMode {
    /// 40/40/20 per-tier capacities.
    #[default]
    Tiered,
    /// One shared bucket of `budget` slots, results kept in scan order.
    Flat,
}

/// Filter criteria for one perspective query.
///
/// Every field except `budget` is optional in the sense that its default
/// disables the corresponding rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default = "default_true")]
    pub hide_completed: bool,
    /// Forwarded to the provider; the engine does not act on it.
    #[serde(default = "default_true")]
    pub hide_recurring_duplicates: bool,
    /// Drop a task whose name and project repeat an earlier accepted task.
    /// Off unless the caller asks for it.
    #[serde(default)]
    pub collapse_duplicates: bool,
    #[serde(default)]
    pub flagged_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_estimated_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_estimated_minutes: Option<u32>,
    /// `Some(true)` keeps only tasks with a due date, `Some(false)` only tasks without.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_due_date: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Empty means no tag constraint.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default = "default_budget")]
    pub budget: usize,
    #[serde(default)]
    pub tier_order: TierOrder,
    #[serde(default)]
    pub quota_mode: QuotaMode,
}

fn default_true() -> bool {
    true
}

fn default_budget() -> usize {
    DEFAULT_BUDGET
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            hide_completed: true,
            hide_recurring_duplicates: true,
            collapse_duplicates: false,
            flagged_only: false,
            min_estimated_minutes: None,
            max_estimated_minutes: None,
            has_due_date: None,
            project: None,
            tags: Vec::new(),
            budget: DEFAULT_BUDGET,
            tier_order: TierOrder::default(),
            quota_mode: QuotaMode::default(),
        }
    }
}

impl FilterCriteria {
    /// Reject internally inconsistent criteria before any provider call.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.budget == 0 {
            return Err(ValidationError::InvalidBudget(0));
        }
        if let (Some(min), Some(max)) = (self.min_estimated_minutes, self.max_estimated_minutes) {
            if min > max {
                return Err(ValidationError::InvalidDurationRange { min, max });
            }
        }
        Ok(())
    }

    /// Set the budget from a signed caller value, rejecting non-positive input.
    pub fn with_budget(mut self, budget: i64) -> Result<Self, ValidationError> {
        if budget <= 0 {
            return Err(ValidationError::InvalidBudget(budget));
        }
        self.budget = usize::try_from(budget).map_err(|_| ValidationError::InvalidBudget(budget))?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_surface() {
        let criteria = FilterCriteria::default();
        assert!(criteria.hide_completed);
        assert!(criteria.hide_recurring_duplicates);
        assert!(!criteria.collapse_duplicates);
        assert!(!criteria.flagged_only);
        assert_eq!(criteria.budget, 500);
        assert_eq!(criteria.tier_order, TierOrder::UrgentFirst);
        assert_eq!(criteria.quota_mode, QuotaMode::Tiered);
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn empty_json_yields_defaults() {
        let criteria: FilterCriteria = serde_json::from_str("{}").unwrap();
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn zero_budget_is_rejected() {
        let criteria = FilterCriteria {
            budget: 0,
            ..Default::default()
        };
        assert_eq!(criteria.validate(), Err(ValidationError::InvalidBudget(0)));
    }

    #[test]
    fn negative_budget_is_rejected() {
        let err = FilterCriteria::default().with_budget(-3).unwrap_err();
        assert_eq!(err, ValidationError::InvalidBudget(-3));
        assert_eq!(FilterCriteria::default().with_budget(12).unwrap().budget, 12);
    }

    #[test]
    fn crossed_duration_bounds_are_rejected() {
        let criteria = FilterCriteria {
            min_estimated_minutes: Some(60),
            max_estimated_minutes: Some(30),
            ..Default::default()
        };
        assert_eq!(
            criteria.validate(),
            Err(ValidationError::InvalidDurationRange { min: 60, max: 30 })
        );
    }

    #[test]
    fn tier_order_uses_kebab_case() {
        let order: TierOrder = serde_json::from_str("\"natural\"").unwrap();
        assert_eq!(order, TierOrder::Natural);
        assert_eq!(serde_json::to_string(&TierOrder::UrgentFirst).unwrap(), "\"urgent-first\"");
    }
}
