//! Record filtering.
//!
//! Tasks go through the selectivity-ordered [`PredicatePipeline`]; projects
//! only through the completed/dropped check in [`project`].

pub mod pipeline;
pub mod project;
pub mod rules;

pub use pipeline::{PredicatePipeline, Verdict};
pub use project::{filter_projects, keep_project};
pub use rules::{enabled_rules, rules, FilterRule, RuleKind, RULE_TABLE};
