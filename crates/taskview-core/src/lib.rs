//! # taskview Core Library
//!
//! Returns a bounded, prioritized view of the tasks and projects in a
//! task-manager perspective without scanning the whole dataset.
//!
//! ## Architecture
//!
//! - **Filter**: a static, selectivity-ordered rule table and a
//!   short-circuiting predicate pipeline
//! - **Scoring**: integer urgency score and high/medium/low tier
//! - **Quota**: per-tier capacities with early termination once all are full
//! - **Result**: tier concatenation plus stats
//! - **Provider**: structured request/response boundary to the task manager,
//!   serialized so only one query touches the shared view at a time
//!
//! ## Key Components
//!
//! - [`QueryService`]: validate, fetch, evaluate; failures become values
//! - [`QueryEngine`]: the single-pass evaluation over fetched records
//! - [`FilterCriteria`]: caller configuration
//! - [`Config`]: TOML configuration management

pub mod config;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod filter;
pub mod provider;
pub mod quota;
pub mod record;
pub mod result;
pub mod scoring;
pub mod service;

pub use config::Config;
pub use criteria::{FilterCriteria, QuotaMode, TierOrder, DEFAULT_BUDGET};
pub use engine::QueryEngine;
pub use error::{ConfigError, QueryError, ValidationError};
pub use filter::{FilterRule, PredicatePipeline, RuleKind, Verdict};
pub use provider::{CommandProvider, FileProvider, PerspectiveProvider, ProviderRequest, SerializedProvider};
pub use quota::{QuotaCollector, ResultQuota, TierCounts};
pub use record::{ProjectRecord, ProjectStatus, TaskRecord};
pub use result::{QueryResult, QueryStats, RankedTask};
pub use scoring::{classify, score, PriorityTier, UrgencyScore};
pub use service::{QueryOutcome, QueryService};
