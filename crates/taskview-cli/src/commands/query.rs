//! Perspective query command.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;
use tracing::debug;
use taskview_core::{
    CommandProvider, Config, FileProvider, FilterCriteria, PerspectiveProvider, QueryService,
    QuotaMode, SerializedProvider, TierOrder,
};

#[derive(Args)]
pub struct QueryArgs {
    /// Perspective name (e.g. "Today", "Flagged")
    pub perspective: String,
    /// Include completed tasks and done/dropped projects
    #[arg(long)]
    pub show_completed: bool,
    /// Ask the provider to keep repeats of recurring tasks
    #[arg(long)]
    pub keep_duplicates: bool,
    /// Drop tasks that repeat an earlier task's name and project
    #[arg(long)]
    pub collapse_duplicates: bool,
    /// Only flagged tasks
    #[arg(long)]
    pub flagged: bool,
    /// Minimum estimated minutes (tasks without an estimate are excluded)
    #[arg(long)]
    pub min_minutes: Option<u32>,
    /// Maximum estimated minutes (tasks without an estimate are excluded)
    #[arg(long)]
    pub max_minutes: Option<u32>,
    /// Only tasks with a due date
    #[arg(long, conflicts_with = "no_due")]
    pub due: bool,
    /// Only tasks without a due date
    #[arg(long)]
    pub no_due: bool,
    /// Only tasks in this project
    #[arg(long)]
    pub project: Option<String>,
    /// Only tasks carrying at least one of these tags (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Result budget (default from config, 500 out of the box)
    #[arg(long, allow_negative_numbers = true)]
    pub budget: Option<i64>,
    /// Low tier first instead of high tier first
    #[arg(long, conflicts_with = "urgent_first")]
    pub natural_order: bool,
    /// High tier first (overrides a natural-order config default)
    #[arg(long)]
    pub urgent_first: bool,
    /// One shared budget in scan order instead of per-tier quotas
    #[arg(long)]
    pub flat: bool,
    /// Read the provider response from this file instead of calling the provider
    #[arg(long)]
    pub response_file: Option<PathBuf>,
    /// Evaluate urgency at this RFC 3339 instant instead of the current time
    #[arg(long)]
    pub now: Option<String>,
}

impl QueryArgs {
    fn criteria(&self, config: &Config) -> Result<FilterCriteria, Box<dyn std::error::Error>> {
        let mut criteria = config.defaults.to_criteria();

        if self.show_completed {
            criteria.hide_completed = false;
        }
        if self.keep_duplicates {
            criteria.hide_recurring_duplicates = false;
        }
        if self.collapse_duplicates {
            criteria.collapse_duplicates = true;
        }
        criteria.flagged_only = self.flagged;
        criteria.min_estimated_minutes = self.min_minutes;
        criteria.max_estimated_minutes = self.max_minutes;
        criteria.has_due_date = match (self.due, self.no_due) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        criteria.project = self.project.clone();
        criteria.tags = self.tags.clone();
        if let Some(budget) = self.budget {
            criteria = criteria.with_budget(budget)?;
        }
        if self.natural_order {
            criteria.tier_order = TierOrder::Natural;
        } else if self.urgent_first {
            criteria.tier_order = TierOrder::UrgentFirst;
        }
        if self.flat {
            criteria.quota_mode = QuotaMode::Flat;
        }
        Ok(criteria)
    }

    fn provider(&self, config: &Config) -> Result<Box<dyn PerspectiveProvider>, Box<dyn std::error::Error>> {
        if let Some(path) = self.response_file.as_ref().or(config.provider.response_file.as_ref()) {
            return Ok(Box::new(FileProvider::new(path)));
        }
        if config.provider.command.trim().is_empty() {
            return Err(format!(
                "no provider configured: set provider.command in {} or pass --response-file",
                Config::path().display()
            )
            .into());
        }
        Ok(Box::new(CommandProvider::new(
            config.provider.command.clone(),
            config.provider.args.clone(),
        )))
    }
}

pub fn run(args: QueryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    debug!(path = %Config::path().display(), "config loaded");
    let criteria = args.criteria(&config)?;
    let provider = SerializedProvider::new(args.provider(&config)?);

    let mut service = QueryService::new(provider);
    if let Some(raw) = &args.now {
        let now: DateTime<Utc> = DateTime::parse_from_rfc3339(raw)
            .map_err(|e| format!("invalid --now '{raw}': {e}"))?
            .with_timezone(&Utc);
        service = service.with_now(now);
    }

    let outcome = service.run(&args.perspective, &criteria);
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if !outcome.success {
        return Err(outcome.error.unwrap_or_default().into());
    }
    Ok(())
}
