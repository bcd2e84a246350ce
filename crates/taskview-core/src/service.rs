//! Caller-facing query entry point.
//!
//! Validates criteria, fetches from the provider, runs the engine, and turns
//! every failure (including unexpected panics) into a [`QueryOutcome`] value.

use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::criteria::FilterCriteria;
use crate::engine::QueryEngine;
use crate::error::{QueryError, ValidationError};
use crate::provider::{parse_response, PerspectiveProvider, ProviderRequest};
use crate::result::QueryResult;

/// Result of one query as handed to the formatting layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// Unparsed provider payload, for malformed responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<QueryResult>,
}

impl QueryOutcome {
    pub fn success(result: QueryResult) -> Self {
        Self {
            success: true,
            error: None,
            error_kind: None,
            raw: None,
            result: Some(result),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            error_kind: Some("internal_error".to_string()),
            raw: None,
            result: None,
        }
    }
}

impl From<Result<QueryResult, QueryError>> for QueryOutcome {
    fn from(result: Result<QueryResult, QueryError>) -> Self {
        match result {
            Ok(result) => QueryOutcome::success(result),
            Err(err) => QueryOutcome {
                success: false,
                error: Some(err.to_string()),
                error_kind: Some(err.kind().to_string()),
                raw: err.raw_payload().map(str::to_string),
                result: None,
            },
        }
    }
}

/// Runs perspective queries against a provider.
pub struct QueryService<P> {
    provider: P,
    now: Option<DateTime<Utc>>,
}

impl<P: PerspectiveProvider> QueryService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider, now: None }
    }

    /// Freeze the clock used for urgency scoring.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run one query, returning errors as `Err`.
    pub fn query(&self, perspective: &str, criteria: &FilterCriteria) -> Result<QueryResult, QueryError> {
        if perspective.trim().is_empty() {
            return Err(ValidationError::EmptyPerspective.into());
        }
        criteria.validate()?;

        let request = ProviderRequest::new(perspective, criteria.clone());
        let raw = self.provider.fetch(&request)?;
        let payload = parse_response(&raw)?;

        let now = self.now.unwrap_or_else(Utc::now);
        let mut result = QueryEngine::new(criteria, now).run(payload.tasks, payload.projects);
        result.provider_stats = payload.stats;
        Ok(result)
    }

    /// Run one query; never panics past this call.
    pub fn run(&self, perspective: &str, criteria: &FilterCriteria) -> QueryOutcome {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| self.query(perspective, criteria)));
        match attempt {
            Ok(Ok(result)) => {
                info!(
                    provider = self.provider.name(),
                    perspective,
                    tasks = result.tasks.len(),
                    projects = result.projects.len(),
                    "query succeeded"
                );
                QueryOutcome::success(result)
            }
            Ok(Err(err)) => {
                warn!(provider = self.provider.name(), perspective, kind = err.kind(), error = %err, "query failed");
                QueryOutcome::from(Err::<QueryResult, _>(err))
            }
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!(provider = self.provider.name(), perspective, %detail, "query panicked");
                QueryOutcome::failure(format!("internal error: {detail}"))
            }
        }
    }
}
