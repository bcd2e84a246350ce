//! Boundary with the external task-management provider.
//!
//! Requests are structured data serialized as JSON; caller-controlled values
//! never end up spliced into executable text. The provider exposes one active
//! view shared by every caller, so access goes through [`SerializedProvider`].

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::criteria::FilterCriteria;
use crate::error::QueryError;
use crate::record::{ProjectRecord, TaskRecord};

/// One perspective query as sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRequest {
    pub perspective: String,
    #[serde(flatten)]
    pub criteria: FilterCriteria,
}

impl ProviderRequest {
    pub fn new(perspective: impl Into<String>, criteria: FilterCriteria) -> Self {
        Self {
            perspective: perspective.into(),
            criteria,
        }
    }

    pub fn to_json(&self) -> Result<String, QueryError> {
        serde_json::to_string(self)
            .map_err(|e| QueryError::ProviderUnavailable(format!("cannot encode request: {e}")))
    }
}

/// Wire shape of a provider response.
#[derive(Debug, Deserialize)]
struct RawResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    tasks: Vec<TaskRecord>,
    #[serde(default)]
    projects: Vec<ProjectRecord>,
    #[serde(default)]
    stats: Option<serde_json::Value>,
}

/// Records from a successful provider response, in provider order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderPayload {
    pub tasks: Vec<TaskRecord>,
    pub projects: Vec<ProjectRecord>,
    pub stats: Option<serde_json::Value>,
}

/// Parse a raw provider payload.
///
/// `success: false` becomes [`QueryError::ProviderReported`] with the message
/// untouched; anything unparsable becomes [`QueryError::MalformedResponse`]
/// carrying the raw text. No repair is attempted.
pub fn parse_response(raw: &str) -> Result<ProviderPayload, QueryError> {
    let response: RawResponse =
        serde_json::from_str(raw).map_err(|e| QueryError::MalformedResponse {
            message: e.to_string(),
            raw: raw.to_string(),
        })?;

    if !response.success {
        return Err(QueryError::ProviderReported(
            response
                .error
                .unwrap_or_else(|| "provider reported failure without a message".to_string()),
        ));
    }

    Ok(ProviderPayload {
        tasks: response.tasks,
        projects: response.projects,
        stats: response.stats,
    })
}

/// A source of perspective data.
///
/// Implementations perform one blocking request/response and return the raw
/// payload. Timeouts and retries belong here, not in the engine.
pub trait PerspectiveProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn fetch(&self, request: &ProviderRequest) -> Result<String, QueryError>;
}

impl<P: PerspectiveProvider + ?Sized> PerspectiveProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, request: &ProviderRequest) -> Result<String, QueryError> {
        (**self).fetch(request)
    }
}

impl<P: PerspectiveProvider + ?Sized> PerspectiveProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, request: &ProviderRequest) -> Result<String, QueryError> {
        (**self).fetch(request)
    }
}

/// Runs an external program, writes the request JSON to its stdin and reads
/// the response from stdout.
#[derive(Debug, Clone)]
pub struct CommandProvider {
    program: String,
    args: Vec<String>,
}

impl CommandProvider {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl PerspectiveProvider for CommandProvider {
    fn name(&self) -> &str {
        &self.program
    }

    fn fetch(&self, request: &ProviderRequest) -> Result<String, QueryError> {
        let body = request.to_json()?;
        debug!(program = %self.program, perspective = %request.perspective, "invoking provider");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                QueryError::ProviderUnavailable(format!("failed to start '{}': {e}", self.program))
            })?;

        // Feed stdin from its own thread so a provider that writes before it
        // reads cannot deadlock against a full pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || stdin.write_all(body.as_bytes()))
        });

        let output = child.wait_with_output().map_err(|e| {
            QueryError::ProviderUnavailable(format!("failed to read from '{}': {e}", self.program))
        })?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // A provider may answer without reading its input.
                Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => {
                    return Err(QueryError::ProviderUnavailable(format!(
                        "failed to write request to '{}': {e}",
                        self.program
                    )));
                }
                Err(_) => {
                    return Err(QueryError::ProviderUnavailable(format!(
                        "request writer for '{}' panicked",
                        self.program
                    )));
                }
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() && stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = if stderr.trim().is_empty() {
                format!("'{}' exited with {}", self.program, output.status)
            } else {
                stderr.trim().to_string()
            };
            warn!(program = %self.program, %detail, "provider process failed");
            return Err(QueryError::ProviderUnavailable(detail));
        }
        Ok(stdout)
    }
}

/// Serves a saved provider response from disk.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PerspectiveProvider for FileProvider {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch(&self, _request: &ProviderRequest) -> Result<String, QueryError> {
        std::fs::read_to_string(&self.path).map_err(|e| {
            QueryError::ProviderUnavailable(format!("cannot read {}: {e}", self.path.display()))
        })
    }
}

/// Allows one in-flight request at a time.
///
/// Switching the provider's active perspective and reading its contents must
/// not interleave with another caller doing the same.
pub struct SerializedProvider<P> {
    inner: P,
    gate: Mutex<()>,
}

impl<P: PerspectiveProvider> SerializedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            gate: Mutex::new(()),
        }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: PerspectiveProvider> PerspectiveProvider for SerializedProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch(&self, request: &ProviderRequest) -> Result<String, QueryError> {
        // a panic in another caller must not wedge the queue
        let _guard = self.gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.inner.fetch(request)
    }
}
