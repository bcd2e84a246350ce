//! Raw task and project records as delivered by the provider.
//!
//! The engine only reads these. Keys arrive camelCase; optional fields may be
//! absent or `null`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single task from the active perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub flagged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(default, rename = "dueDate", skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    #[serde(default, rename = "deferDate", skip_serializing_if = "Option::is_none")]
    pub defer: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, rename = "projectName", skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TaskRecord {
    /// Minimal task with only an id and name; everything else unset.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            completed: false,
            flagged: false,
            estimated_minutes: None,
            due: None,
            defer: None,
            tags: Vec::new(),
            project: None,
            note: None,
        }
    }

    pub fn flagged(mut self) -> Self {
        self.flagged = true;
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    pub fn with_estimate(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    pub fn with_defer(mut self, defer: DateTime<Utc>) -> Self {
        self.defer = Some(defer);
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum ProjectStatus {
    Active,
    Done,
    Dropped,
    OnHold,
    #[default]
    Unspecified,
}

impl ProjectStatus {
    /// Done and dropped projects are hidden when completed items are hidden.
    pub fn is_closed(self) -> bool {
        matches!(self, ProjectStatus::Done | ProjectStatus::Dropped)
    }
}

impl From<String> for ProjectStatus {
    fn from(raw: String) -> Self {
        let normalized: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "active" => ProjectStatus::Active,
            "done" | "completed" => ProjectStatus::Done,
            "dropped" => ProjectStatus::Dropped,
            "onhold" => ProjectStatus::OnHold,
            _ => ProjectStatus::Unspecified,
        }
    }
}

/// A project summary from the active perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(default, rename = "dueDate", skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_count: Option<u32>,
}

impl ProjectRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: ProjectStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            flagged: None,
            estimated_minutes: None,
            due: None,
            task_count: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn task_parses_provider_shape() {
        let json = r#"{
            "id": "t1",
            "name": "Write report",
            "completed": false,
            "flagged": true,
            "estimatedMinutes": 25,
            "dueDate": "2026-03-01T17:00:00+02:00",
            "deferDate": null,
            "tags": ["work", "writing"],
            "projectName": "Quarterly",
            "note": null
        }"#;

        let task: TaskRecord = serde_json::from_str(json).unwrap();
        assert!(task.flagged);
        assert_eq!(task.estimated_minutes, Some(25));
        assert_eq!(task.due, Some(Utc.with_ymd_and_hms(2026, 3, 1, 15, 0, 0).unwrap()));
        assert_eq!(task.defer, None);
        assert_eq!(task.project.as_deref(), Some("Quarterly"));
        assert_eq!(task.tags, vec!["work", "writing"]);
    }

    #[test]
    fn task_tolerates_missing_and_null_fields() {
        let task: TaskRecord = serde_json::from_str(r#"{"id":"t2","name":"Bare","tags":null}"#).unwrap();
        assert_eq!(task, TaskRecord::new("t2", "Bare"));
    }

    #[test]
    fn project_status_accepts_provider_spellings() {
        assert_eq!(ProjectStatus::from("Active".to_string()), ProjectStatus::Active);
        assert_eq!(ProjectStatus::from("on hold".to_string()), ProjectStatus::OnHold);
        assert_eq!(ProjectStatus::from("OnHold".to_string()), ProjectStatus::OnHold);
        assert_eq!(ProjectStatus::from("completed".to_string()), ProjectStatus::Done);
        assert_eq!(ProjectStatus::from("dropped".to_string()), ProjectStatus::Dropped);
        assert_eq!(ProjectStatus::from("archived".to_string()), ProjectStatus::Unspecified);
    }

    #[test]
    fn project_status_serializes_kebab_case() {
        let json = serde_json::to_string(&ProjectStatus::OnHold).unwrap();
        assert_eq!(json, "\"on-hold\"");
    }

    #[test]
    fn project_without_status_is_unspecified() {
        let project: ProjectRecord =
            serde_json::from_str(r#"{"id":"p1","name":"Home","taskCount":3}"#).unwrap();
        assert_eq!(project.status, ProjectStatus::Unspecified);
        assert_eq!(project.task_count, Some(3));
        assert!(!project.status.is_closed());
    }
}
