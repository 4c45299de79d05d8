//! Task and milestone records and the patches that update them.
//!
//! Records are never merged field-by-field ad hoc: every edit is expressed as
//! a `TaskPatch` or `MilestonePatch` and applied to produce a new record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::*;
use crate::shorthand::{MilestoneShorthand, TaskShorthand};

/// A unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub project_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub status: Status,
    pub priority: Priority,
    /// Normalized `"<number> <unit>"` estimate.
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

impl Task {
    /// Build a fresh `todo` task from parsed shorthand.
    pub fn from_shorthand(
        id: u64,
        project_id: u64,
        parsed: TaskShorthand,
        created_by: Option<String>,
        now_utc: i64,
    ) -> Self {
        Task {
            id,
            project_id,
            title: parsed.title,
            description: String::new(),
            task_type: parsed.task_type,
            status: Status::Todo,
            priority: parsed.priority,
            duration: parsed.duration,
            deadline: None,
            created_by,
            created_at_utc: now_utc,
            updated_at_utc: now_utc,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }

    /// Status after a checkbox toggle: done goes back to todo, anything else is finished.
    pub fn toggled_status(&self) -> Status {
        if self.is_done() {
            Status::Todo
        } else {
            Status::Done
        }
    }

    /// Return a new record with every field present in `patch` replaced.
    pub fn apply(&self, patch: &TaskPatch, now_utc: i64) -> Task {
        Task {
            id: self.id,
            project_id: self.project_id,
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            task_type: patch.task_type.unwrap_or(self.task_type),
            status: patch.status.unwrap_or(self.status),
            priority: patch.priority.unwrap_or(self.priority),
            duration: patch
                .duration
                .clone()
                .unwrap_or_else(|| self.duration.clone()),
            deadline: patch.deadline.unwrap_or(self.deadline),
            created_by: self.created_by.clone(),
            created_at_utc: self.created_at_utc,
            updated_at_utc: now_utc,
        }
    }
}

/// Optional replacements for a task's editable fields. `None` keeps the
/// current value; for nullable fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub task_type: Option<TaskType>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub duration: Option<Option<String>>,
    pub deadline: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    /// Patch produced by re-parsing edited shorthand. Title, type, priority
    /// and duration are all overwritten; a missing `in:` tag clears the duration.
    pub fn from_shorthand(parsed: TaskShorthand) -> Self {
        TaskPatch {
            title: Some(parsed.title),
            task_type: Some(parsed.task_type),
            priority: Some(parsed.priority),
            duration: Some(parsed.duration),
            ..TaskPatch::default()
        }
    }

    pub fn status(status: Status) -> Self {
        TaskPatch {
            status: Some(status),
            ..TaskPatch::default()
        }
    }
}

/// A dated goal inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub project_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

impl Milestone {
    pub fn from_shorthand(id: u64, project_id: u64, parsed: MilestoneShorthand, now_utc: i64) -> Self {
        Milestone {
            id,
            project_id,
            title: parsed.title,
            description: String::new(),
            due_date: parsed.due_date,
            completed: false,
            created_at_utc: now_utc,
            updated_at_utc: now_utc,
        }
    }

    pub fn apply(&self, patch: &MilestonePatch, now_utc: i64) -> Milestone {
        Milestone {
            id: self.id,
            project_id: self.project_id,
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            due_date: patch.due_date.unwrap_or(self.due_date),
            completed: patch.completed.unwrap_or(self.completed),
            created_at_utc: self.created_at_utc,
            updated_at_utc: now_utc,
        }
    }
}

/// Optional replacements for a milestone's editable fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilestonePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
}

impl MilestonePatch {
    /// Re-parsed shorthand replaces both the title and the due date.
    pub fn from_shorthand(parsed: MilestoneShorthand) -> Self {
        MilestonePatch {
            title: Some(parsed.title),
            due_date: Some(parsed.due_date),
            ..MilestonePatch::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        MilestonePatch {
            completed: Some(completed),
            ..MilestonePatch::default()
        }
    }
}
