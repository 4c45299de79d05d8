//! Enumerations and field types for projects, tasks and their satellites.
//!
//! The lowercase tag spelling of each variant (`bug`, `high`, `in_progress`)
//! is what gets stored and what the shorthand grammar recognises.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// What kind of work a task represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    General,
    Bug,
    // Early records were written with the misspelt "future".
    #[serde(alias = "future")]
    Feature,
    Improvement,
}

impl TaskType {
    pub const ALL: [TaskType; 4] = [
        TaskType::Bug,
        TaskType::Feature,
        TaskType::Improvement,
        TaskType::General,
    ];

    pub fn as_tag(self) -> &'static str {
        match self {
            TaskType::General => "general",
            TaskType::Bug => "bug",
            TaskType::Feature => "feature",
            TaskType::Improvement => "improvement",
        }
    }

    /// Case-insensitive lookup of a `#type` tag body.
    pub fn from_tag(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "general" => Some(TaskType::General),
            "bug" => Some(TaskType::Bug),
            "feature" => Some(TaskType::Feature),
            "improvement" => Some(TaskType::Improvement),
            _ => None,
        }
    }
}

/// Task completion status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub fn as_tag(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in_progress",
            Status::Done => "done",
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_tag(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Case-insensitive lookup of a `!priority` tag body.
    pub fn from_tag(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Whether a project has shipped yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    PreLaunch,
    Launched,
}

/// Environment a project link points at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Production,
    Staging,
    Development,
    Repository,
    Other,
}

/// Role of a person on a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Member,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags_are_case_insensitive() {
        assert_eq!(TaskType::from_tag("BUG"), Some(TaskType::Bug));
        assert_eq!(TaskType::from_tag("Improvement"), Some(TaskType::Improvement));
        assert_eq!(TaskType::from_tag("chore"), None);
        assert_eq!(Priority::from_tag("HiGh"), Some(Priority::High));
        assert_eq!(Priority::from_tag(""), None);
    }

    #[test]
    fn test_legacy_future_type_reads_as_feature() {
        let t: TaskType = serde_json::from_str("\"future\"").unwrap();
        assert_eq!(t, TaskType::Feature);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"feature\"");
    }

    #[test]
    fn test_status_serialises_snake_case() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"in_progress\"");
        assert_eq!(serde_json::to_string(&ProjectStatus::PreLaunch).unwrap(), "\"pre_launch\"");
    }
}
