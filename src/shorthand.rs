//! Inline shorthand for tasks and milestones.
//!
//! A task line carries up to three tags anywhere in its text:
//!
//! ```text
//! Fix login bug #bug !high in:2d
//! ```
//!
//! - `#bug`, `#feature`, `#improvement`, `#general` set the task type
//! - `!high`, `!medium`, `!low` set the priority
//! - `in:<number><unit>` sets the duration, with units `m|min|minute(s)`,
//!   `h|hr|hour(s)`, `d|day(s)`, `w|week(s)`
//!
//! A milestone line carries `by:YYYY-MM-DD` or a relative `in:` tag, which is
//! resolved against the clock at parse time. `by:` wins when both are present.
//!
//! Each tag family is matched once and stripped once, so a second `#bug` in
//! the same line stays in the title. Tokens that are not tags are left alone
//! and malformed tags fall back to defaults. The only failure is a title that
//! is empty once the tags are gone, which callers check with `validate`.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::duration::{NormalizedDuration, UNIT_PATTERN};
use crate::error::{Result, ShipError};
use crate::fields::{Priority, TaskType};
use crate::task::{Milestone, Task};

static TYPE_RE: OnceLock<Regex> = OnceLock::new();
static PRIORITY_RE: OnceLock<Regex> = OnceLock::new();
static DURATION_RE: OnceLock<Regex> = OnceLock::new();
static DUE_DATE_RE: OnceLock<Regex> = OnceLock::new();

fn type_re() -> &'static Regex {
    TYPE_RE.get_or_init(|| Regex::new(r"(?i)#(bug|feature|improvement|general)").unwrap())
}

fn priority_re() -> &'static Regex {
    PRIORITY_RE.get_or_init(|| Regex::new(r"(?i)!(high|medium|low)").unwrap())
}

fn duration_re() -> &'static Regex {
    DURATION_RE.get_or_init(|| {
        Regex::new(&format!(r"(?i)in:([0-9]+(?:\.[0-9]+)?)\s*({UNIT_PATTERN})")).unwrap()
    })
}

// Case-sensitive, unlike the task tags.
fn due_date_re() -> &'static Regex {
    DUE_DATE_RE.get_or_init(|| Regex::new(r"by:([0-9]{4}-[0-9]{2}-[0-9]{2})").unwrap())
}

/// Values a task takes when its shorthand carries no type or priority tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefaults {
    #[serde(default = "default_task_type")]
    pub task_type: TaskType,
    #[serde(default = "default_priority")]
    pub priority: Priority,
}

fn default_task_type() -> TaskType {
    TaskType::General
}

fn default_priority() -> Priority {
    Priority::Low
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            task_type: default_task_type(),
            priority: default_priority(),
        }
    }
}

/// Fields extracted from one line of task shorthand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskShorthand {
    pub title: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub priority: Priority,
    /// Normalized `"<number> <unit>"` string, absent when no `in:` tag matched.
    pub duration: Option<String>,
}

impl TaskShorthand {
    /// Refuse input whose title is empty once the tags are stripped.
    pub fn validate(&self) -> Result<()> {
        if self.title.is_empty() {
            return Err(ShipError::EmptyTitle);
        }
        Ok(())
    }
}

/// Fields extracted from one line of milestone shorthand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneShorthand {
    pub title: String,
    pub due_date: Option<DateTime<Utc>>,
}

impl MilestoneShorthand {
    pub fn validate(&self) -> Result<()> {
        if self.title.is_empty() {
            return Err(ShipError::EmptyTitle);
        }
        Ok(())
    }
}

/// Parse task shorthand with the built-in defaults (`general`, `low`).
pub fn parse_task_shorthand(input: &str) -> TaskShorthand {
    parse_task_shorthand_with(input, &TaskDefaults::default())
}

/// Parse task shorthand, filling absent type and priority from `defaults`.
pub fn parse_task_shorthand_with(input: &str, defaults: &TaskDefaults) -> TaskShorthand {
    let type_tag = type_re().captures(input).and_then(|c| TaskType::from_tag(&c[1]));
    let priority_tag = priority_re().captures(input).and_then(|c| Priority::from_tag(&c[1]));
    let duration = duration_re()
        .captures(input)
        .and_then(|c| NormalizedDuration::from_parts(&c[1], &c[2]))
        .map(|d| d.to_string());

    let title = strip_first(input, &[type_re(), priority_re(), duration_re()]);

    tracing::debug!(
        input,
        title = %title,
        type_tag = ?type_tag,
        priority_tag = ?priority_tag,
        duration = ?duration,
        "parsed task shorthand"
    );

    TaskShorthand {
        title,
        task_type: type_tag.unwrap_or(defaults.task_type),
        priority: priority_tag.unwrap_or(defaults.priority),
        duration,
    }
}

/// Parse milestone shorthand, resolving a relative `in:` tag against the
/// current time.
pub fn parse_milestone_shorthand(input: &str) -> MilestoneShorthand {
    parse_milestone_shorthand_at(input, Utc::now())
}

/// Parse milestone shorthand, resolving a relative `in:` tag against `now`.
pub fn parse_milestone_shorthand_at(input: &str, now: DateTime<Utc>) -> MilestoneShorthand {
    let absolute = due_date_re().captures(input).and_then(|c| {
        let parsed = NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").ok();
        if parsed.is_none() {
            tracing::warn!(date = &c[1], "ignoring impossible calendar date in by: tag");
        }
        parsed
    });

    let due_date = match absolute {
        Some(date) => date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt)),
        None => duration_re()
            .captures(input)
            .and_then(|c| NormalizedDuration::from_parts(&c[1], &c[2]))
            .and_then(NormalizedDuration::to_time_delta)
            .and_then(|delta| now.checked_add_signed(delta)),
    };

    let title = strip_first(input, &[due_date_re(), duration_re()]);

    tracing::debug!(input, title = %title, due_date = ?due_date, "parsed milestone shorthand");

    MilestoneShorthand { title, due_date }
}

/// Write a task back as editable shorthand, e.g. `Ship beta !high #feature in:1w`.
pub fn task_to_shorthand(task: &Task) -> String {
    let mut out = task.title.clone();
    out.push_str(" !");
    out.push_str(task.priority.as_tag());
    out.push_str(" #");
    out.push_str(task.task_type.as_tag());
    if let Some(d) = task.duration.as_deref().and_then(NormalizedDuration::parse) {
        out.push(' ');
        out.push_str(&d.shorthand());
    }
    out
}

/// Write a milestone back as editable shorthand, e.g. `Public launch by:2024-03-01`.
pub fn milestone_to_shorthand(milestone: &Milestone) -> String {
    match milestone.due_date {
        Some(due) => format!("{} by:{}", milestone.title, due.format("%Y-%m-%d")),
        None => milestone.title.clone(),
    }
}

/// Remove the first match of each pattern in turn, then trim.
fn strip_first(input: &str, patterns: &[&Regex]) -> String {
    let mut text = input.to_string();
    for re in patterns {
        text = re.replace(&text, "").into_owned();
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Status;
    use chrono::TimeDelta;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_full_task_line() {
        let p = parse_task_shorthand("Fix login bug #bug !high in:2d");
        assert_eq!(p.title, "Fix login bug");
        assert_eq!(p.task_type, TaskType::Bug);
        assert_eq!(p.priority, Priority::High);
        assert_eq!(p.duration.as_deref(), Some("2 days"));
    }

    #[test]
    fn test_plain_text_gets_defaults() {
        let p = parse_task_shorthand("   Write the changelog  ");
        assert_eq!(p.title, "Write the changelog");
        assert_eq!(p.task_type, TaskType::General);
        assert_eq!(p.priority, Priority::Low);
        assert_eq!(p.duration, None);
    }

    #[test]
    fn test_configured_defaults_apply() {
        let defaults = TaskDefaults {
            task_type: TaskType::Feature,
            priority: Priority::Medium,
        };
        let p = parse_task_shorthand_with("Landing page", &defaults);
        assert_eq!(p.task_type, TaskType::Feature);
        assert_eq!(p.priority, Priority::Medium);

        let p = parse_task_shorthand_with("Landing page #bug", &defaults);
        assert_eq!(p.task_type, TaskType::Bug);
    }

    #[test]
    fn test_singular_unit_for_one() {
        assert_eq!(parse_task_shorthand("Ship beta in:1w").duration.as_deref(), Some("1 week"));
        assert_eq!(parse_task_shorthand("Call in:1.0h").duration.as_deref(), Some("1 hour"));
    }

    #[test]
    fn test_fractional_and_spelled_units() {
        let p = parse_task_shorthand("Refactor in:2.5days");
        assert_eq!(p.title, "Refactor");
        assert_eq!(p.duration.as_deref(), Some("2.5 days"));

        let p = parse_task_shorthand("Standup in:15 min");
        assert_eq!(p.title, "Standup");
        assert_eq!(p.duration.as_deref(), Some("15 minutes"));

        let p = parse_task_shorthand("Review in:3hr");
        assert_eq!(p.duration.as_deref(), Some("3 hours"));
    }

    #[test]
    fn test_tags_are_case_insensitive_and_unordered() {
        let p = parse_task_shorthand("IN:3W !MEDIUM polish onboarding #Improvement");
        assert_eq!(p.title, "polish onboarding");
        assert_eq!(p.task_type, TaskType::Improvement);
        assert_eq!(p.priority, Priority::Medium);
        assert_eq!(p.duration.as_deref(), Some("3 weeks"));
    }

    #[test]
    fn test_only_first_occurrence_is_used_and_stripped() {
        let p = parse_task_shorthand("Crash #bug on save #feature !low !high");
        assert_eq!(p.task_type, TaskType::Bug);
        assert_eq!(p.priority, Priority::Low);
        assert_eq!(p.title, "Crash  on save #feature  !high");
    }

    #[test]
    fn test_unknown_tokens_stay_in_title() {
        let p = parse_task_shorthand("Email #marketing !urgent in:soon");
        assert_eq!(p.title, "Email #marketing !urgent in:soon");
        assert_eq!(p.task_type, TaskType::General);
        assert_eq!(p.priority, Priority::Low);
        assert_eq!(p.duration, None);
    }

    #[test]
    fn test_overflowing_duration_is_dropped() {
        let input = format!("Big job in:{}d", "9".repeat(400));
        let parsed = parse_task_shorthand(&input);
        assert_eq!(parsed.title, "Big job");
        assert_eq!(parsed.duration, None);
    }

    #[test]
    fn test_tags_only_leaves_empty_title() {
        let p = parse_task_shorthand("#bug !high in:2d");
        assert_eq!(p.title, "");
        assert!(matches!(p.validate(), Err(ShipError::EmptyTitle)));

        assert!(parse_task_shorthand("").validate().is_err());
        assert!(parse_task_shorthand("   ").validate().is_err());
        assert!(parse_task_shorthand("Real title #bug").validate().is_ok());
    }

    #[test]
    fn test_milestone_absolute_date() {
        let p = parse_milestone_shorthand_at("Launch by:2024-03-01", fixed_now());
        assert_eq!(p.title, "Launch");
        assert_eq!(p.due_date, Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_milestone_absolute_wins_over_relative() {
        let p = parse_milestone_shorthand_at("Launch in:2w by:2024-03-01", fixed_now());
        assert_eq!(p.title, "Launch");
        assert_eq!(p.due_date, Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_milestone_relative_date() {
        let now = fixed_now();
        let p = parse_milestone_shorthand_at("Beta in:2w", now);
        assert_eq!(p.title, "Beta");
        assert_eq!(p.due_date, Some(now + TimeDelta::days(14)));

        let p = parse_milestone_shorthand_at("Demo IN:90min", now);
        assert_eq!(p.due_date, Some(now + TimeDelta::minutes(90)));

        let p = parse_milestone_shorthand_at("Sync in:1.5d", now);
        assert_eq!(p.due_date, Some(now + TimeDelta::hours(36)));
    }

    #[test]
    fn test_milestone_relative_uses_wall_clock() {
        let before = Utc::now();
        let p = parse_milestone_shorthand("Beta in:2w");
        let after = Utc::now();
        let due = p.due_date.unwrap();
        assert!(due >= before + TimeDelta::days(14));
        assert!(due <= after + TimeDelta::days(14));
    }

    #[test]
    fn test_milestone_without_tags() {
        let p = parse_milestone_shorthand_at("  Public launch ", fixed_now());
        assert_eq!(p.title, "Public launch");
        assert_eq!(p.due_date, None);
    }

    #[test]
    fn test_milestone_by_tag_is_case_sensitive() {
        let p = parse_milestone_shorthand_at("Launch BY:2024-03-01", fixed_now());
        assert_eq!(p.title, "Launch BY:2024-03-01");
        assert_eq!(p.due_date, None);
    }

    #[test]
    fn test_milestone_impossible_date_falls_back_to_relative() {
        let now = fixed_now();
        let p = parse_milestone_shorthand_at("Launch by:2024-13-45 in:1d", now);
        assert_eq!(p.title, "Launch");
        assert_eq!(p.due_date, Some(now + TimeDelta::days(1)));

        let p = parse_milestone_shorthand_at("Launch by:2024-02-30", now);
        assert_eq!(p.title, "Launch");
        assert_eq!(p.due_date, None);
    }

    #[test]
    fn test_milestone_overflowing_offset_has_no_date() {
        let digits = "9".repeat(30);
        let p = parse_milestone_shorthand_at(&format!("Someday in:{digits}w"), fixed_now());
        assert_eq!(p.title, "Someday");
        assert_eq!(p.due_date, None);
    }

    #[test]
    fn test_task_round_trips_through_shorthand() {
        let parsed = parse_task_shorthand("Ship beta #feature !high in:2.5d");
        let task = Task {
            id: 1,
            project_id: 1,
            title: parsed.title.clone(),
            description: String::new(),
            task_type: parsed.task_type,
            status: Status::Todo,
            priority: parsed.priority,
            duration: parsed.duration.clone(),
            deadline: None,
            created_by: None,
            created_at_utc: 0,
            updated_at_utc: 0,
        };
        let line = task_to_shorthand(&task);
        assert_eq!(line, "Ship beta !high #feature in:2.5d");
        assert_eq!(parse_task_shorthand(&line), parsed);
    }

    #[test]
    fn test_milestone_shorthand_rendering() {
        let mut m = Milestone {
            id: 1,
            project_id: 1,
            title: "Launch".into(),
            description: String::new(),
            due_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            completed: false,
            created_at_utc: 0,
            updated_at_utc: 0,
        };
        assert_eq!(milestone_to_shorthand(&m), "Launch by:2024-03-01");
        m.due_date = None;
        assert_eq!(milestone_to_shorthand(&m), "Launch");
    }
}
