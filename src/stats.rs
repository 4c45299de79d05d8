//! Progress rollups for a single project.
//!
//! Everything here is a pure function of the task and milestone lists it is
//! handed, so the snapshot is recomputed on every read and never stored.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::duration::parse_duration_to_days;
use crate::fields::Status;
use crate::task::{Milestone, Task};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Derived statistics shown on a project's stats view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectStats {
    pub task_pct: u8,
    pub milestone_pct: u8,
    pub time_spent_days: f64,
    pub time_required_days: f64,
}

/// Percentage of tasks that are done, rounded half up. Zero for no tasks.
pub fn task_completion_percent<'a, I>(tasks: I) -> u8
where
    I: IntoIterator<Item = &'a Task>,
{
    let (done, total) = tasks.into_iter().fold((0usize, 0usize), |(done, total), t| {
        (done + usize::from(t.status == Status::Done), total + 1)
    });
    percent(done, total)
}

/// Percentage of milestones that are completed, rounded half up. Zero for none.
pub fn milestone_completion_percent<'a, I>(milestones: I) -> u8
where
    I: IntoIterator<Item = &'a Milestone>,
{
    let (done, total) = milestones.into_iter().fold((0usize, 0usize), |(done, total), m| {
        (done + usize::from(m.completed), total + 1)
    });
    percent(done, total)
}

/// Day-equivalent sum of the durations of finished tasks.
pub fn time_spent_days<'a, I>(tasks: I) -> f64
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|t| t.status == Status::Done)
        .map(|t| parse_duration_to_days(t.duration.as_deref()))
        .sum()
}

/// Day-equivalent sum of the durations of tasks not yet done.
pub fn time_required_days<'a, I>(tasks: I) -> f64
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|t| t.status != Status::Done)
        .map(|t| parse_duration_to_days(t.duration.as_deref()))
        .sum()
}

/// Single pass over both lists producing the whole snapshot.
pub fn compute_project_stats<'a, 'b, T, M>(tasks: T, milestones: M) -> ProjectStats
where
    T: IntoIterator<Item = &'a Task>,
    M: IntoIterator<Item = &'b Milestone>,
{
    let mut done = 0usize;
    let mut total = 0usize;
    let mut spent = 0.0;
    let mut required = 0.0;
    for task in tasks {
        total += 1;
        let days = parse_duration_to_days(task.duration.as_deref());
        if task.status == Status::Done {
            done += 1;
            spent += days;
        } else {
            required += days;
        }
    }

    ProjectStats {
        task_pct: percent(done, total),
        milestone_pct: milestone_completion_percent(milestones),
        time_spent_days: spent,
        time_required_days: required,
    }
}

/// Render a day count for display: whole hours under a day, whole days otherwise.
pub fn format_time(days: f64) -> String {
    if days < 1.0 {
        format!("{} hours", (days * 24.0).round())
    } else {
        format!("{} days", days.round())
    }
}

/// Describe `when` relative to `now` in whole days: `Today`, `Tomorrow`,
/// `Yesterday`, `In N days` or `N days ago`.
pub fn format_relative_date(when: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = (now - when).num_milliseconds().abs();
    let days = diff_ms / DAY_MS;
    let future = when > now;
    match days {
        0 => "Today".to_string(),
        1 if future => "Tomorrow".to_string(),
        1 => "Yesterday".to_string(),
        n if future => format!("In {n} days"),
        n => format!("{n} days ago"),
    }
}

/// Text progress bar for terminal output, e.g. `[######----] 60%`.
pub fn progress_bar(pct: u8, width: usize) -> String {
    let filled = (usize::from(pct.min(100)) * width + 50) / 100;
    format!("[{}{}] {}%", "#".repeat(filled), "-".repeat(width - filled), pct)
}

// round(100 * part / whole), halves rounding up, in integer arithmetic.
fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((200 * part + whole) / (2 * whole)) as u8
}
