//! The document store and the helpers shared by the command handlers.
//!
//! `Database` keeps one collection per record kind in a single JSON file.
//! Child records point at their project through `project_id`; every project
//! view is an equality filter on that field, returned in id order.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::config::UserConfig;
use crate::error::{Result, ShipError};
use crate::fields::*;
use crate::project::{require, Note, Project, ProjectLink, ProjectMember, ProjectPatch, Secret};
use crate::shorthand::{MilestoneShorthand, TaskShorthand};
use crate::stats::{compute_project_stats, format_relative_date, ProjectStats};
use crate::task::{Milestone, MilestonePatch, Task, TaskPatch};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub members: Vec<ProjectMember>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub links: Vec<ProjectLink>,
    #[serde(default)]
    pub secrets: Vec<Secret>,
}

fn next_id<T>(items: &[T], id: impl Fn(&T) -> u64) -> u64 {
    items.iter().map(id).max().unwrap_or(0) + 1
}

fn position<T>(items: &[T], id: impl Fn(&T) -> bool) -> Option<usize> {
    items.iter().position(id)
}

impl Database {
    /// Load from `path`. A missing file is an empty database; an unreadable
    /// or corrupt one is an error, so nothing gets overwritten by accident.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no database yet, starting empty");
            return Ok(Database::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Save using an atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)?;
        fs::write(&tmp, data)?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    pub fn next_project_id(&self) -> u64 {
        next_id(&self.projects, |p| p.id)
    }

    pub fn next_member_id(&self) -> u64 {
        next_id(&self.members, |m| m.id)
    }

    pub fn next_task_id(&self) -> u64 {
        next_id(&self.tasks, |t| t.id)
    }

    pub fn next_milestone_id(&self) -> u64 {
        next_id(&self.milestones, |m| m.id)
    }

    pub fn next_note_id(&self) -> u64 {
        next_id(&self.notes, |n| n.id)
    }

    pub fn next_link_id(&self) -> u64 {
        next_id(&self.links, |l| l.id)
    }

    pub fn next_secret_id(&self) -> u64 {
        next_id(&self.secrets, |s| s.id)
    }

    // ---- projects ----

    pub fn project(&self, id: u64) -> Result<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ShipError::ProjectNotFound(id.to_string()))
    }

    /// Resolve a project by numeric id or by case-insensitive exact name.
    pub fn resolve_project(&self, identifier: &str) -> Result<u64> {
        let identifier = identifier.trim();
        if let Ok(id) = identifier.parse::<u64>() {
            if self.projects.iter().any(|p| p.id == id) {
                return Ok(id);
            }
        }
        let wanted = identifier.to_lowercase();
        let matches: Vec<&Project> = self
            .projects
            .iter()
            .filter(|p| p.name.to_lowercase() == wanted)
            .collect();
        match matches.as_slice() {
            [] => Err(ShipError::ProjectNotFound(identifier.to_string())),
            [one] => Ok(one.id),
            _ => Err(ShipError::AmbiguousProject(identifier.to_string())),
        }
    }

    fn ensure_unique_name(&self, name: &str, except: Option<u64>) -> Result<()> {
        let wanted = name.to_lowercase();
        let taken = self
            .projects
            .iter()
            .any(|p| Some(p.id) != except && p.name.to_lowercase() == wanted);
        if taken {
            return Err(ShipError::ProjectExists(name.to_string()));
        }
        Ok(())
    }

    /// Create a project and record `owner` as its owner member.
    pub fn create_project(&mut self, name: &str, owner: &UserConfig, now_utc: i64) -> Result<u64> {
        let id = self.next_project_id();
        let project = Project::new(id, name, owner.author(), now_utc)?;
        self.ensure_unique_name(&project.name, None)?;

        let member_id = self.next_member_id();
        self.members.push(ProjectMember {
            id: member_id,
            project_id: id,
            email: owner.email.clone(),
            full_name: owner.name.clone(),
            role: MemberRole::Owner,
            created_at_utc: now_utc,
        });
        tracing::info!(project_id = id, name = %project.name, "created project");
        self.projects.push(project);
        Ok(id)
    }

    pub fn update_project(&mut self, id: u64, patch: &ProjectPatch, now_utc: i64) -> Result<&Project> {
        let idx = position(&self.projects, |p| p.id == id)
            .ok_or_else(|| ShipError::ProjectNotFound(id.to_string()))?;
        let mut patch = patch.clone();
        if let Some(name) = &patch.name {
            let name = require("project name", name)?;
            self.ensure_unique_name(&name, Some(id))?;
            patch.name = Some(name);
        }
        let updated = self.projects[idx].apply(&patch, now_utc);
        self.projects[idx] = updated;
        tracing::info!(project_id = id, "updated project");
        Ok(&self.projects[idx])
    }

    /// Bump a project's `updated_at_utc` after one of its children changed.
    fn touch_project(&mut self, id: u64, now_utc: i64) {
        if let Some(p) = self.projects.iter_mut().find(|p| p.id == id) {
            p.updated_at_utc = now_utc;
        }
    }

    /// Delete a project together with every record that belongs to it.
    pub fn delete_project(&mut self, id: u64) -> Result<Project> {
        let idx = position(&self.projects, |p| p.id == id)
            .ok_or_else(|| ShipError::ProjectNotFound(id.to_string()))?;
        let project = self.projects.remove(idx);
        self.members.retain(|r| r.project_id != id);
        self.tasks.retain(|r| r.project_id != id);
        self.milestones.retain(|r| r.project_id != id);
        self.notes.retain(|r| r.project_id != id);
        self.links.retain(|r| r.project_id != id);
        self.secrets.retain(|r| r.project_id != id);
        tracing::info!(project_id = id, "deleted project and its records");
        Ok(project)
    }

    /// Most recently updated project that is not archived.
    pub fn most_recent_project(&self) -> Option<&Project> {
        self.projects
            .iter()
            .filter(|p| !p.archived)
            .max_by_key(|p| (p.updated_at_utc, p.id))
    }

    pub fn stats(&self, project_id: u64) -> ProjectStats {
        compute_project_stats(
            self.tasks.iter().filter(|t| t.project_id == project_id),
            self.milestones.iter().filter(|m| m.project_id == project_id),
        )
    }

    // ---- tasks ----

    pub fn project_tasks(&self, project_id: u64) -> Vec<&Task> {
        let mut v: Vec<&Task> = self.tasks.iter().filter(|t| t.project_id == project_id).collect();
        v.sort_by_key(|t| t.id);
        v
    }

    pub fn task(&self, id: u64) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(ShipError::TaskNotFound(id))
    }

    /// Persist parsed shorthand as a new `todo` task. Refuses an empty title.
    pub fn add_task(
        &mut self,
        project_id: u64,
        parsed: TaskShorthand,
        created_by: Option<String>,
        now_utc: i64,
    ) -> Result<u64> {
        parsed.validate()?;
        self.project(project_id)?;
        let id = self.next_task_id();
        let task = Task::from_shorthand(id, project_id, parsed, created_by, now_utc);
        tracing::info!(task_id = id, project_id, title = %task.title, "added task");
        self.tasks.push(task);
        self.touch_project(project_id, now_utc);
        Ok(id)
    }

    pub fn update_task(&mut self, id: u64, patch: &TaskPatch, now_utc: i64) -> Result<&Task> {
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ShipError::EmptyTitle);
        }
        let idx = position(&self.tasks, |t| t.id == id).ok_or(ShipError::TaskNotFound(id))?;
        let updated = self.tasks[idx].apply(patch, now_utc);
        let project_id = updated.project_id;
        self.tasks[idx] = updated;
        self.touch_project(project_id, now_utc);
        tracing::info!(task_id = id, "updated task");
        Ok(&self.tasks[idx])
    }

    pub fn toggle_task(&mut self, id: u64, now_utc: i64) -> Result<&Task> {
        let next = self.task(id)?.toggled_status();
        self.update_task(id, &TaskPatch::status(next), now_utc)
    }

    pub fn remove_task(&mut self, id: u64, now_utc: i64) -> Result<Task> {
        let idx = position(&self.tasks, |t| t.id == id).ok_or(ShipError::TaskNotFound(id))?;
        let task = self.tasks.remove(idx);
        self.touch_project(task.project_id, now_utc);
        tracing::info!(task_id = id, "removed task");
        Ok(task)
    }

    // ---- milestones ----

    pub fn project_milestones(&self, project_id: u64) -> Vec<&Milestone> {
        let mut v: Vec<&Milestone> = self
            .milestones
            .iter()
            .filter(|m| m.project_id == project_id)
            .collect();
        v.sort_by_key(|m| m.id);
        v
    }

    pub fn milestone(&self, id: u64) -> Result<&Milestone> {
        self.milestones
            .iter()
            .find(|m| m.id == id)
            .ok_or(ShipError::MilestoneNotFound(id))
    }

    pub fn add_milestone(&mut self, project_id: u64, parsed: MilestoneShorthand, now_utc: i64) -> Result<u64> {
        parsed.validate()?;
        self.project(project_id)?;
        let id = self.next_milestone_id();
        let milestone = Milestone::from_shorthand(id, project_id, parsed, now_utc);
        tracing::info!(milestone_id = id, project_id, title = %milestone.title, "added milestone");
        self.milestones.push(milestone);
        self.touch_project(project_id, now_utc);
        Ok(id)
    }

    pub fn update_milestone(&mut self, id: u64, patch: &MilestonePatch, now_utc: i64) -> Result<&Milestone> {
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ShipError::EmptyTitle);
        }
        let idx = position(&self.milestones, |m| m.id == id).ok_or(ShipError::MilestoneNotFound(id))?;
        let updated = self.milestones[idx].apply(patch, now_utc);
        let project_id = updated.project_id;
        self.milestones[idx] = updated;
        self.touch_project(project_id, now_utc);
        tracing::info!(milestone_id = id, "updated milestone");
        Ok(&self.milestones[idx])
    }

    pub fn toggle_milestone(&mut self, id: u64, now_utc: i64) -> Result<&Milestone> {
        let completed = !self.milestone(id)?.completed;
        self.update_milestone(id, &MilestonePatch::completed(completed), now_utc)
    }

    pub fn remove_milestone(&mut self, id: u64, now_utc: i64) -> Result<Milestone> {
        let idx = position(&self.milestones, |m| m.id == id).ok_or(ShipError::MilestoneNotFound(id))?;
        let milestone = self.milestones.remove(idx);
        self.touch_project(milestone.project_id, now_utc);
        tracing::info!(milestone_id = id, "removed milestone");
        Ok(milestone)
    }

    // ---- notes ----

    pub fn project_notes(&self, project_id: u64) -> Vec<&Note> {
        self.notes.iter().filter(|n| n.project_id == project_id).collect()
    }

    pub fn add_note(
        &mut self,
        project_id: u64,
        title: &str,
        content: &str,
        created_by: Option<String>,
        now_utc: i64,
    ) -> Result<u64> {
        let title = require("note title", title)?;
        let content = require("note content", content)?;
        self.project(project_id)?;
        let id = self.next_note_id();
        self.notes.push(Note {
            id,
            project_id,
            title,
            content,
            created_by,
            created_at_utc: now_utc,
            updated_at_utc: now_utc,
        });
        self.touch_project(project_id, now_utc);
        tracing::info!(note_id = id, project_id, "added note");
        Ok(id)
    }

    pub fn edit_note(&mut self, id: u64, title: Option<&str>, content: Option<&str>, now_utc: i64) -> Result<&Note> {
        let title = title.map(|t| require("note title", t)).transpose()?;
        let content = content.map(|c| require("note content", c)).transpose()?;
        let idx = position(&self.notes, |n| n.id == id).ok_or(ShipError::NoteNotFound(id))?;
        let note = &mut self.notes[idx];
        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = content;
        }
        note.updated_at_utc = now_utc;
        let project_id = note.project_id;
        self.touch_project(project_id, now_utc);
        tracing::info!(note_id = id, "edited note");
        Ok(&self.notes[idx])
    }

    pub fn remove_note(&mut self, id: u64, now_utc: i64) -> Result<Note> {
        let idx = position(&self.notes, |n| n.id == id).ok_or(ShipError::NoteNotFound(id))?;
        let note = self.notes.remove(idx);
        self.touch_project(note.project_id, now_utc);
        tracing::info!(note_id = id, "removed note");
        Ok(note)
    }

    // ---- links ----

    pub fn project_links(&self, project_id: u64) -> Vec<&ProjectLink> {
        self.links.iter().filter(|l| l.project_id == project_id).collect()
    }

    pub fn add_link(
        &mut self,
        project_id: u64,
        name: &str,
        url: &str,
        link_type: LinkType,
        now_utc: i64,
    ) -> Result<u64> {
        let name = require("link name", name)?;
        let url = require("link url", url)?;
        self.project(project_id)?;
        let id = self.next_link_id();
        self.links.push(ProjectLink {
            id,
            project_id,
            name,
            url,
            link_type,
            created_at_utc: now_utc,
        });
        self.touch_project(project_id, now_utc);
        tracing::info!(link_id = id, project_id, "added link");
        Ok(id)
    }

    pub fn remove_link(&mut self, id: u64, now_utc: i64) -> Result<ProjectLink> {
        let idx = position(&self.links, |l| l.id == id).ok_or(ShipError::LinkNotFound(id))?;
        let link = self.links.remove(idx);
        self.touch_project(link.project_id, now_utc);
        tracing::info!(link_id = id, "removed link");
        Ok(link)
    }

    // ---- secrets ----

    pub fn project_secrets(&self, project_id: u64) -> Vec<&Secret> {
        self.secrets.iter().filter(|s| s.project_id == project_id).collect()
    }

    pub fn add_secret(
        &mut self,
        project_id: u64,
        name: &str,
        value: &str,
        created_by: Option<String>,
        now_utc: i64,
    ) -> Result<u64> {
        let name = require("secret name", name)?;
        let value = require("secret value", value)?;
        self.project(project_id)?;
        let id = self.next_secret_id();
        self.secrets.push(Secret {
            id,
            project_id,
            name,
            value,
            created_by,
            created_at_utc: now_utc,
            updated_at_utc: now_utc,
        });
        self.touch_project(project_id, now_utc);
        tracing::info!(secret_id = id, project_id, "added secret");
        Ok(id)
    }

    pub fn edit_secret(&mut self, id: u64, name: Option<&str>, value: Option<&str>, now_utc: i64) -> Result<&Secret> {
        let name = name.map(|n| require("secret name", n)).transpose()?;
        let value = value.map(|v| require("secret value", v)).transpose()?;
        let idx = position(&self.secrets, |s| s.id == id).ok_or(ShipError::SecretNotFound(id))?;
        let secret = &mut self.secrets[idx];
        if let Some(name) = name {
            secret.name = name;
        }
        if let Some(value) = value {
            secret.value = value;
        }
        secret.updated_at_utc = now_utc;
        let project_id = secret.project_id;
        self.touch_project(project_id, now_utc);
        tracing::info!(secret_id = id, "edited secret");
        Ok(&self.secrets[idx])
    }

    pub fn remove_secret(&mut self, id: u64, now_utc: i64) -> Result<Secret> {
        let idx = position(&self.secrets, |s| s.id == id).ok_or(ShipError::SecretNotFound(id))?;
        let secret = self.secrets.remove(idx);
        self.touch_project(secret.project_id, now_utc);
        tracing::info!(secret_id = id, "removed secret");
        Ok(secret)
    }

    // ---- members ----

    pub fn project_members(&self, project_id: u64) -> Vec<&ProjectMember> {
        self.members.iter().filter(|m| m.project_id == project_id).collect()
    }

    /// Add `email` to a project with the `member` role. The email must not
    /// already be on the project (compared case-insensitively).
    pub fn invite_member(
        &mut self,
        project_id: u64,
        email: &str,
        full_name: Option<&str>,
        now_utc: i64,
    ) -> Result<u64> {
        let email = require("email", email)?;
        self.project(project_id)?;
        let wanted = email.to_lowercase();
        if self
            .project_members(project_id)
            .iter()
            .any(|m| m.email.to_lowercase() == wanted)
        {
            return Err(ShipError::AlreadyMember(email));
        }
        let id = self.next_member_id();
        let full_name = full_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| email.clone());
        self.members.push(ProjectMember {
            id,
            project_id,
            email,
            full_name,
            role: MemberRole::Member,
            created_at_utc: now_utc,
        });
        self.touch_project(project_id, now_utc);
        tracing::info!(member_id = id, project_id, "invited member");
        Ok(id)
    }

    pub fn remove_member(&mut self, id: u64, now_utc: i64) -> Result<ProjectMember> {
        let idx = position(&self.members, |m| m.id == id).ok_or(ShipError::MemberNotFound(id))?;
        if self.members[idx].role == MemberRole::Owner {
            return Err(ShipError::OwnerRemoval);
        }
        let member = self.members.remove(idx);
        self.touch_project(member.project_id, now_utc);
        tracing::info!(member_id = id, "removed member");
        Ok(member)
    }
}

/// Parse a human date relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday".."sunday" (and "mon".."sun"), "next friday", "this friday"
/// - "end of week" / "eow", "end of month" / "eom"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD"
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => return Some(start_end_of_this_week(today).1),
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            return Some(NaiveDate::from_ymd_opt(year, month, 1)? - Duration::days(1));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some(n) = rest.strip_suffix('d') {
            return n
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(Duration::try_days)
                .and_then(|d| today.checked_add_signed(d));
        }
        if let Some(n) = rest.strip_suffix('w') {
            return n
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(Duration::try_weeks)
                .and_then(|d| today.checked_add_signed(d));
        }
        return None;
    }

    let (next_week, day) = match s.split_once(' ') {
        Some(("next", day)) => (true, day),
        Some(("this", day)) => (false, day),
        _ => (false, s.as_str()),
    };
    if let Some(target) = weekday_index(day) {
        let current = today.weekday().num_days_from_monday() as i64;
        let ahead = (target + 7 - current) % 7;
        let ahead = if next_week { ahead + 7 } else { ahead };
        return Some(today + Duration::days(ahead));
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

fn weekday_index(name: &str) -> Option<i64> {
    const DAYS: [&str; 7] = ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];
    DAYS.iter()
        .position(|d| *d == name || (name.len() == 3 && d.starts_with(name)))
        .map(|i| i as i64)
}

/// [`parse_due_input`] against the local calendar, as a command argument.
pub fn parse_date_arg(s: &str) -> Result<NaiveDate> {
    parse_due_input(s, Local::now().date_naive()).ok_or_else(|| ShipError::InvalidDate(s.to_string()))
}

/// Calculate the start and end dates of the current ISO week (Monday to Sunday).
pub fn start_end_of_this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    (start, start + Duration::days(6))
}

/// Format a deadline relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => match (d - today).num_days() {
            0 => "today".into(),
            1 => "tomorrow".into(),
            n if n > 1 => format!("in {n}d"),
            n => format!("{}d late", -n),
        },
    }
}

/// Launch line for a project, e.g. `Expected 2024-06-01 (In 12 days)`.
/// The date is taken at midnight UTC when measuring the distance from `now`.
pub fn format_launch(project: &Project, now: DateTime<Utc>) -> String {
    let label = match project.status {
        ProjectStatus::PreLaunch => "Expected",
        ProjectStatus::Launched => "Launched",
    };
    let Some(date) = project.launch_date() else {
        return format!("{label} -");
    };
    match date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt)) {
        Some(when) => format!("{label} {date} ({})", format_relative_date(when, now)),
        None => format!("{label} {date}"),
    }
}

pub fn format_task_type(t: TaskType) -> &'static str {
    match t {
        TaskType::General => "General",
        TaskType::Bug => "Bug",
        TaskType::Feature => "Feature",
        TaskType::Improvement => "Improvement",
    }
}

pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Todo => "Todo",
        Status::InProgress => "In Progress",
        Status::Done => "Done",
    }
}

pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
    }
}

pub fn format_project_status(s: ProjectStatus) -> &'static str {
    match s {
        ProjectStatus::PreLaunch => "Pre-launch",
        ProjectStatus::Launched => "Launched",
    }
}

pub fn format_link_type(t: LinkType) -> &'static str {
    match t {
        LinkType::Production => "Production",
        LinkType::Staging => "Staging",
        LinkType::Development => "Development",
        LinkType::Repository => "Repository",
        LinkType::Other => "Other",
    }
}

/// Print tasks in a formatted table.
pub fn print_task_table(tasks: &[&Task]) {
    println!(
        "{:<5} {:<4} {:<12} {:<7} {:<10} {:<10} {}",
        "ID", "Done", "Type", "Pri", "Duration", "Deadline", "Title"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        let mark = match t.status {
            Status::Done => "[x]",
            Status::InProgress => "[~]",
            Status::Todo => "[ ]",
        };
        println!(
            "{:<5} {:<4} {:<12} {:<7} {:<10} {:<10} {}",
            t.id,
            mark,
            format_task_type(t.task_type),
            format_priority(t.priority),
            truncate(t.duration.as_deref().unwrap_or("-"), 10),
            format_due_relative(t.deadline, today),
            t.title
        );
    }
}

/// Print milestones in a formatted table.
pub fn print_milestone_table(milestones: &[&Milestone]) {
    println!("{:<5} {:<4} {:<12} {:<14} {}", "ID", "Done", "Due", "When", "Title");
    let now = Utc::now();
    for m in milestones {
        let (due, when) = match m.due_date {
            Some(d) => (d.format("%Y-%m-%d").to_string(), format_relative_date(d, now)),
            None => ("-".to_string(), "-".to_string()),
        };
        println!(
            "{:<5} {:<4} {:<12} {:<14} {}",
            m.id,
            if m.completed { "[x]" } else { "[ ]" },
            due,
            when,
            m.title
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
