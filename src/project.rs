//! Projects and the records that hang off them.
//!
//! A project owns its tasks, milestones, notes, links, secrets and members;
//! each of those carries the owning `project_id` and is looked up by an
//! equality filter on it (see [`crate::db::Database`]).

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShipError};
use crate::fields::*;

/// A product being built towards launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub expected_launch_date: Option<NaiveDate>,
    #[serde(default)]
    pub actual_launch_date: Option<NaiveDate>,
    /// Key of the template the project was seeded from.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub creator: Option<String>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

impl Project {
    /// Create a pre-launch project with a validated name.
    pub fn new(id: u64, name: &str, creator: Option<String>, now_utc: i64) -> Result<Self> {
        Ok(Project {
            id,
            name: require("project name", name)?,
            description: None,
            status: ProjectStatus::PreLaunch,
            expected_launch_date: None,
            actual_launch_date: None,
            template: None,
            starred: false,
            archived: false,
            creator,
            created_at_utc: now_utc,
            updated_at_utc: now_utc,
        })
    }

    /// The launch date relevant to the current status: expected while
    /// pre-launch, actual once launched.
    pub fn launch_date(&self) -> Option<NaiveDate> {
        match self.status {
            ProjectStatus::PreLaunch => self.expected_launch_date,
            ProjectStatus::Launched => self.actual_launch_date,
        }
    }

    /// Patch flipping the launch status.
    ///
    /// Launching stamps `today` as the actual date and drops the expected
    /// date; un-launching drops the actual date and keeps the expected one.
    pub fn launch_toggle(&self, today: NaiveDate) -> ProjectPatch {
        match self.status {
            ProjectStatus::PreLaunch => ProjectPatch {
                status: Some(ProjectStatus::Launched),
                actual_launch_date: Some(Some(today)),
                expected_launch_date: Some(None),
                ..ProjectPatch::default()
            },
            ProjectStatus::Launched => ProjectPatch {
                status: Some(ProjectStatus::PreLaunch),
                actual_launch_date: Some(None),
                ..ProjectPatch::default()
            },
        }
    }

    /// Patch setting whichever launch date the current status shows.
    pub fn launch_date_patch(&self, date: Option<NaiveDate>) -> ProjectPatch {
        match self.status {
            ProjectStatus::PreLaunch => ProjectPatch {
                expected_launch_date: Some(date),
                ..ProjectPatch::default()
            },
            ProjectStatus::Launched => ProjectPatch {
                actual_launch_date: Some(date),
                ..ProjectPatch::default()
            },
        }
    }

    /// Case-insensitive substring match against name and description.
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&q))
    }

    pub fn apply(&self, patch: &ProjectPatch, now_utc: i64) -> Project {
        Project {
            id: self.id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            status: patch.status.unwrap_or(self.status),
            expected_launch_date: patch.expected_launch_date.unwrap_or(self.expected_launch_date),
            actual_launch_date: patch.actual_launch_date.unwrap_or(self.actual_launch_date),
            template: self.template.clone(),
            starred: patch.starred.unwrap_or(self.starred),
            archived: patch.archived.unwrap_or(self.archived),
            creator: self.creator.clone(),
            created_at_utc: self.created_at_utc,
            updated_at_utc: now_utc,
        }
    }
}

/// Optional replacements for a project's editable fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    pub expected_launch_date: Option<Option<NaiveDate>>,
    pub actual_launch_date: Option<Option<NaiveDate>>,
    pub starred: Option<bool>,
    pub archived: Option<bool>,
}

/// Someone with access to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMember {
    pub id: u64,
    pub project_id: u64,
    pub email: String,
    pub full_name: String,
    pub role: MemberRole,
    pub created_at_utc: i64,
}

/// Free-form note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub project_id: u64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

/// Bookmark to one of the project's environments or its repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLink {
    pub id: u64,
    pub project_id: u64,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub created_at_utc: i64,
}

/// Named credential kept alongside the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub id: u64,
    pub project_id: u64,
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

impl Secret {
    pub fn masked_value(&self) -> String {
        "*".repeat(self.value.chars().count().clamp(4, 12))
    }
}

/// Counts shown above the project list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortfolioSummary {
    pub total: usize,
    pub pre_launch: usize,
    pub launched: usize,
    pub created_this_month: usize,
}

/// Summarize every project, archived ones included. "This month" is the
/// calendar month of `now` in its own time zone.
pub fn portfolio_summary<Tz: TimeZone>(projects: &[Project], now: &DateTime<Tz>) -> PortfolioSummary {
    let tz = now.timezone();
    let month = (now.year(), now.month());
    let mut summary = PortfolioSummary::default();
    for p in projects {
        summary.total += 1;
        match p.status {
            ProjectStatus::PreLaunch => summary.pre_launch += 1,
            ProjectStatus::Launched => summary.launched += 1,
        }
        let created = DateTime::<Utc>::from_timestamp(p.created_at_utc, 0).map(|dt| dt.with_timezone(&tz));
        if created.is_some_and(|c| (c.year(), c.month()) == month) {
            summary.created_this_month += 1;
        }
    }
    summary
}

/// Trim `value` and reject it when nothing is left.
pub fn require(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ShipError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Lowercase key with runs of separators collapsed to single underscores,
/// e.g. `"Pre-Launch"` becomes `"pre_launch"`.
pub fn sanitize_key(display_name: &str) -> String {
    display_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project::new(1, "  Rocket  ", Some("me@example.com".into()), 10).unwrap()
    }

    #[test]
    fn test_portfolio_summary_counts() {
        let at = |ts: i64, status| Project {
            created_at_utc: ts,
            status,
            ..project()
        };
        // 2024-05-15T12:00:00Z
        let now = Utc.timestamp_opt(1_715_774_400, 0).unwrap();
        let projects = vec![
            at(1_714_521_600, ProjectStatus::PreLaunch), // 2024-05-01
            at(1_714_521_599, ProjectStatus::Launched),  // 2024-04-30 23:59:59
            at(1_683_000_000, ProjectStatus::PreLaunch), // 2023-05-02
        ];
        assert_eq!(
            portfolio_summary(&projects, &now),
            PortfolioSummary {
                total: 3,
                pre_launch: 2,
                launched: 1,
                created_this_month: 1,
            }
        );
        assert_eq!(portfolio_summary(&[], &now), PortfolioSummary::default());
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("Pre-Launch"), "pre_launch");
        assert_eq!(sanitize_key("pre_launch"), "pre_launch");
        assert_eq!(sanitize_key("  SaaS   Pre launch!! "), "saas_pre_launch");
        assert_eq!(sanitize_key(""), "");
    }

    #[test]
    fn test_new_project_trims_and_rejects_blank_names() {
        assert_eq!(project().name, "Rocket");
        assert_eq!(project().status, ProjectStatus::PreLaunch);
        assert!(matches!(
            Project::new(2, "   ", None, 0),
            Err(ShipError::EmptyField("project name"))
        ));
    }

    #[test]
    fn test_launch_toggle_round_trip() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let p = project().apply(&project().launch_date_patch(Some(expected)), 11);
        assert_eq!(p.launch_date(), Some(expected));

        let launched = p.apply(&p.launch_toggle(today), 12);
        assert_eq!(launched.status, ProjectStatus::Launched);
        assert_eq!(launched.actual_launch_date, Some(today));
        assert_eq!(launched.expected_launch_date, None);
        assert_eq!(launched.launch_date(), Some(today));

        let back = launched.apply(&launched.launch_toggle(today), 13);
        assert_eq!(back.status, ProjectStatus::PreLaunch);
        assert_eq!(back.actual_launch_date, None);
        assert_eq!(back.launch_date(), None);
    }

    #[test]
    fn test_launch_date_follows_status() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let p = project();
        let launched = p.apply(&p.launch_toggle(today), 1);
        let moved = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
        let fixed = launched.apply(&launched.launch_date_patch(Some(moved)), 2);
        assert_eq!(fixed.actual_launch_date, Some(moved));
        assert_eq!(fixed.expected_launch_date, None);
    }

    #[test]
    fn test_search_covers_description() {
        let mut p = project();
        p.description = Some("Analytics for makers".into());
        assert!(p.matches_search("rock"));
        assert!(p.matches_search("MAKERS"));
        assert!(!p.matches_search("billing"));
    }

    #[test]
    fn test_secret_masking_hides_length_extremes() {
        let mut s = Secret {
            id: 1,
            project_id: 1,
            name: "STRIPE_KEY".into(),
            value: "ab".into(),
            created_by: None,
            created_at_utc: 0,
            updated_at_utc: 0,
        };
        assert_eq!(s.masked_value(), "****");
        s.value = "x".repeat(64);
        assert_eq!(s.masked_value(), "*".repeat(12));
    }
}
