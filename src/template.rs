//! Built-in project templates.
//!
//! A template is a canned set of tasks and milestones copied into a freshly
//! created project. Offsets are in days from the moment the template is applied.

use chrono::{DateTime, TimeDelta, Utc};

use crate::db::Database;
use crate::duration::{DurationUnit, NormalizedDuration};
use crate::error::{Result, ShipError};
use crate::fields::*;
use crate::project::sanitize_key;
use crate::task::{Milestone, Task};

#[derive(Debug)]
pub struct TemplateTask {
    pub title: &'static str,
    pub description: &'static str,
    pub task_type: TaskType,
    pub priority: Priority,
    pub duration_days: u32,
    pub deadline_in_days: i64,
}

#[derive(Debug)]
pub struct TemplateMilestone {
    pub title: &'static str,
    pub description: &'static str,
    pub due_in_days: i64,
}

#[derive(Debug)]
pub struct ProjectTemplate {
    /// Stored on the project and matched against user input after `sanitize_key`.
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tasks: &'static [TemplateTask],
    pub milestones: &'static [TemplateMilestone],
}

const fn general(
    title: &'static str,
    description: &'static str,
    priority: Priority,
    duration_days: u32,
    deadline_in_days: i64,
) -> TemplateTask {
    TemplateTask {
        title,
        description,
        task_type: TaskType::General,
        priority,
        duration_days,
        deadline_in_days,
    }
}

pub const PRE_LAUNCH: ProjectTemplate = ProjectTemplate {
    key: "pre_launch",
    name: "SaaS Pre-launch Template",
    description: "A comprehensive checklist for launching your SaaS project",
    tasks: &[
        general("Set up authentication system", "Implement secure user authentication and authorization", Priority::High, 3, 3),
        general("Design database schema", "Plan and implement the database structure", Priority::High, 2, 5),
        general("Set up CI/CD pipeline", "Configure automated testing and deployment", Priority::Medium, 2, 7),
        general("Implement core features", "Build the main functionality of your application", Priority::High, 10, 17),
        general("Set up monitoring and logging", "Implement error tracking and performance monitoring", Priority::Medium, 2, 19),
        general("Create documentation", "Write user guides and API documentation", Priority::Medium, 3, 22),
        general("Set up payment processing", "Integrate payment gateway and subscription management", Priority::High, 4, 26),
        general("Implement email notifications", "Set up transactional emails and notifications", Priority::Medium, 2, 28),
        general("Security audit", "Perform security testing and vulnerability assessment", Priority::High, 3, 31),
        general("Beta testing", "Conduct user testing and gather feedback", Priority::High, 7, 38),
    ],
    milestones: &[
        TemplateMilestone {
            title: "MVP Development Complete",
            description: "Core features implemented and tested",
            due_in_days: 30,
        },
        TemplateMilestone {
            title: "Beta Launch",
            description: "Release to beta testers and gather feedback",
            due_in_days: 45,
        },
        TemplateMilestone {
            title: "Public Launch",
            description: "Official public release",
            due_in_days: 60,
        },
    ],
};

pub const BUILTIN: &[ProjectTemplate] = &[PRE_LAUNCH];

/// Look a template up by key, accepting any spelling that sanitizes to it
/// (`pre-launch`, `Pre Launch`, `pre_launch`).
pub fn find_template(name: &str) -> Result<&'static ProjectTemplate> {
    let key = sanitize_key(name);
    BUILTIN
        .iter()
        .find(|t| t.key == key)
        .ok_or_else(|| ShipError::UnknownTemplate(name.to_string()))
}

impl ProjectTemplate {
    /// Total estimated effort of the template's tasks, in days.
    pub fn total_days(&self) -> u32 {
        self.tasks.iter().map(|t| t.duration_days).sum()
    }

    /// Copy every task and milestone into `project_id`. Returns how many
    /// tasks and milestones were created.
    pub fn apply(
        &self,
        db: &mut Database,
        project_id: u64,
        created_by: Option<String>,
        now: DateTime<Utc>,
    ) -> (usize, usize) {
        let now_utc = now.timestamp();
        for t in self.tasks {
            let id = db.next_task_id();
            let duration = NormalizedDuration::new(f64::from(t.duration_days), DurationUnit::Day);
            db.tasks.push(Task {
                id,
                project_id,
                title: t.title.to_string(),
                description: t.description.to_string(),
                task_type: t.task_type,
                status: Status::Todo,
                priority: t.priority,
                duration: Some(duration.to_string()),
                deadline: Some((now + TimeDelta::days(t.deadline_in_days)).date_naive()),
                created_by: created_by.clone(),
                created_at_utc: now_utc,
                updated_at_utc: now_utc,
            });
        }
        for m in self.milestones {
            let id = db.next_milestone_id();
            db.milestones.push(Milestone {
                id,
                project_id,
                title: m.title.to_string(),
                description: m.description.to_string(),
                due_date: Some(now + TimeDelta::days(m.due_in_days)),
                completed: false,
                created_at_utc: now_utc,
                updated_at_utc: now_utc,
            });
        }
        tracing::info!(template = self.key, project_id, "applied template");
        (self.tasks.len(), self.milestones.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_find_template_accepts_spellings() {
        assert_eq!(find_template("pre-launch").unwrap().key, "pre_launch");
        assert_eq!(find_template("Pre Launch").unwrap().key, "pre_launch");
        assert!(matches!(
            find_template("enterprise"),
            Err(ShipError::UnknownTemplate(name)) if name == "enterprise"
        ));
    }

    #[test]
    fn test_pre_launch_shape() {
        assert_eq!(PRE_LAUNCH.tasks.len(), 10);
        assert_eq!(PRE_LAUNCH.milestones.len(), 3);
        assert_eq!(PRE_LAUNCH.total_days(), 38);
    }

    #[test]
    fn test_apply_seeds_records_relative_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let mut db = Database::default();
        let (tasks, milestones) = PRE_LAUNCH.apply(&mut db, 4, Some("me@example.com".into()), now);
        assert_eq!((tasks, milestones), (10, 3));

        let first = &db.tasks[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.project_id, 4);
        assert_eq!(first.duration.as_deref(), Some("3 days"));
        assert_eq!(first.deadline, NaiveDate::from_ymd_opt(2024, 1, 4));
        assert_eq!(first.status, Status::Todo);

        let ids: Vec<u64> = db.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());

        let public = &db.milestones[2];
        assert_eq!(public.title, "Public Launch");
        assert_eq!(public.due_date, Some(now + TimeDelta::days(60)));
    }
}
