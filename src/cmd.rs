//! Command definitions and their handlers.
//!
//! Every handler loads the database, applies one change through the
//! `Database` API, saves, and reports what happened on stdout.

use std::path::PathBuf;

use chrono::{Local, NaiveDate, TimeZone, Utc};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::config::Config;
use crate::db::*;
use crate::error::{Result, ShipError};
use crate::fields::*;
use crate::project::{portfolio_summary, Project, ProjectPatch};
use crate::shorthand::{
    milestone_to_shorthand, parse_milestone_shorthand, parse_task_shorthand_with, task_to_shorthand,
};
use crate::stats::{format_relative_date, format_time, progress_bar};
use crate::task::{MilestonePatch, TaskPatch};
use crate::template::{find_template, BUILTIN};
use crate::tui::run::run_dashboard;

#[derive(Subcommand)]
pub enum Commands {
    /// Open the terminal dashboard for a project.
    Ui {
        /// Project id or name (defaults to the most recently updated one).
        project: Option<String>,
    },

    /// Create, list and manage projects.
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage a project's tasks using shorthand.
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Manage a project's milestones using shorthand.
    Milestone {
        #[command(subcommand)]
        action: MilestoneAction,
    },

    /// Manage project notes.
    Note {
        #[command(subcommand)]
        action: NoteAction,
    },

    /// Manage project links.
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Manage project secrets.
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },

    /// Manage project members.
    Member {
        #[command(subcommand)]
        action: MemberAction,
    },

    /// Show progress statistics for a project.
    Stats {
        /// Project id or name
        project: String,
        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Parse shorthand and print the result without saving anything.
    Parse {
        #[command(subcommand)]
        action: ParseAction,
    },

    /// Inspect the built-in project templates.
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Show or change local configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project.
    New {
        /// Project name (must be unique).
        name: String,
        /// Optional description.
        #[arg(long)]
        desc: Option<String>,
        /// Create the project as already launched.
        #[arg(long)]
        launched: bool,
        /// Launch date: YYYY-MM-DD, "today", "next friday", "in 3w", ...
        #[arg(long)]
        launch_date: Option<String>,
        /// Seed tasks and milestones from a template (e.g. pre-launch).
        #[arg(long)]
        template: Option<String>,
    },
    /// List projects, starred first.
    List {
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<ProjectStatus>,
        /// Case-insensitive search over name and description.
        #[arg(long)]
        search: Option<String>,
        /// Only starred projects.
        #[arg(long)]
        starred: bool,
        /// Show archived projects instead of active ones.
        #[arg(long)]
        archived: bool,
    },
    /// Show a project with its stats, tasks and milestones.
    Show {
        /// Project id or name
        project: String,
    },
    /// Toggle between pre-launch and launched.
    Launch {
        /// Project id or name
        project: String,
    },
    /// Set the expected (pre-launch) or actual (launched) launch date.
    LaunchDate {
        /// Project id or name
        project: String,
        /// New date
        #[arg(required_unless_present = "clear")]
        date: Option<String>,
        /// Remove the date instead.
        #[arg(long, conflicts_with = "date")]
        clear: bool,
    },
    /// Rename a project.
    Rename {
        /// Project id or name
        project: String,
        /// New name
        name: String,
    },
    /// Set or clear the description.
    Describe {
        /// Project id or name
        project: String,
        /// New description (omit to clear)
        text: Option<String>,
    },
    /// Toggle the star.
    Star {
        /// Project id or name
        project: String,
    },
    /// Hide a project from the default list.
    Archive {
        /// Project id or name
        project: String,
    },
    /// Bring an archived project back.
    Restore {
        /// Project id or name
        project: String,
    },
    /// Delete a project and everything in it.
    Delete {
        /// Project id or name
        project: String,
    },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task, e.g. `ship task add Rocket Fix login bug #bug !high in:2d`.
    Add {
        /// Project id or name
        project: String,
        /// Shorthand text: title plus optional #type, !priority and in:<duration> tags.
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
        /// Deadline: YYYY-MM-DD, "today", "friday", "in 3d", ...
        #[arg(long)]
        deadline: Option<String>,
        /// Longer description.
        #[arg(long)]
        desc: Option<String>,
    },
    /// Re-parse shorthand over an existing task.
    Edit {
        /// Task id
        id: u64,
        /// Replacement shorthand text.
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
    },
    /// Print a task as editable shorthand.
    Shorthand {
        /// Task id
        id: u64,
    },
    /// Flip a task between done and todo.
    Toggle {
        /// Task id
        id: u64,
    },
    /// Set a task's status directly.
    Status {
        /// Task id
        id: u64,
        /// New status
        #[arg(value_enum)]
        status: Status,
    },
    /// Set or clear the description.
    Describe {
        /// Task id
        id: u64,
        /// New description (omit to clear)
        text: Option<String>,
    },
    /// Set or clear the deadline.
    Deadline {
        /// Task id
        id: u64,
        /// New deadline
        #[arg(required_unless_present = "clear")]
        date: Option<String>,
        /// Remove the deadline instead.
        #[arg(long, conflicts_with = "date")]
        clear: bool,
    },
    /// Delete a task.
    Rm {
        /// Task id
        id: u64,
    },
    /// List a project's tasks, open ones first.
    List {
        /// Project id or name
        project: String,
        /// Only tasks of this type.
        #[arg(long = "type", value_enum)]
        task_type: Option<TaskType>,
        /// Only tasks with this status.
        #[arg(long, value_enum)]
        status: Option<Status>,
    },
}

#[derive(Subcommand)]
pub enum MilestoneAction {
    /// Add a milestone, e.g. `ship milestone add Rocket Beta launch by:2024-06-01`.
    Add {
        /// Project id or name
        project: String,
        /// Shorthand text: title plus optional by:YYYY-MM-DD or in:<duration>.
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
        /// Longer description.
        #[arg(long)]
        desc: Option<String>,
    },
    /// Re-parse shorthand over an existing milestone (title and due date).
    Edit {
        /// Milestone id
        id: u64,
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
    },
    /// Print a milestone as editable shorthand.
    Shorthand {
        /// Milestone id
        id: u64,
    },
    /// Flip a milestone's completed flag.
    Toggle {
        /// Milestone id
        id: u64,
    },
    /// Delete a milestone.
    Rm {
        /// Milestone id
        id: u64,
    },
    /// List a project's milestones.
    List {
        /// Project id or name
        project: String,
    },
}

#[derive(Subcommand)]
pub enum NoteAction {
    /// Add a note.
    Add {
        /// Project id or name
        project: String,
        title: String,
        content: String,
    },
    /// Change a note's title or content.
    Edit {
        /// Note id
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// List a project's notes.
    List {
        /// Project id or name
        project: String,
    },
    /// Delete a note.
    Rm {
        /// Note id
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum LinkAction {
    /// Add a link.
    Add {
        /// Project id or name
        project: String,
        name: String,
        url: String,
        /// Environment the link points at.
        #[arg(long = "type", value_enum, default_value_t = LinkType::Other)]
        link_type: LinkType,
    },
    /// List a project's links.
    List {
        /// Project id or name
        project: String,
    },
    /// Delete a link.
    Rm {
        /// Link id
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum SecretAction {
    /// Store a secret.
    Add {
        /// Project id or name
        project: String,
        name: String,
        value: String,
    },
    /// Change a secret's name or value.
    Edit {
        /// Secret id
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        value: Option<String>,
    },
    /// List a project's secrets (values masked).
    List {
        /// Project id or name
        project: String,
        /// Print values in clear text.
        #[arg(long)]
        reveal: bool,
    },
    /// Delete a secret.
    Rm {
        /// Secret id
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum MemberAction {
    /// Add someone to a project.
    Invite {
        /// Project id or name
        project: String,
        email: String,
        /// Display name (defaults to the email).
        #[arg(long)]
        name: Option<String>,
    },
    /// List a project's members.
    List {
        /// Project id or name
        project: String,
    },
    /// Remove a member (the owner cannot be removed).
    Rm {
        /// Member id
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum ParseAction {
    /// Parse task shorthand.
    Task {
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
    },
    /// Parse milestone shorthand.
    Milestone {
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum TemplateAction {
    /// List the built-in templates.
    List,
    /// Show the tasks and milestones a template creates.
    Show {
        /// Template name, e.g. pre-launch
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Set the identity recorded on new projects and tasks.
    SetUser {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Set the type and priority used when shorthand has no tag.
    SetDefault {
        #[arg(long = "type", value_enum)]
        task_type: Option<TaskType>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },
}

/// Resolved paths and configuration shared by every handler.
pub struct Context {
    pub home: PathBuf,
    pub db_path: PathBuf,
    pub config: Config,
}

impl Context {
    fn load_db(&self) -> Result<Database> {
        Database::load(&self.db_path)
    }

    fn save_db(&self, db: &Database) -> Result<()> {
        db.save(&self.db_path)
    }
}

fn now_utc() -> i64 {
    Utc::now().timestamp()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn join_input(input: &[String]) -> String {
    input.join(" ")
}

/// Dispatch a parsed command.
pub fn run(ctx: &mut Context, command: Commands) -> Result<()> {
    match command {
        Commands::Ui { project } => cmd_ui(ctx, project),
        Commands::Project { action } => cmd_project(ctx, action),
        Commands::Task { action } => cmd_task(ctx, action),
        Commands::Milestone { action } => cmd_milestone(ctx, action),
        Commands::Note { action } => cmd_note(ctx, action),
        Commands::Link { action } => cmd_link(ctx, action),
        Commands::Secret { action } => cmd_secret(ctx, action),
        Commands::Member { action } => cmd_member(ctx, action),
        Commands::Stats { project, json } => cmd_stats(ctx, &project, json),
        Commands::Parse { action } => cmd_parse(ctx, action),
        Commands::Template { action } => cmd_template(action),
        Commands::Config { action } => cmd_config(ctx, action),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

/// Launch the terminal dashboard.
pub fn cmd_ui(ctx: &Context, project: Option<String>) -> Result<()> {
    let db = ctx.load_db()?;
    let project_id = match project {
        Some(p) => db.resolve_project(&p)?,
        None => db.most_recent_project().ok_or(ShipError::NoProjects)?.id,
    };
    drop(db);
    run_dashboard(&ctx.db_path, project_id, &ctx.config)
}

pub fn cmd_project(ctx: &Context, action: ProjectAction) -> Result<()> {
    let mut db = ctx.load_db()?;
    let now = now_utc();
    match action {
        ProjectAction::New { name, desc, launched, launch_date, template } => {
            let template = template.as_deref().map(find_template).transpose()?;
            let launch_date = launch_date.as_deref().map(parse_date_arg).transpose()?;
            let id = db.create_project(&name, &ctx.config.user, now)?;

            let mut patch = ProjectPatch {
                description: desc.map(|d| Some(d.trim().to_string()).filter(|d| !d.is_empty())),
                ..ProjectPatch::default()
            };
            if launched {
                patch.status = Some(ProjectStatus::Launched);
                patch.actual_launch_date = Some(Some(launch_date.unwrap_or_else(today)));
            } else {
                patch.expected_launch_date = Some(launch_date);
            }
            db.update_project(id, &patch, now)?;

            if let Some(template) = template {
                let (tasks, milestones) = template.apply(&mut db, id, ctx.config.user.author(), Utc::now());
                if let Some(p) = db.projects.iter_mut().find(|p| p.id == id) {
                    p.template = Some(template.key.to_string());
                }
                println!("Seeded {tasks} tasks and {milestones} milestones from '{}'", template.name);
            }
            ctx.save_db(&db)?;
            println!("Created project {id}: {}", db.project(id)?.name);
        }

        ProjectAction::List { status, search, starred, archived } => {
            let mut projects: Vec<&Project> = db
                .projects
                .iter()
                .filter(|p| p.archived == archived)
                .filter(|p| status.map_or(true, |s| p.status == s))
                .filter(|p| !starred || p.starred)
                .filter(|p| search.as_deref().map_or(true, |q| p.matches_search(q)))
                .collect();
            projects.sort_by_key(|p| (!p.starred, p.id));

            if !db.projects.is_empty() {
                let summary = portfolio_summary(&db.projects, &Local::now());
                println!(
                    "{} projects • {} pre-launch • {} launched • {} created this month",
                    summary.total, summary.pre_launch, summary.launched, summary.created_this_month
                );
                println!();
            }
            if projects.is_empty() {
                println!("No projects found.");
                return Ok(());
            }
            println!("{:<5} {:<2} {:<11} {:<12} {:<6} {}", "ID", "", "Status", "Launch", "Tasks", "Name");
            for p in projects {
                let launch = p
                    .launch_date()
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{:<5} {:<2} {:<11} {:<12} {:<6} {}",
                    p.id,
                    if p.starred { "*" } else { "" },
                    format_project_status(p.status),
                    launch,
                    format!("{}%", db.stats(p.id).task_pct),
                    p.name
                );
            }
        }

        ProjectAction::Show { project } => {
            let id = db.resolve_project(&project)?;
            let p = db.project(id)?;
            let stats = db.stats(id);
            println!("{} [{}]{}", p.name, format_project_status(p.status), if p.starred { " *" } else { "" });
            if let Some(desc) = &p.description {
                println!("{desc}");
            }
            println!("Launch:     {}", format_launch(p, Utc::now()));
            println!("Tasks:      {}", progress_bar(stats.task_pct, 20));
            println!("Milestones: {}", progress_bar(stats.milestone_pct, 20));
            println!();
            print_task_table(&db.project_tasks(id));
            println!();
            print_milestone_table(&db.project_milestones(id));
        }

        ProjectAction::Launch { project } => {
            let id = db.resolve_project(&project)?;
            let patch = db.project(id)?.launch_toggle(today());
            let p = db.update_project(id, &patch, now)?;
            println!("{} is now {}", p.name, format_project_status(p.status));
            ctx.save_db(&db)?;
        }

        ProjectAction::LaunchDate { project, date, clear } => {
            let id = db.resolve_project(&project)?;
            let date = if clear {
                None
            } else {
                let raw = date.ok_or_else(|| ShipError::InvalidDate(String::new()))?;
                Some(parse_date_arg(&raw)?)
            };
            let patch = db.project(id)?.launch_date_patch(date);
            let p = db.update_project(id, &patch, now)?;
            println!("{}: {}", p.name, format_launch(p, Utc::now()));
            ctx.save_db(&db)?;
        }

        ProjectAction::Rename { project, name } => {
            let id = db.resolve_project(&project)?;
            let patch = ProjectPatch {
                name: Some(name),
                ..ProjectPatch::default()
            };
            println!("Renamed project {id} to {}", db.update_project(id, &patch, now)?.name);
            ctx.save_db(&db)?;
        }

        ProjectAction::Describe { project, text } => {
            let id = db.resolve_project(&project)?;
            let patch = ProjectPatch {
                description: Some(text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())),
                ..ProjectPatch::default()
            };
            db.update_project(id, &patch, now)?;
            ctx.save_db(&db)?;
            println!("Updated description of project {id}");
        }

        ProjectAction::Star { project } => {
            let id = db.resolve_project(&project)?;
            let patch = ProjectPatch {
                starred: Some(!db.project(id)?.starred),
                ..ProjectPatch::default()
            };
            let p = db.update_project(id, &patch, now)?;
            println!("{} {}", if p.starred { "Starred" } else { "Unstarred" }, p.name);
            ctx.save_db(&db)?;
        }

        ProjectAction::Archive { project } => set_archived(ctx, &mut db, &project, true, now)?,
        ProjectAction::Restore { project } => set_archived(ctx, &mut db, &project, false, now)?,

        ProjectAction::Delete { project } => {
            let id = db.resolve_project(&project)?;
            let removed = db.delete_project(id)?;
            ctx.save_db(&db)?;
            println!("Deleted project {id}: {}", removed.name);
        }
    }
    Ok(())
}

fn set_archived(ctx: &Context, db: &mut Database, project: &str, archived: bool, now: i64) -> Result<()> {
    let id = db.resolve_project(project)?;
    let patch = ProjectPatch {
        archived: Some(archived),
        ..ProjectPatch::default()
    };
    let p = db.update_project(id, &patch, now)?;
    println!("{} {}", if archived { "Archived" } else { "Restored" }, p.name);
    ctx.save_db(db)
}

pub fn cmd_task(ctx: &Context, action: TaskAction) -> Result<()> {
    let mut db = ctx.load_db()?;
    let now = now_utc();
    match action {
        TaskAction::Add { project, input, deadline, desc } => {
            let project_id = db.resolve_project(&project)?;
            let deadline = deadline.as_deref().map(parse_date_arg).transpose()?;
            let parsed = parse_task_shorthand_with(&join_input(&input), &ctx.config.defaults);
            let id = db.add_task(project_id, parsed, ctx.config.user.author(), now)?;
            if deadline.is_some() || desc.is_some() {
                let patch = TaskPatch {
                    deadline: Some(deadline),
                    description: desc,
                    ..TaskPatch::default()
                };
                db.update_task(id, &patch, now)?;
            }
            ctx.save_db(&db)?;
            let t = db.task(id)?;
            println!(
                "Added task {id}: {} [{} {} {}]",
                t.title,
                t.task_type.as_tag(),
                t.priority.as_tag(),
                t.duration.as_deref().unwrap_or("-")
            );
        }

        TaskAction::Edit { id, input } => {
            let parsed = parse_task_shorthand_with(&join_input(&input), &ctx.config.defaults);
            parsed.validate()?;
            let t = db.update_task(id, &TaskPatch::from_shorthand(parsed), now)?;
            println!("Updated task {id}: {}", t.title);
            ctx.save_db(&db)?;
        }

        TaskAction::Shorthand { id } => {
            println!("{}", task_to_shorthand(db.task(id)?));
        }

        TaskAction::Toggle { id } => {
            let t = db.toggle_task(id, now)?;
            println!("Task {id} is now {}", format_status(t.status));
            ctx.save_db(&db)?;
        }

        TaskAction::Status { id, status } => {
            let t = db.update_task(id, &TaskPatch::status(status), now)?;
            println!("Task {id} is now {}", format_status(t.status));
            ctx.save_db(&db)?;
        }

        TaskAction::Describe { id, text } => {
            let patch = TaskPatch {
                description: Some(text.unwrap_or_default()),
                ..TaskPatch::default()
            };
            db.update_task(id, &patch, now)?;
            ctx.save_db(&db)?;
            println!("Updated description of task {id}");
        }

        TaskAction::Deadline { id, date, clear } => {
            let deadline = if clear {
                None
            } else {
                let raw = date.ok_or_else(|| ShipError::InvalidDate(String::new()))?;
                Some(parse_date_arg(&raw)?)
            };
            let patch = TaskPatch {
                deadline: Some(deadline),
                ..TaskPatch::default()
            };
            db.update_task(id, &patch, now)?;
            ctx.save_db(&db)?;
            match deadline {
                Some(d) => println!("Task {id} is due {d}"),
                None => println!("Cleared deadline of task {id}"),
            }
        }

        TaskAction::Rm { id } => {
            let t = db.remove_task(id, now)?;
            ctx.save_db(&db)?;
            println!("Deleted task {id}: {}", t.title);
        }

        TaskAction::List { project, task_type, status } => {
            let project_id = db.resolve_project(&project)?;
            let all = db.project_tasks(project_id);
            let active = all.iter().filter(|t| !t.is_done()).count();
            println!("{active} active • {} completed", all.len() - active);
            let counts: Vec<String> = TaskType::ALL
                .iter()
                .map(|ty| {
                    let n = all.iter().filter(|t| t.task_type == *ty).count();
                    format!("{}: {n}", format_task_type(*ty))
                })
                .collect();
            println!("{}", counts.join("  "));
            println!();

            let (mut open, done): (Vec<_>, Vec<_>) = all
                .into_iter()
                .filter(|t| task_type.map_or(true, |ty| t.task_type == ty))
                .filter(|t| status.map_or(true, |s| t.status == s))
                .partition(|t| !t.is_done());
            open.extend(done);
            if open.is_empty() {
                println!("No tasks found.");
            } else {
                print_task_table(&open);
            }
        }
    }
    Ok(())
}

pub fn cmd_milestone(ctx: &Context, action: MilestoneAction) -> Result<()> {
    let mut db = ctx.load_db()?;
    let now = now_utc();
    match action {
        MilestoneAction::Add { project, input, desc } => {
            let project_id = db.resolve_project(&project)?;
            let parsed = parse_milestone_shorthand(&join_input(&input));
            let id = db.add_milestone(project_id, parsed, now)?;
            if let Some(desc) = desc {
                let patch = MilestonePatch {
                    description: Some(desc),
                    ..MilestonePatch::default()
                };
                db.update_milestone(id, &patch, now)?;
            }
            ctx.save_db(&db)?;
            let m = db.milestone(id)?;
            let due = m
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".into());
            println!("Added milestone {id}: {} (due {due})", m.title);
        }

        MilestoneAction::Edit { id, input } => {
            let parsed = parse_milestone_shorthand(&join_input(&input));
            parsed.validate()?;
            let m = db.update_milestone(id, &MilestonePatch::from_shorthand(parsed), now)?;
            println!("Updated milestone {id}: {}", m.title);
            ctx.save_db(&db)?;
        }

        MilestoneAction::Shorthand { id } => {
            println!("{}", milestone_to_shorthand(db.milestone(id)?));
        }

        MilestoneAction::Toggle { id } => {
            let m = db.toggle_milestone(id, now)?;
            let state = if m.completed { "completed" } else { "open" };
            println!("Milestone {id} is now {state}");
            ctx.save_db(&db)?;
        }

        MilestoneAction::Rm { id } => {
            let m = db.remove_milestone(id, now)?;
            ctx.save_db(&db)?;
            println!("Deleted milestone {id}: {}", m.title);
        }

        MilestoneAction::List { project } => {
            let project_id = db.resolve_project(&project)?;
            let milestones = db.project_milestones(project_id);
            let completed = milestones.iter().filter(|m| m.completed).count();
            println!("{} remaining • {completed} completed", milestones.len() - completed);
            if !milestones.is_empty() {
                println!();
                print_milestone_table(&milestones);
            }
        }
    }
    Ok(())
}

pub fn cmd_note(ctx: &Context, action: NoteAction) -> Result<()> {
    let mut db = ctx.load_db()?;
    let now = now_utc();
    match action {
        NoteAction::Add { project, title, content } => {
            let project_id = db.resolve_project(&project)?;
            let id = db.add_note(project_id, &title, &content, ctx.config.user.author(), now)?;
            ctx.save_db(&db)?;
            println!("Added note {id}");
        }
        NoteAction::Edit { id, title, content } => {
            db.edit_note(id, title.as_deref(), content.as_deref(), now)?;
            ctx.save_db(&db)?;
            println!("Updated note {id}");
        }
        NoteAction::List { project } => {
            let project_id = db.resolve_project(&project)?;
            let notes = db.project_notes(project_id);
            if notes.is_empty() {
                println!("No notes yet.");
            }
            for n in notes {
                let updated = Utc
                    .timestamp_opt(n.updated_at_utc, 0)
                    .single()
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                println!("[{}] {} ({updated})", n.id, n.title);
                for line in n.content.lines() {
                    println!("    {line}");
                }
            }
        }
        NoteAction::Rm { id } => {
            let n = db.remove_note(id, now)?;
            ctx.save_db(&db)?;
            println!("Deleted note {id}: {}", n.title);
        }
    }
    Ok(())
}

pub fn cmd_link(ctx: &Context, action: LinkAction) -> Result<()> {
    let mut db = ctx.load_db()?;
    let now = now_utc();
    match action {
        LinkAction::Add { project, name, url, link_type } => {
            let project_id = db.resolve_project(&project)?;
            let id = db.add_link(project_id, &name, &url, link_type, now)?;
            ctx.save_db(&db)?;
            println!("Added link {id}");
        }
        LinkAction::List { project } => {
            let project_id = db.resolve_project(&project)?;
            println!("{:<5} {:<12} {:<20} {}", "ID", "Type", "Name", "URL");
            for l in db.project_links(project_id) {
                println!(
                    "{:<5} {:<12} {:<20} {}",
                    l.id,
                    format_link_type(l.link_type),
                    truncate(&l.name, 20),
                    l.url
                );
            }
        }
        LinkAction::Rm { id } => {
            let l = db.remove_link(id, now)?;
            ctx.save_db(&db)?;
            println!("Deleted link {id}: {}", l.name);
        }
    }
    Ok(())
}

pub fn cmd_secret(ctx: &Context, action: SecretAction) -> Result<()> {
    let mut db = ctx.load_db()?;
    let now = now_utc();
    match action {
        SecretAction::Add { project, name, value } => {
            let project_id = db.resolve_project(&project)?;
            let id = db.add_secret(project_id, &name, &value, ctx.config.user.author(), now)?;
            ctx.save_db(&db)?;
            println!("Added secret {id}");
        }
        SecretAction::Edit { id, name, value } => {
            db.edit_secret(id, name.as_deref(), value.as_deref(), now)?;
            ctx.save_db(&db)?;
            println!("Updated secret {id}");
        }
        SecretAction::List { project, reveal } => {
            let project_id = db.resolve_project(&project)?;
            println!("{:<5} {:<24} {}", "ID", "Name", "Value");
            for s in db.project_secrets(project_id) {
                let value = if reveal { s.value.clone() } else { s.masked_value() };
                println!("{:<5} {:<24} {}", s.id, truncate(&s.name, 24), value);
            }
        }
        SecretAction::Rm { id } => {
            let s = db.remove_secret(id, now)?;
            ctx.save_db(&db)?;
            println!("Deleted secret {id}: {}", s.name);
        }
    }
    Ok(())
}

pub fn cmd_member(ctx: &Context, action: MemberAction) -> Result<()> {
    let mut db = ctx.load_db()?;
    let now = now_utc();
    match action {
        MemberAction::Invite { project, email, name } => {
            let project_id = db.resolve_project(&project)?;
            let id = db.invite_member(project_id, &email, name.as_deref(), now)?;
            ctx.save_db(&db)?;
            println!("Invited {} as member {id}", email.trim());
        }
        MemberAction::List { project } => {
            let project_id = db.resolve_project(&project)?;
            println!("{:<5} {:<7} {:<24} {}", "ID", "Role", "Name", "Email");
            for m in db.project_members(project_id) {
                let role = match m.role {
                    MemberRole::Owner => "owner",
                    MemberRole::Member => "member",
                };
                println!("{:<5} {:<7} {:<24} {}", m.id, role, truncate(&m.full_name, 24), m.email);
            }
        }
        MemberAction::Rm { id } => {
            let m = db.remove_member(id, now)?;
            ctx.save_db(&db)?;
            println!("Removed {} from the project", m.email);
        }
    }
    Ok(())
}

pub fn cmd_stats(ctx: &Context, project: &str, json: bool) -> Result<()> {
    let db = ctx.load_db()?;
    let id = db.resolve_project(project)?;
    let p = db.project(id)?;
    let stats = db.stats(id);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    println!("{}", p.name);
    println!("Tasks:         {}", progress_bar(stats.task_pct, 20));
    println!("Milestones:    {}", progress_bar(stats.milestone_pct, 20));
    println!("Time spent:    {}", format_time(stats.time_spent_days));
    println!("Time required: {}", format_time(stats.time_required_days));
    println!("Launch:        {}", format_launch(p, Utc::now()));
    Ok(())
}

pub fn cmd_parse(ctx: &Context, action: ParseAction) -> Result<()> {
    let out = match action {
        ParseAction::Task { input } => {
            serde_json::to_string_pretty(&parse_task_shorthand_with(&join_input(&input), &ctx.config.defaults))?
        }
        ParseAction::Milestone { input } => {
            serde_json::to_string_pretty(&parse_milestone_shorthand(&join_input(&input)))?
        }
    };
    println!("{out}");
    Ok(())
}

pub fn cmd_template(action: TemplateAction) -> Result<()> {
    match action {
        TemplateAction::List => {
            println!("{:<12} {:<6} {:<11} {}", "Key", "Tasks", "Milestones", "Name");
            for t in BUILTIN {
                println!("{:<12} {:<6} {:<11} {}", t.key, t.tasks.len(), t.milestones.len(), t.name);
            }
        }
        TemplateAction::Show { name } => {
            let t = find_template(&name)?;
            println!("{}", t.name);
            println!("{}", t.description);
            println!();
            println!("{:<6} {:<7} {:<9} {}", "Due", "Pri", "Duration", "Task");
            for task in t.tasks {
                println!(
                    "{:<6} {:<7} {:<9} {}",
                    format!("+{}d", task.deadline_in_days),
                    format_priority(task.priority),
                    format!("{}d", task.duration_days),
                    task.title
                );
            }
            println!();
            for m in t.milestones {
                println!("+{}d  {}", m.due_in_days, m.title);
            }
            println!();
            println!("Total estimate: {} days", t.total_days());
        }
    }
    Ok(())
}

pub fn cmd_config(ctx: &mut Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("home:     {}", ctx.home.display());
            println!("database: {}", ctx.db_path.display());
            println!("{}", serde_json::to_string_pretty(&ctx.config)?);
        }
        ConfigAction::SetUser { name, email } => {
            if let Some(name) = name {
                ctx.config.user.name = name.trim().to_string();
            }
            if let Some(email) = email {
                ctx.config.user.email = email.trim().to_string();
            }
            ctx.config.save(&ctx.home)?;
            tracing::info!(name = %ctx.config.user.name, "updated user config");
            println!("User: {} <{}>", ctx.config.user.name, ctx.config.user.email);
        }
        ConfigAction::SetDefault { task_type, priority } => {
            if let Some(t) = task_type {
                ctx.config.defaults.task_type = t;
            }
            if let Some(p) = priority {
                ctx.config.defaults.priority = p;
            }
            ctx.config.save(&ctx.home)?;
            println!(
                "Defaults: #{} !{}",
                ctx.config.defaults.task_type.as_tag(),
                ctx.config.defaults.priority.as_tag()
            );
        }
    }
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
