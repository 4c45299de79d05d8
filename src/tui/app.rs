//! Project dashboard for the terminal user interface.
//!
//! The `App` struct owns the loaded database and one project id. Keys are
//! routed through [`App::handle_key`], which is independent of the terminal
//! so the dashboard behaviour can be driven from tests. Every change is
//! written to disk before the next frame is drawn.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};

use crate::config::Config;
use crate::db::*;
use crate::error::{Result, ShipError};
use crate::fields::*;
use crate::shorthand::{
    milestone_to_shorthand, parse_milestone_shorthand, parse_task_shorthand_with, task_to_shorthand, TaskDefaults,
};
use crate::stats::format_time;
use crate::task::{Milestone, MilestonePatch, Task, TaskPatch};
use crate::tui::{
    colors::{type_color, DARK_GREEN, DARK_PURPLE, DARK_RED, GOLD},
    enums::{AppState, InputTarget, Pane, TypeFilter},
    input::InputField,
    utils::centered_rect,
};

pub struct App {
    state: AppState,
    db: Database,
    db_path: PathBuf,
    project_id: u64,
    defaults: TaskDefaults,
    author: Option<String>,
    pane: Pane,
    type_filter: TypeFilter,
    task_state: TableState,
    milestone_state: TableState,
    input: InputField,
    input_target: Option<InputTarget>,
    status_message: String,
    confirm_action: Option<String>,
}

fn now_utc() -> i64 {
    Utc::now().timestamp()
}

impl App {
    /// Load the database and open the dashboard on `project_id`.
    pub fn new(db_path: &Path, project_id: u64, config: &Config) -> Result<Self> {
        let db = Database::load(db_path)?;
        db.project(project_id)?;
        let mut app = App {
            state: AppState::Dashboard,
            db,
            db_path: db_path.to_path_buf(),
            project_id,
            defaults: config.defaults,
            author: config.user.author(),
            pane: Pane::Tasks,
            type_filter: TypeFilter::All,
            task_state: TableState::default(),
            milestone_state: TableState::default(),
            input: InputField::new(),
            input_target: None,
            status_message: String::new(),
            confirm_action: None,
        };
        app.clamp_selection();
        Ok(app)
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Tasks shown in the task pane: filtered by the type tab, open ones first.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let (mut open, done): (Vec<&Task>, Vec<&Task>) = self
            .db
            .project_tasks(self.project_id)
            .into_iter()
            .filter(|t| self.type_filter.matches(t.task_type))
            .partition(|t| !t.is_done());
        open.extend(done);
        open
    }

    fn visible_milestones(&self) -> Vec<&Milestone> {
        self.db.project_milestones(self.project_id)
    }

    fn selected_task_id(&self) -> Option<u64> {
        let idx = self.task_state.selected()?;
        self.visible_tasks().get(idx).map(|t| t.id)
    }

    fn selected_milestone_id(&self) -> Option<u64> {
        let idx = self.milestone_state.selected()?;
        self.visible_milestones().get(idx).map(|m| m.id)
    }

    /// Keep each pane's selection inside its list after the list changed.
    fn clamp_selection(&mut self) {
        let tasks = self.visible_tasks().len();
        let milestones = self.visible_milestones().len();
        for (state, len) in [(&mut self.task_state, tasks), (&mut self.milestone_state, milestones)] {
            match (state.selected(), len) {
                (_, 0) => state.select(None),
                (None, _) => state.select(Some(0)),
                (Some(i), n) if i >= n => state.select(Some(n - 1)),
                _ => {}
            }
        }
    }

    fn move_selection(&mut self, down: bool) {
        let len = match self.pane {
            Pane::Tasks => self.visible_tasks().len(),
            Pane::Milestones => self.visible_milestones().len(),
        };
        let state = match self.pane {
            Pane::Tasks => &mut self.task_state,
            Pane::Milestones => &mut self.milestone_state,
        };
        if len == 0 {
            return;
        }
        let i = state.selected().unwrap_or(0);
        let next = if down { (i + 1).min(len - 1) } else { i.saturating_sub(1) };
        state.select(Some(next));
    }

    fn save_db(&mut self) -> Result<()> {
        self.db.save(&self.db_path)?;
        self.clamp_selection();
        Ok(())
    }

    fn start_input(&mut self, target: InputTarget, prefill: &str) {
        self.input = InputField::with_value(prefill);
        self.input_target = Some(target);
        self.state = AppState::Input;
    }

    /// Route one key press. Returns true when the dashboard should close.
    pub fn handle_key(&mut self, key: KeyCode) -> Result<bool> {
        self.status_message.clear();
        match self.state {
            AppState::Dashboard => self.handle_dashboard_key(key),
            AppState::Input => {
                self.handle_input_key(key)?;
                Ok(false)
            }
            AppState::Help => {
                self.state = AppState::Dashboard;
                Ok(false)
            }
            AppState::Confirm => {
                self.handle_confirm_key(key)?;
                Ok(false)
            }
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) -> Result<bool> {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Tab | KeyCode::BackTab => self.pane = self.pane.other(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            KeyCode::Char('t') => {
                self.type_filter = self.type_filter.next();
                self.task_state.select(None);
                self.clamp_selection();
            }
            KeyCode::Char('a') => match self.pane {
                Pane::Tasks => self.start_input(InputTarget::AddTask, ""),
                Pane::Milestones => self.start_input(InputTarget::AddMilestone, ""),
            },
            KeyCode::Char('e') => self.start_edit()?,
            KeyCode::Char(' ') => self.toggle_selected()?,
            KeyCode::Char('d') => {
                let label = match self.pane {
                    Pane::Tasks => self.selected_task_id().and_then(|id| self.db.task(id).ok()).map(|t| t.title.clone()),
                    Pane::Milestones => self
                        .selected_milestone_id()
                        .and_then(|id| self.db.milestone(id).ok())
                        .map(|m| m.title.clone()),
                };
                if let Some(title) = label {
                    self.confirm_action = Some(format!("Delete '{title}'"));
                    self.state = AppState::Confirm;
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn start_edit(&mut self) -> Result<()> {
        match self.pane {
            Pane::Tasks => {
                if let Some(id) = self.selected_task_id() {
                    let text = task_to_shorthand(self.db.task(id)?);
                    self.start_input(InputTarget::EditTask(id), &text);
                }
            }
            Pane::Milestones => {
                if let Some(id) = self.selected_milestone_id() {
                    let text = milestone_to_shorthand(self.db.milestone(id)?);
                    self.start_input(InputTarget::EditMilestone(id), &text);
                }
            }
        }
        Ok(())
    }

    fn toggle_selected(&mut self) -> Result<()> {
        let now = now_utc();
        match self.pane {
            Pane::Tasks => {
                if let Some(id) = self.selected_task_id() {
                    let status = self.db.toggle_task(id, now)?.status;
                    self.status_message = format!("Task marked {}", format_status(status));
                }
            }
            Pane::Milestones => {
                if let Some(id) = self.selected_milestone_id() {
                    let done = self.db.toggle_milestone(id, now)?.completed;
                    let msg = if done { "Milestone completed" } else { "Milestone reopened" };
                    self.status_message = msg.to_string();
                }
            }
        }
        self.save_db()
    }

    fn handle_input_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Esc => {
                self.input_target = None;
                self.state = AppState::Dashboard;
            }
            KeyCode::Enter => match self.submit_input() {
                Ok(()) => {
                    self.input_target = None;
                    self.state = AppState::Dashboard;
                }
                Err(e @ (ShipError::Io(_) | ShipError::Json(_))) => return Err(e),
                // Stay in the prompt so the line can be fixed.
                Err(e) => self.status_message = e.to_string(),
            },
            KeyCode::Char(c) => self.input.handle_char(c),
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
        Ok(())
    }

    fn submit_input(&mut self) -> Result<()> {
        let Some(target) = self.input_target else {
            return Ok(());
        };
        let now = now_utc();
        let text = self.input.value.clone();
        match target {
            InputTarget::AddTask => {
                let parsed = parse_task_shorthand_with(&text, &self.defaults);
                let id = self.db.add_task(self.project_id, parsed, self.author.clone(), now)?;
                self.status_message = format!("Added task {id}");
            }
            InputTarget::EditTask(id) => {
                let parsed = parse_task_shorthand_with(&text, &self.defaults);
                parsed.validate()?;
                self.db.update_task(id, &TaskPatch::from_shorthand(parsed), now)?;
                self.status_message = format!("Updated task {id}");
            }
            InputTarget::AddMilestone => {
                let parsed = parse_milestone_shorthand(&text);
                let id = self.db.add_milestone(self.project_id, parsed, now)?;
                self.status_message = format!("Added milestone {id}");
            }
            InputTarget::EditMilestone(id) => {
                let parsed = parse_milestone_shorthand(&text);
                parsed.validate()?;
                self.db.update_milestone(id, &MilestonePatch::from_shorthand(parsed), now)?;
                self.status_message = format!("Updated milestone {id}");
            }
        }
        self.save_db()
    }

    fn handle_confirm_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let now = now_utc();
                match self.pane {
                    Pane::Tasks => {
                        if let Some(id) = self.selected_task_id() {
                            self.db.remove_task(id, now)?;
                        }
                    }
                    Pane::Milestones => {
                        if let Some(id) = self.selected_milestone_id() {
                            self.db.remove_milestone(id, now)?;
                        }
                    }
                }
                self.save_db()?;
                self.status_message = "Deleted".to_string();
                self.confirm_action = None;
                self.state = AppState::Dashboard;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_action = None;
                self.state = AppState::Dashboard;
            }
            _ => {}
        }
        Ok(())
    }

    /// Poll for a key event. Returns true if the application should quit.
    fn handle_input(&mut self) -> Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(false);
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    return Ok(true);
                }
                return self.handle_key(key.code);
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ])
            .split(area);

        let stats = self.db.stats(self.project_id);
        let (name, status, launch) = match self.db.project(self.project_id) {
            Ok(p) => (p.name.clone(), format_project_status(p.status), format_launch(p, Utc::now())),
            Err(_) => ("?".to_string(), "", String::new()),
        };
        let info = vec![
            Line::from(vec![
                Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(status, Style::default().fg(Color::Cyan)),
            ]),
            Line::from(launch),
            Line::from(format!(
                "Spent {} • Remaining {}",
                format_time(stats.time_spent_days),
                format_time(stats.time_required_days)
            )),
        ];
        f.render_widget(
            Paragraph::new(info).block(Block::default().borders(Borders::ALL).title("Project")),
            chunks[0],
        );

        let gauge = |title: &'static str, pct: u8, color: Color| {
            Gauge::default()
                .block(Block::default().borders(Borders::ALL).title(title))
                .gauge_style(Style::default().fg(color))
                .percent(u16::from(pct))
                .label(format!("{pct}%"))
        };
        f.render_widget(gauge("Tasks", stats.task_pct, DARK_GREEN), chunks[1]);
        f.render_widget(gauge("Milestones", stats.milestone_pct, DARK_PURPLE), chunks[2]);
    }

    fn render_tasks(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let tab_titles = std::iter::once("All")
            .chain(TaskType::ALL.iter().map(|t| format_task_type(*t)))
            .collect::<Vec<_>>();
        let selected_tab = match self.type_filter {
            TypeFilter::All => 0,
            TypeFilter::Only(t) => TaskType::ALL.iter().position(|x| *x == t).map_or(0, |i| i + 1),
        };
        f.render_widget(
            Tabs::new(tab_titles)
                .select(selected_tab)
                .highlight_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            chunks[0],
        );

        let today = Local::now().date_naive();
        let tasks = self.visible_tasks();
        let active = tasks.iter().filter(|t| !t.is_done()).count();
        let title = format!("Tasks  {active} active • {} completed", tasks.len() - active);
        let rows: Vec<Row> = tasks
            .iter()
            .map(|t| {
                let style = match t.status {
                    Status::Done => Style::default().fg(Color::DarkGray),
                    Status::InProgress => Style::default().add_modifier(Modifier::BOLD),
                    Status::Todo => Style::default().fg(Color::White),
                };
                let mark = match t.status {
                    Status::Done => "[x]",
                    Status::InProgress => "[~]",
                    Status::Todo => "[ ]",
                };
                let pri_style = match t.priority {
                    Priority::High => Style::default().fg(GOLD),
                    _ => Style::default(),
                };
                Row::new(vec![
                    Cell::from(mark),
                    Cell::from(t.title.clone()),
                    Cell::from(format_task_type(t.task_type)).style(Style::default().fg(type_color(t.task_type))),
                    Cell::from(format_priority(t.priority)).style(pri_style),
                    Cell::from(t.duration.clone().unwrap_or_else(|| "-".into())),
                    Cell::from(format_due_relative(t.deadline, today)),
                ])
                .style(style)
            })
            .collect();

        let header = Row::new(["", "Title", "Type", "Pri", "Duration", "Deadline"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }));
        let widths = [
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Length(11),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(9),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(self.pane_block(Pane::Tasks, title))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");
        f.render_stateful_widget(table, chunks[1], &mut self.task_state);
    }

    fn render_milestones(&mut self, f: &mut Frame, area: Rect) {
        let now = Utc::now();
        let milestones = self.visible_milestones();
        let completed = milestones.iter().filter(|m| m.completed).count();
        let title = format!("Milestones  {} remaining • {completed} completed", milestones.len() - completed);
        let rows: Vec<Row> = milestones
            .iter()
            .map(|m| {
                let due = m
                    .due_date
                    .map(|d| crate::stats::format_relative_date(d, now))
                    .unwrap_or_else(|| "-".into());
                let style = if m.completed {
                    Style::default().fg(DARK_GREEN)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    Cell::from(if m.completed { "[x]" } else { "[ ]" }),
                    Cell::from(m.title.clone()),
                    Cell::from(due),
                ])
                .style(style)
            })
            .collect();
        let widths = [Constraint::Length(3), Constraint::Min(15), Constraint::Length(12)];
        let table = Table::new(rows, widths)
            .block(self.pane_block(Pane::Milestones, title))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");
        f.render_stateful_widget(table, area, &mut self.milestone_state);
    }

    fn pane_block(&self, pane: Pane, title: String) -> Block<'static> {
        let border = if self.pane == pane && self.state == AppState::Dashboard {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };
        Block::default().borders(Borders::ALL).border_style(border).title(title)
    }

    fn render_input(&self, f: &mut Frame, area: Rect) {
        let (title, text) = match (self.state, self.input_target) {
            (AppState::Input, Some(target)) => (target.label(), self.input.value.as_str()),
            _ => ("Shorthand", "a: add  e: edit  space: toggle  d: delete  tab: switch pane"),
        };
        let style = if self.state == AppState::Input {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        f.render_widget(
            Paragraph::new(text)
                .style(style)
                .block(Block::default().borders(Borders::ALL).title(title)),
            area,
        );
        if self.state == AppState::Input {
            let x = area.x + 1 + self.input.cursor.min(area.width.saturating_sub(3) as usize) as u16;
            f.set_cursor_position((x, area.y + 1));
        }
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(Span::styled("Dashboard", bold)),
            Line::from("  j/k, arrows  Move selection"),
            Line::from("  Tab          Switch between tasks and milestones"),
            Line::from("  a            Add with shorthand"),
            Line::from("  e            Edit selected as shorthand"),
            Line::from("  Space        Toggle done / completed"),
            Line::from("  d            Delete selected"),
            Line::from("  t            Cycle task type filter"),
            Line::from("  h/F1         Show this help"),
            Line::from("  q/Esc/Ctrl+C Quit"),
            Line::from(""),
            Line::from(Span::styled("Task shorthand", bold)),
            Line::from("  #bug #feature #improvement #general"),
            Line::from("  !high !medium !low"),
            Line::from("  in:30m in:4h in:2.5d in:1w"),
            Line::from(""),
            Line::from(Span::styled("Milestone shorthand", bold)),
            Line::from("  by:2024-06-01   or   in:2w"),
        ];
        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(help_text)
                .block(Block::default().borders(Borders::ALL).title("Help - Press any key to return"))
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    /// Render a confirmation dialog for destructive actions.
    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.confirm_action.as_deref().unwrap_or(""),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        f.render_widget(
            Paragraph::new(text)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::Dashboard => "Press 'h' for help".to_string(),
                AppState::Input => "Enter to save, Esc to cancel".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
            }
        };
        f.render_widget(
            Paragraph::new(text).style(Style::default().bg(DARK_PURPLE).fg(Color::White)),
            area,
        );
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(chunks[1]);
        self.render_tasks(f, body[0]);
        self.render_milestones(f, body[1]);
        self.render_input(f, chunks[2]);

        match self.state {
            AppState::Help => self.render_help(f, chunks[1]),
            AppState::Confirm => self.render_confirm(f, chunks[1]),
            AppState::Dashboard | AppState::Input => {}
        }

        self.render_status_bar(f, chunks[3]);
    }

    /// Main event loop: draw, then handle one key, until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shorthand::parse_task_shorthand;

    fn setup() -> (tempfile::TempDir, PathBuf, u64) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ship.json");
        let mut db = Database::default();
        let id = db.create_project("Rocket", &Config::default().user, 1).unwrap();
        db.add_task(id, parse_task_shorthand("Existing task"), None, 1).unwrap();
        db.save(&path).unwrap();
        (dir, path, id)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c)).unwrap();
        }
    }

    #[test]
    fn test_add_task_with_shorthand_saves_immediately() {
        let (_dir, path, id) = setup();
        let mut app = App::new(&path, id, &Config::default()).unwrap();

        app.handle_key(KeyCode::Char('a')).unwrap();
        assert_eq!(app.state(), AppState::Input);
        type_text(&mut app, "Fix login bug #bug !high in:2d");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(app.state(), AppState::Dashboard);

        let on_disk = Database::load(&path).unwrap();
        let task = on_disk.tasks.iter().find(|t| t.title == "Fix login bug").unwrap();
        assert_eq!(task.task_type, TaskType::Bug);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.duration.as_deref(), Some("2 days"));
    }

    #[test]
    fn test_empty_title_keeps_prompt_open() {
        let (_dir, path, id) = setup();
        let mut app = App::new(&path, id, &Config::default()).unwrap();
        app.handle_key(KeyCode::Char('a')).unwrap();
        type_text(&mut app, "#bug !high");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(app.state(), AppState::Input);
        assert!(app.status_message().contains("empty"));
        assert_eq!(app.database().tasks.len(), 1);
    }

    #[test]
    fn test_toggle_and_delete_selected_task() {
        let (_dir, path, id) = setup();
        let mut app = App::new(&path, id, &Config::default()).unwrap();

        app.handle_key(KeyCode::Char(' ')).unwrap();
        assert_eq!(app.database().tasks[0].status, Status::Done);
        assert_eq!(Database::load(&path).unwrap().tasks[0].status, Status::Done);

        app.handle_key(KeyCode::Char('d')).unwrap();
        assert_eq!(app.state(), AppState::Confirm);
        app.handle_key(KeyCode::Char('n')).unwrap();
        assert_eq!(app.database().tasks.len(), 1);

        app.handle_key(KeyCode::Char('d')).unwrap();
        app.handle_key(KeyCode::Char('y')).unwrap();
        assert!(app.database().tasks.is_empty());
        assert!(Database::load(&path).unwrap().tasks.is_empty());
    }

    #[test]
    fn test_edit_prefills_shorthand() {
        let (_dir, path, id) = setup();
        let mut app = App::new(&path, id, &Config::default()).unwrap();
        app.handle_key(KeyCode::Char('e')).unwrap();
        assert_eq!(app.input.value, "Existing task !low #general");

        app.handle_key(KeyCode::End).unwrap();
        type_text(&mut app, " in:1w");
        app.handle_key(KeyCode::Enter).unwrap();
        let task = &app.database().tasks[0];
        assert_eq!(task.title, "Existing task");
        assert_eq!(task.duration.as_deref(), Some("1 week"));
    }

    #[test]
    fn test_milestone_pane() {
        let (_dir, path, id) = setup();
        let mut app = App::new(&path, id, &Config::default()).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        app.handle_key(KeyCode::Char('a')).unwrap();
        type_text(&mut app, "Public launch by:2030-03-01");
        app.handle_key(KeyCode::Enter).unwrap();

        app.handle_key(KeyCode::Char(' ')).unwrap();
        let m = &Database::load(&path).unwrap().milestones[0];
        assert_eq!(m.title, "Public launch");
        assert!(m.completed);
    }

    #[test]
    fn test_type_filter_hides_other_types() {
        let (_dir, path, id) = setup();
        let mut app = App::new(&path, id, &Config::default()).unwrap();
        app.handle_key(KeyCode::Char('a')).unwrap();
        type_text(&mut app, "Crash on save #bug");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(app.visible_tasks().len(), 2);

        app.handle_key(KeyCode::Char('t')).unwrap();
        let titles: Vec<&str> = app.visible_tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Crash on save"]);
    }

    #[test]
    fn test_quit_keys() {
        let (_dir, path, id) = setup();
        let mut app = App::new(&path, id, &Config::default()).unwrap();
        app.handle_key(KeyCode::Char('h')).unwrap();
        assert_eq!(app.state(), AppState::Help);
        assert!(!app.handle_key(KeyCode::Char('q')).unwrap());
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }
}
