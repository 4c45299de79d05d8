//! Enumerations for dashboard state management.

use crate::fields::TaskType;

/// Which screen of the dashboard has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Dashboard,
    Input,
    Help,
    Confirm,
}

/// The list that selection and `a`/`e`/`d`/space act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pane {
    Tasks,
    Milestones,
}

impl Pane {
    pub fn other(self) -> Self {
        match self {
            Pane::Tasks => Pane::Milestones,
            Pane::Milestones => Pane::Tasks,
        }
    }
}

/// Task-type tab shown in the task pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeFilter {
    All,
    Only(TaskType),
}

impl TypeFilter {
    /// Next tab: All, then each type in display order, then back to All.
    pub fn next(self) -> Self {
        match self {
            TypeFilter::All => TypeFilter::Only(TaskType::ALL[0]),
            TypeFilter::Only(t) => {
                let idx = TaskType::ALL.iter().position(|x| *x == t).unwrap_or(0);
                TaskType::ALL
                    .get(idx + 1)
                    .map(|t| TypeFilter::Only(*t))
                    .unwrap_or(TypeFilter::All)
            }
        }
    }

    pub fn matches(self, t: TaskType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(only) => only == t,
        }
    }
}

/// What the shorthand input line will do on Enter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputTarget {
    AddTask,
    EditTask(u64),
    AddMilestone,
    EditMilestone(u64),
}

impl InputTarget {
    pub fn label(self) -> &'static str {
        match self {
            InputTarget::AddTask => "New task  (title #type !priority in:2d)",
            InputTarget::EditTask(_) => "Edit task",
            InputTarget::AddMilestone => "New milestone  (title by:YYYY-MM-DD | in:2w)",
            InputTarget::EditMilestone(_) => "Edit milestone",
        }
    }
}
