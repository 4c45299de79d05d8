//! Error type shared by the store, the command handlers and the dashboard.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShipError {
    #[error("title cannot be empty once shorthand tags are removed")]
    EmptyTitle,

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("multiple projects named '{0}', use the numeric id instead")]
    AmbiguousProject(String),

    #[error("task not found: {0}")]
    TaskNotFound(u64),

    #[error("milestone not found: {0}")]
    MilestoneNotFound(u64),

    #[error("note not found: {0}")]
    NoteNotFound(u64),

    #[error("link not found: {0}")]
    LinkNotFound(u64),

    #[error("secret not found: {0}")]
    SecretNotFound(u64),

    #[error("member not found: {0}")]
    MemberNotFound(u64),

    #[error("{0} is already a member of this project")]
    AlreadyMember(String),

    #[error("the project owner cannot be removed")]
    OwnerRemoval,

    #[error("invalid date '{0}': use YYYY-MM-DD, today, tomorrow, a weekday or 'in 3d'")]
    InvalidDate(String),

    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    #[error("no projects yet: create one with 'ship project new <name>'")]
    NoProjects,

    #[error("home directory not found: set HOME or SHIP_HOME")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShipError>;
