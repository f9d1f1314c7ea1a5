use std::fmt;

use chrono::NaiveDate;

use crate::error::FalconError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Todo,
    Deadline { by: NaiveDate },
    Event { at: NaiveDate },
}

impl TaskKind {
    pub fn tag(&self) -> char {
        match self {
            TaskKind::Todo => 'T',
            TaskKind::Deadline { .. } => 'D',
            TaskKind::Event { .. } => 'E',
        }
    }

    /// Command word that creates this kind of task.
    pub fn keyword(&self) -> &'static str {
        match self {
            TaskKind::Todo => "todo",
            TaskKind::Deadline { .. } => "deadline",
            TaskKind::Event { .. } => "event",
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            TaskKind::Todo => None,
            TaskKind::Deadline { by } => Some(*by),
            TaskKind::Event { at } => Some(*at),
        }
    }
}

/// One entry of the task list. The kind is fixed at construction; only the
/// done flag changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    description: String,
    done: bool,
    kind: TaskKind,
}

impl Task {
    pub fn new(description: impl Into<String>, kind: TaskKind) -> Result<Self, FalconError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(FalconError::EmptyDescription(kind.keyword()));
        }
        Ok(Self {
            description,
            done: false,
            kind,
        })
    }

    pub fn todo(description: impl Into<String>) -> Result<Self, FalconError> {
        Self::new(description, TaskKind::Todo)
    }

    pub fn deadline(description: impl Into<String>, by: NaiveDate) -> Result<Self, FalconError> {
        Self::new(description, TaskKind::Deadline { by })
    }

    pub fn event(description: impl Into<String>, at: NaiveDate) -> Result<Self, FalconError> {
        Self::new(description, TaskKind::Event { at })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn mark_done(&mut self) {
        self.done = true;
    }

    pub fn mark_not_done(&mut self) {
        self.done = false;
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    /// Case-sensitive substring match on the description.
    pub fn matches(&self, keyword: &str) -> bool {
        self.description.contains(keyword)
    }

    /// Canonical form, shared by the listing and the storage file.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// The command line that would create this task (done flag aside).
    pub fn to_command(&self) -> String {
        match self.kind {
            TaskKind::Todo => format!("todo {}", self.description),
            TaskKind::Deadline { by } => format!(
                "deadline {} /by {}",
                self.description,
                by.format(DATE_FORMAT)
            ),
            TaskKind::Event { at } => format!(
                "event {} /at {}",
                self.description,
                at.format(DATE_FORMAT)
            ),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.done { 'X' } else { ' ' };
        write!(f, "[{}][{}] {}", self.kind.tag(), mark, self.description)?;
        match self.kind {
            TaskKind::Todo => Ok(()),
            TaskKind::Deadline { by } => write!(f, " (by: {})", by.format(DATE_FORMAT)),
            TaskKind::Event { at } => write!(f, " (at: {})", at.format(DATE_FORMAT)),
        }
    }
}
