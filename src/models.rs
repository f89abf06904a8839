use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Opaque task identifier. Freshly generated ids are UUID v4 text, but any
/// string read back from storage is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Focus,
    Flow,
    Spark,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Focus, Priority::Flow, Priority::Spark];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Flow => "flow",
            Self::Spark => "spark",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Focus => "Focus",
            Self::Flow => "Flow",
            Self::Spark => "Spark",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant::new("priority", s))
    }
}

/// Position of a task in the linear `queued -> in-progress -> complete` progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Queued,
    InProgress,
    Complete,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Queued, Status::InProgress, Status::Complete];

    /// The following state, or `None` at the terminal state.
    pub const fn next(self) -> Option<Status> {
        match self {
            Self::Queued => Some(Self::InProgress),
            Self::InProgress => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in-progress",
            Self::Complete => "complete",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::InProgress => "In progress",
            Self::Complete => "Complete",
        }
    }
}

impl FromStr for Status {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant::new("status", s))
    }
}

/// The single primary action a task card exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NextAction {
    Advance,
    Reset,
}

impl NextAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Advance => "Advance",
            Self::Reset => "Reset to queued",
        }
    }
}

/// Terminal state resets, every other state advances.
pub const fn next_action(status: Status) -> NextAction {
    match status.next() {
        Some(_) => NextAction::Advance,
        None => NextAction::Reset,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub note: String,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterSelection {
    #[default]
    All,
    Queued,
    InProgress,
    Complete,
}

impl FilterSelection {
    pub const ALL: [FilterSelection; 4] = [
        FilterSelection::All,
        FilterSelection::Queued,
        FilterSelection::InProgress,
        FilterSelection::Complete,
    ];

    /// The status this selection narrows to; `None` for `all`.
    pub const fn status(self) -> Option<Status> {
        match self {
            Self::All => None,
            Self::Queued => Some(Status::Queued),
            Self::InProgress => Some(Status::InProgress),
            Self::Complete => Some(Status::Complete),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self.status() {
            Some(status) => status.as_str(),
            None => "all",
        }
    }

    pub const fn label(self) -> &'static str {
        match self.status() {
            Some(status) => status.label(),
            None => "All",
        }
    }
}

impl FromStr for FilterSelection {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant::new("filter", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub priority: Priority,
}

/// Form body posted by the page's creation form.
#[derive(Debug, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct FilterForm {
    pub filter: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct BoardQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub queued: usize,
    pub active: usize,
    pub completed: usize,
    pub focus_count: usize,
    pub completion_rate: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCard {
    #[serde(flatten)]
    pub task: Task,
    pub next_action: NextAction,
}

impl From<&Task> for TaskCard {
    fn from(task: &Task) -> Self {
        Self {
            task: task.clone(),
            next_action: next_action(task.status),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub revision: u64,
    pub filter: FilterSelection,
    pub stats: TaskStats,
    pub tasks: Vec<TaskCard>,
    pub timeline: Vec<Task>,
}
