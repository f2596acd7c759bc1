//! Task model for the priority engine.
//!
//! `Task` is the engine input (lenient: every field but the batch position is
//! optional). `ScoredTask` is the normalized, scored copy the pipeline emits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default effort when a task carries no estimate.
pub const DEFAULT_ESTIMATED_HOURS: f64 = 8.0;

/// Default importance rating when a task carries none.
pub const DEFAULT_IMPORTANCE: f64 = 5.0;

/// Stable task identifier. Either an integer or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Int(i64),
    Str(String),
}

impl TaskId {
    /// The value as a batch position, if it can be one.
    pub fn as_position(&self) -> Option<usize> {
        match self {
            TaskId::Int(n) => usize::try_from(*n).ok(),
            TaskId::Str(_) => None,
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Int(n)
    }
}

impl From<usize> for TaskId {
    fn from(n: usize) -> Self {
        TaskId::Int(n as i64)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Str(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId::Str(s)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Int(n) => write!(f, "{n}"),
            TaskId::Str(s) => f.write_str(s),
        }
    }
}

/// Engine input record.
///
/// Missing fields are filled with defaults when the pipeline builds its
/// normalized copy; the engine never mutates these.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,

    #[serde(default)]
    pub title: Option<String>,

    /// `YYYY-MM-DD`. Kept as text: a malformed value scores zero urgency
    /// instead of failing the batch.
    #[serde(default)]
    pub due_date: Option<String>,

    #[serde(default)]
    pub estimated_hours: Option<f64>,

    /// 1-10. Non-finite values stand for "not a number" and score zero.
    #[serde(default)]
    pub importance: Option<f64>,

    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// A task with a title but no declared id (position becomes its id).
    pub fn anonymous(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_due_date(mut self, due: impl Into<String>) -> Self {
        self.due_date = Some(due.into());
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance = Some(importance);
        self
    }

    pub fn with_dependency(mut self, dep: impl Into<TaskId>) -> Self {
        self.dependencies.push(dep.into());
        self
    }

    pub fn with_dependencies<I, D>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<TaskId>,
    {
        self.dependencies.extend(deps.into_iter().map(Into::into));
        self
    }

    /// Title with surrounding whitespace removed, if non-empty.
    pub fn display_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Per-component scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependencies: f64,
}

/// Pipeline output: the normalized task plus its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    pub id: TaskId,
    pub title: String,
    pub due_date: Option<String>,
    pub estimated_hours: f64,
    pub importance: f64,
    pub dependencies: Vec<TaskId>,

    pub priority_score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub explanation: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub circular_dependency: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}
