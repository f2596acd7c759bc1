//! taskrank-core: priority scoring and dependency analysis for task batches.
//!
//! ```
//! use chrono::NaiveDate;
//! use taskrank_core::{evaluate, Strategy, Task};
//!
//! let tasks = vec![
//!     Task::new("api", "Fix login bug").with_hours(1.0).with_importance(8.0),
//!     Task::new("docs", "Write docs").with_hours(10.0).with_importance(4.0).with_dependency("api"),
//! ];
//! let today = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
//! let ranked = evaluate(&tasks, Strategy::SmartBalance, None, Some(today));
//! assert_eq!(ranked.tasks[0].title, "Fix login bug");
//! ```

pub mod graph;
pub mod pipeline;
pub mod scoring;
pub mod strategy;
pub mod task;
pub mod time;

pub use graph::{cycle_members, detect_cycles, DependencyGraph};
pub use pipeline::{evaluate, Evaluation, Evaluator, CIRCULAR_DEPENDENCY_WARNING};
pub use scoring::{
    dependency_score, effort_score, explain, importance_score, score_task, urgency_for_days,
    urgency_score, PriorityScore,
};
pub use strategy::{Strategy, UnknownStrategy, Weights};
pub use task::{ScoreBreakdown, ScoredTask, Task, TaskId};
pub use time::{Clock, FixedClock, SystemClock};
