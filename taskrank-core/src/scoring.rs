//! Priority scoring: four component scores and their weighted combination.
//!
//! Components (each 0-100):
//! - urgency: days until the due date, step table
//! - importance: 1-10 rating scaled by 10
//! - effort: estimated hours, smaller is better ("quick wins")
//! - dependencies: how many other tasks are blocked on this one
//!
//! Bad input never fails a pass; it scores zero.

use chrono::NaiveDate;

use crate::strategy::Weights;
use crate::task::{ScoreBreakdown, Task, DEFAULT_ESTIMATED_HOURS, DEFAULT_IMPORTANCE};
use crate::time::{days_until, parse_due_date};

/// Component scores above these thresholds earn a clause in the explanation.
const URGENCY_CLAUSE: f64 = 70.0;
const IMPORTANCE_CLAUSE: f64 = 70.0;
const EFFORT_CLAUSE: f64 = 70.0;
const DEPENDENCY_CLAUSE: f64 = 50.0;

/// Points per task blocked on this one.
const POINTS_PER_BLOCKED_TASK: f64 = 20.0;

pub const EXPLANATION_PREFIX: &str = "Prioritized due to: ";

/// Urgency for a signed day distance (negative = overdue).
///
/// Beyond 30 days the score is `30 - days/10`, capped at 15 (the 15-30 day
/// band value) and floored at 5, so it never rises as the deadline moves out.
pub fn urgency_for_days(days: i64) -> f64 {
    match days {
        d if d < 0 => (50.0 + d.unsigned_abs() as f64 * 5.0).min(100.0),
        0 => 90.0,
        1 => 80.0,
        2..=3 => 70.0,
        4..=7 => 50.0,
        8..=14 => 30.0,
        15..=30 => 15.0,
        d => (30.0 - d as f64 / 10.0).clamp(5.0, 15.0),
    }
}

/// Urgency for an optional `YYYY-MM-DD` due date. Missing or malformed → 0.
pub fn urgency_score(due_date: Option<&str>, today: NaiveDate) -> f64 {
    let Some(due) = due_date.and_then(parse_due_date) else {
        return 0.0;
    };
    urgency_for_days(days_until(due, today))
}

/// Importance rating (clamped to 1..=10, fractional part dropped) times 10.
pub fn importance_score(rating: f64) -> f64 {
    if !rating.is_finite() {
        return 0.0;
    }
    rating.clamp(1.0, 10.0).trunc() * 10.0
}

/// Effort score: smaller tasks score higher. Non-positive hours → 0.
///
/// Beyond 16 hours the score is `50 - hours/2`, capped at 40 and floored at 10.
pub fn effort_score(hours: f64) -> f64 {
    if !hours.is_finite() || hours <= 0.0 {
        return 0.0;
    }
    match hours {
        h if h <= 1.0 => 100.0,
        h if h <= 2.0 => 90.0,
        h if h <= 4.0 => 75.0,
        h if h <= 8.0 => 60.0,
        h if h <= 16.0 => 40.0,
        h => (50.0 - h / 2.0).clamp(10.0, 40.0),
    }
}

/// Dependency impact for a task that `blocked` other tasks wait on.
pub fn dependency_score(blocked: usize) -> f64 {
    (blocked as f64 * POINTS_PER_BLOCKED_TASK).min(100.0)
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// All four component scores for one task. Missing effort/importance take
/// the engine defaults.
pub fn component_scores(task: &Task, blocked: usize, today: NaiveDate) -> ScoreBreakdown {
    ScoreBreakdown {
        urgency: urgency_score(task.due_date.as_deref(), today),
        importance: importance_score(task.importance.unwrap_or(DEFAULT_IMPORTANCE)),
        effort: effort_score(task.estimated_hours.unwrap_or(DEFAULT_ESTIMATED_HOURS)),
        dependencies: dependency_score(blocked),
    }
}

/// Weighted sum of components, unrounded.
pub fn combine(components: &ScoreBreakdown, weights: &Weights) -> f64 {
    components.urgency * weights.urgency
        + components.importance * weights.importance
        + components.effort * weights.effort
        + components.dependencies * weights.dependencies
}

/// Human-readable reason for a score. Cycle warnings are not added here.
pub fn explain(components: &ScoreBreakdown) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if components.urgency > URGENCY_CLAUSE {
        parts.push("urgent deadline");
    }
    if components.importance > IMPORTANCE_CLAUSE {
        parts.push("high importance");
    }
    if components.effort > EFFORT_CLAUSE {
        parts.push("quick win (low effort)");
    }
    if components.dependencies > DEPENDENCY_CLAUSE {
        parts.push("blocks other tasks");
    }
    if parts.is_empty() {
        parts.push("moderate priority across factors");
    }
    format!("{EXPLANATION_PREFIX}{}", parts.join(", "))
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriorityScore {
    /// Rounded to 2 decimals.
    pub score: f64,
    /// Each component rounded to 2 decimals.
    pub breakdown: ScoreBreakdown,
    pub explanation: String,
}

/// Score one task. `blocked` is the number of other tasks depending on it.
pub fn score_task(task: &Task, blocked: usize, weights: &Weights, today: NaiveDate) -> PriorityScore {
    let c = component_scores(task, blocked, today);
    PriorityScore {
        score: round2(combine(&c, weights)),
        breakdown: ScoreBreakdown {
            urgency: round2(c.urgency),
            importance: round2(c.importance),
            effort: round2(c.effort),
            dependencies: round2(c.dependencies),
        },
        explanation: explain(&c),
    }
}
