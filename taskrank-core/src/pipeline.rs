//! Evaluation pipeline: cycle detection → per-task scoring → stable sort.
//!
//! One call is a pure batch computation over the tasks it is given. Nothing
//! here fails: bad fields degrade to defaults or zero scores, and tasks
//! without a title are dropped from the output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::graph::{cycle_members, DependencyGraph};
use crate::scoring::score_task;
use crate::strategy::{Strategy, Weights};
use crate::task::{ScoredTask, Task, TaskId, DEFAULT_ESTIMATED_HOURS, DEFAULT_IMPORTANCE};
use crate::time::{Clock, SystemClock};

pub const CIRCULAR_DEPENDENCY_WARNING: &str = " (warning: circular dependency detected)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Sorted by `priority_score`, highest first; ties keep input order.
    pub tasks: Vec<ScoredTask>,
    /// Each cycle as a list of batch positions.
    pub cycles: Vec<Vec<usize>>,
    pub strategy: Strategy,
    pub custom_weights: bool,
    pub reference_date: NaiveDate,
}

impl Evaluation {
    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    /// The `n` highest-priority tasks (fewer if the batch is smaller).
    pub fn top(&self, n: usize) -> &[ScoredTask] {
        &self.tasks[..n.min(self.tasks.len())]
    }
}

/// Pipeline bound to a reference clock.
#[derive(Debug, Clone, Default)]
pub struct Evaluator<C: Clock> {
    clock: C,
}

impl<C: Clock> Evaluator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn evaluate(&self, tasks: &[Task], strategy: Strategy, weights: Option<&Weights>) -> Evaluation {
        evaluate_on(tasks, strategy, weights, self.clock.today())
    }
}

/// Score and rank `tasks`. Without a reference date, "today" is the current
/// UTC date, which makes results depend on when they are computed.
pub fn evaluate(
    tasks: &[Task],
    strategy: Strategy,
    weights: Option<&Weights>,
    reference_date: Option<NaiveDate>,
) -> Evaluation {
    let today = reference_date.unwrap_or_else(|| SystemClock::utc().today());
    evaluate_on(tasks, strategy, weights, today)
}

fn evaluate_on(tasks: &[Task], strategy: Strategy, weights: Option<&Weights>, today: NaiveDate) -> Evaluation {
    let resolved = strategy.resolve(weights);

    // The graph covers the whole batch, titled or not: dropped tasks still
    // block and are blocked.
    let graph = DependencyGraph::build(tasks);
    let cycles = graph.find_cycles();
    let in_cycle = cycle_members(&cycles);
    if !cycles.is_empty() {
        tracing::warn!(cycles = cycles.len(), tasks = in_cycle.len(), "circular dependencies detected");
    }

    let mut scored: Vec<ScoredTask> = Vec::with_capacity(tasks.len());
    let mut skipped = 0usize;

    for (pos, task) in tasks.iter().enumerate() {
        let Some(title) = task.display_title() else {
            skipped += 1;
            continue;
        };

        let p = score_task(task, graph.dependents_of(pos), &resolved, today);
        let circular = in_cycle.contains(&pos);
        let mut explanation = p.explanation;
        if circular {
            explanation.push_str(CIRCULAR_DEPENDENCY_WARNING);
        }

        scored.push(ScoredTask {
            id: task.id.clone().unwrap_or(TaskId::from(pos)),
            title: title.to_string(),
            due_date: task.due_date.clone(),
            estimated_hours: task.estimated_hours.unwrap_or(DEFAULT_ESTIMATED_HOURS),
            importance: task.importance.unwrap_or(DEFAULT_IMPORTANCE),
            dependencies: task.dependencies.clone(),
            priority_score: p.score,
            score_breakdown: p.breakdown,
            explanation,
            circular_dependency: circular,
        });
    }

    // Vec::sort_by is stable.
    scored.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));

    tracing::debug!(
        strategy = %strategy,
        custom_weights = weights.is_some(),
        %today,
        scored = scored.len(),
        skipped,
        "evaluated task batch"
    );

    Evaluation {
        tasks: scored,
        cycles,
        strategy,
        custom_weights: weights.is_some(),
        reference_date: today,
    }
}
