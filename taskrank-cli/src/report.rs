//! Plain-text rendering of ranked tasks.

use taskrank_core::{Evaluation, ScoredTask};
use taskrank_ingest::AnalyzeResponse;

fn task_line(out: &mut String, rank: usize, t: &ScoredTask) {
    let due = t.due_date.as_deref().unwrap_or("-");
    out.push_str(&format!(
        "{rank:>2}. [{:>6.2}] {} | due {} | {}h | importance {}\n",
        t.priority_score, t.title, due, t.estimated_hours, t.importance
    ));
}

pub fn render_ranking(resp: &AnalyzeResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# {} tasks ranked by {} (as of {})\n\n",
        resp.total_tasks, resp.strategy_used, resp.reference_date
    ));

    for (i, t) in resp.tasks.iter().enumerate() {
        task_line(&mut out, i + 1, t);
        let b = &t.score_breakdown;
        out.push_str(&format!(
            "      urgency={:.2} importance={:.2} effort={:.2} dependencies={:.2}\n",
            b.urgency, b.importance, b.effort, b.dependencies
        ));
    }

    if !resp.warnings.is_empty() {
        out.push('\n');
        for w in &resp.warnings {
            out.push_str(&format!("! {w}\n"));
        }
    }
    out
}

pub fn render_suggestions(eval: &Evaluation, limit: usize) -> String {
    let mut out = String::new();
    let top = eval.top(limit);
    out.push_str(&format!("# Work on these next ({})\n\n", eval.strategy));
    if top.is_empty() {
        out.push_str("(no tasks)\n");
        return out;
    }
    for (i, t) in top.iter().enumerate() {
        task_line(&mut out, i + 1, t);
        out.push_str(&format!("      {}\n", t.explanation));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use taskrank_core::{evaluate, Strategy, Task};

    fn evaluation() -> Evaluation {
        let tasks = vec![
            Task::new("a", "Fix login bug").with_due_date("2026-02-21").with_hours(2.0).with_importance(8.0),
            Task::new("b", "Loop").with_dependency("c"),
            Task::new("c", "Back").with_dependency("b"),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        evaluate(&tasks, Strategy::SmartBalance, None, Some(today))
    }

    #[test]
    fn test_ranking_lists_every_task_and_warnings() {
        let s = render_ranking(&AnalyzeResponse::from_evaluation(&evaluation()));
        assert!(s.starts_with("# 3 tasks ranked by smart_balance (as of 2026-02-20)"));
        assert!(s.contains(" 1. ["));
        assert!(s.contains("Fix login bug | due 2026-02-21 | 2h | importance 8"));
        assert!(s.contains("! Warning: 1 circular dependency cycle(s) detected"));
    }

    #[test]
    fn test_suggestions_respect_limit() {
        let s = render_suggestions(&evaluation(), 1);
        assert!(s.contains("Fix login bug"));
        assert!(!s.contains("Loop"));
        assert!(s.contains("Prioritized due to:"));
    }
}
