use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskrank_core::{evaluate, Evaluation, ScoredTask, Strategy, Task, Weights};

use crate::validate::{validate_strategy, validate_tasks, validate_weights, ValidationError};

/// Raw analyze request, as read from JSON. Nothing is checked yet.
///
/// ```json
/// {
///   "tasks": [{"title": "Fix login bug", "due_date": "2025-11-30", "estimated_hours": 3,
///              "importance": 8, "dependencies": []}],
///   "strategy": "smart_balance",
///   "weights": {"urgency": 0.4, "importance": 0.3, "effort": 0.2, "dependencies": 0.1}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub tasks: Option<Value>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub weights: Option<Value>,
}

/// JSON values that carry nothing: null, false, 0, "", [] and {}.
fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(m) => m.is_empty(),
    }
}

impl AnalyzeRequest {
    pub fn from_json(s: &str) -> Result<Self, ValidationError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Apply all request-level checks. A request without a strategy uses
    /// `default_strategy`; blank weights count as no override.
    pub fn into_validated(self, default_strategy: Strategy) -> Result<ValidatedRequest, ValidationError> {
        let tasks = match self.tasks {
            None => return Err(ValidationError::MissingTasks),
            Some(ref v) if is_blank(v) => return Err(ValidationError::MissingTasks),
            Some(Value::Array(items)) => validate_tasks(&items)?,
            Some(_) => return Err(ValidationError::TasksNotList),
        };

        let strategy = validate_strategy(self.strategy.as_deref(), default_strategy)?;

        let weights = match self.weights {
            Some(ref v) if !is_blank(v) => Some(validate_weights(v)?),
            _ => None,
        };

        Ok(ValidatedRequest {
            tasks,
            strategy,
            weights,
        })
    }
}

/// A request that passed validation; ready for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub tasks: Vec<Task>,
    pub strategy: Strategy,
    pub weights: Option<Weights>,
}

impl ValidatedRequest {
    pub fn evaluate(&self, today: NaiveDate) -> Evaluation {
        evaluate(&self.tasks, self.strategy, self.weights.as_ref(), Some(today))
    }
}

/// Response envelope for an evaluated batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub tasks: Vec<ScoredTask>,
    pub strategy_used: Strategy,
    pub total_tasks: usize,
    pub reference_date: NaiveDate,
    pub warnings: Vec<String>,
}

impl AnalyzeResponse {
    pub fn from_evaluation(eval: &Evaluation) -> Self {
        let mut warnings = Vec::new();
        if eval.cycle_count() > 0 {
            warnings.push(format!(
                "Warning: {} circular dependency cycle(s) detected",
                eval.cycle_count()
            ));
        }
        Self {
            tasks: eval.tasks.clone(),
            strategy_used: eval.strategy,
            total_tasks: eval.tasks.len(),
            reference_date: eval.reference_date,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
    }

    #[test]
    fn test_missing_tasks() {
        let req = AnalyzeRequest::from_json(r#"{"strategy": "high_impact"}"#).unwrap();
        let err = req.into_validated(Strategy::SmartBalance).unwrap_err();
        assert!(matches!(err, ValidationError::MissingTasks));

        let req = AnalyzeRequest::from_json(r#"{"tasks": []}"#).unwrap();
        assert!(matches!(req.into_validated(Strategy::SmartBalance), Err(ValidationError::MissingTasks)));

        let req = AnalyzeRequest::from_json(r#"{"tasks": {"title": "x"}}"#).unwrap();
        assert!(matches!(req.into_validated(Strategy::SmartBalance), Err(ValidationError::TasksNotList)));
    }

    #[test]
    fn test_invalid_json() {
        let err = AnalyzeRequest::from_json("{not json").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidJson(_)));
        assert!(err.to_string().starts_with("Invalid JSON format"));
    }

    #[test]
    fn test_blank_weights_are_no_override() {
        for blank in ["{}", "[]", "null", "false", "0", "\"\""] {
            let body = format!(r#"{{"tasks": [{{"title": "a"}}], "weights": {blank}}}"#);
            let v = AnalyzeRequest::from_json(&body)
                .unwrap()
                .into_validated(Strategy::SmartBalance)
                .unwrap();
            assert!(v.weights.is_none(), "weights {blank} applied");
        }

        let req = AnalyzeRequest::from_json(r#"{"tasks": [{"title": "a"}], "weights": [0.4]}"#).unwrap();
        assert!(matches!(
            req.into_validated(Strategy::SmartBalance),
            Err(ValidationError::WeightsNotObject)
        ));
    }

    #[test]
    fn test_blank_tasks_are_missing() {
        for blank in ["{}", "\"\"", "0", "false"] {
            let body = format!(r#"{{"tasks": {blank}}}"#);
            let req = AnalyzeRequest::from_json(&body).unwrap();
            assert!(matches!(
                req.into_validated(Strategy::SmartBalance),
                Err(ValidationError::MissingTasks)
            ));
        }
    }

    #[test]
    fn test_response_warns_on_cycles() {
        let req = AnalyzeRequest::from_json(
            r#"{"tasks": [
                {"id": 1, "title": "a", "dependencies": [2]},
                {"id": 2, "title": "b", "dependencies": [1]},
                {"id": 3, "title": "c"}
            ]}"#,
        )
        .unwrap();
        let v = req.into_validated(Strategy::SmartBalance).unwrap();
        let resp = AnalyzeResponse::from_evaluation(&v.evaluate(today()));
        assert_eq!(resp.total_tasks, 3);
        assert_eq!(resp.strategy_used, Strategy::SmartBalance);
        assert_eq!(resp.warnings, vec!["Warning: 1 circular dependency cycle(s) detected".to_string()]);
    }

    #[test]
    fn test_response_serializes_flat_fields() {
        let req = AnalyzeRequest::from_json(r#"{"tasks": [{"title": "a"}], "strategy": "fastest_wins"}"#).unwrap();
        let v = req.into_validated(Strategy::SmartBalance).unwrap();
        let resp = AnalyzeResponse::from_evaluation(&v.evaluate(today()));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["strategy_used"], "fastest_wins");
        assert_eq!(json["reference_date"], "2026-02-20");
        assert!(json["warnings"].as_array().unwrap().is_empty());
        let task = &json["tasks"][0];
        assert_eq!(task["id"], "a");
        assert!(task.get("circular_dependency").is_none());
        assert!(task["score_breakdown"]["urgency"].is_number());
    }
}
