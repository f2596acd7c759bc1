//! Field-level validation of raw task JSON.
//!
//! The engine tolerates anything; this layer is where hard failures live.
//! Numeric fields accept JSON numbers or numeric strings.

use serde_json::{Map, Value};
use taskrank_core::task::{DEFAULT_ESTIMATED_HOURS, DEFAULT_IMPORTANCE};
use taskrank_core::time::parse_due_date;
use taskrank_core::{Strategy, Task, TaskId, Weights};
use thiserror::Error;

/// Accepted range for the sum of a custom weight vector.
pub const WEIGHT_SUM_RANGE: std::ops::RangeInclusive<f64> = 0.9..=1.1;

const WEIGHT_KEYS: [&str; 4] = ["urgency", "importance", "effort", "dependencies"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Missing required field: tasks")]
    MissingTasks,

    #[error("Tasks must be a list")]
    TasksNotList,

    #[error("Tasks list cannot be empty")]
    EmptyTaskList,

    /// `index` is 1-based.
    #[error("Task {index}: {source}")]
    Task {
        index: usize,
        source: Box<ValidationError>,
    },

    #[error("Task must be an object")]
    NotAnObject,

    #[error("Task must have a non-empty 'title'")]
    MissingTitle,

    #[error("Invalid date format for 'due_date': {0}. Use YYYY-MM-DD")]
    InvalidDueDate(String),

    #[error("estimated_hours must be greater than 0")]
    NonPositiveHours,

    #[error("estimated_hours must be a number")]
    HoursNotNumeric,

    #[error("importance must be between 1 and 10")]
    ImportanceOutOfRange,

    #[error("importance must be an integer between 1 and 10")]
    ImportanceNotInteger,

    #[error("dependencies must be a list")]
    DependenciesNotList,

    #[error("Invalid strategy '{name}'. Must be one of: {valid}")]
    InvalidStrategy { name: String, valid: String },

    #[error("weights must be an object")]
    WeightsNotObject,

    #[error("weights must contain all keys: urgency, importance, effort, dependencies")]
    MissingWeightKeys,

    #[error("All weight values must be numbers")]
    WeightNotNumeric,

    #[error("weight '{0}' must not be negative")]
    NegativeWeight(&'static str),

    #[error("weights must sum to approximately 1.0 (current sum: {0})")]
    WeightSum(f64),
}

fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Integer conversion the way a user would expect from a form field:
/// numbers truncate, strings must spell an integer.
fn as_integer(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Integers, whole floats and digit-only strings become `TaskId::Int`,
/// other strings stay strings. Anything else cannot name a task.
fn as_task_id(v: &Value) -> Option<TaskId> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .map(TaskId::Int),
        Value::String(s) => {
            let digits = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
            match s.parse::<i64>() {
                Ok(n) if digits => Some(TaskId::Int(n)),
                _ => Some(TaskId::Str(s.clone())),
            }
        }
        _ => None,
    }
}

fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

/// Validate one raw task and build the engine record with defaults applied.
pub fn validate_task(value: &Value) -> Result<Task, ValidationError> {
    let obj = value.as_object().ok_or(ValidationError::NotAnObject)?;

    // A whitespace-only title passes here and is dropped by the engine.
    let title = match obj.get("title") {
        Some(Value::String(s)) if !s.is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => return Err(ValidationError::MissingTitle),
    };

    let due_date = match present(obj, "due_date") {
        None => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => {
            if parse_due_date(s).is_none() {
                return Err(ValidationError::InvalidDueDate(s.clone()));
            }
            Some(s.clone())
        }
        Some(other) => return Err(ValidationError::InvalidDueDate(other.to_string())),
    };

    let estimated_hours = match present(obj, "estimated_hours") {
        None => DEFAULT_ESTIMATED_HOURS,
        Some(v) => {
            let h = as_number(v).ok_or(ValidationError::HoursNotNumeric)?;
            if h <= 0.0 {
                return Err(ValidationError::NonPositiveHours);
            }
            h
        }
    };

    let importance = match present(obj, "importance") {
        None => DEFAULT_IMPORTANCE,
        Some(v) => {
            let i = as_integer(v).ok_or(ValidationError::ImportanceNotInteger)?;
            if !(1..=10).contains(&i) {
                return Err(ValidationError::ImportanceOutOfRange);
            }
            i as f64
        }
    };

    let dependencies = match present(obj, "dependencies") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|d| {
                let id = as_task_id(d);
                if id.is_none() {
                    tracing::debug!(value = %d, "ignoring dependency that cannot name a task");
                }
                id
            })
            .collect(),
        Some(_) => return Err(ValidationError::DependenciesNotList),
    };

    // Tasks without an id are addressed by title.
    let id = present(obj, "id")
        .and_then(as_task_id)
        .unwrap_or_else(|| TaskId::Str(title.clone()));

    Ok(Task {
        id: Some(id),
        title: Some(title),
        due_date,
        estimated_hours: Some(estimated_hours),
        importance: Some(importance),
        dependencies,
    })
}

/// Validate a whole batch. The first bad task aborts with its 1-based index.
pub fn validate_tasks(values: &[Value]) -> Result<Vec<Task>, ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::EmptyTaskList);
    }
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            validate_task(v).map_err(|e| ValidationError::Task {
                index: i + 1,
                source: Box::new(e),
            })
        })
        .collect()
}

/// Strict strategy check; `None` means `default`.
pub fn validate_strategy(name: Option<&str>, default: Strategy) -> Result<Strategy, ValidationError> {
    let Some(name) = name else {
        return Ok(default);
    };
    name.parse().map_err(|_| ValidationError::InvalidStrategy {
        name: name.to_string(),
        valid: Strategy::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Check a custom weight vector: all four keys, numeric, non-negative, and
/// summing to roughly 1.0.
pub fn validate_weights(value: &Value) -> Result<Weights, ValidationError> {
    let obj = value.as_object().ok_or(ValidationError::WeightsNotObject)?;
    if !WEIGHT_KEYS.iter().all(|k| obj.contains_key(*k)) {
        return Err(ValidationError::MissingWeightKeys);
    }

    let mut w = [0.0f64; 4];
    for (slot, key) in w.iter_mut().zip(WEIGHT_KEYS) {
        let v = as_number(&obj[key]).ok_or(ValidationError::WeightNotNumeric)?;
        if v < 0.0 {
            return Err(ValidationError::NegativeWeight(key));
        }
        *slot = v;
    }

    let weights = Weights::new(w[0], w[1], w[2], w[3]);
    let sum = weights.sum();
    if !WEIGHT_SUM_RANGE.contains(&sum) {
        return Err(ValidationError::WeightSum(sum));
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_task_with_defaults() {
        let t = validate_task(&json!({"title": "  Fix login bug  "})).unwrap();
        assert_eq!(t.title.as_deref(), Some("Fix login bug"));
        assert_eq!(t.id, Some(TaskId::from("Fix login bug")));
        assert_eq!(t.estimated_hours, Some(8.0));
        assert_eq!(t.importance, Some(5.0));
        assert!(t.due_date.is_none());
        assert!(t.dependencies.is_empty());
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let t = validate_task(&json!({
            "id": "7",
            "title": "t",
            "estimated_hours": "2.5",
            "importance": "9",
            "dependencies": ["3", "design", 4, null, true]
        }))
        .unwrap();
        assert_eq!(t.id, Some(TaskId::Int(7)));
        assert_eq!(t.estimated_hours, Some(2.5));
        assert_eq!(t.importance, Some(9.0));
        assert_eq!(
            t.dependencies,
            vec![TaskId::Int(3), TaskId::from("design"), TaskId::Int(4)]
        );
    }

    #[test]
    fn test_importance_truncates_floats() {
        let t = validate_task(&json!({"title": "t", "importance": 7.9})).unwrap();
        assert_eq!(t.importance, Some(7.0));
    }

    #[test]
    fn test_missing_title_rejected() {
        assert!(matches!(validate_task(&json!({"importance": 3})), Err(ValidationError::MissingTitle)));
        assert!(matches!(validate_task(&json!({"title": ""})), Err(ValidationError::MissingTitle)));
        assert!(matches!(validate_task(&json!({"title": 0})), Err(ValidationError::MissingTitle)));
        assert!(matches!(validate_task(&json!("just a string")), Err(ValidationError::NotAnObject)));
    }

    #[test]
    fn test_blank_and_numeric_titles() {
        let blank = validate_task(&json!({"title": "   "})).unwrap();
        assert_eq!(blank.title.as_deref(), Some(""));
        assert!(blank.display_title().is_none());

        let numbered = validate_task(&json!({"title": 42})).unwrap();
        assert_eq!(numbered.title.as_deref(), Some("42"));
    }

    #[test]
    fn test_whole_float_dependencies_become_ints() {
        let t = validate_task(&json!({"title": "t", "dependencies": [1.0, 2.5, "3"]})).unwrap();
        assert_eq!(t.dependencies, vec![TaskId::Int(1), TaskId::Int(3)]);
    }

    #[test]
    fn test_padded_due_date_rejected() {
        let err = validate_task(&json!({"title": "t", "due_date": " 2026-02-21 "})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid date format for 'due_date':  2026-02-21 . Use YYYY-MM-DD"
        );
        let ok = validate_task(&json!({"title": "t", "due_date": "2026-02-21"})).unwrap();
        assert_eq!(ok.due_date.as_deref(), Some("2026-02-21"));
    }

    #[test]
    fn test_bad_due_date_rejected() {
        let err = validate_task(&json!({"title": "t", "due_date": "11/30/2025"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid date format for 'due_date': 11/30/2025. Use YYYY-MM-DD"
        );
        let ok = validate_task(&json!({"title": "t", "due_date": null})).unwrap();
        assert!(ok.due_date.is_none());
    }

    #[test]
    fn test_hours_and_importance_ranges() {
        assert!(matches!(
            validate_task(&json!({"title": "t", "estimated_hours": 0})),
            Err(ValidationError::NonPositiveHours)
        ));
        assert!(matches!(
            validate_task(&json!({"title": "t", "estimated_hours": "lots"})),
            Err(ValidationError::HoursNotNumeric)
        ));
        assert!(matches!(
            validate_task(&json!({"title": "t", "importance": 11})),
            Err(ValidationError::ImportanceOutOfRange)
        ));
        assert!(matches!(
            validate_task(&json!({"title": "t", "importance": "high"})),
            Err(ValidationError::ImportanceNotInteger)
        ));
        assert!(matches!(
            validate_task(&json!({"title": "t", "dependencies": "a,b"})),
            Err(ValidationError::DependenciesNotList)
        ));
    }

    #[test]
    fn test_batch_reports_one_based_index() {
        let tasks = vec![json!({"title": "ok"}), json!({"title": ""})];
        let err = validate_tasks(&tasks).unwrap_err();
        assert_eq!(err.to_string(), "Task 2: Task must have a non-empty 'title'");
        assert!(matches!(validate_tasks(&[]), Err(ValidationError::EmptyTaskList)));
    }

    #[test]
    fn test_strategy_validation() {
        assert_eq!(validate_strategy(None, Strategy::HighImpact).unwrap(), Strategy::HighImpact);
        assert_eq!(
            validate_strategy(Some("fastest_wins"), Strategy::SmartBalance).unwrap(),
            Strategy::FastestWins
        );
        let err = validate_strategy(Some("random"), Strategy::SmartBalance).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid strategy 'random'. Must be one of: fastest_wins, high_impact, deadline_driven, smart_balance"
        );
    }

    #[test]
    fn test_weights_validation() {
        let w = validate_weights(&json!({
            "urgency": 0.4, "importance": "0.3", "effort": 0.2, "dependencies": 0.1
        }))
        .unwrap();
        assert_eq!(w, Weights::new(0.4, 0.3, 0.2, 0.1));

        assert!(matches!(
            validate_weights(&json!({"urgency": 1.0})),
            Err(ValidationError::MissingWeightKeys)
        ));
        assert!(matches!(
            validate_weights(&json!({"urgency": 0.5, "importance": 0.5, "effort": 0.5, "dependencies": 0.5})),
            Err(ValidationError::WeightSum(_))
        ));
        assert!(matches!(
            validate_weights(&json!({"urgency": "x", "importance": 0.5, "effort": 0.5, "dependencies": 0.0})),
            Err(ValidationError::WeightNotNumeric)
        ));
        assert!(matches!(
            validate_weights(&json!({"urgency": 1.2, "importance": -0.2, "effort": 0.0, "dependencies": 0.0})),
            Err(ValidationError::NegativeWeight("importance"))
        ));
        assert!(matches!(validate_weights(&json!([1, 2])), Err(ValidationError::WeightsNotObject)));
    }
}
