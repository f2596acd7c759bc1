//! taskrank-ingest: request decoding, field validation, and the response envelope.

pub mod types;
pub mod validate;

pub use types::{AnalyzeRequest, AnalyzeResponse, ValidatedRequest};
pub use validate::{validate_strategy, validate_task, validate_tasks, validate_weights, ValidationError};
