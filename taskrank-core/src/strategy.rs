//! Weighting strategies.
//!
//! A strategy binds a fixed weight vector. Caller-supplied `Weights` replace
//! the vector wholesale; the two are never blended.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Per-component weights. By convention they sum to ~1.0; the engine does not
/// check this (the ingest layer does).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependencies: f64,
}

impl Weights {
    pub const fn new(urgency: f64, importance: f64, effort: f64, dependencies: f64) -> Self {
        Self {
            urgency,
            importance,
            effort,
            dependencies,
        }
    }

    pub fn sum(&self) -> f64 {
        self.urgency + self.importance + self.effort + self.dependencies
    }
}

impl Default for Weights {
    fn default() -> Self {
        Strategy::SmartBalance.weights()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    FastestWins,
    HighImpact,
    DeadlineDriven,
    #[default]
    SmartBalance,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::FastestWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
        Strategy::SmartBalance,
    ];

    pub fn weights(self) -> Weights {
        match self {
            Strategy::SmartBalance => Weights::new(0.35, 0.30, 0.20, 0.15),
            Strategy::FastestWins => Weights::new(0.20, 0.20, 0.50, 0.10),
            Strategy::HighImpact => Weights::new(0.20, 0.60, 0.10, 0.10),
            Strategy::DeadlineDriven => Weights::new(0.70, 0.15, 0.10, 0.05),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::FastestWins => "fastest_wins",
            Strategy::HighImpact => "high_impact",
            Strategy::DeadlineDriven => "deadline_driven",
            Strategy::SmartBalance => "smart_balance",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Strategy::FastestWins => "favor low-effort quick wins",
            Strategy::HighImpact => "favor stated importance",
            Strategy::DeadlineDriven => "favor the nearest deadlines",
            Strategy::SmartBalance => "blend all four factors",
        }
    }

    /// Parse a strategy name, falling back to `SmartBalance` for anything
    /// unrecognized.
    pub fn from_name_lossy(name: &str) -> Strategy {
        match name.parse() {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(%e, "falling back to smart_balance");
                Strategy::SmartBalance
            }
        }
    }

    /// Weights to use for a pass: the override if any, else the defaults.
    pub fn resolve(self, custom: Option<&Weights>) -> Weights {
        custom.copied().unwrap_or_else(|| self.weights())
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}'")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|st| st.as_str() == s.trim())
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}
