//! Error taxonomy for the planner core.
//!
//! One variant per condition in the taxonomy, each with an `#[error(...)]`
//! message, in the style of `gram-codec`'s `parser::error::ParseError`.

use thiserror::Error;

use crate::capture::CaptureLabel;
use crate::rule::PlanPhase;

/// Errors raised while building, matching against, or rewriting a graph.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// An element-graph invariant was violated (dangling edge, unknown
    /// vertex).
    #[error("graph shape violation: {message}")]
    GraphShape { message: String },

    /// A transformer variant received a capture set of the wrong
    /// cardinality.
    #[error("bad captures for {label:?}: expected {expected}, found {found}")]
    BadCaptures {
        label: CaptureLabel,
        expected: String,
        found: usize,
    },

    /// An assert rule matched; carries the interpolated message and the
    /// elements captured by the match that triggered it.
    #[error("planner assertion failed in phase {phase:?}, rule '{rule_name}': {message}")]
    PlannerAssertion {
        phase: PlanPhase,
        rule_name: String,
        message: String,
    },

    /// A recursive transformer exceeded its configured iteration cap.
    #[error("rule '{rule_name}' exceeded its recursion cap of {cap} iterations")]
    PlannerLoop { rule_name: String, cap: u64 },

    /// The rule driver's wall-clock ceiling was exceeded.
    #[error("planner timed out in phase {phase:?} after {elapsed_ms}ms (limit {limit_ms}ms)")]
    PlannerTimeout {
        phase: PlanPhase,
        elapsed_ms: u64,
        limit_ms: u64,
    },

    /// Configuration options are inconsistent; raised only at construction
    /// time, never during planning.
    #[error("configuration error: {message}")]
    ConfigError { message: String },
}

impl PlannerError {
    pub fn graph_shape(message: impl Into<String>) -> Self {
        PlannerError::GraphShape {
            message: message.into(),
        }
    }

    /// Annotates any error with the phase and rule name it surfaced under,
    /// matching §7's propagation policy ("the driver... annotates them with
    /// the current phase and rule name").
    pub fn with_rule_context(self, phase: PlanPhase, rule_name: &str) -> Self {
        match self {
            PlannerError::PlannerAssertion {
                message,
                rule_name: _,
                ..
            } => PlannerError::PlannerAssertion {
                phase,
                rule_name: rule_name.to_string(),
                message,
            },
            other => other,
        }
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;
