//! Planner configuration (spec.md §6).
//!
//! A plain struct with a builder, `Serialize`/`Deserialize` derived so a
//! collaborator's own configuration layer can load it — the teacher never
//! reaches for a dedicated config crate, so neither do we.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;

/// Deterministic vertex visitation order used by the indexed graph views
/// (component C) and, downstream, by the matcher's `nextPair`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, Default)]
pub enum SearchOrder {
    #[default]
    Topological,
    ReverseTopological,
    DepthFirst,
    BreadthFirst,
}

/// Algorithm used to decide edge-bundle compatibility between parallel
/// multi-edges (spec.md §4.D, §9).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, Default)]
pub enum EdgeMatchingAlgorithm {
    #[default]
    Bipartite,
    /// Retained only for regression comparison against the bipartite
    /// matcher; quadratic-to-factorial in bundle size (spec.md §9).
    Permutation,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub trace_enabled: bool,
    pub trace_path: Option<PathBuf>,
    pub search_order: SearchOrder,
    /// See DESIGN.md "Open Question decisions" #3 for why this is a `u64`
    /// defaulted to 2^31 rather than the `u32` the spec's prose suggests.
    pub recursive_max_iterations: u64,
    pub edge_matching_algorithm: EdgeMatchingAlgorithm,
    /// Wall-clock ceiling the driver enforces between rule boundaries
    /// (spec.md §5). `None` disables the timeout.
    pub rule_timeout: Option<Duration>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            trace_enabled: false,
            trace_path: None,
            search_order: SearchOrder::default(),
            recursive_max_iterations: 1u64 << 31,
            edge_matching_algorithm: EdgeMatchingAlgorithm::default(),
            rule_timeout: None,
        }
    }
}

impl PlannerConfig {
    pub fn builder() -> PlannerConfigBuilder {
        PlannerConfigBuilder::default()
    }

    /// Validates cross-field invariants. Only `ConfigError` is raised at
    /// construction time (spec.md §7); everything else surfaces during
    /// planning.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.trace_enabled && self.trace_path.is_none() {
            return Err(PlannerError::ConfigError {
                message: "trace.enabled is set but trace.path is missing".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct PlannerConfigBuilder {
    inner: PlannerConfig,
}

impl PlannerConfigBuilder {
    pub fn trace_enabled(mut self, enabled: bool) -> Self {
        self.inner.trace_enabled = enabled;
        self
    }

    pub fn trace_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.inner.trace_path = Some(path.into());
        self
    }

    pub fn search_order(mut self, order: SearchOrder) -> Self {
        self.inner.search_order = order;
        self
    }

    pub fn recursive_max_iterations(mut self, cap: u64) -> Self {
        self.inner.recursive_max_iterations = cap;
        self
    }

    pub fn edge_matching_algorithm(mut self, algorithm: EdgeMatchingAlgorithm) -> Self {
        self.inner.edge_matching_algorithm = algorithm;
        self
    }

    pub fn rule_timeout(mut self, timeout: Duration) -> Self {
        self.inner.rule_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<PlannerConfig, PlannerError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
