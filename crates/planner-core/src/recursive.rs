//! Recursive transformer, component H.
//!
//! Applies an inner, repeatable transform to a graph until it reports no
//! further change or a configured iteration ceiling is hit (spec.md §4.H).
//! The ceiling exists purely as a non-termination guard: a well-formed
//! inner transform reaches a fixed point on its own, but a misbehaving
//! collaborator predicate (e.g. one whose `compose` is not associative)
//! could otherwise spin forever, which is exactly the failure spec.md §7
//! names `PlannerLoop` for.

use crate::config::PlannerConfig;
use crate::element_graph::ElementGraph;
use crate::error::{PlannerError, PlannerResult};
use crate::match_result::FinderContext;

/// A transform that can be applied repeatedly and reports whether the last
/// application changed anything. [`ContractedTransformer`](crate::contracted::ContractedTransformer)
/// and [`MutateFlowGraphTransformer`](crate::transform::MutateFlowGraphTransformer)
/// both implement this so [`RecursiveTransformer`] can wrap either.
pub trait RepeatableTransform<E, S> {
    fn apply_once(
        &self,
        graph: &mut ElementGraph<E, S>,
        finder: &FinderContext,
        config: &PlannerConfig,
    ) -> PlannerResult<bool>;
}

pub struct RecursiveTransformer<T> {
    inner: T,
    rule_name: String,
    max_iterations: Option<u64>,
}

impl<T> RecursiveTransformer<T> {
    /// `rule_name` identifies this recursion in a `PlannerLoop` error; it is
    /// independent of the rule-driver's own rule names since a single rule
    /// may nest more than one recursive transform.
    pub fn new(inner: T, rule_name: impl Into<String>) -> Self {
        RecursiveTransformer {
            inner,
            rule_name: rule_name.into(),
            max_iterations: None,
        }
    }

    /// Overrides `config.recursive_max_iterations` for this instance.
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Runs `inner.apply_once` until it reports no change, returning the
    /// number of iterations that did change something. Exceeding the
    /// ceiling without reaching a fixed point is a [`PlannerError::PlannerLoop`].
    pub fn apply<E, S>(
        &self,
        graph: &mut ElementGraph<E, S>,
        finder: &FinderContext,
        config: &PlannerConfig,
    ) -> PlannerResult<u64>
    where
        T: RepeatableTransform<E, S>,
    {
        let cap = self.max_iterations.unwrap_or(config.recursive_max_iterations);
        let mut iterations: u64 = 0;
        loop {
            if iterations >= cap {
                return Err(PlannerError::PlannerLoop {
                    rule_name: self.rule_name.clone(),
                    cap,
                });
            }
            let changed = self.inner.apply_once(graph, finder, config)?;
            if !changed {
                return Ok(iterations);
            }
            iterations += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::{FlowElement, ScopeAlgebra, Topo};

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    struct Unit;

    impl FlowElement for Unit {
        fn topology(&self) -> Topo {
            Topo::new("unit")
        }
    }

    impl ScopeAlgebra for Unit {
        fn compose(&self, _successor: &Self) -> Self {
            Unit
        }
    }

    struct CountDown(std::cell::Cell<u32>);

    impl RepeatableTransform<Unit, Unit> for CountDown {
        fn apply_once(
            &self,
            _graph: &mut ElementGraph<Unit, Unit>,
            _finder: &FinderContext,
            _config: &PlannerConfig,
        ) -> PlannerResult<bool> {
            let remaining = self.0.get();
            if remaining == 0 {
                Ok(false)
            } else {
                self.0.set(remaining - 1);
                Ok(true)
            }
        }
    }

    #[test]
    fn stops_at_fixed_point() {
        let transformer = RecursiveTransformer::new(CountDown(std::cell::Cell::new(3)), "countdown");
        let mut graph: ElementGraph<Unit, Unit> = ElementGraph::new();
        let finder = FinderContext::default();
        let config = PlannerConfig::default();
        let iterations = transformer.apply(&mut graph, &finder, &config).unwrap();
        assert_eq!(iterations, 3);
    }

    #[test]
    fn exceeding_ceiling_is_a_planner_loop_error() {
        let transformer =
            RecursiveTransformer::new(CountDown(std::cell::Cell::new(10)), "countdown").with_max_iterations(2);
        let mut graph: ElementGraph<Unit, Unit> = ElementGraph::new();
        let finder = FinderContext::default();
        let config = PlannerConfig::default();
        let result = transformer.apply(&mut graph, &finder, &config);
        assert!(matches!(result, Err(PlannerError::PlannerLoop { .. })));
    }
}
