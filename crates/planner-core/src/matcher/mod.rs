//! The subgraph isomorphism matcher, component D.
//!
//! A faithful VF2 (Cordella et al., 2004) state-space search adapted to
//! multi-graphs with edge predicates and capture filtering (spec.md §4.D).

mod feasibility;
mod search;
mod state;

use crate::collaborator::FlowElement;
use crate::config::PlannerConfig;
use crate::element_graph::ElementGraph;
use crate::expression_graph::ExpressionGraph;
use crate::indexed::IndexedGraph;
use crate::match_result::{FinderContext, Match};

pub use feasibility::FeasibilityContext;

/// A matcher bound to one P-graph/E-graph pair and one finder context.
/// Constructing it materialises both indexed views once; every subsequent
/// `find_first`/`find_all` call reuses them.
pub struct Matcher<'a, E, S> {
    pattern: &'a ExpressionGraph<E, S>,
    target: &'a ElementGraph<E, S>,
    pattern_index: IndexedGraph<crate::ids::ElementId>,
    target_index: IndexedGraph<crate::ids::ElementId>,
    finder: FinderContext,
    config: &'a PlannerConfig,
}

impl<'a, E: FlowElement, S> Matcher<'a, E, S> {
    pub fn new(
        pattern: &'a ExpressionGraph<E, S>,
        target: &'a ElementGraph<E, S>,
        finder: FinderContext,
        config: &'a PlannerConfig,
    ) -> Self {
        // The pattern side is always indexed in its own insertion (id)
        // order: spec.md's `search.order` config governs the *target*
        // graph's visitation order, the sole axis the matcher's
        // performance is sensitive to; the pattern graph is small and
        // fixed, so a stable canonical order suffices there.
        let pattern_index = IndexedGraph::build(pattern, crate::config::SearchOrder::Topological);
        let target_index = IndexedGraph::build(target, config.search_order);
        Matcher {
            pattern,
            target,
            pattern_index,
            target_index,
            finder,
            config,
        }
    }

    fn ctx(&self) -> FeasibilityContext<'_, E, S> {
        FeasibilityContext {
            pattern: self.pattern,
            pattern_index: &self.pattern_index,
            target: self.target,
            target_index: &self.target_index,
            finder: &self.finder,
            edge_matching: self.config.edge_matching_algorithm,
        }
    }

    /// The first match found, or `None` if the pattern does not occur.
    pub fn find_first(&self) -> Option<Match> {
        let ctx = self.ctx();
        let mut found = None;
        search::search(&ctx, |m| {
            found = Some(m);
            false
        });
        found
    }

    /// Every match the search space contains, in deterministic discovery
    /// order (spec.md §4.D "Determinism").
    pub fn find_all(&self) -> Vec<Match> {
        let ctx = self.ctx();
        let mut found = Vec::new();
        search::search(&ctx, |m| {
            found.push(m);
            true
        });
        found
    }
}
