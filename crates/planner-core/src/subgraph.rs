//! Sub-graph transformer, component G.
//!
//! Composes contraction (F) with a second P-graph, `pattern`: contracts a
//! working copy, matches `pattern` against the contraction, then projects
//! each `Primary`-captured contracted vertex back to the set of original
//! elements it stands for (spec.md §4.G). The result is what partitioners
//! (I) and replace-style transforms consume.

use std::collections::HashSet;

use crate::capture::CaptureLabel;
use crate::collaborator::{FlowElement, ScopeAlgebra};
use crate::config::PlannerConfig;
use crate::contracted::{ContractedTransformer, Provenance};
use crate::element_graph::ElementGraph;
use crate::error::PlannerResult;
use crate::expression_graph::ExpressionGraph;
use crate::ids::ElementId;
use crate::match_result::{FinderContext, Match};
use crate::matcher::Matcher;

/// A read-only view over the original E-graph: the set of original
/// elements a derived sub-graph covers. Mirrors the teacher's
/// `GraphView`/contained-query shape — "transformations operate over views
/// and produce a new view" — here realised as a plain element-id set
/// rather than a closure, since the matcher already did the traversal
/// work that produced it.
pub struct SubGraphView<'g, E, S> {
    parent: &'g ElementGraph<E, S>,
    elements: HashSet<ElementId>,
}

impl<'g, E: FlowElement, S> SubGraphView<'g, E, S> {
    /// Builds a view directly from an already-known element set, used by
    /// the partitioner's "no pattern" fallback (spec.md §4.I: "return the
    /// whole graph ... as a single partition").
    pub fn whole(parent: &'g ElementGraph<E, S>, elements: HashSet<ElementId>) -> Self {
        SubGraphView { parent, elements }
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains(&id)
    }

    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn parent(&self) -> &'g ElementGraph<E, S> {
        self.parent
    }
}

pub struct SubGraphTransformer<'p, E, S> {
    contraction: &'p ExpressionGraph<E, S>,
    pattern: &'p ExpressionGraph<E, S>,
}

impl<'p, E: FlowElement, S: ScopeAlgebra> SubGraphTransformer<'p, E, S> {
    pub fn new(contraction: &'p ExpressionGraph<E, S>, pattern: &'p ExpressionGraph<E, S>) -> Self {
        SubGraphTransformer { contraction, pattern }
    }

    /// Every sub-graph `pattern` derives from `parent`, together with the
    /// match that produced it, in deterministic discovery order.
    pub fn find_all<'g>(
        &self,
        parent: &'g ElementGraph<E, S>,
        finder: &FinderContext,
        config: &PlannerConfig,
    ) -> PlannerResult<Vec<(SubGraphView<'g, E, S>, Match)>> {
        let mut working = parent.copy();
        let outcome = ContractedTransformer::new(self.contraction).apply(&mut working, finder, config)?;
        let provenance = outcome.provenance;

        let matcher = Matcher::new(self.pattern, &working, finder.clone(), config);
        let matches = matcher.find_all();

        Ok(matches
            .into_iter()
            .map(|m| {
                let mut elements = HashSet::new();
                for id in m.captured(CaptureLabel::Primary) {
                    elements.extend(provenance.standing_for(*id));
                }
                (SubGraphView { parent, elements }, m)
            })
            .collect())
    }
}

/// Projects a sub-graph transformer over a graph that needs no contraction
/// step at all (an absent contraction P-graph, spec.md §4.I): each match's
/// Primary capture stands only for itself.
pub fn find_all_without_contraction<'g, E: FlowElement, S>(
    pattern: &ExpressionGraph<E, S>,
    parent: &'g ElementGraph<E, S>,
    finder: &FinderContext,
    config: &PlannerConfig,
) -> Vec<(SubGraphView<'g, E, S>, Match)> {
    let provenance = Provenance::identity(parent);
    let matcher = Matcher::new(pattern, parent, finder.clone(), config);
    matcher
        .find_all()
        .into_iter()
        .map(|m| {
            let mut elements = HashSet::new();
            for id in m.captured(CaptureLabel::Primary) {
                elements.extend(provenance.standing_for(*id));
            }
            (SubGraphView { parent, elements }, m)
        })
        .collect()
}
