//! Contracted transformer, component F.
//!
//! Repeatedly finds an occurrence of a `contraction` P-graph and contracts
//! every captured element that is not `Primary`, `Include`, or `Ignore`
//! (spec.md §4.F), producing the "anvil" working graph that downstream
//! matchers (G) operate on.

use std::collections::{HashMap, HashSet};

use crate::capture::CaptureLabel;
use crate::collaborator::{FlowElement, ScopeAlgebra};
use crate::config::PlannerConfig;
use crate::element_graph::ElementGraph;
use crate::error::PlannerResult;
use crate::expression_graph::ExpressionGraph;
use crate::ids::ElementId;
use crate::match_result::FinderContext;
use crate::matcher::Matcher;

/// Which original elements a surviving vertex now "stands for", after zero
/// or more rounds of contraction (spec.md §4.G). A contracted vertex that
/// was never itself removed always at least stands for itself; a vertex
/// absorbs the provenance of every neighbour contracted through it. A
/// removed element can end up standing for more than one surviving vertex
/// (both the vertex's former predecessor and successor absorb it) — this
/// over-approximates slightly rather than picking one side arbitrarily,
/// which matches spec.md's own S4 scenario where a single shared element
/// legitimately belongs to more than one derived sub-graph.
#[derive(Clone, Debug, Default)]
pub struct Provenance(HashMap<ElementId, HashSet<ElementId>>);

impl Provenance {
    pub fn identity<E: FlowElement, S>(graph: &ElementGraph<E, S>) -> Self {
        Provenance(
            graph
                .vertices()
                .map(|v| (v, std::iter::once(v).collect()))
                .collect(),
        )
    }

    pub fn standing_for(&self, id: ElementId) -> HashSet<ElementId> {
        self.0
            .get(&id)
            .cloned()
            .unwrap_or_else(|| std::iter::once(id).collect())
    }
}

pub struct ContractionOutcome {
    pub changed: bool,
    pub provenance: Provenance,
}

pub struct ContractedTransformer<'p, E, S> {
    contraction: &'p ExpressionGraph<E, S>,
}

impl<'p, E: FlowElement, S: ScopeAlgebra> crate::recursive::RepeatableTransform<E, S>
    for ContractedTransformer<'p, E, S>
{
    /// One contraction pass is already a fixed-point loop internally; from
    /// `RecursiveTransformer`'s perspective a single `apply_once` either
    /// changed the graph or it didn't.
    fn apply_once(
        &self,
        graph: &mut ElementGraph<E, S>,
        finder: &FinderContext,
        config: &PlannerConfig,
    ) -> PlannerResult<bool> {
        self.apply(graph, finder, config).map(|outcome| outcome.changed)
    }
}

impl<'p, E: FlowElement, S: ScopeAlgebra> ContractedTransformer<'p, E, S> {
    pub fn new(contraction: &'p ExpressionGraph<E, S>) -> Self {
        ContractedTransformer { contraction }
    }

    /// Fixed-point loop: stop when no further match of `contraction` is
    /// found (spec.md §4.F "Fixed-point: stop when no further match is
    /// found").
    pub fn apply(
        &self,
        graph: &mut ElementGraph<E, S>,
        finder: &FinderContext,
        config: &PlannerConfig,
    ) -> PlannerResult<ContractionOutcome> {
        let mut provenance = Provenance::identity(graph);
        let mut changed = false;

        loop {
            let found = {
                let matcher = Matcher::new(self.contraction, graph, finder.clone(), config);
                matcher.find_first()
            };
            let Some(m) = found else { break };

            let include: HashSet<ElementId> = m.captured(CaptureLabel::Include).iter().copied().collect();
            let ignore: HashSet<ElementId> = m.captured(CaptureLabel::Ignore).iter().copied().collect();
            let primary = m.primary();

            let mut to_remove: Vec<ElementId> = m.all_mapped_elements().collect();
            to_remove.sort_unstable();
            to_remove.dedup();

            let mut removed_any = false;
            for elem in to_remove {
                if include.contains(&elem) || ignore.contains(&elem) || Some(elem) == primary {
                    continue;
                }
                let neighbors: Vec<ElementId> = graph
                    .in_edges(elem)
                    .iter()
                    .filter_map(|e| graph.endpoints(*e).map(|(s, _)| s))
                    .chain(
                        graph
                            .out_edges(elem)
                            .iter()
                            .filter_map(|e| graph.endpoints(*e).map(|(_, t)| t)),
                    )
                    .collect();
                let elem_provenance = provenance.0.remove(&elem).unwrap_or_else(|| std::iter::once(elem).collect());

                graph.remove_and_contract(elem)?;
                removed_any = true;
                changed = true;

                for n in neighbors {
                    if n == elem {
                        continue;
                    }
                    provenance
                        .0
                        .entry(n)
                        .or_insert_with(|| std::iter::once(n).collect())
                        .extend(elem_provenance.iter().copied());
                }
            }

            if !removed_any {
                // Every captured element was Primary/Include/Ignore: the
                // match is stable under contraction and re-finding it
                // forever would spin. Stop after one no-op pass.
                break;
            }
        }

        Ok(ContractionOutcome { changed, provenance })
    }
}
