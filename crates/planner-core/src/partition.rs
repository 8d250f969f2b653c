//! Partitioner, component I.
//!
//! Extracts an ordered list of annotated sub-graphs from a parent E-graph
//! using an optional contraction P-graph and an optional expression P-graph
//! (spec.md §4.I). When the expression P-graph is absent, the whole graph
//! (minus its bookends) is the single partition.

use std::collections::HashMap;

use crate::capture::CaptureLabel;
use crate::collaborator::{FlowElement, ScopeAlgebra};
use crate::config::PlannerConfig;
use crate::element_graph::ElementGraph;
use crate::error::PlannerResult;
use crate::expression_graph::ExpressionGraph;
use crate::ids::ElementId;
use crate::match_result::{FinderContext, Match};
use crate::subgraph::{find_all_without_contraction, SubGraphTransformer, SubGraphView};

/// One label's pair of (Primary-like, Secondary-like) annotation captures
/// to record for every partition, e.g. `PartitionHashJoinSameSourceExpression`'s
/// `(Primary -> blocking pipe, Secondary -> HashJoin)` pairing from spec.md's
/// S4 scenario.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Annotation {
    pub label: CaptureLabel,
}

impl Annotation {
    pub const fn new(label: CaptureLabel) -> Self {
        Annotation { label }
    }
}

/// One partition's captured elements, keyed by capture label, in iteration
/// order with index as tie-breaker (spec.md §4.I).
pub struct PartitionEntry<'g, E, S> {
    pub index: usize,
    pub view: SubGraphView<'g, E, S>,
    captures: HashMap<CaptureLabel, Vec<ElementId>>,
}

impl<'g, E: FlowElement, S> PartitionEntry<'g, E, S> {
    pub fn captured(&self, label: CaptureLabel) -> &[ElementId] {
        self.captures.get(&label).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

pub struct ExpressionGraphPartitioner<'p, E, S> {
    contraction: Option<&'p ExpressionGraph<E, S>>,
    pattern: Option<&'p ExpressionGraph<E, S>>,
    annotations: Vec<Annotation>,
}

impl<'p, E: FlowElement, S: ScopeAlgebra> ExpressionGraphPartitioner<'p, E, S> {
    pub fn new(
        contraction: Option<&'p ExpressionGraph<E, S>>,
        pattern: Option<&'p ExpressionGraph<E, S>>,
        annotations: Vec<Annotation>,
    ) -> Self {
        ExpressionGraphPartitioner {
            contraction,
            pattern,
            annotations,
        }
    }

    /// Partitions `parent` without modifying it. When `pattern` is absent,
    /// returns the whole graph, bookends masked out, as a single partition
    /// with empty annotations (spec.md §4.I).
    pub fn partition<'g>(
        &self,
        parent: &'g ElementGraph<E, S>,
        finder: &FinderContext,
        config: &PlannerConfig,
    ) -> PlannerResult<Vec<PartitionEntry<'g, E, S>>> {
        let Some(pattern) = self.pattern else {
            let hidden: Vec<ElementId> = parent.head().into_iter().chain(parent.tail()).collect();
            let elements: std::collections::HashSet<ElementId> =
                parent.vertices().filter(|v| !hidden.contains(v)).collect();
            let view = SubGraphView::whole(parent, elements);
            return Ok(vec![PartitionEntry {
                index: 0,
                view,
                captures: HashMap::new(),
            }]);
        };

        let derived: Vec<(SubGraphView<'g, E, S>, Match)> = match self.contraction {
            Some(contraction) => SubGraphTransformer::new(contraction, pattern).find_all(parent, finder, config)?,
            None => find_all_without_contraction(pattern, parent, finder, config),
        };

        Ok(derived
            .into_iter()
            .enumerate()
            .map(|(index, (view, m))| {
                let mut captures = HashMap::new();
                for annotation in &self.annotations {
                    captures.insert(annotation.label, m.captured(annotation.label).to_vec());
                }
                PartitionEntry { index, view, captures }
            })
            .collect())
    }
}
