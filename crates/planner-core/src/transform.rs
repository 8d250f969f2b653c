//! Mutating match-driven transforms: Remove, Replace, Insert (spec.md §4.J,
//! the non-Contract/SubGraph/Recursive `Transform` variants).
//!
//! spec.md §9 describes a single `Transform` tagged union with five
//! variants, two of which (`Contract`, `SubGraph`) carry a whole second
//! P-graph and one of which (`Recursive`) carries a nested `Transform`
//! itself. Rust makes that shape awkward as one enum: the `Contract` and
//! `SubGraph` payloads are already first-class types
//! ([`ContractedTransformer`](crate::contracted::ContractedTransformer),
//! [`SubGraphTransformer`](crate::subgraph::SubGraphTransformer)) with their
//! own lifetimes, and `Recursive` is generic over any of them via
//! [`RepeatableTransform`](crate::recursive::RepeatableTransform). Rather
//! than force all three into one enum's associated data, this module keeps
//! only the genuinely uniform "operate on one match against one graph"
//! variants as `MutateFlowGraphTransformer`, and [`TransformKind`] is a
//! small diagnostic tag naming all six for tracing/reporting purposes
//! (decision recorded in DESIGN.md).

use crate::capture::CaptureLabel;
use crate::collaborator::{FlowElement, ScopeAlgebra};
use crate::config::PlannerConfig;
use crate::element_graph::ElementGraph;
use crate::error::{PlannerError, PlannerResult};
use crate::match_result::FinderContext;
use crate::match_result::Match;
use crate::recursive::RepeatableTransform;

/// Names every kind of graph transform spec.md §9 lists, including the ones
/// realised by other modules, purely for diagnostics (trace messages,
/// driver reports) that want to say what ran without caring how.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransformKind {
    Remove,
    Replace,
    Insert,
    Contract,
    SubGraph,
    Recursive,
}

/// A transform that rewrites a match's captured elements in place.
pub enum MutateFlowGraphTransformer<E> {
    /// Removes the Primary element via `remove_and_contract`. Demands
    /// exactly one Primary capture.
    Remove,
    /// Rewires every edge of the Primary element onto the Secondary
    /// element, then drops the Primary (`replace_element_with(primary,
    /// secondary)`). Demands exactly one Primary and one Secondary
    /// capture, both already present in the graph (spec.md §4.J: "demands
    /// exactly one Primary and one Secondary captured element").
    Replace,
    /// Inserts a freshly constructed element after the Primary element
    /// (`insert_flow_element_after`). The new element does not come from
    /// the match — unlike Remove/Replace it has no counterpart in the
    /// E-graph being matched against, so the collaborator must construct
    /// it. Demands exactly one Primary capture.
    Insert { new_element: E, default_scope_source: InsertScopeSource },
}

/// Which existing scope an `Insert` transform's new `new -> successor` leg
/// is cloned from, since spec.md leaves the choice of a genuinely new scope
/// value to the collaborator (§4.A's documented default keeps the original
/// scope on the `prev -> new` leg).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InsertScopeSource {
    /// Clone the scope already present on the edge being split.
    CloneOriginal,
}

fn require_one(elements: &[crate::ids::ElementId], label: CaptureLabel) -> PlannerResult<crate::ids::ElementId> {
    match elements {
        [single] => Ok(*single),
        other => Err(PlannerError::BadCaptures {
            label,
            expected: "exactly one".to_string(),
            found: other.len(),
        }),
    }
}

impl<E: FlowElement> MutateFlowGraphTransformer<E> {
    pub fn kind(&self) -> TransformKind {
        match self {
            MutateFlowGraphTransformer::Remove => TransformKind::Remove,
            MutateFlowGraphTransformer::Replace => TransformKind::Replace,
            MutateFlowGraphTransformer::Insert { .. } => TransformKind::Insert,
        }
    }

    /// Applies this transform to the single match `m`, returning whether
    /// the graph actually changed (always `true` on success, since every
    /// variant here performs a mutation whenever it runs).
    pub fn apply<S: ScopeAlgebra>(&self, graph: &mut ElementGraph<E, S>, m: &Match) -> PlannerResult<bool> {
        match self {
            MutateFlowGraphTransformer::Remove => {
                let primary = require_one(m.captured(CaptureLabel::Primary), CaptureLabel::Primary)?;
                graph.remove_and_contract(primary)?;
            }
            MutateFlowGraphTransformer::Replace => {
                let primary = require_one(m.captured(CaptureLabel::Primary), CaptureLabel::Primary)?;
                let secondary = require_one(m.captured(CaptureLabel::Secondary), CaptureLabel::Secondary)?;
                graph.replace_element_with(primary, secondary)?;
            }
            MutateFlowGraphTransformer::Insert {
                new_element,
                default_scope_source: InsertScopeSource::CloneOriginal,
            } => {
                let primary = require_one(m.captured(CaptureLabel::Primary), CaptureLabel::Primary)?;
                let default_scope = graph
                    .out_edges(primary)
                    .first()
                    .and_then(|e| graph.scope(*e))
                    .cloned()
                    .ok_or_else(|| {
                        PlannerError::graph_shape(format!(
                            "insert transform: Primary element {:?} has no outgoing edge to clone a scope from",
                            primary
                        ))
                    })?;
                graph.insert_flow_element_after(primary, new_element.clone(), default_scope)?;
            }
        }
        Ok(true)
    }
}

/// Adapts a [`MutateFlowGraphTransformer`] bound to a fixed pattern so
/// [`RecursiveTransformer`](crate::recursive::RecursiveTransformer) can
/// drive "apply until a match no longer exists" loops where the match
/// itself is re-derived from scratch each iteration.
pub struct RepeatMatching<'a, E, S> {
    pub pattern: &'a crate::expression_graph::ExpressionGraph<E, S>,
    pub transform: MutateFlowGraphTransformer<E>,
}

impl<'a, E: FlowElement, S: ScopeAlgebra> RepeatableTransform<E, S> for RepeatMatching<'a, E, S> {
    fn apply_once(
        &self,
        graph: &mut ElementGraph<E, S>,
        finder: &FinderContext,
        config: &PlannerConfig,
    ) -> PlannerResult<bool> {
        let matcher = crate::matcher::Matcher::new(self.pattern, graph, finder.clone(), config);
        let Some(m) = matcher.find_first() else {
            return Ok(false);
        };
        self.transform.apply(graph, &m)
    }
}
