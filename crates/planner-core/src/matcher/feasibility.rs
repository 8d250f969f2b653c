//! `isFeasiblePair`/`areCompatibleNodes`/`areCompatibleEdges` (spec.md §4.D).

use crate::bipartite::has_perfect_matching;
use crate::collaborator::FlowElement;
use crate::config::EdgeMatchingAlgorithm;
use crate::element_graph::ElementGraph;
use crate::expression_graph::ExpressionGraph;
use crate::indexed::IndexedGraph;
use crate::ids::ElementId;
use crate::match_result::FinderContext;

use super::state::MatcherState;

pub struct FeasibilityContext<'a, E, S> {
    pub pattern: &'a ExpressionGraph<E, S>,
    pub pattern_index: &'a IndexedGraph<ElementId>,
    pub target: &'a ElementGraph<E, S>,
    pub target_index: &'a IndexedGraph<ElementId>,
    pub finder: &'a FinderContext,
    pub edge_matching: EdgeMatchingAlgorithm,
}

/// `areCompatibleEdges`: the bundle of scope expressions from pattern index
/// `pi` to `pj` must admit a perfect matching against the bundle of scopes
/// from target index `ti` to `tj` (or be satisfied vacuously by a lone
/// wildcard, spec.md §4.D/§9).
fn compatible_edge_bundle<E, S>(ctx: &FeasibilityContext<E, S>, pi: usize, pj: usize, ti: usize, tj: usize) -> bool {
    let p_u = ctx.pattern_index.id_at(pi);
    let p_v = ctx.pattern_index.id_at(pj);
    let t_u = ctx.target_index.id_at(ti);
    let t_v = ctx.target_index.id_at(tj);

    let pattern_bundle = ctx.pattern.bundle(p_u, p_v);
    let target_bundle = ctx.target.bundle(t_u, t_v);

    if pattern_bundle.len() == 1 {
        if let Some(expr) = ctx.pattern.scope_expr(pattern_bundle[0]) {
            if expr.is_wildcard() {
                return !target_bundle.is_empty();
            }
        }
    }

    if pattern_bundle.len() != target_bundle.len() {
        return false;
    }

    let matrix: Vec<Vec<bool>> = pattern_bundle
        .iter()
        .map(|p_scope_id| {
            let matcher = ctx.pattern.scope_expr(*p_scope_id);
            target_bundle
                .iter()
                .map(|t_scope_id| {
                    let scope = ctx.target.scope(*t_scope_id);
                    match (matcher, scope) {
                        (Some(m), Some(s)) => m.applies(s),
                        _ => false,
                    }
                })
                .collect()
        })
        .collect();

    has_perfect_matching(&matrix, ctx.edge_matching)
}

/// `isFeasiblePair(i, j)`: node-predicate and capture-context consistency,
/// then the four neighbour passes (P successors/predecessors, E
/// successors/predecessors) described in spec.md §4.D, finishing with the
/// VF2 look-ahead cardinality check.
pub fn is_feasible_pair<E: FlowElement, S>(
    ctx: &FeasibilityContext<E, S>,
    state: &MatcherState,
    i: usize,
    j: usize,
) -> bool {
    let p_id = ctx.pattern_index.id_at(i);
    let t_id = ctx.target_index.id_at(j);

    let Some(expr) = ctx.pattern.node(p_id) else {
        return false;
    };
    if !ctx.finder.is_feasible_element(t_id) {
        return false;
    }
    if expr.label == crate::capture::CaptureLabel::Primary && !ctx.finder.satisfies_required(t_id) {
        return false;
    }
    let Some(element) = ctx.target.element(t_id) else {
        return false;
    };
    if !expr.accepts(element) {
        return false;
    }

    let mut term_in1 = 0usize;
    let mut term_out1 = 0usize;
    let mut new1 = 0usize;
    let mut term_in2 = 0usize;
    let mut term_out2 = 0usize;
    let mut new2 = 0usize;

    // P successors: edge-existence check against the mapped core; terminal
    // bookkeeping (deduped against predecessors below) against the
    // unmapped remainder.
    let mut unmapped_p: std::collections::HashSet<usize> = std::collections::HashSet::new();
    for &pn in ctx.pattern_index.successors(i) {
        match state.mapped1(pn) {
            Some(tn) => {
                if !compatible_edge_bundle(ctx, i, pn, j, tn) {
                    return false;
                }
            }
            None => {
                unmapped_p.insert(pn);
            }
        }
    }
    // P predecessors.
    for &pn in ctx.pattern_index.predecessors(i) {
        match state.mapped1(pn) {
            Some(tn) => {
                if !compatible_edge_bundle(ctx, pn, i, tn, j) {
                    return false;
                }
            }
            None => {
                unmapped_p.insert(pn);
            }
        }
    }
    for pn in unmapped_p {
        classify_p_neighbor(state, pn, &mut term_in1, &mut term_out1, &mut new1);
    }

    // E successors/predecessors: no edge-existence obligation (subgraph,
    // not induced, isomorphism — extra target edges are always allowed);
    // only terminal-set bookkeeping for the look-ahead prune.
    let mut unmapped_t: std::collections::HashSet<usize> = std::collections::HashSet::new();
    for &tn in ctx.target_index.successors(j) {
        if state.mapped2(tn).is_none() {
            unmapped_t.insert(tn);
        }
    }
    for &tn in ctx.target_index.predecessors(j) {
        if state.mapped2(tn).is_none() {
            unmapped_t.insert(tn);
        }
    }
    for tn in unmapped_t {
        classify_t_neighbor(state, tn, &mut term_in2, &mut term_out2, &mut new2);
    }

    term_in1 <= term_in2 && term_out1 <= term_out2 && new1 <= new2
}

fn classify_p_neighbor(state: &MatcherState, pn: usize, term_in1: &mut usize, term_out1: &mut usize, new1: &mut usize) {
    let in_t = state.in_terminal1(pn);
    let out_t = state.out_terminal1(pn);
    if in_t {
        *term_in1 += 1;
    }
    if out_t {
        *term_out1 += 1;
    }
    if !in_t && !out_t {
        *new1 += 1;
    }
}

fn classify_t_neighbor(state: &MatcherState, tn: usize, term_in2: &mut usize, term_out2: &mut usize, new2: &mut usize) {
    let in_t = state.in_terminal2(tn);
    let out_t = state.out_terminal2(tn);
    if in_t {
        *term_in2 += 1;
    }
    if out_t {
        *term_out2 += 1;
    }
    if !in_t && !out_t {
        *new2 += 1;
    }
}
