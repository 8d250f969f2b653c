//! Fixture collaborator types and `proptest` generators, compiled only for
//! tests and benchmarks (spec.md's collaborator is external; this module is
//! the crate's own stand-in so its tests can exercise the matcher,
//! transformers, and driver without a real flow-element catalogue).
//!
//! Grounded in the teacher's `test_utils/{generators.rs,helpers.rs}`:
//! hand-written `proptest` strategies and small builder helpers over the
//! crate's own domain types, not a generic fixture-generation crate.

use std::collections::HashSet;

use proptest::prelude::*;

use crate::collaborator::{FlowElement, ScopeAlgebra, Topo};
use crate::element_graph::ElementGraph;
use crate::expression_graph::{ElementExpression, ExpressionGraph, ScopeExpression};
use crate::ids::ElementId;

/// A minimal named flow element: identity is the name plus an instance
/// counter, since spec.md §3 requires "two distinct elements of the same
/// kind" to be distinct vertices even when their visible labels coincide.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FixtureElement {
    pub kind: &'static str,
    pub instance: u32,
}

impl FixtureElement {
    pub fn new(kind: &'static str, instance: u32) -> Self {
        FixtureElement { kind, instance }
    }
}

impl FlowElement for FixtureElement {
    fn topology(&self) -> Topo {
        match self.kind {
            "GroupBy" | "HashJoin" => Topo::new("Split"),
            "Every" => Topo::new("LinearOut"),
            _ => Topo::new("LinearIn"),
        }
    }
}

/// A minimal scope whose "blocking"/"non-blocking" tag is the only thing
/// scope expressions query, and whose composition concatenates provenance
/// labels — enough structure to test associativity (spec.md §9) without
/// claiming to model real dataflow annotations.
#[derive(Clone, PartialEq, Debug)]
pub struct FixtureScope {
    pub blocking: bool,
    pub via: Vec<&'static str>,
}

impl FixtureScope {
    pub fn new(blocking: bool, via: &'static str) -> Self {
        FixtureScope { blocking, via: vec![via] }
    }
}

impl ScopeAlgebra for FixtureScope {
    /// Composition keeps the predecessor's blocking flag (the leg closer to
    /// the source determines whether the fused edge blocks) and concatenates
    /// the provenance trail — associative by construction, since list
    /// concatenation is associative.
    fn compose(&self, successor: &Self) -> Self {
        let mut via = self.via.clone();
        via.extend(successor.via.iter().copied());
        FixtureScope {
            blocking: self.blocking,
            via,
        }
    }
}

/// Builds a `kind`-labelled element expression accepting only fixture
/// elements of that kind, under `label`.
pub fn kind_expr(label: crate::capture::CaptureLabel, kind: &'static str) -> ElementExpression<FixtureElement> {
    ElementExpression::new(label, move |e: &FixtureElement| e.kind == kind)
}

pub fn any_blocking_expr() -> ScopeExpression<FixtureScope> {
    ScopeExpression::new(|s: &FixtureScope| s.blocking)
}

pub fn any_nonblocking_expr() -> ScopeExpression<FixtureScope> {
    ScopeExpression::new(|s: &FixtureScope| !s.blocking)
}

/// A small linear chain `Source -> k1 -> k2 -> ... -> Sink`, returning the
/// graph and the ids of the named intermediate vertices in order.
pub fn linear_chain(kinds: &[&'static str]) -> (ElementGraph<FixtureElement, FixtureScope>, Vec<ElementId>) {
    let mut graph = ElementGraph::new();
    let source = graph.add_vertex(FixtureElement::new("Source", 0));
    graph.set_head(source);
    let mut prev = source;
    let mut ids = Vec::new();
    for (i, kind) in kinds.iter().enumerate() {
        let v = graph.add_vertex(FixtureElement::new(kind, i as u32));
        graph.add_edge(prev, v, FixtureScope::new(false, "chain")).unwrap();
        ids.push(v);
        prev = v;
    }
    let sink = graph.add_vertex(FixtureElement::new("Sink", 0));
    graph.add_edge(prev, sink, FixtureScope::new(false, "chain")).unwrap();
    graph.set_tail(sink);
    (graph, ids)
}

/// `proptest` strategy generating small element graphs bounded to at most
/// `max_vertices` vertices, used by the bounded brute-force completeness
/// check (spec.md §8 property 2: `n2 <= 7`).
pub fn small_element_graph(max_vertices: usize) -> impl Strategy<Value = ElementGraph<FixtureElement, FixtureScope>> {
    (2..=max_vertices).prop_flat_map(|n| {
        let kinds = prop::collection::vec("[A-C]", n);
        let edge_flags = prop::collection::vec(any::<bool>(), n * n);
        (kinds, edge_flags).prop_map(move |(kinds, edge_flags)| {
            let mut graph = ElementGraph::new();
            let ids: Vec<ElementId> = kinds
                .iter()
                .enumerate()
                .map(|(i, k)| {
                    let kind: &'static str = match k.as_str() {
                        "A" => "A",
                        "B" => "B",
                        _ => "C",
                    };
                    graph.add_vertex(FixtureElement::new(kind, i as u32))
                })
                .collect();
            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    if edge_flags[i * n + j] {
                        let _ = graph.add_edge(ids[i], ids[j], FixtureScope::new(edge_flags[(i + j) % edge_flags.len()], "gen"));
                    }
                }
            }
            graph
        })
    })
}

/// `proptest` strategy generating small pattern graphs bounded to at most
/// `max_vertices` vertices (spec.md §8 property 2: `n1 <= 4`), each vertex
/// wildcard-wired to every other so the pattern's own shape does the
/// filtering work during the brute-force cross-check.
pub fn small_expression_graph(
    max_vertices: usize,
) -> impl Strategy<Value = ExpressionGraph<FixtureElement, FixtureScope>> {
    (1..=max_vertices).prop_flat_map(|n| {
        let kinds = prop::collection::vec(prop_oneof![Just("A"), Just("B"), Just("C")], n);
        let edge_flags = prop::collection::vec(any::<bool>(), n * n);
        (kinds, edge_flags).prop_map(move |(kinds, edge_flags)| {
            let mut pattern = ExpressionGraph::new();
            let ids: Vec<ElementId> = kinds
                .iter()
                .map(|k| pattern.add_node(kind_expr(crate::capture::CaptureLabel::Include, k)))
                .collect();
            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    if edge_flags[i * n + j] {
                        pattern.add_edge(ids[i], ids[j], ScopeExpression::wildcard());
                    }
                }
            }
            pattern
        })
    })
}

/// Every injective mapping from `0..n1` pattern indices into the target
/// graph's vertex set, used by the brute-force reference implementation of
/// subgraph isomorphism that property 2's test cross-checks the VF2 matcher
/// against.
pub fn brute_force_has_match<E, S>(
    pattern: &ExpressionGraph<E, S>,
    target: &ElementGraph<E, S>,
) -> bool
where
    E: FlowElement,
{
    let p_ids: Vec<ElementId> = pattern.vertices().collect();
    let t_ids: Vec<ElementId> = target.vertices().collect();
    if p_ids.len() > t_ids.len() {
        return false;
    }
    permutations_of_size(&t_ids, p_ids.len()).into_iter().any(|assignment| {
        candidate_is_isomorphism(pattern, target, &p_ids, &assignment)
    })
}

fn candidate_is_isomorphism<E, S>(
    pattern: &ExpressionGraph<E, S>,
    target: &ElementGraph<E, S>,
    p_ids: &[ElementId],
    assignment: &[ElementId],
) -> bool
where
    E: FlowElement,
{
    for (i, &p) in p_ids.iter().enumerate() {
        let Some(expr) = pattern.node(p) else { return false };
        let Some(elem) = target.element(assignment[i]) else { return false };
        if !expr.accepts(elem) {
            return false;
        }
    }
    let seen: HashSet<ElementId> = assignment.iter().copied().collect();
    if seen.len() != assignment.len() {
        return false;
    }
    for (i, &pu) in p_ids.iter().enumerate() {
        for (j, &pv) in p_ids.iter().enumerate() {
            if i == j {
                continue;
            }
            let bundle = pattern.bundle(pu, pv);
            if bundle.is_empty() {
                continue;
            }
            let tu = assignment[i];
            let tv = assignment[j];
            let target_bundle = target.bundle(tu, tv);
            if target_bundle.is_empty() {
                return false;
            }
        }
    }
    true
}

fn permutations_of_size(items: &[ElementId], k: usize) -> Vec<Vec<ElementId>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    let mut results = Vec::new();
    let mut used = vec![false; items.len()];
    let mut current = Vec::with_capacity(k);
    permute_rec(items, k, &mut used, &mut current, &mut results);
    results
}

fn permute_rec(
    items: &[ElementId],
    k: usize,
    used: &mut [bool],
    current: &mut Vec<ElementId>,
    results: &mut Vec<Vec<ElementId>>,
) {
    if current.len() == k {
        results.push(current.clone());
        return;
    }
    for i in 0..items.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push(items[i]);
        permute_rec(items, k, used, current, results);
        current.pop();
        used[i] = false;
    }
}
