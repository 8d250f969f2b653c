//! Property 7 — Contraction preserves connectivity (spec.md §8): after any
//! sequence of `removeAndContract`, for every pre-existing pair `(u, v)`
//! with both still present and a directed path between them in the
//! pre-graph, a directed path remains in the post-graph.

use std::collections::{HashSet, VecDeque};

use planner_core::element_graph::ElementGraph;
use planner_core::test_support::{FixtureElement, FixtureScope};

fn reachable(graph: &ElementGraph<FixtureElement, FixtureScope>, from: planner_core::ElementId) -> HashSet<planner_core::ElementId> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(from);
    queue.push_back(from);
    while let Some(v) = queue.pop_front() {
        for e in graph.out_edges(v) {
            if let Some((_, t)) = graph.endpoints(*e) {
                if seen.insert(t) {
                    queue.push_back(t);
                }
            }
        }
    }
    seen
}

#[test]
fn contracting_interior_vertices_preserves_reachability() {
    let mut graph: ElementGraph<FixtureElement, FixtureScope> = ElementGraph::new();
    let source = graph.add_vertex(FixtureElement::new("Source", 0));
    let a = graph.add_vertex(FixtureElement::new("A", 0));
    let b = graph.add_vertex(FixtureElement::new("B", 0));
    let c = graph.add_vertex(FixtureElement::new("C", 0));
    let sink = graph.add_vertex(FixtureElement::new("Sink", 0));
    graph.add_edge(source, a, FixtureScope::new(false, "1")).unwrap();
    graph.add_edge(a, b, FixtureScope::new(false, "2")).unwrap();
    graph.add_edge(b, c, FixtureScope::new(false, "3")).unwrap();
    graph.add_edge(c, sink, FixtureScope::new(false, "4")).unwrap();

    let before_reaches_sink = reachable(&graph, source).contains(&sink);
    assert!(before_reaches_sink);

    graph.remove_and_contract(b).unwrap();
    assert!(reachable(&graph, source).contains(&sink));
    assert!(reachable(&graph, source).contains(&c));

    graph.remove_and_contract(a).unwrap();
    assert!(reachable(&graph, source).contains(&sink));
    assert!(reachable(&graph, source).contains(&c));
}

#[test]
fn contracting_a_branch_point_preserves_reachability_to_every_original_descendant() {
    // source -> split -> { left, right } -> join -> sink
    let mut graph: ElementGraph<FixtureElement, FixtureScope> = ElementGraph::new();
    let source = graph.add_vertex(FixtureElement::new("Source", 0));
    let split = graph.add_vertex(FixtureElement::new("Split", 0));
    let left = graph.add_vertex(FixtureElement::new("Left", 0));
    let right = graph.add_vertex(FixtureElement::new("Right", 0));
    let join = graph.add_vertex(FixtureElement::new("Join", 0));
    graph.add_edge(source, split, FixtureScope::new(false, "1")).unwrap();
    graph.add_edge(split, left, FixtureScope::new(false, "2")).unwrap();
    graph.add_edge(split, right, FixtureScope::new(false, "3")).unwrap();
    graph.add_edge(left, join, FixtureScope::new(false, "4")).unwrap();
    graph.add_edge(right, join, FixtureScope::new(false, "5")).unwrap();

    graph.remove_and_contract(split).unwrap();

    let from_source = reachable(&graph, source);
    assert!(from_source.contains(&left));
    assert!(from_source.contains(&right));
    assert!(from_source.contains(&join));
}
