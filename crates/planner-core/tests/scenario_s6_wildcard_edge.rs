//! S6 — Wildcard edge (spec.md §8): a P-graph edge that is the
//! "applies-to-all" wildcard matches any E-graph bundle of one or more
//! parallel scopes, regardless of their content.

use planner_core::capture::CaptureLabel;
use planner_core::config::PlannerConfig;
use planner_core::element_graph::ElementGraph;
use planner_core::expression_graph::{ExpressionGraph, ScopeExpression};
use planner_core::match_result::FinderContext;
use planner_core::test_support::{kind_expr, FixtureElement, FixtureScope};
use planner_core::Matcher;

fn wildcard_pattern() -> ExpressionGraph<FixtureElement, FixtureScope> {
    let mut pattern = ExpressionGraph::new();
    let pu = pattern.add_node(kind_expr(CaptureLabel::Primary, "A"));
    let pv = pattern.add_node(kind_expr(CaptureLabel::Secondary, "B"));
    pattern.add_edge(pu, pv, ScopeExpression::wildcard());
    pattern
}

#[test]
fn wildcard_matches_single_parallel_scope() {
    let mut graph: ElementGraph<FixtureElement, FixtureScope> = ElementGraph::new();
    let u = graph.add_vertex(FixtureElement::new("A", 0));
    let v = graph.add_vertex(FixtureElement::new("B", 0));
    graph.add_edge(u, v, FixtureScope::new(true, "only")).unwrap();

    let pattern = wildcard_pattern();
    let config = PlannerConfig::default();
    let matcher = Matcher::new(&pattern, &graph, FinderContext::new(), &config);
    assert!(matcher.find_first().is_some());
}

#[test]
fn wildcard_matches_any_sized_bundle_of_mixed_scopes() {
    let mut graph: ElementGraph<FixtureElement, FixtureScope> = ElementGraph::new();
    let u = graph.add_vertex(FixtureElement::new("A", 0));
    let v = graph.add_vertex(FixtureElement::new("B", 0));
    graph.add_edge(u, v, FixtureScope::new(true, "one")).unwrap();
    graph.add_edge(u, v, FixtureScope::new(false, "two")).unwrap();
    graph.add_edge(u, v, FixtureScope::new(true, "three")).unwrap();

    let pattern = wildcard_pattern();
    let config = PlannerConfig::default();
    let matcher = Matcher::new(&pattern, &graph, FinderContext::new(), &config);
    assert!(matcher.find_first().is_some());
}

#[test]
fn wildcard_never_matches_an_absent_edge() {
    let mut graph: ElementGraph<FixtureElement, FixtureScope> = ElementGraph::new();
    let u = graph.add_vertex(FixtureElement::new("A", 0));
    let _v = graph.add_vertex(FixtureElement::new("B", 0));
    // No edge between u and v at all.

    let pattern = wildcard_pattern();
    let config = PlannerConfig::default();
    let matcher = Matcher::new(&pattern, &graph, FinderContext::new(), &config);
    assert!(matcher.find_first().is_none());
    let _ = u;
}
