//! Property 3 — Capture correctness (spec.md §8): for every returned match
//! and every capture label `L`, the captured-element set equals the set of
//! E-graph elements whose index is the image of a P-graph vertex carrying
//! `L`.
//!
//! Built with one P-graph vertex per capture label (all five), each with a
//! distinct accepted kind, so every label's captured set is unambiguously
//! a single known element.

use planner_core::capture::CaptureLabel;
use planner_core::config::PlannerConfig;
use planner_core::element_graph::ElementGraph;
use planner_core::expression_graph::{ExpressionGraph, ScopeExpression};
use planner_core::match_result::FinderContext;
use planner_core::test_support::{kind_expr, FixtureElement, FixtureScope};
use planner_core::Matcher;

#[test]
fn every_label_captures_exactly_its_own_vertex() {
    let mut graph: ElementGraph<FixtureElement, FixtureScope> = ElementGraph::new();
    let p = graph.add_vertex(FixtureElement::new("P", 0));
    let s = graph.add_vertex(FixtureElement::new("S", 0));
    let i = graph.add_vertex(FixtureElement::new("I", 0));
    let x = graph.add_vertex(FixtureElement::new("X", 0));
    let g = graph.add_vertex(FixtureElement::new("G", 0));
    graph.add_edge(p, s, FixtureScope::new(false, "chain")).unwrap();
    graph.add_edge(s, i, FixtureScope::new(false, "chain")).unwrap();
    graph.add_edge(i, x, FixtureScope::new(false, "chain")).unwrap();
    graph.add_edge(x, g, FixtureScope::new(false, "chain")).unwrap();

    let mut pattern: ExpressionGraph<FixtureElement, FixtureScope> = ExpressionGraph::new();
    let pp = pattern.add_node(kind_expr(CaptureLabel::Primary, "P"));
    let ps = pattern.add_node(kind_expr(CaptureLabel::Secondary, "S"));
    let pi = pattern.add_node(kind_expr(CaptureLabel::Include, "I"));
    let px = pattern.add_node(kind_expr(CaptureLabel::Exclude, "X"));
    let pg = pattern.add_node(kind_expr(CaptureLabel::Ignore, "G"));
    pattern.add_edge(pp, ps, ScopeExpression::wildcard());
    pattern.add_edge(ps, pi, ScopeExpression::wildcard());
    pattern.add_edge(pi, px, ScopeExpression::wildcard());
    pattern.add_edge(px, pg, ScopeExpression::wildcard());

    let config = PlannerConfig::default();
    let matcher = Matcher::new(&pattern, &graph, FinderContext::new(), &config);
    let m = matcher.find_first().expect("five-label chain should match the identically-shaped target");

    assert_eq!(m.captured(CaptureLabel::Primary), &[p]);
    assert_eq!(m.captured(CaptureLabel::Secondary), &[s]);
    assert_eq!(m.captured(CaptureLabel::Include), &[i]);
    assert_eq!(m.captured(CaptureLabel::Exclude), &[x]);
    assert_eq!(m.captured(CaptureLabel::Ignore), &[g]);
}

#[test]
fn a_label_with_no_pattern_vertex_captures_nothing() {
    let mut graph: ElementGraph<FixtureElement, FixtureScope> = ElementGraph::new();
    let a = graph.add_vertex(FixtureElement::new("A", 0));

    let mut pattern: ExpressionGraph<FixtureElement, FixtureScope> = ExpressionGraph::new();
    pattern.add_node(kind_expr(CaptureLabel::Primary, "A"));

    let config = PlannerConfig::default();
    let matcher = Matcher::new(&pattern, &graph, FinderContext::new(), &config);
    let m = matcher.find_first().expect("single vertex pattern matches");

    assert_eq!(m.captured(CaptureLabel::Primary), &[a]);
    assert!(m.captured(CaptureLabel::Secondary).is_empty());
    assert!(m.captured(CaptureLabel::Include).is_empty());
    assert!(m.captured(CaptureLabel::Exclude).is_empty());
    assert!(m.captured(CaptureLabel::Ignore).is_empty());
}
