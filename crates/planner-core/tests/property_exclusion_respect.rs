//! Property 4 — Exclusion respect (spec.md §8): no match ever contains an
//! excluded or ignored E-element; if `required` is non-empty, every
//! Primary-captured element is in `required`.

use planner_core::capture::CaptureLabel;
use planner_core::config::PlannerConfig;
use planner_core::element_graph::ElementGraph;
use planner_core::expression_graph::ExpressionGraph;
use planner_core::match_result::FinderContext;
use planner_core::test_support::{kind_expr, FixtureElement, FixtureScope};
use planner_core::Matcher;

fn three_candidates() -> (ElementGraph<FixtureElement, FixtureScope>, Vec<planner_core::ElementId>) {
    let mut graph: ElementGraph<FixtureElement, FixtureScope> = ElementGraph::new();
    let a = graph.add_vertex(FixtureElement::new("A", 0));
    let b = graph.add_vertex(FixtureElement::new("A", 1));
    let c = graph.add_vertex(FixtureElement::new("A", 2));
    (graph, vec![a, b, c])
}

fn primary_a_pattern() -> ExpressionGraph<FixtureElement, FixtureScope> {
    let mut p = ExpressionGraph::new();
    p.add_node(kind_expr(CaptureLabel::Primary, "A"));
    p
}

#[test]
fn excluded_elements_are_never_matched() {
    let (graph, ids) = three_candidates();
    let pattern = primary_a_pattern();
    let config = PlannerConfig::default();

    let finder = FinderContext::new().with_excluded([ids[0], ids[1]]);
    let matcher = Matcher::new(&pattern, &graph, finder, &config);
    let m = matcher.find_first().expect("the unexcluded candidate still matches");
    assert_eq!(m.primary(), Some(ids[2]));
}

#[test]
fn excluding_every_candidate_yields_no_match() {
    let (graph, ids) = three_candidates();
    let pattern = primary_a_pattern();
    let config = PlannerConfig::default();

    let finder = FinderContext::new().with_excluded(ids);
    let matcher = Matcher::new(&pattern, &graph, finder, &config);
    assert!(matcher.find_first().is_none());
}

#[test]
fn ignored_elements_are_never_matched() {
    let (graph, ids) = three_candidates();
    let pattern = primary_a_pattern();
    let config = PlannerConfig::default();

    let finder = FinderContext::new().with_ignored([ids[0], ids[1], ids[2]]);
    let matcher = Matcher::new(&pattern, &graph, finder, &config);
    assert!(matcher.find_first().is_none());
}

#[test]
fn required_set_constrains_the_primary_capture() {
    let (graph, ids) = three_candidates();
    let pattern = primary_a_pattern();
    let config = PlannerConfig::default();

    let finder = FinderContext::new().with_required([ids[1]]);
    let matcher = Matcher::new(&pattern, &graph, finder, &config);
    let m = matcher.find_first().expect("the required candidate is still matchable");
    assert_eq!(m.primary(), Some(ids[1]));
}

#[test]
fn empty_required_set_is_unconstrained() {
    let (graph, ids) = three_candidates();
    let pattern = primary_a_pattern();
    let config = PlannerConfig::default();

    let finder = FinderContext::new();
    let matcher = Matcher::new(&pattern, &graph, finder, &config);
    let m = matcher.find_first().expect("some candidate matches");
    assert!(ids.contains(&m.primary().unwrap()));
}
