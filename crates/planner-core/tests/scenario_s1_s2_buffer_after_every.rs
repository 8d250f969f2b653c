//! S1/S2 — BufferAfterEvery assert (spec.md §8).

use planner_core::capture::CaptureLabel;
use planner_core::config::PlannerConfig;
use planner_core::error::PlannerError;
use planner_core::expression_graph::{ExpressionGraph, ScopeExpression};
use planner_core::match_result::FinderContext;
use planner_core::rule::{AssertRule, PlanPhase, Rule};
use planner_core::test_support::{kind_expr, linear_chain, FixtureElement, FixtureScope};
use planner_core::RuleDriver;

fn pattern() -> ExpressionGraph<FixtureElement, FixtureScope> {
    let mut p = ExpressionGraph::new();
    let group_by = p.add_node(kind_expr(CaptureLabel::Ignore, "GroupBy"));
    let buffer = p.add_node(kind_expr(CaptureLabel::Primary, "EveryBuffer"));
    let every = p.add_node(kind_expr(CaptureLabel::Secondary, "Every"));
    p.add_edge(group_by, buffer, ScopeExpression::wildcard());
    p.add_edge(buffer, every, ScopeExpression::wildcard());
    p
}

#[test]
fn s1_chain_with_trailing_every_trips_the_assert() {
    let _ = env_logger::try_init();
    let (graph, _) = linear_chain(&["GroupBy", "EveryBuffer", "Every"]);
    let pattern = pattern();

    let mut driver: RuleDriver<'_, FixtureElement, FixtureScope> = RuleDriver::new(PlannerConfig::default());
    driver.add_rule(Rule::Assert(AssertRule {
        name: "buffer-after-every".to_string(),
        phase: PlanPhase::PreBalance,
        pattern: &pattern,
        message_template: "{Primary} feeds directly into {Secondary}".to_string(),
    }));

    let err = driver.run(graph, &FinderContext::new()).unwrap_err();
    match err {
        PlannerError::PlannerAssertion { message, rule_name, .. } => {
            assert_eq!(rule_name, "buffer-after-every");
            assert!(message.contains("EveryBuffer"));
            assert!(message.contains("Every"));
        }
        other => panic!("expected PlannerAssertion, got {other:?}"),
    }
}

#[test]
fn s2_chain_without_trailing_every_passes_cleanly() {
    let (graph, _) = linear_chain(&["GroupBy", "EveryBuffer"]);
    let pattern = pattern();

    let mut driver: RuleDriver<'_, FixtureElement, FixtureScope> = RuleDriver::new(PlannerConfig::default());
    driver.add_rule(Rule::Assert(AssertRule {
        name: "buffer-after-every".to_string(),
        phase: PlanPhase::PreBalance,
        pattern: &pattern,
        message_template: "{Primary} feeds directly into {Secondary}".to_string(),
    }));

    let outcome = driver.run(graph, &FinderContext::new()).unwrap();
    assert_eq!(outcome.reports.len(), 1);
    assert!(!outcome.reports[0].changed);
}
