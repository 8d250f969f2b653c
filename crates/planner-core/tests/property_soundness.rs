//! Property 1 — Soundness of matching (spec.md §8): if the matcher returns
//! a mapping `m`, every P-vertex's node predicate accepts its image, and
//! every P-edge bundle admits a perfect matching against the target's
//! parallel scopes between the corresponding images.
//!
//! Built with one P-graph vertex per capture label (so `Match::captured`
//! unambiguously names a single pattern vertex's image — the matcher's
//! internal pattern-side index is private, so this is the only externally
//! observable way to recover "which P-vertex produced this image").

use planner_core::capture::CaptureLabel;
use planner_core::config::PlannerConfig;
use planner_core::match_result::FinderContext;
use planner_core::test_support::{kind_expr, small_element_graph, FixtureElement, FixtureScope};
use planner_core::expression_graph::{ExpressionGraph, ScopeExpression};
use planner_core::Matcher;
use proptest::prelude::*;

/// A chain pattern `Primary(A) -> Secondary(B) -> Include(C)`, each vertex
/// carrying a distinct capture label and a distinct accepted kind.
fn labelled_chain_pattern(wildcard: bool) -> ExpressionGraph<FixtureElement, FixtureScope> {
    let mut p = ExpressionGraph::new();
    let a = p.add_node(kind_expr(CaptureLabel::Primary, "A"));
    let b = p.add_node(kind_expr(CaptureLabel::Secondary, "B"));
    let c = p.add_node(kind_expr(CaptureLabel::Include, "C"));
    if wildcard {
        p.add_edge(a, b, ScopeExpression::wildcard());
        p.add_edge(b, c, ScopeExpression::wildcard());
    } else {
        p.add_edge(a, b, ScopeExpression::new(|s: &FixtureScope| s.blocking));
        p.add_edge(b, c, ScopeExpression::new(|s: &FixtureScope| !s.blocking));
    }
    p
}

proptest! {
    #[test]
    fn matches_are_sound(wildcard in any::<bool>(), target in small_element_graph(7)) {
        let pattern = labelled_chain_pattern(wildcard);
        let config = PlannerConfig::default();
        let matcher = Matcher::new(&pattern, &target, FinderContext::new(), &config);

        if let Some(m) = matcher.find_first() {
            let primary = m.primary().expect("Primary vertex always present in this pattern");
            let secondary = m.secondary().expect("Secondary vertex always present in this pattern");
            let include = m.captured(CaptureLabel::Include).first().copied().expect("Include vertex always present");

            prop_assert_eq!(target.element(primary).unwrap().kind, "A");
            prop_assert_eq!(target.element(secondary).unwrap().kind, "B");
            prop_assert_eq!(target.element(include).unwrap().kind, "C");

            let ab_bundle = target.bundle(primary, secondary);
            let bc_bundle = target.bundle(secondary, include);
            if wildcard {
                prop_assert!(!ab_bundle.is_empty());
                prop_assert!(!bc_bundle.is_empty());
            } else {
                prop_assert_eq!(ab_bundle.len(), 1);
                prop_assert!(target.scope(ab_bundle[0]).unwrap().blocking);
                prop_assert_eq!(bc_bundle.len(), 1);
                prop_assert!(!target.scope(bc_bundle[0]).unwrap().blocking);
            }
        }
    }
}
