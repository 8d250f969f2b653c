//! `ScopeAlgebra::compose` must form an associative semigroup (DESIGN.md
//! Open Question decision #2): `a.compose(&b).compose(&c)` must equal
//! `a.compose(&b.compose(&c))`, since `removeAndContract` relies on this to
//! give the same composed edge regardless of which neighbouring pair is
//! folded first when chained contractions meet.
//!
//! Checked generically against the crate's own fixture scope type, since
//! the planner core has no scope type of its own — the collaborator
//! supplies one, and only promises the law holds.

use planner_core::collaborator::ScopeAlgebra;
use planner_core::test_support::FixtureScope;
use proptest::prelude::*;

fn arb_scope() -> impl Strategy<Value = FixtureScope> {
    (any::<bool>(), prop_oneof![Just("x"), Just("y"), Just("z")])
        .prop_map(|(blocking, via)| FixtureScope::new(blocking, via))
}

proptest! {
    #[test]
    fn compose_is_associative(a in arb_scope(), b in arb_scope(), c in arb_scope()) {
        let left = a.compose(&b).compose(&c);
        let right = a.compose(&b.compose(&c));
        prop_assert_eq!(left, right);
    }
}

#[test]
fn compose_keeps_the_predecessors_blocking_flag_through_a_three_way_fold() {
    let a = FixtureScope::new(true, "a");
    let b = FixtureScope::new(false, "b");
    let c = FixtureScope::new(true, "c");

    let left = a.compose(&b).compose(&c);
    let right = a.compose(&b.compose(&c));

    assert_eq!(left, right);
    assert!(left.blocking);
    assert_eq!(left.via, vec!["a", "b", "c"]);
}
