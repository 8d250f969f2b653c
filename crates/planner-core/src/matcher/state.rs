//! VF2 matcher state (spec.md §4.D): the six core arrays and seven scalar
//! counters the algorithm backtracks over.

/// `core1[i]`/`core2[j]`, the `in*`/`out*` generation stamps, and the
/// terminal-set counters, sized `n1` (pattern) and `n2` (target) at
/// construction and never resized afterwards.
pub struct MatcherState {
    core1: Vec<Option<usize>>,
    core2: Vec<Option<usize>>,
    in1: Vec<u32>,
    out1: Vec<u32>,
    in2: Vec<u32>,
    out2: Vec<u32>,
    core_len: usize,
    pub(super) t1in_len: usize,
    pub(super) t1out_len: usize,
    pub(super) t1both_len: usize,
    pub(super) t2in_len: usize,
    pub(super) t2out_len: usize,
    pub(super) t2both_len: usize,
}

impl MatcherState {
    pub fn new(n1: usize, n2: usize) -> Self {
        MatcherState {
            core1: vec![None; n1],
            core2: vec![None; n2],
            in1: vec![0; n1],
            out1: vec![0; n1],
            in2: vec![0; n2],
            out2: vec![0; n2],
            core_len: 0,
            t1in_len: 0,
            t1out_len: 0,
            t1both_len: 0,
            t2in_len: 0,
            t2out_len: 0,
            t2both_len: 0,
        }
    }

    pub fn n1(&self) -> usize {
        self.core1.len()
    }

    pub fn n2(&self) -> usize {
        self.core2.len()
    }

    pub fn core_len(&self) -> usize {
        self.core_len
    }

    pub fn is_goal(&self) -> bool {
        self.core_len == self.n1()
    }

    pub fn mapped1(&self, i: usize) -> Option<usize> {
        self.core1[i]
    }

    pub fn mapped2(&self, j: usize) -> Option<usize> {
        self.core2[j]
    }

    pub fn is_mapped1(&self, i: usize) -> bool {
        self.core1[i].is_some()
    }

    pub fn is_mapped2(&self, j: usize) -> bool {
        self.core2[j].is_some()
    }

    pub fn in_terminal1(&self, i: usize) -> bool {
        !self.is_mapped1(i) && self.in1[i] > 0
    }

    pub fn out_terminal1(&self, i: usize) -> bool {
        !self.is_mapped1(i) && self.out1[i] > 0
    }

    pub fn in_terminal2(&self, j: usize) -> bool {
        !self.is_mapped2(j) && self.in2[j] > 0
    }

    pub fn out_terminal2(&self, j: usize) -> bool {
        !self.is_mapped2(j) && self.out2[j] > 0
    }

    pub fn is_free1(&self, i: usize) -> bool {
        !self.is_mapped1(i) && self.in1[i] == 0 && self.out1[i] == 0
    }

    pub fn is_free2(&self, j: usize) -> bool {
        !self.is_mapped2(j) && self.in2[j] == 0 && self.out2[j] == 0
    }

    /// `isDead()` (spec.md §4.D): abandon a branch the moment any terminal
    /// set has grown strictly past what the target side can supply.
    pub fn is_dead(&self) -> bool {
        self.n1() > self.n2()
            || self.t1in_len > self.t2in_len
            || self.t1out_len > self.t2out_len
            || self.t1both_len > self.t2both_len
    }

    /// `addPair(i, j)`: map pattern index `i` to target index `j`, then
    /// stamp every still-unmapped neighbour of either that just became a
    /// terminal-set member. `p_succ`/`p_pred` are `i`'s pattern-graph
    /// neighbours; `t_succ`/`t_pred` are `j`'s target-graph neighbours.
    pub fn add_pair(
        &mut self,
        i: usize,
        j: usize,
        p_succ: &[usize],
        p_pred: &[usize],
        t_succ: &[usize],
        t_pred: &[usize],
    ) {
        debug_assert!(self.core1[i].is_none());
        debug_assert!(self.core2[j].is_none());

        // `i`/`j` themselves stop counting as unmapped terminal members.
        self.retire_from_terminal_sets_1(i);
        self.retire_from_terminal_sets_2(j);

        self.core1[i] = Some(j);
        self.core2[j] = Some(i);
        self.core_len += 1;
        let stamp = self.core_len as u32;

        for &nb in p_succ {
            if self.core1[nb].is_none() && self.out1[nb] == 0 {
                self.out1[nb] = stamp;
                self.t1out_len += 1;
                if self.in1[nb] > 0 {
                    self.t1both_len += 1;
                }
            }
        }
        for &nb in p_pred {
            if self.core1[nb].is_none() && self.in1[nb] == 0 {
                self.in1[nb] = stamp;
                self.t1in_len += 1;
                if self.out1[nb] > 0 {
                    self.t1both_len += 1;
                }
            }
        }
        for &nb in t_succ {
            if self.core2[nb].is_none() && self.out2[nb] == 0 {
                self.out2[nb] = stamp;
                self.t2out_len += 1;
                if self.in2[nb] > 0 {
                    self.t2both_len += 1;
                }
            }
        }
        for &nb in t_pred {
            if self.core2[nb].is_none() && self.in2[nb] == 0 {
                self.in2[nb] = stamp;
                self.t2in_len += 1;
                if self.out2[nb] > 0 {
                    self.t2both_len += 1;
                }
            }
        }
    }

    /// `backTrack()`: reverses exactly the entries stamped by the matching
    /// `add_pair`, leaving the state bit-identical to before it ran
    /// (spec.md §4.D, §8 property 6).
    pub fn back_track(
        &mut self,
        i: usize,
        j: usize,
        p_succ: &[usize],
        p_pred: &[usize],
        t_succ: &[usize],
        t_pred: &[usize],
    ) {
        let stamp = self.core_len as u32;
        debug_assert_eq!(self.core1[i], Some(j));

        for &nb in p_succ {
            if self.out1[nb] == stamp {
                let was_both = self.in1[nb] > 0;
                self.out1[nb] = 0;
                self.t1out_len -= 1;
                if was_both {
                    self.t1both_len -= 1;
                }
            }
        }
        for &nb in p_pred {
            if self.in1[nb] == stamp {
                let was_both = self.out1[nb] > 0;
                self.in1[nb] = 0;
                self.t1in_len -= 1;
                if was_both {
                    self.t1both_len -= 1;
                }
            }
        }
        for &nb in t_succ {
            if self.out2[nb] == stamp {
                let was_both = self.in2[nb] > 0;
                self.out2[nb] = 0;
                self.t2out_len -= 1;
                if was_both {
                    self.t2both_len -= 1;
                }
            }
        }
        for &nb in t_pred {
            if self.in2[nb] == stamp {
                let was_both = self.out2[nb] > 0;
                self.in2[nb] = 0;
                self.t2in_len -= 1;
                if was_both {
                    self.t2both_len -= 1;
                }
            }
        }

        self.core1[i] = None;
        self.core2[j] = None;
        self.core_len -= 1;

        self.restore_to_terminal_sets_1(i);
        self.restore_to_terminal_sets_2(j);
    }

    fn retire_from_terminal_sets_1(&mut self, i: usize) {
        let was_in = self.in1[i] > 0;
        let was_out = self.out1[i] > 0;
        if was_in {
            self.t1in_len -= 1;
        }
        if was_out {
            self.t1out_len -= 1;
        }
        if was_in && was_out {
            self.t1both_len -= 1;
        }
    }

    fn restore_to_terminal_sets_1(&mut self, i: usize) {
        let was_in = self.in1[i] > 0;
        let was_out = self.out1[i] > 0;
        if was_in {
            self.t1in_len += 1;
        }
        if was_out {
            self.t1out_len += 1;
        }
        if was_in && was_out {
            self.t1both_len += 1;
        }
    }

    fn retire_from_terminal_sets_2(&mut self, j: usize) {
        let was_in = self.in2[j] > 0;
        let was_out = self.out2[j] > 0;
        if was_in {
            self.t2in_len -= 1;
        }
        if was_out {
            self.t2out_len -= 1;
        }
        if was_in && was_out {
            self.t2both_len -= 1;
        }
    }

    fn restore_to_terminal_sets_2(&mut self, j: usize) {
        let was_in = self.in2[j] > 0;
        let was_out = self.out2[j] > 0;
        if was_in {
            self.t2in_len += 1;
        }
        if was_out {
            self.t2out_len += 1;
        }
        if was_in && was_out {
            self.t2both_len += 1;
        }
    }
}

impl PartialEq for MatcherState {
    fn eq(&self, other: &Self) -> bool {
        self.core1 == other.core1
            && self.core2 == other.core2
            && self.in1 == other.in1
            && self.out1 == other.out1
            && self.in2 == other.in2
            && self.out2 == other.out2
            && self.core_len == other.core_len
            && self.t1in_len == other.t1in_len
            && self.t1out_len == other.t1out_len
            && self.t1both_len == other.t1both_len
            && self.t2in_len == other.t2in_len
            && self.t2out_len == other.t2out_len
            && self.t2both_len == other.t2both_len
    }
}

impl Clone for MatcherState {
    fn clone(&self) -> Self {
        MatcherState {
            core1: self.core1.clone(),
            core2: self.core2.clone(),
            in1: self.in1.clone(),
            out1: self.out1.clone(),
            in2: self.in2.clone(),
            out2: self.out2.clone(),
            core_len: self.core_len,
            t1in_len: self.t1in_len,
            t1out_len: self.t1out_len,
            t1both_len: self.t1both_len,
            t2in_len: self.t2in_len,
            t2out_len: self.t2out_len,
            t2both_len: self.t2both_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_backtrack_is_identity() {
        let mut state = MatcherState::new(3, 3);
        let before = state.clone();
        state.add_pair(0, 0, &[1], &[], &[1], &[]);
        assert_ne!(state, before);
        state.back_track(0, 0, &[1], &[], &[1], &[]);
        assert_eq!(state, before);
    }

    #[test]
    fn nested_add_then_backtrack_is_identity() {
        let mut state = MatcherState::new(3, 3);
        state.add_pair(0, 0, &[1], &[], &[1], &[]);
        let checkpoint = state.clone();
        state.add_pair(1, 1, &[2], &[0], &[2], &[0]);
        state.back_track(1, 1, &[2], &[0], &[2], &[0]);
        assert_eq!(state, checkpoint);
    }
}
