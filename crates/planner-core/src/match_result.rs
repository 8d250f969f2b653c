//! Match object (component E) and finder context (spec.md §3/§4.E).

use std::collections::{HashMap, HashSet};

use crate::capture::CaptureLabel;
use crate::ids::ElementId;

/// The per-search inputs threaded through a matcher invocation: which
/// E-graph elements may never be matched (`excluded`), which may be
/// matched but never captured as `Primary` unless listed (`required`,
/// unconstrained when empty), and which should be skipped entirely but are
/// not errors to encounter (`ignored`).
#[derive(Clone, Debug, Default)]
pub struct FinderContext {
    pub excluded: HashSet<ElementId>,
    pub required: HashSet<ElementId>,
    pub ignored: HashSet<ElementId>,
}

impl FinderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_excluded(mut self, excluded: impl IntoIterator<Item = ElementId>) -> Self {
        self.excluded.extend(excluded);
        self
    }

    pub fn with_required(mut self, required: impl IntoIterator<Item = ElementId>) -> Self {
        self.required.extend(required);
        self
    }

    pub fn with_ignored(mut self, ignored: impl IntoIterator<Item = ElementId>) -> Self {
        self.ignored.extend(ignored);
        self
    }

    /// spec.md §4.D: "Excluded or ignored elements are never feasible."
    pub fn is_feasible_element(&self, id: ElementId) -> bool {
        !self.excluded.contains(&id) && !self.ignored.contains(&id)
    }

    /// spec.md §4.D: "If the P-graph node carries capture label `Primary`
    /// and the finder context has a non-empty `required` set, the flow
    /// element must be in that set."
    pub fn satisfies_required(&self, id: ElementId) -> bool {
        self.required.is_empty() || self.required.contains(&id)
    }
}

/// A total mapping from P-graph vertex indices to E-graph vertex ids,
/// together with the per-label capture sets it induces. Capture sets
/// preserve the insertion order the match was discovered in, so downstream
/// transforms see a deterministic Primary/Secondary selection (spec.md
/// §4.E).
#[derive(Clone, Debug)]
pub struct Match {
    /// P-graph vertex index -> E-graph vertex id.
    mapping: HashMap<usize, ElementId>,
    captures: HashMap<CaptureLabel, Vec<ElementId>>,
}

impl Match {
    pub fn new(mapping: HashMap<usize, ElementId>, captures: HashMap<CaptureLabel, Vec<ElementId>>) -> Self {
        Match { mapping, captures }
    }

    pub fn image_of(&self, pattern_index: usize) -> Option<ElementId> {
        self.mapping.get(&pattern_index).copied()
    }

    pub fn mapping(&self) -> &HashMap<usize, ElementId> {
        &self.mapping
    }

    /// All E-graph elements captured under `label`, in discovery order.
    /// Empty (never `None`) when no P-graph vertex carries that label.
    pub fn captured(&self, label: CaptureLabel) -> &[ElementId] {
        self.captures.get(&label).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// The single Primary capture, spec.md's common case for transformer
    /// rules (`Replace` et al. demand exactly one).
    pub fn primary(&self) -> Option<ElementId> {
        self.captured(CaptureLabel::Primary).first().copied()
    }

    pub fn secondary(&self) -> Option<ElementId> {
        self.captured(CaptureLabel::Secondary).first().copied()
    }

    /// Every E-graph element the mapping touches, Primary or otherwise —
    /// the set a contraction transform must consider for removal.
    pub fn all_mapped_elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.mapping.values().copied()
    }
}
