//! The trait surface the flow-element collaborator implements (spec.md §6).
//!
//! The planner core never constructs a flow element or a scope; it only
//! ever receives them, classifies them through these traits, and compares
//! them by identity. This mirrors the teacher's `GraphValue` trait
//! (`graph/graph_classifier.rs`): "the core only needs an identity and a
//! classification, never a concrete type."

use std::hash::Hash;

/// Opaque branching-topology label. The core only ever compares these for
/// equality; it never interprets what a given label means for execution.
/// Kept open (not a closed Rust enum) because spec.md §6 lists `{Splice,
/// Split, LinearIn, LinearOut, SplitOnly, …}` with an explicit ellipsis —
/// the collaborator's topology taxonomy is its own to extend.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Topo(&'static str);

impl Topo {
    pub const fn new(name: &'static str) -> Self {
        Topo(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

/// Canonical topology labels named explicitly in spec.md §6. Not
/// exhaustive — a collaborator may mint its own via `Topo::new`.
pub mod topo {
    use super::Topo;

    pub const SPLICE: Topo = Topo::new("Splice");
    pub const SPLIT: Topo = Topo::new("Split");
    pub const LINEAR_IN: Topo = Topo::new("LinearIn");
    pub const LINEAR_OUT: Topo = Topo::new("LinearOut");
    pub const SPLIT_ONLY: Topo = Topo::new("SplitOnly");
}

/// A flow element: an opaque vertex value of the element graph.
///
/// `Eq + Hash` gives the "stable identity usable as a hash/ordering key"
/// spec.md §6 requires of the collaborator; `Clone` lets the graph hand
/// out owned copies to predicates without borrowing the whole graph.
pub trait FlowElement: Eq + Hash + Clone + std::fmt::Debug {
    fn topology(&self) -> Topo;
}

/// A scope: an opaque edge value carrying dataflow annotations.
///
/// Composition under contraction is delegated to the collaborator and
/// must be associative across successive contractions (spec.md §4.A,
/// §9 "Open questions").
pub trait ScopeAlgebra: Clone {
    /// Compose a predecessor scope with a successor scope into the scope
    /// of the new edge installed by `removeAndContract`.
    fn compose(&self, successor: &Self) -> Self;
}

// spec.md §6 and SPEC_FULL.md §6 describe the scope predicate evaluator as
// `applies(plannerContext, graph, scope) -> bool`, i.e. phase- and
// graph-sensitive. This crate deliberately narrows `ScopeExpression::applies`
// (`expression_graph.rs`) to `scope` alone; see DESIGN.md's Open Question
// decisions for why, and for what a collaborator needing phase-sensitive
// edge predicates would have to add back.
