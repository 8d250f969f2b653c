//! Diagnostic trace surface (spec.md §5/§6): "an optional trace writer...
//! configured once before planning", the single seam through which a
//! collaborator serializes a failing graph — DOT serialization itself
//! stays out of scope (spec.md §1).

use crate::collaborator::{FlowElement, ScopeAlgebra};
use crate::element_graph::ElementGraph;
use crate::error::PlannerError;
use crate::rule::PlanPhase;

/// An opaque handle to the graph a planner failure occurred against. Never
/// interpreted by this crate beyond carrying it to [`TraceSink::on_failure`];
/// a collaborator that wants a DOT (or any other) rendering owns that
/// serialization entirely.
pub struct GraphSnapshotRef<'g, E, S> {
    pub phase: PlanPhase,
    pub rule_name: &'g str,
    pub graph: &'g ElementGraph<E, S>,
}

/// The seam a collaborator implements to observe planner failures, e.g. to
/// serialize the failing graph to DOT with captured elements highlighted
/// (spec.md §6's diagnostic surface). Configured once before planning;
/// there is no global mutable trace state in this crate (spec.md §5).
pub trait TraceSink<E, S> {
    fn on_failure(&self, error: &PlannerError, snapshot: &GraphSnapshotRef<'_, E, S>);

    /// Optional lower-severity hook fired on every phase transition when
    /// `trace.enabled` is set (spec.md §6); the default is a no-op so a
    /// collaborator that only cares about failures needs to implement
    /// nothing but `on_failure`.
    fn on_phase_complete(&self, _phase: PlanPhase, _graph: &ElementGraph<E, S>) {}
}

/// The default trace sink: observes nothing. Installed when the
/// collaborator configures no trace writer of its own.
pub struct NullTraceSink;

impl<E: FlowElement, S: ScopeAlgebra> TraceSink<E, S> for NullTraceSink {
    fn on_failure(&self, _error: &PlannerError, _snapshot: &GraphSnapshotRef<'_, E, S>) {}
}
