//! The expression graph (P-graph), component B.
//!
//! Vertices are element expressions (a predicate over flow elements plus a
//! capture label); edges are scope expressions (a predicate over scopes,
//! with a distinguished wildcard kind). Generalizes the teacher's
//! `GraphClassifier` (`graph/graph_classifier.rs`) idiom of wrapping a
//! boxed closure as the thing the core dispatches through, applied here to
//! the collaborator's own predicate rather than to a shape classifier.

use std::collections::HashMap;

use crate::capture::CaptureLabel;
use crate::collaborator::FlowElement;
use crate::ids::{Arena, ElementId, ScopeId};

/// An element expression: a predicate over flow elements, plus the
/// capture label it contributes under when it participates in a match.
pub struct ElementExpression<E> {
    pub label: CaptureLabel,
    predicate: Box<dyn Fn(&E) -> bool>,
}

impl<E> ElementExpression<E> {
    pub fn new(label: CaptureLabel, predicate: impl Fn(&E) -> bool + 'static) -> Self {
        ElementExpression {
            label,
            predicate: Box::new(predicate),
        }
    }

    pub fn accepts(&self, element: &E) -> bool {
        (self.predicate)(element)
    }
}

/// A scope expression: a predicate over scopes, or the distinguished
/// wildcard ("applies to all") kind (spec.md §3).
pub struct ScopeExpression<S> {
    wildcard: bool,
    predicate: Box<dyn Fn(&S) -> bool>,
}

impl<S> ScopeExpression<S> {
    pub fn new(predicate: impl Fn(&S) -> bool + 'static) -> Self {
        ScopeExpression {
            wildcard: false,
            predicate: Box::new(predicate),
        }
    }

    pub fn wildcard() -> Self {
        ScopeExpression {
            wildcard: true,
            predicate: Box::new(|_| true),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn applies(&self, scope: &S) -> bool {
        (self.predicate)(scope)
    }
}

struct ExprEdge {
    source: ElementId,
    target: ElementId,
}

/// The expression graph. Uses the very same `ElementId`/`ScopeId`
/// generational-id machinery as the element graph (they are never mixed:
/// an `ExpressionGraph`'s ids only ever index into its own arenas).
pub struct ExpressionGraph<E, S> {
    nodes: Arena<ElementExpression<E>>,
    scope_exprs: Arena<ScopeExpression<S>>,
    edges: Arena<ExprEdge>,
    out_edges: HashMap<ElementId, Vec<ScopeId>>,
    in_edges: HashMap<ElementId, Vec<ScopeId>>,
}

impl<E, S> Default for ExpressionGraph<E, S> {
    fn default() -> Self {
        ExpressionGraph {
            nodes: Arena::new(),
            scope_exprs: Arena::new(),
            edges: Arena::new(),
            out_edges: HashMap::new(),
            in_edges: HashMap::new(),
        }
    }
}

impl<E: FlowElement, S> ExpressionGraph<E, S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, expr: ElementExpression<E>) -> ElementId {
        let id = ElementId(self.nodes.insert(expr));
        self.out_edges.insert(id, Vec::new());
        self.in_edges.insert(id, Vec::new());
        id
    }

    pub fn add_edge(&mut self, u: ElementId, v: ElementId, expr: ScopeExpression<S>) -> ScopeId {
        let scope_id = ScopeId(self.scope_exprs.insert(expr));
        let edge_id = ScopeId(self.edges.insert(ExprEdge { source: u, target: v }));
        debug_assert_eq!(scope_id.0, edge_id.0, "scope and edge arenas must stay in lockstep");
        self.out_edges.entry(u).or_default().push(edge_id);
        self.in_edges.entry(v).or_default().push(edge_id);
        edge_id
    }

    pub fn node(&self, id: ElementId) -> Option<&ElementExpression<E>> {
        self.nodes.get(id.0)
    }

    pub fn scope_expr(&self, id: ScopeId) -> Option<&ScopeExpression<S>> {
        self.scope_exprs.get(id.0)
    }

    pub fn vertices(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.nodes.iter().map(|(raw, _)| ElementId(raw))
    }

    pub fn vertex_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn out_edges(&self, v: ElementId) -> &[ScopeId] {
        self.out_edges.get(&v).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn in_edges(&self, v: ElementId) -> &[ScopeId] {
        self.in_edges.get(&v).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn endpoints(&self, id: ScopeId) -> Option<(ElementId, ElementId)> {
        self.edges.get(id.0).map(|e| (e.source, e.target))
    }

    /// All scope-expression edges from `u` to `v`, in insertion order.
    pub fn bundle(&self, u: ElementId, v: ElementId) -> Vec<ScopeId> {
        self.out_edges(u)
            .iter()
            .copied()
            .filter(|e| self.endpoints(*e).map(|(_, t)| t) == Some(v))
            .collect()
    }

    pub fn nodes_with_label(&self, label: CaptureLabel) -> impl Iterator<Item = ElementId> + '_ {
        self.vertices().filter(move |v| self.node(*v).map(|n| n.label) == Some(label))
    }
}
