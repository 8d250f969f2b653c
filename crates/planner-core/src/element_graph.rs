//! The element graph (E-graph), component A.
//!
//! A directed multi-graph of flow elements connected by scopes. Generalized
//! from the teacher's `pattern_graph::PatternGraph` (a classified
//! `HashMap`-of-containers store) to a single homogeneous vertex/edge arena,
//! since vertex classification here is entirely external
//! (`FlowElement::topology`) rather than intrinsic to the container the way
//! `GraphClass` was.

use std::collections::HashMap;
use std::rc::Rc;

use crate::collaborator::{FlowElement, ScopeAlgebra};
use crate::error::PlannerError;
use crate::ids::{Arena, ElementId, ScopeId};

struct VertexSlot<E> {
    element: Rc<E>,
    bookend: bool,
}

impl<E> Clone for VertexSlot<E> {
    fn clone(&self) -> Self {
        VertexSlot {
            element: Rc::clone(&self.element),
            bookend: self.bookend,
        }
    }
}

struct EdgeSlot<S> {
    source: ElementId,
    target: ElementId,
    scope: Rc<S>,
}

impl<S> Clone for EdgeSlot<S> {
    fn clone(&self) -> Self {
        EdgeSlot {
            source: self.source,
            target: self.target,
            scope: Rc::clone(&self.scope),
        }
    }
}

/// The element graph. `E` and `S` are the collaborator's flow-element and
/// scope types.
///
/// Invariants (spec.md §3): no self-loops; the graph remains weakly
/// connected between `head` and `tail` after any mutation; every edge's
/// endpoints are present as vertices. The planner core does not itself
/// verify weak connectivity after every op (that is a property of a
/// well-formed rule, not something the data structure can cheaply check
/// incrementally); it does enforce the other two.
pub struct ElementGraph<E, S> {
    vertices: Arena<VertexSlot<E>>,
    edges: Arena<EdgeSlot<S>>,
    out_edges: HashMap<ElementId, Vec<ScopeId>>,
    in_edges: HashMap<ElementId, Vec<ScopeId>>,
    head: Option<ElementId>,
    tail: Option<ElementId>,
    /// Bumped by every mutating operation. Two `ElementGraph` values with
    /// the same version are, for the driver's purposes, "the same end
    /// graph" (DESIGN.md Open Question decision #1) — including the case
    /// where a rule mutated and then reverted its own copy, which still
    /// bumps the version and so is correctly treated as "changed".
    version: u64,
}

impl<E, S> Clone for ElementGraph<E, S> {
    fn clone(&self) -> Self {
        ElementGraph {
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
            out_edges: self.out_edges.clone(),
            in_edges: self.in_edges.clone(),
            head: self.head,
            tail: self.tail,
            version: self.version,
        }
    }
}

impl<E, S> Default for ElementGraph<E, S> {
    fn default() -> Self {
        ElementGraph {
            vertices: Arena::new(),
            edges: Arena::new(),
            out_edges: HashMap::new(),
            in_edges: HashMap::new(),
            head: None,
            tail: None,
            version: 0,
        }
    }
}

impl<E: FlowElement, S: ScopeAlgebra> ElementGraph<E, S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    pub fn head(&self) -> Option<ElementId> {
        self.head
    }

    pub fn tail(&self) -> Option<ElementId> {
        self.tail
    }

    pub fn set_head(&mut self, id: ElementId) {
        if let Some(slot) = self.vertices.get_mut(id.0) {
            slot.bookend = true;
        }
        self.head = Some(id);
    }

    pub fn set_tail(&mut self, id: ElementId) {
        if let Some(slot) = self.vertices.get_mut(id.0) {
            slot.bookend = true;
        }
        self.tail = Some(id);
    }

    pub fn is_bookend(&self, id: ElementId) -> bool {
        self.vertices.get(id.0).map(|s| s.bookend).unwrap_or(false)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.vertices.iter().map(|(raw, _)| ElementId(raw))
    }

    pub fn edges(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.edges.iter().map(|(raw, _)| ScopeId(raw))
    }

    pub fn element(&self, id: ElementId) -> Option<&E> {
        self.vertices.get(id.0).map(|s| s.element.as_ref())
    }

    pub fn contains_vertex(&self, id: ElementId) -> bool {
        self.vertices.contains(id.0)
    }

    pub fn scope(&self, id: ScopeId) -> Option<&S> {
        self.edges.get(id.0).map(|s| s.scope.as_ref())
    }

    pub fn endpoints(&self, id: ScopeId) -> Option<(ElementId, ElementId)> {
        self.edges.get(id.0).map(|e| (e.source, e.target))
    }

    pub fn out_edges(&self, v: ElementId) -> &[ScopeId] {
        self.out_edges.get(&v).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn in_edges(&self, v: ElementId) -> &[ScopeId] {
        self.in_edges.get(&v).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All edges from `u` to `v` (a "bundle"), in insertion order.
    pub fn bundle(&self, u: ElementId, v: ElementId) -> Vec<ScopeId> {
        self.out_edges(u)
            .iter()
            .copied()
            .filter(|e| self.endpoints(*e).map(|(_, t)| t) == Some(v))
            .collect()
    }

    pub fn add_vertex(&mut self, element: E) -> ElementId {
        let id = ElementId(self.vertices.insert(VertexSlot {
            element: Rc::new(element),
            bookend: false,
        }));
        self.out_edges.insert(id, Vec::new());
        self.in_edges.insert(id, Vec::new());
        self.bump();
        id
    }

    pub fn add_edge(&mut self, u: ElementId, v: ElementId, scope: S) -> Result<ScopeId, PlannerError> {
        if u == v {
            return Err(PlannerError::graph_shape("self-loops are not permitted"));
        }
        if !self.vertices.contains(u.0) {
            return Err(PlannerError::graph_shape(format!("add_edge: unknown source {:?}", u)));
        }
        if !self.vertices.contains(v.0) {
            return Err(PlannerError::graph_shape(format!("add_edge: unknown target {:?}", v)));
        }
        let id = ScopeId(self.edges.insert(EdgeSlot {
            source: u,
            target: v,
            scope: Rc::new(scope),
        }));
        self.out_edges.entry(u).or_default().push(id);
        self.in_edges.entry(v).or_default().push(id);
        self.bump();
        Ok(id)
    }

    fn remove_edge(&mut self, id: ScopeId) {
        if let Some(edge) = self.edges.remove(id.0) {
            if let Some(list) = self.out_edges.get_mut(&edge.source) {
                list.retain(|e| *e != id);
            }
            if let Some(list) = self.in_edges.get_mut(&edge.target) {
                list.retain(|e| *e != id);
            }
        }
    }

    /// `removeAndContract(v)` (spec.md §4.A): for every (predecessor,
    /// successor) pair of `v`, install a composed edge, then remove `v`.
    pub fn remove_and_contract(&mut self, v: ElementId) -> Result<(), PlannerError> {
        if !self.vertices.contains(v.0) {
            return Err(PlannerError::graph_shape(format!(
                "remove_and_contract: unknown vertex {:?}",
                v
            )));
        }
        let incoming: Vec<ScopeId> = self.in_edges(v).to_vec();
        let outgoing: Vec<ScopeId> = self.out_edges(v).to_vec();

        let mut new_edges = Vec::new();
        for &pred_edge in &incoming {
            let (p, _) = self.endpoints(pred_edge).expect("incoming edge endpoints");
            let pred_scope = Rc::clone(&self.edges.get(pred_edge.0).unwrap().scope);
            for &succ_edge in &outgoing {
                let (_, s) = self.endpoints(succ_edge).expect("outgoing edge endpoints");
                let succ_scope = Rc::clone(&self.edges.get(succ_edge.0).unwrap().scope);
                if p == s {
                    // Would reintroduce a self-loop through the removed
                    // vertex; composition still happens for scope
                    // continuity bookkeeping elsewhere, but no edge is
                    // installed here (self-loops are forbidden).
                    continue;
                }
                let composed = pred_scope.compose(&succ_scope);
                new_edges.push((p, s, composed));
            }
        }

        for edge in incoming.iter().chain(outgoing.iter()) {
            self.remove_edge(*edge);
        }
        self.vertices.remove(v.0);
        self.out_edges.remove(&v);
        self.in_edges.remove(&v);

        for (p, s, scope) in new_edges {
            self.add_edge(p, s, scope)?;
        }
        self.bump();
        Ok(())
    }

    /// `replaceElementWith(old, new)` (spec.md §4.A): rewire every edge of
    /// `old` to terminate at `new`, preserving scope identity and order,
    /// then remove `old`. `new` must already be a vertex of the graph.
    pub fn replace_element_with(&mut self, old: ElementId, new: ElementId) -> Result<(), PlannerError> {
        if !self.vertices.contains(old.0) {
            return Err(PlannerError::graph_shape(format!(
                "replace_element_with: unknown vertex {:?}",
                old
            )));
        }
        if !self.vertices.contains(new.0) {
            return Err(PlannerError::graph_shape(format!(
                "replace_element_with: unknown replacement {:?}",
                new
            )));
        }
        let incoming: Vec<ScopeId> = self.in_edges(old).to_vec();
        let outgoing: Vec<ScopeId> = self.out_edges(old).to_vec();

        for edge in incoming {
            // An edge `new -> old` would become a `new -> new` self-loop
            // under naive rewiring; since `old` is being removed entirely,
            // this edge has no image in the replaced graph and is dropped
            // rather than retained as a self-loop (spec.md §9 S3: the
            // direct `Primary -> Secondary` edge simply disappears).
            let (source, _) = self.endpoints(edge).expect("incoming edge endpoints");
            if source == new {
                self.remove_edge(edge);
                continue;
            }
            if let Some(slot) = self.edges.get_mut(edge.0) {
                slot.target = new;
            }
            if let Some(l) = self.in_edges.get_mut(&old) {
                l.retain(|e| *e != edge);
            }
            self.in_edges.entry(new).or_default().push(edge);
        }
        for edge in outgoing {
            let (_, target) = self.endpoints(edge).expect("outgoing edge endpoints");
            if target == new {
                self.remove_edge(edge);
                continue;
            }
            if let Some(slot) = self.edges.get_mut(edge.0) {
                slot.source = new;
            }
            if let Some(l) = self.out_edges.get_mut(&old) {
                l.retain(|e| *e != edge);
            }
            self.out_edges.entry(new).or_default().push(edge);
        }

        self.vertices.remove(old.0);
        self.out_edges.remove(&old);
        self.in_edges.remove(&old);
        if self.head == Some(old) {
            self.head = Some(new);
        }
        if self.tail == Some(old) {
            self.tail = Some(new);
        }
        self.bump();
        Ok(())
    }

    /// `insertFlowElementAfter(prev, new)` (spec.md §4.A): splits every
    /// outgoing edge `prev -> s` into `prev -> new -> s`. The leg retaining
    /// the original scope is `prev -> new`; `new -> s` carries
    /// `default_scope` — a fixed, documented choice (spec.md leaves which
    /// leg gets which scope to the implementer, "the collaborator is free
    /// to normalise afterwards").
    pub fn insert_flow_element_after(
        &mut self,
        prev: ElementId,
        new_element: E,
        default_scope: S,
    ) -> Result<ElementId, PlannerError> {
        if !self.vertices.contains(prev.0) {
            return Err(PlannerError::graph_shape(format!(
                "insert_flow_element_after: unknown vertex {:?}",
                prev
            )));
        }
        let new_vertex = self.add_vertex(new_element);
        let outgoing: Vec<ScopeId> = self.out_edges(prev).to_vec();
        for edge in outgoing {
            let (_, target) = self.endpoints(edge).expect("outgoing edge endpoints");
            let original_scope = (*self.edges.get(edge.0).unwrap().scope).clone();
            self.remove_edge(edge);
            self.add_edge(prev, new_vertex, original_scope)?;
            self.add_edge(new_vertex, target, default_scope.clone())?;
        }
        self.bump();
        Ok(new_vertex)
    }

    /// `mask(hide)` (spec.md §4.A): a read-only view omitting the given
    /// vertices (typically `head`/`tail`) without copying.
    pub fn mask<'g>(&'g self, hide: impl IntoIterator<Item = ElementId>) -> MaskedView<'g, E, S> {
        MaskedView {
            graph: self,
            hidden: hide.into_iter().collect(),
        }
    }

    pub fn mask_bookends(&self) -> MaskedView<'_, E, S> {
        self.mask(self.head.into_iter().chain(self.tail))
    }

    /// `copy()` (spec.md §4.A): a deep copy of the graph's structure;
    /// elements and scopes are shared by reference (the `Rc` clones are
    /// pointer bumps, not deep clones of `E`/`S`).
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Structural equality: compares vertex and edge values id-for-id,
    /// used as the defensive secondary check for "end graph identical"
    /// (DESIGN.md Open Question decision #1). Meaningful whenever both
    /// graphs descend from a common `copy()` (the usual case: a rule's
    /// input snapshot vs. its returned end graph), since `copy()`
    /// preserves `ElementId`/`ScopeId` numbering exactly.
    pub fn structural_eq(&self, other: &Self) -> bool
    where
        E: PartialEq,
        S: PartialEq,
    {
        if self.vertex_count() != other.vertex_count() || self.edge_count() != other.edge_count() {
            return false;
        }
        for id in self.vertices() {
            match (self.element(id), other.element(id)) {
                (Some(a), Some(b)) if a == b => {}
                _ => return false,
            }
        }
        for id in self.edges() {
            if self.endpoints(id) != other.endpoints(id) {
                return false;
            }
            match (self.scope(id), other.scope(id)) {
                (Some(a), Some(b)) if a == b => {}
                _ => return false,
            }
        }
        true
    }
}

/// A read-only view over an `ElementGraph` that omits a fixed set of
/// vertices without copying the underlying graph (spec.md §4.A `mask`).
/// Mirrors the teacher's `GraphView`/`frame_query` pattern of restricting
/// a base query by predicate instead of materializing a new container.
pub struct MaskedView<'g, E, S> {
    graph: &'g ElementGraph<E, S>,
    hidden: std::collections::HashSet<ElementId>,
}

impl<'g, E: FlowElement, S: ScopeAlgebra> MaskedView<'g, E, S> {
    pub fn vertices(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.graph.vertices().filter(move |v| !self.hidden.contains(v))
    }

    pub fn element(&self, id: ElementId) -> Option<&E> {
        if self.hidden.contains(&id) {
            return None;
        }
        self.graph.element(id)
    }

    pub fn out_edges(&self, v: ElementId) -> impl Iterator<Item = ScopeId> + '_ {
        self.graph
            .out_edges(v)
            .iter()
            .copied()
            .filter(move |e| {
                self.graph
                    .endpoints(*e)
                    .map(|(_, t)| !self.hidden.contains(&t))
                    .unwrap_or(false)
            })
    }

    pub fn underlying(&self) -> &'g ElementGraph<E, S> {
        self.graph
    }
}
