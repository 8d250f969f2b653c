//! Indexed graph views, component C.
//!
//! Before matching, both the P-graph and the E-graph are wrapped in a dense
//! `0..n` integer index (spec.md §4.B/§4.C). Successor/predecessor lists are
//! materialised once against that index; every later lookup the matcher
//! performs is an array index, never a hash lookup or a predicate walk. The
//! indexing order is the sole source of determinism spec.md §5 requires:
//! two runs over structurally identical inputs produce the same index
//! assignment and therefore the same ordered stream of matches.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

use crate::config::SearchOrder;
use crate::element_graph::ElementGraph;
use crate::expression_graph::ExpressionGraph;
use crate::collaborator::FlowElement;
use crate::ids::ElementId;

/// What the indexer needs from a graph: its vertex set and, for each
/// vertex, its out- and in-neighbours (duplicates collapsed — parallel
/// edges are a matter for the matcher's edge-bundle check, not for the
/// adjacency topology the indexer computes order and terminal sets from).
pub trait MatchGraph {
    type VertexId: Copy + Eq + Hash + Ord;

    fn vertex_ids(&self) -> Vec<Self::VertexId>;
    fn out_neighbor_ids(&self, v: Self::VertexId) -> Vec<Self::VertexId>;
    fn in_neighbor_ids(&self, v: Self::VertexId) -> Vec<Self::VertexId>;
}

impl<E: FlowElement, S> MatchGraph for ElementGraph<E, S> {
    type VertexId = ElementId;

    fn vertex_ids(&self) -> Vec<ElementId> {
        self.vertices().collect()
    }

    fn out_neighbor_ids(&self, v: ElementId) -> Vec<ElementId> {
        self.out_edges(v)
            .iter()
            .filter_map(|e| self.endpoints(*e).map(|(_, t)| t))
            .collect()
    }

    fn in_neighbor_ids(&self, v: ElementId) -> Vec<ElementId> {
        self.in_edges(v)
            .iter()
            .filter_map(|e| self.endpoints(*e).map(|(s, _)| s))
            .collect()
    }
}

impl<E: FlowElement, S> MatchGraph for ExpressionGraph<E, S> {
    type VertexId = ElementId;

    fn vertex_ids(&self) -> Vec<ElementId> {
        self.vertices().collect()
    }

    fn out_neighbor_ids(&self, v: ElementId) -> Vec<ElementId> {
        self.out_edges(v)
            .iter()
            .filter_map(|e| self.endpoints(*e).map(|(_, t)| t))
            .collect()
    }

    fn in_neighbor_ids(&self, v: ElementId) -> Vec<ElementId> {
        self.in_edges(v)
            .iter()
            .filter_map(|e| self.endpoints(*e).map(|(s, _)| s))
            .collect()
    }
}

/// A dense `0..n` index over a graph's vertices, with materialised
/// successor/predecessor tables addressed by index rather than by id.
pub struct IndexedGraph<Id> {
    order: Vec<Id>,
    index_of: HashMap<Id, usize>,
    succ: Vec<Vec<usize>>,
    pred: Vec<Vec<usize>>,
}

impl<Id: Copy + Eq + Hash + Ord> IndexedGraph<Id> {
    pub fn build<G: MatchGraph<VertexId = Id>>(graph: &G, order: SearchOrder) -> Self {
        let ordered_ids = compute_order(graph, order);
        let index_of: HashMap<Id, usize> = ordered_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();

        let n = ordered_ids.len();
        let mut succ = vec![Vec::new(); n];
        let mut pred = vec![Vec::new(); n];
        for (i, id) in ordered_ids.iter().enumerate() {
            let mut out_set: Vec<usize> = graph
                .out_neighbor_ids(*id)
                .into_iter()
                .filter_map(|nbr| index_of.get(&nbr).copied())
                .collect();
            out_set.sort_unstable();
            out_set.dedup();
            succ[i] = out_set;

            let mut in_set: Vec<usize> = graph
                .in_neighbor_ids(*id)
                .into_iter()
                .filter_map(|nbr| index_of.get(&nbr).copied())
                .collect();
            in_set.sort_unstable();
            in_set.dedup();
            pred[i] = in_set;
        }

        IndexedGraph {
            order: ordered_ids,
            index_of,
            succ,
            pred,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn id_at(&self, index: usize) -> Id {
        self.order[index]
    }

    pub fn index_of(&self, id: Id) -> Option<usize> {
        self.index_of.get(&id).copied()
    }

    pub fn successors(&self, index: usize) -> &[usize] {
        &self.succ[index]
    }

    pub fn predecessors(&self, index: usize) -> &[usize] {
        &self.pred[index]
    }
}

/// Computes the vertex visitation order the indexer assigns. Falls back to
/// id order (itself deterministic — `ElementId` orders by arena slot then
/// generation) for any vertex a traversal never reaches, which keeps the
/// function total over graphs with cycles even though `Topological` and
/// `DepthFirst`/`BreadthFirst` are really only meaningful over a DAG.
fn compute_order<G: MatchGraph>(graph: &G, order: SearchOrder) -> Vec<G::VertexId> {
    let mut ids = graph.vertex_ids();
    ids.sort_unstable();

    match order {
        SearchOrder::Topological => topological_order(graph, &ids, false),
        SearchOrder::ReverseTopological => topological_order(graph, &ids, true),
        SearchOrder::DepthFirst => dfs_order(graph, &ids),
        SearchOrder::BreadthFirst => bfs_order(graph, &ids),
    }
}

fn topological_order<G: MatchGraph>(graph: &G, ids: &[G::VertexId], reverse: bool) -> Vec<G::VertexId> {
    let mut in_degree: HashMap<G::VertexId, usize> = HashMap::new();
    for id in ids {
        let preds = if reverse {
            graph.out_neighbor_ids(*id)
        } else {
            graph.in_neighbor_ids(*id)
        };
        in_degree.insert(*id, preds.len());
    }

    let mut ready: VecDeque<G::VertexId> = ids.iter().copied().filter(|id| in_degree[id] == 0).collect();
    let mut ready_sorted: Vec<G::VertexId> = ready.drain(..).collect();
    ready_sorted.sort_unstable();
    let mut queue: VecDeque<G::VertexId> = ready_sorted.into();

    let mut result = Vec::with_capacity(ids.len());
    let mut visited: HashSet<G::VertexId> = HashSet::new();

    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        result.push(id);
        let next = if reverse {
            graph.in_neighbor_ids(id)
        } else {
            graph.out_neighbor_ids(id)
        };
        let mut freed = Vec::new();
        for n in next {
            if let Some(d) = in_degree.get_mut(&n) {
                if *d > 0 {
                    *d -= 1;
                    if *d == 0 {
                        freed.push(n);
                    }
                }
            }
        }
        freed.sort_unstable();
        for n in freed {
            queue.push_back(n);
        }
    }

    // Cycle breaker: any vertex a topological walk never reached (part of
    // a cycle, or dominated by one) is appended in deterministic id order.
    for id in ids {
        if visited.insert(*id) {
            result.push(*id);
        }
    }
    result
}

fn bfs_order<G: MatchGraph>(graph: &G, ids: &[G::VertexId]) -> Vec<G::VertexId> {
    let mut visited: HashSet<G::VertexId> = HashSet::new();
    let mut result = Vec::with_capacity(ids.len());
    for root in ids {
        if !visited.insert(*root) {
            continue;
        }
        let mut queue: VecDeque<G::VertexId> = VecDeque::new();
        queue.push_back(*root);
        result.push(*root);
        while let Some(id) = queue.pop_front() {
            let mut next = graph.out_neighbor_ids(id);
            next.sort_unstable();
            for n in next {
                if visited.insert(n) {
                    result.push(n);
                    queue.push_back(n);
                }
            }
        }
    }
    result
}

fn dfs_order<G: MatchGraph>(graph: &G, ids: &[G::VertexId]) -> Vec<G::VertexId> {
    let mut visited: HashSet<G::VertexId> = HashSet::new();
    let mut result = Vec::with_capacity(ids.len());
    for root in ids {
        if visited.contains(root) {
            continue;
        }
        let mut stack = vec![*root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            result.push(id);
            let mut next = graph.out_neighbor_ids(id);
            next.sort_unstable();
            // Push in reverse so the smallest-id child is popped (and thus
            // visited) first, matching the ascending tie-break used by the
            // other three orders.
            for n in next.into_iter().rev() {
                if !visited.contains(&n) {
                    stack.push(n);
                }
            }
        }
    }
    result
}
