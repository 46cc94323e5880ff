use socialgraph_core::{Edge, Outcome, SkipReason, Vertex, VertexId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Stable handle of a stored edge. Handles grow monotonically, so ordering
/// by handle is insertion order.
pub type EdgeId = u64;

/// Owning vertex/edge store with per-vertex adjacency and a per-kind index.
///
/// The store does not validate that edge endpoints exist; that is the
/// caller's job. It does guarantee that removing a vertex removes every
/// edge touching it.
pub struct GraphStore<V: Vertex, E: Edge> {
    vertices: BTreeMap<VertexId, V>,
    edges: BTreeMap<EdgeId, E>,
    outgoing: HashMap<VertexId, Vec<EdgeId>>,
    incoming: HashMap<VertexId, Vec<EdgeId>>,
    by_kind: HashMap<E::Kind, BTreeSet<EdgeId>>,
    next_edge_id: EdgeId,
}

impl<V: Vertex, E: Edge> GraphStore<V, E> {
    pub fn new() -> Self {
        Self {
            vertices: BTreeMap::new(),
            edges: BTreeMap::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            by_kind: HashMap::new(),
            next_edge_id: 0,
        }
    }

    pub fn add_vertex(&mut self, vertex: V) -> Outcome {
        let id = vertex.id();
        if self.vertices.contains_key(&id) {
            return Outcome::Skipped(SkipReason::DuplicateVertex(id));
        }
        self.vertices.insert(id, vertex);
        Outcome::Applied
    }

    /// Remove a vertex together with every edge it is the source or
    /// destination of. Incident edges are dropped even if the vertex itself
    /// was never stored.
    pub fn remove_vertex(&mut self, id: VertexId) -> Option<V> {
        let mut incident: BTreeSet<EdgeId> = BTreeSet::new();
        incident.extend(self.outgoing.remove(&id).unwrap_or_default());
        incident.extend(self.incoming.remove(&id).unwrap_or_default());

        let removed_edges = incident
            .into_iter()
            .filter_map(|edge_id| self.remove_edge_by_id(edge_id))
            .count();

        let vertex = self.vertices.remove(&id);
        if vertex.is_some() || removed_edges > 0 {
            debug!("Removed vertex {} with {} incident edges", id, removed_edges);
        }
        vertex
    }

    pub fn vertex(&self, id: VertexId) -> Option<&V> {
        self.vertices.get(&id)
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut V> {
        self.vertices.get_mut(&id)
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// All vertices in ascending id order.
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.values()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    pub fn add_edge(&mut self, edge: E) -> EdgeId {
        let id = self.next_edge_id;
        self.next_edge_id += 1;

        self.outgoing.entry(edge.from()).or_default().push(id);
        if let Some(to) = edge.to() {
            self.incoming.entry(to).or_default().push(id);
        }
        self.by_kind.entry(edge.kind()).or_default().insert(id);
        self.edges.insert(id, edge);
        id
    }

    /// Remove the earliest-inserted edge `from -> to` of any kind.
    pub fn remove_edge(&mut self, from: VertexId, to: VertexId) -> Option<E> {
        let id = self.find_edge(from, to, |_| true)?;
        self.remove_edge_by_id(id)
    }

    /// Remove the earliest-inserted edge `from -> to` of the given kind.
    pub fn remove_edge_of_kind(&mut self, from: VertexId, to: VertexId, kind: E::Kind) -> Option<E> {
        let id = self.find_edge(from, to, |edge| edge.kind() == kind)?;
        self.remove_edge_by_id(id)
    }

    pub fn remove_edge_by_id(&mut self, id: EdgeId) -> Option<E> {
        let edge = self.edges.remove(&id)?;

        detach(&mut self.outgoing, edge.from(), id);
        if let Some(to) = edge.to() {
            detach(&mut self.incoming, to, id);
        }
        if let Some(ids) = self.by_kind.get_mut(&edge.kind()) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_kind.remove(&edge.kind());
            }
        }
        Some(edge)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&E> {
        self.edges.get(&id)
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &E> {
        self.edges.values()
    }

    /// All edges with their handles, in insertion order.
    pub fn edge_entries(&self) -> impl Iterator<Item = (EdgeId, &E)> {
        self.edges.iter().map(|(id, edge)| (*id, edge))
    }

    /// Edges whose source is `id`, in insertion order.
    pub fn outgoing(&self, id: VertexId) -> impl Iterator<Item = &E> {
        self.resolve(self.outgoing.get(&id))
    }

    /// Edges whose destination is `id`, in insertion order.
    pub fn incoming(&self, id: VertexId) -> impl Iterator<Item = &E> {
        self.resolve(self.incoming.get(&id))
    }

    /// Destinations one outgoing edge away from `id`. A destination appears
    /// once per connecting edge.
    pub fn neighbors(&self, id: VertexId) -> Vec<VertexId> {
        self.outgoing(id).filter_map(|edge| edge.to()).collect()
    }

    pub fn neighbors_of_kind(&self, id: VertexId, kind: E::Kind) -> Vec<VertexId> {
        self.outgoing(id)
            .filter(|edge| edge.kind() == kind)
            .filter_map(|edge| edge.to())
            .collect()
    }

    /// Edges of one kind, in insertion order.
    pub fn edges_of_kind(&self, kind: E::Kind) -> Vec<&E> {
        self.by_kind
            .get(&kind)
            .map(|ids| ids.iter().filter_map(|id| self.edges.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn has_edge_of_kind(&self, from: VertexId, to: VertexId, kind: E::Kind) -> bool {
        self.find_edge(from, to, |edge| edge.kind() == kind).is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn find_edge(&self, from: VertexId, to: VertexId, pred: impl Fn(&E) -> bool) -> Option<EdgeId> {
        self.outgoing.get(&from)?.iter().copied().find(|id| {
            self.edges
                .get(id)
                .is_some_and(|edge| edge.to() == Some(to) && pred(edge))
        })
    }

    fn resolve<'a>(&'a self, ids: Option<&'a Vec<EdgeId>>) -> impl Iterator<Item = &'a E> + 'a {
        ids.into_iter()
            .flatten()
            .filter_map(move |id| self.edges.get(id))
    }
}

impl<V: Vertex, E: Edge> Default for GraphStore<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Count the edges of `kind` in an arbitrary edge sequence.
pub fn count_kind<'a, E: Edge + 'a>(edges: impl IntoIterator<Item = &'a E>, kind: E::Kind) -> usize {
    edges.into_iter().filter(|edge| edge.kind() == kind).count()
}

fn detach(index: &mut HashMap<VertexId, Vec<EdgeId>>, vertex: VertexId, id: EdgeId) {
    if let Some(ids) = index.get_mut(&vertex) {
        ids.retain(|existing| *existing != id);
        if ids.is_empty() {
            index.remove(&vertex);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use socialgraph_core::model::{EdgeKind, SocialEdge, User};

    fn store_with_users(ids: &[VertexId]) -> GraphStore<User, SocialEdge> {
        let mut store = GraphStore::new();
        for id in ids {
            assert!(store.add_vertex(User::new(*id, format!("u{}", id), "")).is_applied());
        }
        store
    }

    fn friendship(from: VertexId, to: VertexId) -> SocialEdge {
        SocialEdge::Friendship { from, to }
    }

    #[test]
    fn test_store_duplicate_vertex_skipped() {
        let mut store = store_with_users(&[1]);
        let outcome = store.add_vertex(User::new(1, "other", ""));
        assert_eq!(outcome, Outcome::Skipped(SkipReason::DuplicateVertex(1)));
        assert_eq!(store.vertex(1).unwrap().name(), "u1");
        assert_eq!(store.vertex_count(), 1);
    }

    #[test]
    fn test_store_1hop() {
        let mut store = store_with_users(&[1, 2, 3]);
        store.add_edge(friendship(1, 2));
        store.add_edge(SocialEdge::Subscription { from: 1, to: 3 });
        store.add_edge(SocialEdge::Post {
            from: 1,
            content: "hi".into(),
        });

        let neighbors = store.neighbors(1);
        assert_eq!(neighbors, vec![2, 3]);
        assert_eq!(store.neighbors_of_kind(1, EdgeKind::Friendship), vec![2]);
        assert_eq!(store.outgoing(1).count(), 3);
    }

    #[test]
    fn test_store_remove_edge_takes_first_only() {
        let mut store = store_with_users(&[1, 2]);
        let first = store.add_edge(SocialEdge::Message {
            from: 1,
            to: 2,
            text: "one".into(),
        });
        store.add_edge(SocialEdge::Message {
            from: 1,
            to: 2,
            text: "two".into(),
        });

        let removed = store.remove_edge(1, 2).unwrap();
        assert_eq!(removed.text(), Some("one"));
        assert!(store.edge(first).is_none());
        assert_eq!(store.edge_count(), 1);
        assert!(store.remove_edge(2, 1).is_none());
    }

    #[test]
    fn test_store_remove_edge_of_kind() {
        let mut store = store_with_users(&[1, 2]);
        store.add_edge(SocialEdge::Subscription { from: 1, to: 2 });
        store.add_edge(friendship(1, 2));

        assert!(store.remove_edge_of_kind(1, 2, EdgeKind::Friendship).is_some());
        assert!(store.remove_edge_of_kind(1, 2, EdgeKind::Friendship).is_none());
        assert_eq!(store.edges_of_kind(EdgeKind::Subscription).len(), 1);
    }

    #[test]
    fn test_store_remove_vertex_cascades() {
        let mut store = store_with_users(&[1, 2, 3]);
        store.add_edge(friendship(1, 2));
        store.add_edge(friendship(2, 1));
        store.add_edge(SocialEdge::Subscription { from: 3, to: 1 });
        store.add_edge(friendship(2, 3));

        let removed = store.remove_vertex(1);
        assert_eq!(removed.map(|u| u.id()), Some(1));
        assert!(store.edges().all(|edge| !edge.touches(1)));
        assert_eq!(store.edge_count(), 1);
        assert!(store.incoming(1).next().is_none());
        assert!(store.neighbors(3).is_empty());
        assert_eq!(store.edges_of_kind(EdgeKind::Subscription).len(), 0);
    }

    #[test]
    fn test_store_remove_missing_vertex_is_noop() {
        let mut store = store_with_users(&[1]);
        assert!(store.remove_vertex(999).is_none());
        assert_eq!(store.vertex_count(), 1);
    }

    #[test]
    fn test_store_self_loop_removed_once() {
        let mut store = store_with_users(&[1]);
        store.add_edge(SocialEdge::Message {
            from: 1,
            to: 1,
            text: "note to self".into(),
        });
        store.remove_vertex(1);
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_count_kind_over_slice() {
        let edges = vec![
            friendship(1, 2),
            friendship(2, 1),
            SocialEdge::Subscription { from: 1, to: 2 },
        ];
        assert_eq!(count_kind(&edges, EdgeKind::Friendship), 2);
        assert_eq!(count_kind(&edges, EdgeKind::Post), 0);
    }
}
