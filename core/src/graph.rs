//! Capabilities the graph store needs from its vertices and edges.
//!
//! The store is generic over these traits and never inspects social
//! semantics; `crate::model` provides the concrete user and edge types.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Vertex identifier, unique within one store.
pub type VertexId = u64;

/// A node in the graph.
pub trait Vertex: Display {
    fn id(&self) -> VertexId;
}

/// A directed edge, possibly without a destination.
pub trait Edge: Display {
    /// Closed discriminant used for type-filtered retrieval.
    type Kind: Copy + Eq + Hash + Debug;

    fn from(&self) -> VertexId;

    /// `None` for broadcast edges that have no destination.
    fn to(&self) -> Option<VertexId>;

    fn kind(&self) -> Self::Kind;

    /// Short lowercase tag used as the DOT edge label.
    fn dot_label(&self) -> &'static str;

    /// True if either endpoint is `id`.
    fn touches(&self, id: VertexId) -> bool {
        self.from() == id || self.to() == Some(id)
    }
}
