//! Generic in-memory graph store: vertices keyed by id, edges in an
//! insertion-ordered arena, cascading vertex removal and per-kind lookup.

pub mod export;
pub mod store;

pub use export::{write_dot, StoreError};
pub use store::{count_kind, EdgeId, GraphStore};
