use crate::store::GraphStore;
use socialgraph_core::error::{ErrorCode, SocialGraphError};
use socialgraph_core::{Edge, Vertex};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SocialGraphError for StoreError {
    fn error_code(&self) -> ErrorCode {
        match self {
            StoreError::Io(_) => ErrorCode::Io,
        }
    }
}

/// Render the edge list as a DOT digraph.
///
/// Every edge becomes `from -> to [label="<tag>"];`. Edges without a
/// destination point at a synthetic `post_<edge id>` node.
pub fn write_dot<V: Vertex, E: Edge, W: Write>(
    store: &GraphStore<V, E>,
    mut out: W,
) -> Result<(), StoreError> {
    writeln!(out, "digraph G {{")?;
    for vertex in store.vertices() {
        writeln!(out, "  {};", vertex.id())?;
    }
    for (edge_id, edge) in store.edge_entries() {
        match edge.to() {
            Some(to) => writeln!(
                out,
                "  {} -> {} [label=\"{}\"];",
                edge.from(),
                to,
                edge.dot_label()
            )?,
            None => writeln!(
                out,
                "  {} -> post_{} [label=\"{}\"];",
                edge.from(),
                edge_id,
                edge.dot_label()
            )?,
        }
    }
    writeln!(out, "}}")?;
    out.flush()?;
    Ok(())
}

impl<V: Vertex, E: Edge> GraphStore<V, E> {
    /// Write the DOT rendering to `path`.
    /// Writes to a temp file then renames, so a failed export never leaves a
    /// truncated file behind.
    pub fn export_to_dot_graph(&self, path: impl AsRef<Path>) -> Result<PathBuf, StoreError> {
        let path = path.as_ref().to_path_buf();
        let tmp_path = path.with_extension("dot.tmp");

        let result = File::create(&tmp_path)
            .map_err(StoreError::from)
            .and_then(|file| write_dot(self, BufWriter::new(file)))
            .and_then(|()| fs::rename(&tmp_path, &path).map_err(StoreError::from));

        if let Err(err) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }

        info!(
            "Exported {} vertices and {} edges to {}",
            self.vertex_count(),
            self.edge_count(),
            path.display()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use socialgraph_core::model::{SocialEdge, User};

    #[test]
    fn test_write_dot_lines() {
        let mut store: GraphStore<User, SocialEdge> = GraphStore::new();
        let _ = store.add_vertex(User::new(1, "a", ""));
        let _ = store.add_vertex(User::new(2, "b", ""));
        store.add_edge(SocialEdge::Friendship { from: 1, to: 2 });
        store.add_edge(SocialEdge::Subscription { from: 2, to: 1 });
        let post_id = store.add_edge(SocialEdge::Post {
            from: 1,
            content: "hello".into(),
        });

        let mut buf = Vec::new();
        write_dot(&store, &mut buf).unwrap();
        let dot = String::from_utf8(buf).unwrap();

        assert!(dot.starts_with("digraph G {\n"));
        assert!(dot.contains("  1 -> 2 [label=\"friend\"];\n"));
        assert!(dot.contains("  2 -> 1 [label=\"sub\"];\n"));
        assert!(dot.contains(&format!("  1 -> post_{} [label=\"post\"];\n", post_id)));
        assert!(dot.trim_end().ends_with('}'));
    }
}
