use crate::graph::VertexId;
use std::fmt;

/// Result of a mutation that degrades to a no-op on bad input.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A vertex with this id is already stored.
    DuplicateVertex(VertexId),
    /// A referenced vertex does not exist.
    MissingVertex(VertexId),
    /// No edge connects the pair.
    MissingEdge { from: VertexId, to: VertexId },
    /// The relation already exists and may not be duplicated.
    AlreadyLinked { from: VertexId, to: VertexId },
    /// The relation may not point back at its source.
    SelfLink(VertexId),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Outcome::Applied => None,
            Outcome::Skipped(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DuplicateVertex(id) => write!(f, "vertex {} already exists", id),
            SkipReason::MissingVertex(id) => write!(f, "vertex {} not found", id),
            SkipReason::MissingEdge { from, to } => write!(f, "no edge {} -> {}", from, to),
            SkipReason::AlreadyLinked { from, to } => {
                write!(f, "edge {} -> {} already exists", from, to)
            }
            SkipReason::SelfLink(id) => write!(f, "vertex {} cannot link to itself", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_accessors() {
        assert!(Outcome::Applied.is_applied());
        assert_eq!(Outcome::Applied.skip_reason(), None);

        let skipped = Outcome::Skipped(SkipReason::MissingEdge { from: 1, to: 2 });
        assert!(!skipped.is_applied());
        assert_eq!(skipped.skip_reason().unwrap().to_string(), "no edge 1 -> 2");
    }
}
