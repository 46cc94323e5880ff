use crate::network::SocialNetwork;
use serde::Serialize;
use socialgraph_core::model::EdgeKind;

/// Aggregate counts over the whole network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub users: usize,
    /// Friendship pairs, not directed edges.
    pub friendships: usize,
    pub subscriptions: usize,
    pub messages: usize,
    pub posts: usize,
    pub friend_groups: usize,
    pub largest_group: usize,
}

impl NetworkStats {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl SocialNetwork {
    pub fn stats(&self) -> NetworkStats {
        let store = self.store();
        let groups = self.detect_friend_groups();

        NetworkStats {
            users: store.vertex_count(),
            friendships: store.edges_of_kind(EdgeKind::Friendship).len() / 2,
            subscriptions: store.edges_of_kind(EdgeKind::Subscription).len(),
            messages: store.edges_of_kind(EdgeKind::Message).len(),
            posts: store.edges_of_kind(EdgeKind::Post).len(),
            friend_groups: groups.len(),
            largest_group: groups.iter().map(|group| group.len()).max().unwrap_or(0),
        }
    }
}
