//! Read-only structural queries over the friendship subgraph.
//!
//! Friendship is stored as a pair of opposite edges, so following outgoing
//! friendship edges is an undirected traversal. Other edge kinds are
//! ignored except by [`SocialNetwork::find_common_subscriptions`].

use crate::network::SocialNetwork;
use socialgraph_core::model::User;
use socialgraph_core::VertexId;
use std::collections::{BTreeSet, HashMap, VecDeque};

impl SocialNetwork {
    /// True if a chain of friendships links `a` and `b`.
    pub fn are_connected(&self, a: VertexId, b: VertexId) -> bool {
        self.distance_between(a, b).is_some()
    }

    /// Number of friendship hops on a shortest path, `None` if unreachable
    /// or either user is absent.
    pub fn distance_between(&self, a: VertexId, b: VertexId) -> Option<usize> {
        self.friendship_path(a, b).map(|path| path.len() - 1)
    }

    /// Shortest friendship path from `a` to `b`, both endpoints included.
    ///
    /// Layered BFS with a visited set; each user is reached at most once,
    /// at its minimum distance, and the path is rebuilt from parent links.
    pub fn friendship_path(&self, a: VertexId, b: VertexId) -> Option<Vec<VertexId>> {
        if !self.contains_user(a) || !self.contains_user(b) {
            return None;
        }
        if a == b {
            return Some(vec![a]);
        }

        // Start maps to itself.
        let mut parents: HashMap<VertexId, VertexId> = HashMap::new();
        let mut queue: VecDeque<VertexId> = VecDeque::new();
        parents.insert(a, a);
        queue.push_back(a);

        while let Some(current) = queue.pop_front() {
            for next in self.friend_ids(current) {
                if parents.contains_key(&next) {
                    continue;
                }
                parents.insert(next, current);
                if next == b {
                    return Some(reconstruct_path(&parents, a, b));
                }
                queue.push_back(next);
            }
        }

        None
    }

    /// Friends shared by `a` and `b`, excluding the two of them.
    pub fn find_mutual_friends(&self, a: VertexId, b: VertexId) -> Vec<&User> {
        if !self.contains_user(a) || !self.contains_user(b) {
            return Vec::new();
        }

        let friends_of_b = self.friend_ids(b);
        let mutual = self
            .friend_ids(a)
            .into_iter()
            .filter(|id| friends_of_b.contains(id) && *id != a && *id != b);
        self.users_by_id(mutual)
    }

    /// Users at friendship distance exactly two from `id`.
    pub fn find_close_friends(&self, id: VertexId) -> Vec<&User> {
        if !self.contains_user(id) {
            return Vec::new();
        }

        let direct = self.friend_ids(id);
        let second_hop: BTreeSet<VertexId> = direct
            .iter()
            .flat_map(|friend| self.friend_ids(*friend))
            .filter(|candidate| *candidate != id && !direct.contains(candidate))
            .collect();
        self.users_by_id(second_hop)
    }

    /// Users both `a` and `b` are subscribed to.
    pub fn find_common_subscriptions(&self, a: VertexId, b: VertexId) -> Vec<&User> {
        let subscriptions_of_b = self.get_subscriptions_of_user(b);
        let common = self
            .get_subscriptions_of_user(a)
            .into_iter()
            .filter(|id| subscriptions_of_b.contains(id));
        self.users_by_id(common)
    }

    /// Connected components of the friendship subgraph, isolated users
    /// included as singletons. Components are discovered from the lowest
    /// unvisited id upwards.
    pub fn detect_friend_groups(&self) -> Vec<BTreeSet<VertexId>> {
        let mut visited: BTreeSet<VertexId> = BTreeSet::new();
        let mut groups = Vec::new();

        for start in self.store().vertex_ids() {
            if !visited.insert(start) {
                continue;
            }

            let mut group = BTreeSet::new();
            let mut queue = VecDeque::new();
            queue.push_back(start);

            while let Some(current) = queue.pop_front() {
                group.insert(current);
                for next in self.friend_ids(current) {
                    if visited.insert(next) {
                        queue.push_back(next);
                    }
                }
            }

            groups.push(group);
        }

        groups
    }
}

fn reconstruct_path(
    parents: &HashMap<VertexId, VertexId>,
    start: VertexId,
    target: VertexId,
) -> Vec<VertexId> {
    let mut path = vec![target];
    let mut current = target;
    while current != start {
        match parents.get(&current) {
            Some(parent) => {
                current = *parent;
                path.push(current);
            }
            None => break,
        }
    }
    path.reverse();
    path
}
