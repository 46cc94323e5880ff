use socialgraph_core::config::AppConfig;
use socialgraph_core::error::{ErrorCode, SocialGraphError};
use socialgraph_core::model::{Activity, EdgeKind, SocialEdge, User};
use socialgraph_core::{Edge, Outcome, SkipReason, Vertex, VertexId};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use storage::{GraphStore, StoreError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("export failed: {0}")]
    Export(#[from] StoreError),
}

impl SocialGraphError for NetworkError {
    fn error_code(&self) -> ErrorCode {
        match self {
            NetworkError::Export(err) => err.error_code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub premium_starting_points: i64,
    pub dot_path: PathBuf,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for NetworkConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            premium_starting_points: config.premium.starting_points,
            dot_path: config.export.dot_path.clone(),
        }
    }
}

/// The social graph: users as vertices, friendships, subscriptions,
/// messages and posts as edges.
///
/// Every mutation checks that the users it references exist before touching
/// the store, and reports a [`SkipReason`] instead of failing when they do
/// not. Friendships are always stored as a pair of opposite edges.
pub struct SocialNetwork {
    store: GraphStore<User, SocialEdge>,
    config: NetworkConfig,
}

impl SocialNetwork {
    pub fn new() -> Self {
        Self::with_config(NetworkConfig::default())
    }

    pub fn with_config(config: NetworkConfig) -> Self {
        Self {
            store: GraphStore::new(),
            config,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &GraphStore<User, SocialEdge> {
        &self.store
    }

    pub fn add_user(&mut self, user: User) -> Outcome {
        let id = user.id();
        record("add_user", id, self.store.add_vertex(user))
    }

    pub fn add_regular_user(
        &mut self,
        id: VertexId,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Outcome {
        self.add_user(User::regular(id, name, email))
    }

    /// Add a premium user with the configured starting balance.
    pub fn add_premium_user(
        &mut self,
        id: VertexId,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Outcome {
        let points = self.config.premium_starting_points;
        self.add_user(User::premium(id, name, email, points))
    }

    pub fn get_user(&self, id: VertexId) -> Option<&User> {
        self.store.vertex(id)
    }

    pub fn get_user_mut(&mut self, id: VertexId) -> Option<&mut User> {
        self.store.vertex_mut(id)
    }

    pub fn contains_user(&self, id: VertexId) -> bool {
        self.store.contains_vertex(id)
    }

    /// All users in ascending id order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.store.vertices()
    }

    /// Remove a user and every edge touching it. Follower counters of the
    /// user's subscription peers are rolled back.
    pub fn remove_user(&mut self, id: VertexId) -> Option<User> {
        if !self.store.contains_vertex(id) {
            debug!("remove_user skipped: {}", SkipReason::MissingVertex(id));
            return None;
        }

        let targets = self.get_subscriptions_of_user(id);
        let subscribers = self.get_followers_of_user(id);
        for target in targets {
            self.with_activity(target, |activity| activity.remove_follower());
        }
        for subscriber in subscribers {
            self.with_activity(subscriber, |activity| activity.remove_following());
        }

        let user = self.store.remove_vertex(id);
        debug!("remove_user applied for {}", id);
        user
    }

    /// Befriend `a` and `b`. Idempotent in either argument order.
    pub fn add_friendship(&mut self, a: VertexId, b: VertexId) -> Outcome {
        if let Some(reason) = self.check_pair(a, b) {
            return record("add_friendship", a, Outcome::Skipped(reason));
        }
        if self.store.has_edge_of_kind(a, b, EdgeKind::Friendship)
            || self.store.has_edge_of_kind(b, a, EdgeKind::Friendship)
        {
            let reason = SkipReason::AlreadyLinked { from: a, to: b };
            return record("add_friendship", a, Outcome::Skipped(reason));
        }

        self.store.add_edge(SocialEdge::Friendship { from: a, to: b });
        self.store.add_edge(SocialEdge::Friendship { from: b, to: a });
        record("add_friendship", a, Outcome::Applied)
    }

    /// Remove both directions of the friendship between `a` and `b`.
    pub fn remove_friendship(&mut self, a: VertexId, b: VertexId) -> Outcome {
        if let Some(missing) = self.first_missing(&[a, b]) {
            let reason = SkipReason::MissingVertex(missing);
            return record("remove_friendship", a, Outcome::Skipped(reason));
        }

        let forward = self.store.remove_edge_of_kind(a, b, EdgeKind::Friendship);
        let backward = self.store.remove_edge_of_kind(b, a, EdgeKind::Friendship);
        let outcome = if forward.is_some() || backward.is_some() {
            Outcome::Applied
        } else {
            Outcome::Skipped(SkipReason::MissingEdge { from: a, to: b })
        };
        record("remove_friendship", a, outcome)
    }

    /// `subscriber` follows `target`. One edge per ordered pair.
    pub fn add_subscription(&mut self, subscriber: VertexId, target: VertexId) -> Outcome {
        if let Some(reason) = self.check_pair(subscriber, target) {
            return record("add_subscription", subscriber, Outcome::Skipped(reason));
        }
        if self
            .store
            .has_edge_of_kind(subscriber, target, EdgeKind::Subscription)
        {
            let reason = SkipReason::AlreadyLinked {
                from: subscriber,
                to: target,
            };
            return record("add_subscription", subscriber, Outcome::Skipped(reason));
        }

        self.store.add_edge(SocialEdge::Subscription {
            from: subscriber,
            to: target,
        });
        self.with_activity(subscriber, |activity| activity.add_following());
        self.with_activity(target, |activity| activity.add_follower());
        record("add_subscription", subscriber, Outcome::Applied)
    }

    pub fn remove_subscription(&mut self, subscriber: VertexId, target: VertexId) -> Outcome {
        if let Some(missing) = self.first_missing(&[subscriber, target]) {
            let reason = SkipReason::MissingVertex(missing);
            return record("remove_subscription", subscriber, Outcome::Skipped(reason));
        }
        if self
            .store
            .remove_edge_of_kind(subscriber, target, EdgeKind::Subscription)
            .is_none()
        {
            let reason = SkipReason::MissingEdge {
                from: subscriber,
                to: target,
            };
            return record("remove_subscription", subscriber, Outcome::Skipped(reason));
        }

        self.with_activity(subscriber, |activity| activity.remove_following());
        self.with_activity(target, |activity| activity.remove_follower());
        record("remove_subscription", subscriber, Outcome::Applied)
    }

    /// Store a message from `from` to `to`. Repeated messages are kept.
    pub fn send_message(&mut self, from: VertexId, to: VertexId, text: impl Into<String>) -> Outcome {
        if let Some(missing) = self.first_missing(&[from, to]) {
            let reason = SkipReason::MissingVertex(missing);
            return record("send_message", from, Outcome::Skipped(reason));
        }

        self.store.add_edge(SocialEdge::Message {
            from,
            to,
            text: text.into(),
        });
        self.with_activity(from, |activity| activity.record_sent());
        self.with_activity(to, |activity| activity.record_received());
        record("send_message", from, Outcome::Applied)
    }

    pub fn add_post(&mut self, from: VertexId, content: impl Into<String>) -> Outcome {
        if let Some(missing) = self.first_missing(&[from]) {
            let reason = SkipReason::MissingVertex(missing);
            return record("add_post", from, Outcome::Skipped(reason));
        }

        self.store.add_edge(SocialEdge::Post {
            from,
            content: content.into(),
        });
        self.with_activity(from, |activity| activity.add_post());
        record("add_post", from, Outcome::Applied)
    }

    /// Distinct users one friendship away from `id`, by ascending id.
    pub fn get_friends_of_user(&self, id: VertexId) -> Vec<&User> {
        self.users_by_id(self.friend_ids(id))
    }

    /// Messages sent by `id`.
    pub fn get_messages_of_user(&self, id: VertexId) -> Vec<&SocialEdge> {
        self.store
            .outgoing(id)
            .filter(|edge| edge.kind() == EdgeKind::Message)
            .collect()
    }

    /// Messages received by `id`.
    pub fn get_inbox_of_user(&self, id: VertexId) -> Vec<&SocialEdge> {
        self.store
            .incoming(id)
            .filter(|edge| edge.kind() == EdgeKind::Message)
            .collect()
    }

    /// Posts authored by `id`.
    pub fn get_posts_of_user(&self, id: VertexId) -> Vec<&SocialEdge> {
        self.store
            .outgoing(id)
            .filter(|edge| edge.kind() == EdgeKind::Post)
            .collect()
    }

    /// Users `id` is subscribed to.
    pub fn get_subscriptions_of_user(&self, id: VertexId) -> BTreeSet<VertexId> {
        self.store
            .neighbors_of_kind(id, EdgeKind::Subscription)
            .into_iter()
            .collect()
    }

    /// Users subscribed to `id`.
    pub fn get_followers_of_user(&self, id: VertexId) -> BTreeSet<VertexId> {
        self.store
            .incoming(id)
            .filter(|edge| edge.kind() == EdgeKind::Subscription)
            .map(|edge| edge.from())
            .collect()
    }

    pub fn export_dot(&self, path: impl AsRef<Path>) -> Result<PathBuf, NetworkError> {
        Ok(self.store.export_to_dot_graph(path)?)
    }

    /// Export to the configured DOT path.
    pub fn export_dot_default(&self) -> Result<PathBuf, NetworkError> {
        self.export_dot(&self.config.dot_path)
    }

    pub(crate) fn friend_ids(&self, id: VertexId) -> BTreeSet<VertexId> {
        self.store
            .neighbors_of_kind(id, EdgeKind::Friendship)
            .into_iter()
            .collect()
    }

    pub(crate) fn users_by_id(&self, ids: impl IntoIterator<Item = VertexId>) -> Vec<&User> {
        ids.into_iter().filter_map(|id| self.store.vertex(id)).collect()
    }

    fn first_missing(&self, ids: &[VertexId]) -> Option<VertexId> {
        ids.iter().copied().find(|id| !self.store.contains_vertex(*id))
    }

    fn check_pair(&self, from: VertexId, to: VertexId) -> Option<SkipReason> {
        if let Some(missing) = self.first_missing(&[from, to]) {
            return Some(SkipReason::MissingVertex(missing));
        }
        (from == to).then_some(SkipReason::SelfLink(from))
    }

    fn with_activity(&mut self, id: VertexId, f: impl FnOnce(&mut Activity)) {
        if let Some(activity) = self.store.vertex_mut(id).and_then(User::activity_mut) {
            f(activity);
        }
    }
}

impl Default for SocialNetwork {
    fn default() -> Self {
        Self::new()
    }
}

fn record(op: &str, subject: VertexId, outcome: Outcome) -> Outcome {
    match outcome {
        Outcome::Applied => debug!("{} applied for {}", op, subject),
        Outcome::Skipped(reason) => debug!("{} skipped for {}: {}", op, subject, reason),
    }
    outcome
}
