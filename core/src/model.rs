use crate::graph::{Edge, Vertex, VertexId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points a premium user pays for one reputation bonus.
pub const BONUS_COST: i64 = 10;
/// Reputation granted by one bonus.
pub const BONUS_REPUTATION: i64 = 5;
/// Starting balance when no configuration is supplied.
pub const DEFAULT_PREMIUM_POINTS: i64 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub bio: String,
    pub location: String,
    pub phone: String,
    pub birthday: String,
    pub gender: String,
}

impl Profile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }
}

/// Engagement counters carried by regular and premium users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    reputation: i64,
    followers: u32,
    following: u32,
    posts: u32,
    messages_sent: u32,
    messages_received: u32,
    last_login: DateTime<Utc>,
}

impl Activity {
    pub fn new() -> Self {
        Self {
            reputation: 0,
            followers: 0,
            following: 0,
            posts: 0,
            messages_sent: 0,
            messages_received: 0,
            last_login: Utc::now(),
        }
    }

    pub fn reputation(&self) -> i64 {
        self.reputation
    }

    pub fn followers(&self) -> u32 {
        self.followers
    }

    pub fn following(&self) -> u32 {
        self.following
    }

    pub fn posts(&self) -> u32 {
        self.posts
    }

    pub fn messages_sent(&self) -> u32 {
        self.messages_sent
    }

    pub fn messages_received(&self) -> u32 {
        self.messages_received
    }

    pub fn last_login(&self) -> DateTime<Utc> {
        self.last_login
    }

    pub fn add_follower(&mut self) {
        self.followers = self.followers.saturating_add(1);
    }

    pub fn remove_follower(&mut self) {
        self.followers = self.followers.saturating_sub(1);
    }

    pub fn add_following(&mut self) {
        self.following = self.following.saturating_add(1);
    }

    pub fn remove_following(&mut self) {
        self.following = self.following.saturating_sub(1);
    }

    pub fn add_post(&mut self) {
        self.posts = self.posts.saturating_add(1);
    }

    pub fn record_sent(&mut self) {
        self.messages_sent = self.messages_sent.saturating_add(1);
    }

    pub fn record_received(&mut self) {
        self.messages_received = self.messages_received.saturating_add(1);
    }

    pub fn change_reputation(&mut self, delta: i64) {
        self.reputation = self.reputation.saturating_add(delta);
    }

    /// Refresh the login timestamp. Never moves it backwards.
    pub fn touch_login(&mut self) {
        self.last_login = self.last_login.max(Utc::now());
    }
}

impl Default for Activity {
    fn default() -> Self {
        Self::new()
    }
}

/// Premium-only balance and badges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perks {
    points: i64,
    checkmarks: Vec<String>,
}

impl Perks {
    pub fn new(points: i64) -> Self {
        Self {
            points: points.max(0),
            checkmarks: Vec::new(),
        }
    }

    pub fn points(&self) -> i64 {
        self.points
    }

    pub fn checkmarks(&self) -> &[String] {
        &self.checkmarks
    }

    pub fn add_checkmark(&mut self, label: impl Into<String>) {
        self.checkmarks.push(label.into());
    }

    /// Deduct `amount`; refused when negative or unaffordable.
    pub fn spend_points(&mut self, amount: i64) -> bool {
        if amount < 0 || amount > self.points {
            return false;
        }
        self.points -= amount;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum Tier {
    Base,
    Regular { activity: Activity },
    Premium { activity: Activity, perks: Perks },
}

impl Tier {
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Base => "base",
            Tier::Regular { .. } => "regular",
            Tier::Premium { .. } => "premium",
        }
    }
}

/// A user account; the vertex type of the social graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: VertexId,
    pub profile: Profile,
    tier: Tier,
}

impl User {
    pub fn new(id: VertexId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            profile: Profile::new(name, email),
            tier: Tier::Base,
        }
    }

    pub fn regular(id: VertexId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            profile: Profile::new(name, email),
            tier: Tier::Regular {
                activity: Activity::new(),
            },
        }
    }

    pub fn premium(
        id: VertexId,
        name: impl Into<String>,
        email: impl Into<String>,
        points: i64,
    ) -> Self {
        Self {
            id,
            profile: Profile::new(name, email),
            tier: Tier::Premium {
                activity: Activity::new(),
                perks: Perks::new(points),
            },
        }
    }

    pub fn tier(&self) -> &Tier {
        &self.tier
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn email(&self) -> &str {
        &self.profile.email
    }

    pub fn activity(&self) -> Option<&Activity> {
        match &self.tier {
            Tier::Base => None,
            Tier::Regular { activity } | Tier::Premium { activity, .. } => Some(activity),
        }
    }

    pub fn activity_mut(&mut self) -> Option<&mut Activity> {
        match &mut self.tier {
            Tier::Base => None,
            Tier::Regular { activity } | Tier::Premium { activity, .. } => Some(activity),
        }
    }

    pub fn perks(&self) -> Option<&Perks> {
        match &self.tier {
            Tier::Premium { perks, .. } => Some(perks),
            _ => None,
        }
    }

    pub fn perks_mut(&mut self) -> Option<&mut Perks> {
        match &mut self.tier {
            Tier::Premium { perks, .. } => Some(perks),
            _ => None,
        }
    }

    /// Trade `BONUS_COST` points for `BONUS_REPUTATION` reputation.
    /// Returns false for non-premium users or an insufficient balance.
    pub fn bonus_reputation(&mut self) -> bool {
        match &mut self.tier {
            Tier::Premium { activity, perks } => {
                if !perks.spend_points(BONUS_COST) {
                    return false;
                }
                activity.change_reputation(BONUS_REPUTATION);
                true
            }
            _ => false,
        }
    }
}

impl Vertex for User {
    fn id(&self) -> VertexId {
        self.id
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] #{} {} <{}>",
            self.tier.name(),
            self.id,
            self.profile.name,
            self.profile.email
        )?;
        if let Some(activity) = self.activity() {
            write!(
                f,
                " rep={} followers={} following={} posts={}",
                activity.reputation, activity.followers, activity.following, activity.posts
            )?;
        }
        if let Some(perks) = self.perks() {
            write!(f, " points={}", perks.points)?;
            if !perks.checkmarks.is_empty() {
                write!(f, " badges=[{}]", perks.checkmarks.join(", "))?;
            }
        }
        Ok(())
    }
}

/// Discriminant of [`SocialEdge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Friendship,
    Subscription,
    Message,
    Post,
}

impl EdgeKind {
    pub fn tag(self) -> &'static str {
        match self {
            EdgeKind::Friendship => "friend",
            EdgeKind::Subscription => "sub",
            EdgeKind::Message => "msg",
            EdgeKind::Post => "post",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SocialEdge {
    /// One direction of a friendship pair.
    Friendship { from: VertexId, to: VertexId },
    Subscription { from: VertexId, to: VertexId },
    Message {
        from: VertexId,
        to: VertexId,
        text: String,
    },
    /// Broadcast authored by `from`; has no destination.
    Post { from: VertexId, content: String },
}

impl SocialEdge {
    pub fn text(&self) -> Option<&str> {
        match self {
            SocialEdge::Message { text, .. } => Some(text),
            SocialEdge::Post { content, .. } => Some(content),
            _ => None,
        }
    }
}

impl Edge for SocialEdge {
    type Kind = EdgeKind;

    fn from(&self) -> VertexId {
        match self {
            SocialEdge::Friendship { from, .. }
            | SocialEdge::Subscription { from, .. }
            | SocialEdge::Message { from, .. }
            | SocialEdge::Post { from, .. } => *from,
        }
    }

    fn to(&self) -> Option<VertexId> {
        match self {
            SocialEdge::Friendship { to, .. }
            | SocialEdge::Subscription { to, .. }
            | SocialEdge::Message { to, .. } => Some(*to),
            SocialEdge::Post { .. } => None,
        }
    }

    fn kind(&self) -> EdgeKind {
        match self {
            SocialEdge::Friendship { .. } => EdgeKind::Friendship,
            SocialEdge::Subscription { .. } => EdgeKind::Subscription,
            SocialEdge::Message { .. } => EdgeKind::Message,
            SocialEdge::Post { .. } => EdgeKind::Post,
        }
    }

    fn dot_label(&self) -> &'static str {
        self.kind().tag()
    }
}

impl fmt::Display for SocialEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocialEdge::Friendship { from, to } => write!(f, "friendship {} <-> {}", from, to),
            SocialEdge::Subscription { from, to } => {
                write!(f, "subscription {} -> {}", from, to)
            }
            SocialEdge::Message { from, to, text } => {
                write!(f, "message {} -> {}: {}", from, to, text)
            }
            SocialEdge::Post { from, content } => write!(f, "post by {}: {}", from, content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_fields_update() {
        let mut user = User::new(1, "Alice", "alice@mail.com");
        assert_eq!(user.name(), "Alice");
        assert_eq!(user.email(), "alice@mail.com");
        assert!(user.profile.bio.is_empty());

        user.profile.bio = "Hello world".into();
        user.profile.location = "Kyiv".into();
        user.profile.birthday = "1990-01-01".into();

        assert_eq!(user.profile.bio, "Hello world");
        assert_eq!(user.profile.location, "Kyiv");
        assert!(user.activity().is_none());
    }

    #[test]
    fn test_regular_counters() {
        let mut user = User::regular(2, "Bob", "bob@mail.com");
        let activity = user.activity_mut().unwrap();
        activity.add_follower();
        activity.add_following();
        activity.add_post();
        activity.record_sent();
        activity.record_received();
        activity.change_reputation(5);
        activity.change_reputation(-10);

        let activity = user.activity().unwrap();
        assert_eq!(activity.followers(), 1);
        assert_eq!(activity.following(), 1);
        assert_eq!(activity.posts(), 1);
        assert_eq!(activity.messages_sent(), 1);
        assert_eq!(activity.messages_received(), 1);
        assert_eq!(activity.reputation(), -5);
    }

    #[test]
    fn test_counters_do_not_underflow() {
        let mut activity = Activity::new();
        activity.remove_follower();
        activity.remove_following();
        assert_eq!(activity.followers(), 0);
        assert_eq!(activity.following(), 0);
    }

    #[test]
    fn test_login_is_monotonic() {
        let mut activity = Activity::new();
        let before = activity.last_login();
        activity.touch_login();
        assert!(activity.last_login() >= before);
    }

    #[test]
    fn test_premium_points_and_checkmarks() {
        let mut user = User::premium(4, "Diana", "diana@mail.com", 50);
        let perks = user.perks_mut().unwrap();
        perks.add_checkmark("Verified");
        perks.add_checkmark("TopContributor");
        assert_eq!(user.perks().unwrap().checkmarks().len(), 2);

        assert!(user.bonus_reputation());
        assert_eq!(user.perks().unwrap().points(), 50 - BONUS_COST);
        assert_eq!(user.activity().unwrap().reputation(), BONUS_REPUTATION);

        assert!(user.perks_mut().unwrap().spend_points(30));
        assert_eq!(user.perks().unwrap().points(), 10);
    }

    #[test]
    fn test_premium_overspend_refused() {
        let mut perks = Perks::new(20);
        assert!(!perks.spend_points(50));
        assert!(!perks.spend_points(-5));
        assert_eq!(perks.points(), 20);
    }

    #[test]
    fn test_bonus_requires_premium_and_balance() {
        let mut regular = User::regular(6, "Frank", "frank@mail.com");
        assert!(!regular.bonus_reputation());

        let mut broke = User::premium(7, "Grace", "grace@mail.com", BONUS_COST - 1);
        assert!(!broke.bonus_reputation());
        assert_eq!(broke.activity().unwrap().reputation(), 0);
    }

    #[test]
    fn test_edge_endpoints() {
        let friendship = SocialEdge::Friendship { from: 1, to: 2 };
        assert_eq!(friendship.from(), 1);
        assert_eq!(friendship.to(), Some(2));
        assert_eq!(friendship.dot_label(), "friend");

        let message = SocialEdge::Message {
            from: 1,
            to: 3,
            text: "Hello!".into(),
        };
        assert_eq!(message.text(), Some("Hello!"));
        assert_eq!(message.kind(), EdgeKind::Message);

        let post = SocialEdge::Post {
            from: 4,
            content: "My post content".into(),
        };
        assert_eq!(post.from(), 4);
        assert_eq!(post.to(), None);
        assert!(post.touches(4));
        assert!(!post.touches(5));
    }

    #[test]
    fn test_display_includes_tier_payload() {
        let mut user = User::premium(9, "Ivy", "ivy@mail.com", 100);
        user.perks_mut().unwrap().add_checkmark("Verified");
        let rendered = user.to_string();
        assert!(rendered.starts_with("[premium] #9 Ivy"));
        assert!(rendered.contains("points=100"));
        assert!(rendered.contains("badges=[Verified]"));
    }

    #[test]
    fn test_user_serializes_with_tier_tag() {
        let user = User::regular(3, "Charlie", "charlie@mail.com");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["tier"]["tier"], "regular");
        assert_eq!(json["profile"]["name"], "Charlie");
    }
}
