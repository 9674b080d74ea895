use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type TweetId = u64;

pub const MAX_CONTENT_CHARS: usize = 140;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: TweetId,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub liked_by: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub next_id: TweetId,
    pub tweets: BTreeMap<TweetId, Tweet>,
}

impl AppData {
    /// Tweets newest first, the order the feed is rendered in.
    pub fn feed(&self) -> impl Iterator<Item = &Tweet> {
        let mut tweets: Vec<&Tweet> = self.tweets.values().collect();
        tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        tweets.into_iter()
    }
}

/// Server answer to a like or unlike request.
///
/// The wire names come from the page script contract; the Rust names are the
/// generalized ones. Extra fields such as `unlike_url` are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleResult {
    #[serde(rename = "tweet_id")]
    pub entity_id: TweetId,
    #[serde(rename = "is_liked")]
    pub is_active: bool,
    #[serde(rename = "liked_count")]
    pub count: u64,
}

impl ToggleResult {
    pub fn state(&self) -> LikeState {
        LikeState::from(self.is_active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    Active,
    Inactive,
}

impl From<bool> for LikeState {
    fn from(is_active: bool) -> Self {
        if is_active { Self::Active } else { Self::Inactive }
    }
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub tweet_id: TweetId,
    pub is_liked: bool,
    pub liked_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlike_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTweetRequest {
    pub content: String,
}

/// One tweet as seen by a particular viewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedEntry {
    pub id: TweetId,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_liked: bool,
    pub liked_count: u64,
    pub action_url: String,
}
