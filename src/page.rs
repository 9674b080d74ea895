use crate::config::Labels;
use crate::models::{FeedEntry, TweetId};
use crate::paths::counter_name;
use std::collections::BTreeMap;

/// A like button: its `data-url`, its text, and whether a request is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTarget {
    pub entity_id: TweetId,
    pub action_url: String,
    pub label: String,
    pub in_flight: bool,
}

/// The parts of a rendered feed the like handler reads and writes.
///
/// Counters are keyed by their `name` attribute (`count_{id}`), the same
/// lookup the rendered markup supports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    targets: BTreeMap<TweetId, ActionTarget>,
    counters: BTreeMap<String, String>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the page the server would render for these entries.
    pub fn from_feed(entries: &[FeedEntry], labels: &Labels) -> Self {
        let mut page = Self::new();
        for entry in entries {
            page.insert_target(ActionTarget {
                entity_id: entry.id,
                action_url: entry.action_url.clone(),
                label: labels.for_state(entry.is_liked).to_string(),
                in_flight: false,
            });
            page.set_counter(&counter_name(entry.id), entry.liked_count.to_string());
        }
        page
    }

    pub fn insert_target(&mut self, target: ActionTarget) {
        self.targets.insert(target.entity_id, target);
    }

    pub fn target(&self, id: TweetId) -> Option<&ActionTarget> {
        self.targets.get(&id)
    }

    pub fn target_mut(&mut self, id: TweetId) -> Option<&mut ActionTarget> {
        self.targets.get_mut(&id)
    }

    pub fn counter(&self, name: &str) -> Option<&str> {
        self.counters.get(name).map(String::as_str)
    }

    pub fn counter_mut(&mut self, name: &str) -> Option<&mut String> {
        self.counters.get_mut(name)
    }

    pub fn set_counter(&mut self, name: &str, text: String) {
        self.counters.insert(name.to_string(), text);
    }

    pub fn remove_counter(&mut self, name: &str) -> Option<String> {
        self.counters.remove(name)
    }
}
