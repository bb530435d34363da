use std::collections::HashMap;

use super::topic::{TopicId, TopicPhase, TopicState, TopicUpdate};
use crate::model::ResultRecord;

#[derive(Debug, Clone)]
struct Entry {
    phase: TopicPhase,
    state: Option<TopicState>,
}

/// Per-view topic state: which topics a view shows and the latest snapshot
/// for each.
///
/// Snapshots for topics the board does not track are dropped, which is how a
/// fetch that lands after its view moved on becomes a no-op.
#[derive(Debug, Clone, Default)]
pub struct TopicBoard {
    entries: HashMap<TopicId, Entry>,
}

impl TopicBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start showing `topic`; it stays `Subscribing` until a snapshot lands.
    pub fn track(&mut self, topic: &str) {
        self.entries.entry(topic.to_string()).or_insert(Entry {
            phase: TopicPhase::Subscribing,
            state: None,
        });
    }

    pub fn untrack(&mut self, topic: &str) {
        self.entries.remove(topic);
    }

    pub fn apply_snapshot(&mut self, topic: &str, records: Vec<ResultRecord>) -> bool {
        self.apply(TopicUpdate {
            topic: topic.to_string(),
            state: TopicState::new(records),
        })
    }

    /// Replace the stored state for the update's topic. Returns `false` when
    /// the topic is not tracked.
    pub fn apply(&mut self, update: TopicUpdate) -> bool {
        match self.entries.get_mut(&update.topic) {
            Some(entry) => {
                entry.state = Some(update.state);
                entry.phase = TopicPhase::Live;
                true
            }
            None => false,
        }
    }

    pub fn phase(&self, topic: &str) -> TopicPhase {
        self.entries
            .get(topic)
            .map_or(TopicPhase::Unsubscribed, |e| e.phase)
    }

    pub fn state(&self, topic: &str) -> Option<&TopicState> {
        self.entries.get(topic).and_then(|e| e.state.as_ref())
    }

    pub fn topics(&self) -> Vec<TopicId> {
        let mut topics: Vec<_> = self.entries.keys().cloned().collect();
        topics.sort();
        topics
    }
}
