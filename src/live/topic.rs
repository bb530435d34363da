use crate::model::ResultRecord;

/// A result stream, identified by its position id.
pub type TopicId = String;

/// Where a topic stands from the viewing side.
///
/// There is no error state: a failed initial fetch leaves the topic in
/// `Subscribing` until something retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicPhase {
    Unsubscribed,
    Subscribing,
    Live,
}

/// The current, authoritative results for one topic.
///
/// Percentages are always derived from the vote counts held here; whatever
/// the server put in `percentage` is overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicState {
    records: Vec<ResultRecord>,
}

impl TopicState {
    pub fn new(mut records: Vec<ResultRecord>) -> Self {
        // an empty or all-zero topic divides by 1 so every share is 0
        let total = records.iter().map(|r| r.votes).sum::<u64>().max(1) as f64;
        for record in &mut records {
            record.percentage = record.votes as f64 / total * 100.0;
        }
        Self { records }
    }

    /// Records in the order they arrived.
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Records sorted by votes, highest first. Ties keep arrival order.
    pub fn ranked(&self) -> Vec<ResultRecord> {
        let mut ranked = self.records.clone();
        ranked.sort_by(|a, b| b.votes.cmp(&a.votes));
        ranked
    }

    /// The top candidate, once anyone has a vote.
    pub fn leader(&self) -> Option<ResultRecord> {
        self.ranked().into_iter().next().filter(|r| r.votes > 0)
    }

    pub fn total_votes(&self) -> u64 {
        self.records.iter().map(|r| r.votes).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A snapshot delivered to listeners of one topic.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicUpdate {
    pub topic: TopicId,
    pub state: TopicState,
}
