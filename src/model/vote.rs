use serde::{Deserialize, Serialize};

use super::Photo;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub position_id: String,
    pub candidate_id: String,
}

/// One candidate's tally within a position's results.
///
/// `percentage` is whatever the server sent; `TopicState` recomputes it from
/// the votes of the whole topic before anything reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub photo: Photo,
    pub votes: u64,
    #[serde(default)]
    pub percentage: f64,
}
