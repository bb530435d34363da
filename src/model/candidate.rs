use serde::{Deserialize, Serialize};

use super::{Identified, Position, Ref};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub public_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub corporate_id: String,
    pub position_id: Ref<Position>,
    #[serde(default)]
    pub election_id: String,
    #[serde(default)]
    pub photo: Photo,
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub manifesto: String,
    #[serde(default)]
    pub votes: u64,
}

impl Identified for Candidate {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Query parameters for `GET /candidates`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub election_id: Option<String>,
}

impl CandidateFilter {
    pub fn position(position_id: &str) -> Self {
        Self {
            position_id: Some(position_id.to_string()),
            election_id: None,
        }
    }
}
