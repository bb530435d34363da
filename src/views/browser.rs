use std::collections::HashMap;

use tracing::error;

use crate::gateway::ApiClient;
use crate::model::{Candidate, CandidateFilter, Election, Position};

/// Election browser: list elections, open one, look through its positions.
///
/// Candidates are fetched once per position and cached for the lifetime of
/// the browser.
pub struct ElectionBrowser {
    api: ApiClient,
    elections: Vec<Election>,
    selected: Option<Election>,
    election_id: Option<String>,
    positions: Vec<Position>,
    candidates: HashMap<String, Vec<Candidate>>,
    selected_position: Option<String>,
}

impl ElectionBrowser {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            elections: Vec::new(),
            selected: None,
            election_id: None,
            positions: Vec::new(),
            candidates: HashMap::new(),
            selected_position: None,
        }
    }

    pub async fn load_elections(&mut self) -> &[Election] {
        match self.api.elections().await {
            Ok(elections) => self.elections = elections,
            Err(e) => error!("Error fetching elections: {e}"),
        }
        &self.elections
    }

    /// Open an election and pre-fetch the first position's candidates.
    pub async fn open_election(&mut self, election_id: &str) -> &[Position] {
        self.election_id = Some(election_id.to_string());
        self.selected = self
            .elections
            .iter()
            .find(|e| e.id == election_id)
            .cloned();

        match self.api.positions(Some(election_id)).await {
            Ok(positions) => {
                self.positions = positions;
                if let Some(first) = self.positions.first().map(|p| p.id.clone()) {
                    self.select_position(&first).await;
                }
            }
            Err(e) => error!("Error fetching positions: {e}"),
        }
        &self.positions
    }

    /// Switch to a position, fetching its candidates unless already cached.
    pub async fn select_position(&mut self, position_id: &str) -> &[Candidate] {
        self.selected_position = Some(position_id.to_string());

        if !self.candidates.contains_key(position_id) {
            let filter = CandidateFilter {
                position_id: Some(position_id.to_string()),
                election_id: self.election_id.clone(),
            };
            match self.api.candidates(&filter).await {
                Ok(candidates) => {
                    self.candidates.insert(position_id.to_string(), candidates);
                }
                Err(e) => error!("Error fetching candidates for {position_id}: {e}"),
            }
        }

        self.candidates
            .get(position_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Back to the election list.
    pub fn close_election(&mut self) {
        self.selected = None;
        self.election_id = None;
        self.positions.clear();
        self.selected_position = None;
    }

    pub fn elections(&self) -> &[Election] {
        &self.elections
    }

    pub fn selected(&self) -> Option<&Election> {
        self.selected.as_ref()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn selected_position(&self) -> Option<&str> {
        self.selected_position.as_deref()
    }

    pub fn cached_candidates(&self, position_id: &str) -> Option<&[Candidate]> {
        self.candidates.get(position_id).map(Vec::as_slice)
    }
}
