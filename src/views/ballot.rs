//! Voting flow
//!
//! Walks the voter through an election one position at a time. A vote is
//! cast at most once per position; revisiting a position restores the
//! earlier choice. A failed cast leaves the ballot exactly as it was so the
//! voter can retry.

use std::collections::HashMap;

use tracing::{error, info};

use crate::gateway::ApiClient;
use crate::live::{LiveHandle, lock};
use crate::model::{Candidate, CandidateFilter, Election, Position};
use crate::utils::{ClientError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
struct BallotEntry {
    candidate_id: String,
    voted: bool,
}

/// What the caller should do after `next` or `cast`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// The current position has not been voted yet; confirm, then `cast`.
    Confirm,
    /// Moved on to the next position.
    Advanced,
    /// Every position is done.
    Complete,
}

pub struct Ballot {
    api: ApiClient,
    live: LiveHandle,
    election: Option<Election>,
    positions: Vec<Position>,
    current: usize,
    candidates: Vec<Candidate>,
    selected: Option<String>,
    votes: HashMap<String, BallotEntry>,
    notice: Option<String>,
}

impl Ballot {
    pub async fn open(api: ApiClient, live: LiveHandle, election_id: &str) -> Self {
        let mut ballot = Self {
            api,
            live,
            election: None,
            positions: Vec::new(),
            current: 0,
            candidates: Vec::new(),
            selected: None,
            votes: HashMap::new(),
            notice: None,
        };

        match ballot.api.election(election_id).await {
            Ok(election) => ballot.election = Some(election),
            Err(e) => {
                error!("Error fetching election: {e}");
                ballot.notice = Some("Failed to load election".to_string());
            }
        }

        match ballot.api.positions(Some(election_id)).await {
            Ok(positions) => {
                ballot.positions = positions;
                if !ballot.positions.is_empty() {
                    ballot.load_candidates().await;
                }
            }
            Err(e) => {
                error!("Error fetching positions: {e}");
                ballot.notice = Some("Failed to load positions".to_string());
            }
        }
        ballot
    }

    async fn load_candidates(&mut self) {
        let Some(position_id) = self.current_position().map(|p| p.id.clone()) else {
            return;
        };
        self.selected = self
            .votes
            .get(&position_id)
            .map(|entry| entry.candidate_id.clone());

        match self.api.candidates(&CandidateFilter::position(&position_id)).await {
            Ok(candidates) => self.candidates = candidates,
            Err(e) => {
                error!("Error fetching candidates: {e}");
                self.candidates.clear();
                self.notice = Some("Failed to load candidates".to_string());
            }
        }
    }

    pub fn election(&self) -> Option<&Election> {
        self.election.as_ref()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn current_position(&self) -> Option<&Position> {
        self.positions.get(self.current)
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The last load failure, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn has_voted_current(&self) -> bool {
        self.current_position()
            .and_then(|p| self.votes.get(&p.id))
            .is_some_and(|entry| entry.voted)
    }

    /// Percent of the way through the ballot, counting the current position.
    pub fn progress(&self) -> f64 {
        if self.positions.is_empty() {
            return 0.0;
        }
        (self.current + 1) as f64 / self.positions.len() as f64 * 100.0
    }

    /// Choose a candidate for the current position.
    pub fn select(&mut self, candidate_id: &str) -> Result<()> {
        if self.has_voted_current() {
            return Err(ClientError::Validation(
                "You have already voted for this position".to_string(),
            ));
        }
        if !self.candidates.iter().any(|c| c.id == candidate_id) {
            return Err(ClientError::Validation(format!(
                "Unknown candidate {candidate_id}"
            )));
        }
        self.selected = Some(candidate_id.to_string());
        Ok(())
    }

    /// Move on from the current position, or ask for confirmation when it
    /// still needs a vote.
    pub async fn next(&mut self) -> Result<NextStep> {
        if self.selected.is_none() {
            return Err(ClientError::Validation("Please select a candidate".to_string()));
        }
        if self.has_voted_current() {
            return Ok(self.advance().await);
        }
        Ok(NextStep::Confirm)
    }

    /// Cast the selected vote for the current position, then advance.
    ///
    /// On failure nothing changes; the error carries the server's message
    /// when it sent one.
    pub async fn cast(&mut self) -> Result<NextStep> {
        let (Some(position_id), Some(candidate_id)) = (
            self.current_position().map(|p| p.id.clone()),
            self.selected.clone(),
        ) else {
            return Err(ClientError::Validation("Please select a candidate".to_string()));
        };

        if !self.has_voted_current() {
            self.api.cast_vote(&position_id, &candidate_id).await?;
            info!("Vote cast for position {position_id}");
            lock(&self.live).notify_vote(&position_id);
        }

        self.votes.insert(
            position_id,
            BallotEntry {
                candidate_id,
                voted: true,
            },
        );
        Ok(self.advance().await)
    }

    async fn advance(&mut self) -> NextStep {
        if self.current + 1 < self.positions.len() {
            self.current += 1;
            self.load_candidates().await;
            NextStep::Advanced
        } else {
            NextStep::Complete
        }
    }

    /// Step back one position, restoring the choice made there.
    pub async fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.load_candidates().await;
        true
    }
}
