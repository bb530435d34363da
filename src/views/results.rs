//! Live results dashboard
//!
//! Shows every position of one election with its current tallies. On open it
//! fetches the positions, subscribes each position's topic and fetches an
//! initial snapshot per position; afterwards push updates replace those
//! snapshots as they arrive. Closing (or dropping) the dashboard releases
//! every topic it subscribed.

use std::fmt::Write;

use futures::future::join_all;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use crate::gateway::ApiClient;
use crate::live::{ListenerId, LiveHandle, TopicBoard, TopicPhase, TopicState, TopicUpdate, lock};
use crate::model::Position;

pub struct ResultsDashboard {
    api: ApiClient,
    live: LiveHandle,
    election_id: String,
    positions: Vec<Position>,
    board: TopicBoard,
    error: Option<String>,
    sender: UnboundedSender<TopicUpdate>,
    updates: UnboundedReceiver<TopicUpdate>,
    listeners: Vec<(String, ListenerId)>,
}

impl ResultsDashboard {
    pub async fn open(api: ApiClient, live: LiveHandle, election_id: &str) -> Self {
        let (sender, updates) = mpsc::unbounded_channel();
        let mut dashboard = Self {
            api,
            live,
            election_id: election_id.to_string(),
            positions: Vec::new(),
            board: TopicBoard::new(),
            error: None,
            sender,
            updates,
            listeners: Vec::new(),
        };

        match dashboard.api.positions(Some(election_id)).await {
            Ok(positions) => dashboard.positions = positions,
            Err(e) => {
                error!("Failed to load positions for {election_id}: {e}");
                dashboard.error = Some("Failed to load positions".to_string());
                return dashboard;
            }
        }

        dashboard.watch_positions();
        dashboard.refresh().await;
        dashboard
    }

    fn watch_positions(&mut self) {
        let mut manager = lock(&self.live);
        for position in &self.positions {
            self.board.track(&position.id);
            let id = manager.listen(&position.id, self.sender.clone());
            manager.subscribe(&position.id);
            self.listeners.push((position.id.clone(), id));
        }
        info!(
            "Watching {} positions of election {}",
            self.positions.len(),
            self.election_id
        );
    }

    /// Re-fetch the results of every position.
    pub async fn refresh(&mut self) {
        let fetches = self.positions.iter().map(|p| {
            let api = self.api.clone();
            let id = p.id.clone();
            async move {
                let result = api.results(&id).await;
                (id, result)
            }
        });

        for (position_id, result) in join_all(fetches).await {
            match result {
                Ok(records) => {
                    self.board.apply_snapshot(&position_id, records);
                }
                Err(e) => {
                    error!("Failed to load results for {position_id}: {e}");
                    self.error = Some("Failed to load results".to_string());
                }
            }
        }
    }

    /// Wait for the next push update and apply it, returning the topic that
    /// changed. Updates for topics the dashboard no longer shows are skipped.
    pub async fn next_update(&mut self) -> Option<String> {
        loop {
            let update = self.updates.recv().await?;
            let topic = update.topic.clone();
            if self.board.apply(update) {
                return Some(topic);
            }
        }
    }

    /// Apply whatever updates are already queued without waiting.
    pub fn drain_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.updates.try_recv() {
            if self.board.apply(update) {
                applied += 1;
            }
        }
        applied
    }

    /// Stop watching: unsubscribe every topic and drop the listeners.
    pub fn close(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let mut manager = lock(&self.live);
        for (topic, id) in self.listeners.drain(..) {
            manager.unlisten(&topic, &id);
            manager.unsubscribe(&topic);
            self.board.untrack(&topic);
        }
    }

    pub fn election_id(&self) -> &str {
        &self.election_id
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn state(&self, position_id: &str) -> Option<&TopicState> {
        self.board.state(position_id)
    }

    pub fn phase(&self, position_id: &str) -> TopicPhase {
        self.board.phase(position_id)
    }

    /// Last load failure. Sticky: a later successful `refresh` does not clear it.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Plain-text rendering of the dashboard.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(error) = &self.error {
            let _ = writeln!(out, "! {error}");
        }
        if self.positions.is_empty() {
            let _ = writeln!(out, "No positions available for this election");
            return out;
        }

        for position in &self.positions {
            let _ = write!(out, "== {}", position.title);
            let state = self.board.state(&position.id);
            if let Some(leader) = state.and_then(TopicState::leader) {
                let _ = write!(out, "  (Leading: {})", leader.name);
            }
            let _ = writeln!(out);

            match state {
                None => {
                    let _ = writeln!(out, "   loading...");
                }
                Some(state) if state.is_empty() => {
                    let _ = writeln!(out, "   No votes recorded yet");
                }
                Some(state) => {
                    for (rank, record) in state.ranked().iter().enumerate() {
                        let marker = if rank == 0 && record.votes > 0 { "*" } else { " " };
                        let _ = writeln!(
                            out,
                            " {marker}{:>2}. {:<24} {:<16} {:>6} {:>5.1}%",
                            rank + 1,
                            record.name,
                            record.department,
                            record.votes,
                            record.percentage
                        );
                    }
                }
            }
        }
        out
    }
}

impl Drop for ResultsDashboard {
    fn drop(&mut self) {
        self.close();
    }
}
