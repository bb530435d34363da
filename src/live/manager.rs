//! Subscription manager
//!
//! This module holds the client side of the live-results protocol:
//! - the push-channel connection, when there is one
//! - a reference-counted set of subscribed topics
//! - topic-scoped listeners that receive each update for their topic
//!
//! Concurrency and usage notes:
//! - The API is synchronous and meant to sit behind a lock
//!   (`Arc<Mutex<SubscriptionManager>>`, see `LiveHandle`) shared by the
//!   channel's reader task and the views. Nothing here awaits, so the lock
//!   is never held across I/O.
//! - Without a connection every subscribe/unsubscribe is a silent no-op.

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::topic::{TopicId, TopicState, TopicUpdate};
use crate::transport::{ClientMessage, Connection, VoteUpdate};

pub type ListenerId = String;

#[derive(Debug)]
struct Listener {
    id: ListenerId,
    sender: UnboundedSender<TopicUpdate>,
}

#[derive(Debug, Default)]
pub struct SubscriptionManager {
    connection: Option<Connection>,
    subscriptions: HashMap<TopicId, usize>,
    listeners: HashMap<TopicId, Vec<Listener>>,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connection(connection: Connection) -> Self {
        let mut manager = Self::new();
        manager.attach(connection);
        manager
    }

    /// Install a freshly opened connection. Nothing is subscribed on it yet.
    pub fn attach(&mut self, connection: Connection) {
        info!("Attached push channel {}", connection.id);
        self.subscriptions.clear();
        self.connection = Some(connection);
    }

    /// Drop the connection and forget every subscription. Server-side
    /// cleanup is the channel's job.
    pub fn detach(&mut self) -> Option<Connection> {
        let connection = self.connection.take();
        if let Some(conn) = &connection {
            info!(
                "Detached push channel {}, discarding {} subscriptions",
                conn.id,
                self.subscriptions.len()
            );
        }
        self.subscriptions.clear();
        connection
    }

    /// Detach only if `connection_id` is still the active connection.
    pub fn detach_if(&mut self, connection_id: &str) -> Option<Connection> {
        match &self.connection {
            Some(conn) if conn.id == connection_id => self.detach(),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.as_ref().is_some_and(|c| !c.is_closed())
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    fn emit(&mut self, msg: ClientMessage) -> bool {
        let Some(conn) = &self.connection else {
            return false;
        };
        if conn.send(&msg) {
            return true;
        }
        // the writer is gone: behave as if there never was a connection
        warn!("Push channel unavailable, dropping {msg:?}");
        self.detach();
        false
    }

    /// Register interest in `topic`.
    ///
    /// Every call sends a subscribe frame, even for a topic that is already
    /// subscribed; the server treats repeats as idempotent.
    pub fn subscribe(&mut self, topic: &str) {
        if self.emit(ClientMessage::Subscribe(topic.to_string())) {
            let count = self.subscriptions.entry(topic.to_string()).or_insert(0);
            *count += 1;
            debug!("Subscribed to {topic} ({count} interested)");
        }
    }

    /// Drop one unit of interest in `topic`.
    ///
    /// The unsubscribe frame goes out once the last interested caller leaves,
    /// or straight away for a topic that was never subscribed.
    pub fn unsubscribe(&mut self, topic: &str) {
        if self.connection.is_none() {
            return;
        }

        match self.subscriptions.get_mut(topic) {
            Some(count) if *count > 1 => {
                *count -= 1;
                debug!("Released {topic} ({count} still interested)");
            }
            _ => {
                self.subscriptions.remove(topic);
                if self.emit(ClientMessage::Unsubscribe(topic.to_string())) {
                    debug!("Unsubscribed from {topic}");
                }
            }
        }
    }

    /// Tell the server a vote was cast for `position_id`.
    pub fn notify_vote(&mut self, position_id: &str) {
        self.emit(ClientMessage::NewVote {
            position_id: position_id.to_string(),
        });
    }

    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.subscriptions.contains_key(topic)
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.subscriptions.get(topic).copied().unwrap_or(0)
    }

    pub fn topics(&self) -> Vec<TopicId> {
        let mut topics: Vec<_> = self.subscriptions.keys().cloned().collect();
        topics.sort();
        topics
    }

    /// Deliver updates for `topic` to `sender` until `unlisten` is called or
    /// the receiver is dropped.
    pub fn listen(&mut self, topic: &str, sender: UnboundedSender<TopicUpdate>) -> ListenerId {
        let id = Uuid::new_v4().to_string();
        self.listeners
            .entry(topic.to_string())
            .or_default()
            .push(Listener {
                id: id.clone(),
                sender,
            });
        id
    }

    pub fn unlisten(&mut self, topic: &str, id: &ListenerId) {
        if let Some(listeners) = self.listeners.get_mut(topic) {
            listeners.retain(|l| &l.id != id);
            if listeners.is_empty() {
                self.listeners.remove(topic);
            }
        }
    }

    pub fn listener_count(&self, topic: &str) -> usize {
        self.listeners.get(topic).map_or(0, Vec::len)
    }

    /// Fan an inbound update out to the topic's listeners.
    ///
    /// Updates for topics nobody is subscribed to are dropped. Returns how
    /// many listeners received the snapshot.
    pub fn apply_update(&mut self, update: VoteUpdate) -> usize {
        let topic = update.position_id;
        if !self.subscriptions.contains_key(&topic) {
            debug!("Ignoring update for unsubscribed topic {topic}");
            return 0;
        }

        let Some(listeners) = self.listeners.get_mut(&topic) else {
            return 0;
        };

        let snapshot = TopicUpdate {
            topic: topic.clone(),
            state: TopicState::new(update.results),
        };

        let mut delivered = 0;
        listeners.retain(|listener| match listener.sender.send(snapshot.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(_) => {
                debug!("Pruning closed listener {} on {topic}", listener.id);
                false
            }
        });
        if listeners.is_empty() {
            self.listeners.remove(&topic);
        }
        delivered
    }
}
