//! Live Result Subscription Manager
//!
//! Keeps result views in sync with the push channel:
//! - `channel`: one session-scoped connection, opened when a credential exists
//! - `manager`: topic subscription bookkeeping and update fan-out
//! - `topic` / `board`: per-topic result snapshots as the views hold them
//!
//! A topic is a position id. Updates are total snapshots and replace whatever
//! a view held for that topic.

pub mod board;
pub mod channel;
pub mod manager;
pub mod topic;

pub use board::TopicBoard;
pub use channel::{LiveChannel, LiveHandle, lock};
pub use manager::{ListenerId, SubscriptionManager};
pub use topic::{TopicId, TopicPhase, TopicState, TopicUpdate};
