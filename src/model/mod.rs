//! Wire types exchanged with the remote voting API.
//!
//! Most of these are opaque payloads for the live-results core; only
//! `ResultRecord` is manipulated by it.

pub mod candidate;
pub mod election;
pub mod position;
pub mod user;
pub mod vote;

pub use candidate::{Candidate, CandidateFilter, Photo};
pub use election::{Election, ElectionCreate, ElectionStatus};
pub use position::{Position, PositionCreate};
pub use user::{LoginRequest, LoginResponse, Role, User};
pub use vote::{ResultRecord, VoteRequest};

use serde::{Deserialize, Serialize};

/// Standard response envelope: `{ "data": ..., "message": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Anything carrying a server-assigned `_id`.
pub trait Identified {
    fn id(&self) -> &str;
}

/// A reference field the API returns either as a bare id or populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(String),
    Object(Box<T>),
}

impl<T: Identified> Ref<T> {
    pub fn id(&self) -> &str {
        match self {
            Ref::Id(id) => id,
            Ref::Object(obj) => obj.id(),
        }
    }

    pub fn object(&self) -> Option<&T> {
        match self {
            Ref::Id(_) => None,
            Ref::Object(obj) => Some(obj),
        }
    }
}
