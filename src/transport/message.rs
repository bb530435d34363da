use serde::{Deserialize, Serialize};
use tracing::debug;
use tungstenite::protocol::Message as WsMessage;

use crate::model::ResultRecord;

/// Frames the client emits on the push channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "subscribe")]
    Subscribe(String),
    #[serde(rename = "unsubscribe")]
    Unsubscribe(String),
    /// Nudge sent after a successful vote so the server can push fresh tallies.
    #[serde(rename = "new-vote")]
    NewVote {
        #[serde(rename = "positionId")]
        position_id: String,
    },
}

impl ClientMessage {
    pub fn to_ws(&self) -> Result<WsMessage, serde_json::Error> {
        Ok(WsMessage::text(serde_json::to_string(self)?))
    }
}

/// Frames the server pushes to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerMessage {
    #[serde(rename = "vote-update")]
    VoteUpdate(VoteUpdate),
}

impl ServerMessage {
    /// Decode a websocket frame. Non-text frames, unknown events and
    /// malformed payloads yield `None`.
    pub fn decode(msg: &WsMessage) -> Option<Self> {
        let text = msg.to_text().ok().filter(|_| msg.is_text())?;
        match serde_json::from_str(text) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                debug!(
                    "Ignoring channel frame: {err} | {}",
                    text.chars().take(100).collect::<String>()
                );
                None
            }
        }
    }
}

/// Full, authoritative results for one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteUpdate {
    pub position_id: String,
    pub results: Vec<ResultRecord>,
}
