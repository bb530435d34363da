//! The `transport` module owns the push channel's wire format and the
//! websocket connection that carries it.
//!
//! Frames are JSON text messages of the form `{"event": ..., "data": ...}`.
//! Outbound frames are fire-and-forget; there is no acknowledgement step.

pub mod message;
pub mod websocket;

pub use message::{ClientMessage, ServerMessage, VoteUpdate};
pub use websocket::{ChannelTransport, Connection, Inbound, connect};
