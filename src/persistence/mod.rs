//! The `persistence` module keeps the session credential between runs.
//!
//! It uses `sled` as an embedded key-value store, playing the part a cookie
//! jar plays for a browser client. Result data is never persisted: live
//! state is rebuilt from a fresh fetch on every start.

pub mod sled_store;

pub use sled_store::{SessionStore, StoredToken};
