//! Remote Data Gateway
//!
//! Request/response access to the voting API: auth, elections, positions,
//! candidates, vote casting and per-position results. Every call is a
//! suspension point; callers decide how a failure shows up in their view.

pub mod client;

pub use client::ApiClient;

#[cfg(test)]
mod tests;
