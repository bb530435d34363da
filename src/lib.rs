//! # votelive
//!
//! `votelive` is a headless client for a corporate voting system. It talks to
//! the voting REST API for elections, positions, candidates and vote casting,
//! and keeps live result views in sync over a WebSocket push channel.
//!
//! ## Core Modules
//!
//! - `live`: the live result subscription manager, the push-channel lifecycle
//!   and per-topic result state.
//! - `views`: results dashboard, ballot and election browser state.
//! - `gateway`: HTTP client for the voting API.
//! - `session`: who is logged in, backed by the token store in `persistence`.
//! - `transport`: push-channel wire format and WebSocket connection.
//! - `config`: settings from defaults, `config/default.*` and the environment.
//! - `model`: API payload types.
//! - `utils`: error handling and logging.

pub mod config;
pub mod gateway;
pub mod live;
pub mod model;
pub mod persistence;
pub mod session;
pub mod transport;
pub mod utils;
pub mod views;
