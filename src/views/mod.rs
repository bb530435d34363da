//! View State consumers.
//!
//! Headless equivalents of the client's screens. Each view owns its own
//! state, catches fetch failures at the call site and turns them into an
//! error slot or a log line, and talks to the live channel only through a
//! `LiveHandle`.

pub mod ballot;
pub mod browser;
pub mod results;

pub use ballot::{Ballot, NextStep};
pub use browser::ElectionBrowser;
pub use results::ResultsDashboard;
