//! Shared utilities: the crate-wide error type and logging setup.

pub mod error;
pub mod logging;

pub use error::{ClientError, Result};
