//! Session/Identity provider: who the current user is and whether there is a
//! usable credential for the REST API and the push channel.

pub mod provider;

pub use provider::SessionProvider;
