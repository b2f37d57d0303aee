// Substitution Plan Service - API Core
//
// Fetches the school's "today" and "tomorrow" substitution PDFs, turns their
// text into structured substitution records and serves the latest snapshot.
//
// Domain logic lives in domains/substitutions; infrastructure seams in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
