//! `edutrack` command-line client.
//!
//! Thin front-end over [`edutrack::SessionClient`]: parses arguments, restores
//! the cookie session of the selected profile, runs one API call and prints a
//! structured result envelope.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod session_store;
pub mod styles;
