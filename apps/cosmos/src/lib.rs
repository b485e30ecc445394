//! # cosmos
//!
//! The Cosmos binary crate: HTTP API, CLI and configuration around
//! `cosmos-core`. Exposed as a library so integration tests can build the
//! router directly.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
