//! Vocabulary backend serving a daily randomized practice set.
//!
//! - [`storage`]: SQLite dictionary of word and phrase pairs
//! - [`tasks`]: daily selection, sampling and hint derivation
//! - [`server`]: axum routes over the two
//! - [`config`]: optional TOML configuration

pub mod config;
pub mod server;
pub mod storage;
pub mod tasks;
