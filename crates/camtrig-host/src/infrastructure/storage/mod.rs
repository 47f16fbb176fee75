//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads and writes the host's TOML configuration in
//! the platform-appropriate directory and supplies defaults on first run.

pub mod config;
