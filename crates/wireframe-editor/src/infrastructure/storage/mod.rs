//! Storage infrastructure.
//!
//! - `config` reads and writes the TOML configuration file.
//! - `memory` is the in-process [`VersionStore`](crate::application::versioning::VersionStore)
//!   used by the CLI and the tests.

pub mod config;
pub mod memory;
