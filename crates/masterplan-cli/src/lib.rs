//! Command-line shell for the masterplan engine: argument parsing,
//! configuration and logging setup.

/// Subcommands and their execution
pub mod cli;
/// TOML configuration with environment overrides
pub mod config;
/// Tracing subscriber setup
pub mod logging;

pub use cli::{Command, MasterplanCli};
pub use config::MasterplanConfig;
pub use logging::init_logging;
