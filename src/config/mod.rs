#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::schedule::SpinnerPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Spinner policy as written in config files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SpinnerMode {
    #[default]
    Fixed,
    AfterTyping,
}

impl SpinnerMode {
    pub fn into_policy(self, timeout: Duration) -> SpinnerPolicy {
        match self {
            SpinnerMode::Fixed => SpinnerPolicy::FixedTimeout(timeout),
            SpinnerMode::AfterTyping => SpinnerPolicy::AfterTyping,
        }
    }
}
