pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{file::FilePayloadSource, http::HttpPayloadSource, memory::MemoryForm};
pub use crate::config::TomlConfig;
pub use crate::core::autofill::{Autofiller, FormHandles, ScheduledFill};
pub use crate::core::form_template::FormTemplate;
pub use crate::core::schedule::{FillSchedule, SpinnerPolicy};
pub use crate::utils::error::{AutofillError, Result};
