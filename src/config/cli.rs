use crate::adapters::http::DEFAULT_ENDPOINT;
use crate::config::{SpinnerMode, DEFAULT_TIMEOUT_SECS};
use crate::core::schedule::{FillSchedule, DEFAULT_CHAR_DELAY, DEFAULT_SPINNER_TIMEOUT};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "tax-autofill")]
#[command(about = "Fetch tax form data and type it into the form")]
pub struct CliConfig {
    /// Endpoint serving the tax form payload
    #[arg(long)]
    pub endpoint: Option<String>,

    /// TOML configuration file; flags given here override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read the payload from a JSON file instead of the endpoint
    #[arg(long)]
    pub payload_file: Option<PathBuf>,

    /// Delay between typed characters, in milliseconds
    #[arg(long)]
    pub char_delay_ms: Option<u64>,

    /// When to hide the loading indicator
    #[arg(long, value_enum)]
    pub spinner_policy: Option<SpinnerMode>,

    /// Spinner timeout for the fixed policy, in milliseconds
    #[arg(long)]
    pub spinner_timeout_ms: Option<u64>,

    /// Request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// HTML form template used to label the output and check field ids
    #[arg(long)]
    pub form_template: Option<PathBuf>,

    /// Print the fields found in --form-template as JSON and exit
    #[arg(long, requires = "form_template")]
    pub describe_form: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    fn char_delay(&self) -> Duration {
        self.char_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_CHAR_DELAY)
    }

    fn spinner_timeout(&self) -> Duration {
        self.spinner_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SPINNER_TIMEOUT)
    }
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    fn headers(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    fn schedule(&self) -> FillSchedule {
        let mode = self.spinner_policy.unwrap_or_default();
        FillSchedule::default()
            .with_char_delay(self.char_delay())
            .with_spinner(mode.into_policy(self.spinner_timeout()))
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoint", self.endpoint())?;
        if let Some(delay) = self.char_delay_ms {
            validation::validate_positive_number("char_delay_ms", delay, 1)?;
        }
        if let Some(timeout) = self.timeout_secs {
            validation::validate_range("timeout_secs", timeout, 1, 600)?;
        }
        Ok(())
    }
}
