use crate::adapters::http::DEFAULT_ENDPOINT;
use crate::config::{SpinnerMode, DEFAULT_TIMEOUT_SECS};
use crate::core::schedule::{FillSchedule, DEFAULT_CHAR_DELAY, DEFAULT_SPINNER_TIMEOUT};
use crate::core::ConfigProvider;
use crate::domain::model::FormFieldId;
use crate::utils::error::{AutofillError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: None,
            headers: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub char_delay_ms: Option<u64>,
    pub spinner_policy: Option<SpinnerMode>,
    pub spinner_timeout_ms: Option<u64>,
    /// Start offsets keyed by form element id, e.g. `ssn = 1000`.
    pub offsets_ms: Option<HashMap<String, u64>>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AutofillError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AutofillError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AutofillError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Command line flags win over the file.
    #[cfg(feature = "cli")]
    pub fn apply_overrides(&mut self, cli: &crate::config::CliConfig) {
        if let Some(endpoint) = &cli.endpoint {
            self.source.endpoint = endpoint.clone();
        }
        if let Some(timeout) = cli.timeout_secs {
            self.source.timeout_seconds = Some(timeout);
        }
        if let Some(delay) = cli.char_delay_ms {
            self.schedule.char_delay_ms = Some(delay);
        }
        if let Some(mode) = cli.spinner_policy {
            self.schedule.spinner_policy = Some(mode);
        }
        if let Some(timeout) = cli.spinner_timeout_ms {
            self.schedule.spinner_timeout_ms = Some(timeout);
        }
    }

    fn offsets(&self) -> Result<Vec<(FormFieldId, Duration)>> {
        let Some(offsets) = &self.schedule.offsets_ms else {
            return Ok(Vec::new());
        };

        offsets
            .iter()
            .map(|(key, ms)| {
                FormFieldId::from_element_id(key)
                    .map(|id| (id, Duration::from_millis(*ms)))
                    .ok_or_else(|| AutofillError::InvalidConfigValueError {
                        field: "schedule.offsets_ms".to_string(),
                        value: key.clone(),
                        reason: "Not an autofill field id".to_string(),
                    })
            })
            .collect()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.endpoint", &self.source.endpoint)?;

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 600)?;
        }

        if let Some(delay) = self.schedule.char_delay_ms {
            validation::validate_positive_number("schedule.char_delay_ms", delay, 1)?;
        }

        self.offsets()?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    fn headers(&self) -> HashMap<String, String> {
        self.source.headers.clone().unwrap_or_default()
    }

    fn schedule(&self) -> FillSchedule {
        let char_delay = self
            .schedule
            .char_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_CHAR_DELAY);
        let spinner_timeout = self
            .schedule
            .spinner_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SPINNER_TIMEOUT);
        let spinner = self
            .schedule
            .spinner_policy
            .unwrap_or_default()
            .into_policy(spinner_timeout);

        // unknown keys are rejected by validate_config; here they are only skipped
        let offsets = self
            .schedule
            .offsets_ms
            .iter()
            .flatten()
            .filter_map(|(key, ms)| match FormFieldId::from_element_id(key) {
                Some(id) => Some((id, Duration::from_millis(*ms))),
                None => {
                    tracing::warn!("Ignoring offset for unknown field '{}'", key);
                    None
                }
            });

        offsets.fold(
            FillSchedule::default()
                .with_char_delay(char_delay)
                .with_spinner(spinner),
            |schedule, (id, offset)| schedule.with_offset(id, offset),
        )
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
