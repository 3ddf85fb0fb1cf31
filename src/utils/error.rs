use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutofillError {
    #[error("Request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Endpoint returned status {status}")]
    StatusError { status: u16 },

    #[error("Payload decoding error: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Form template error: {message}")]
    TemplateError { message: String },

    #[error("Scheduled task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

impl AutofillError {
    /// Errors raised while fetching or decoding the payload, as opposed to configuration,
    /// template or scheduling errors.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            AutofillError::RequestError(_)
                | AutofillError::StatusError { .. }
                | AutofillError::DecodeError(_)
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AutofillError::RequestError(e) if e.is_timeout() => {
                "The form data service did not answer in time".to_string()
            }
            AutofillError::RequestError(_) => {
                "Could not reach the form data service".to_string()
            }
            AutofillError::StatusError { status } => {
                format!("The form data service answered with HTTP {}", status)
            }
            AutofillError::DecodeError(_) => {
                "The form data service returned something that is not a tax form payload"
                    .to_string()
            }
            AutofillError::IoError(e) => format!("File access failed: {}", e),
            AutofillError::ConfigValidationError { .. }
            | AutofillError::InvalidConfigValueError { .. }
            | AutofillError::MissingConfigError { .. } => {
                format!("Configuration problem: {}", self)
            }
            AutofillError::TemplateError { message } => {
                format!("Could not read the form template: {}", message)
            }
            AutofillError::TaskError(_) => "A typing animation stopped unexpectedly".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AutofillError::RequestError(_) => {
                "Check that the form data service is running and the endpoint is correct"
            }
            AutofillError::StatusError { .. } => "Check the form data service logs",
            AutofillError::DecodeError(_) => {
                "The endpoint must return fullName, ssn, income, deductions, taxPaid and descriptions_request_for_extra_tax_return as strings"
            }
            AutofillError::IoError(_) => "Check the file path and its permissions",
            AutofillError::ConfigValidationError { .. }
            | AutofillError::InvalidConfigValueError { .. }
            | AutofillError::MissingConfigError { .. } => {
                "Fix the configuration file or command line flags"
            }
            AutofillError::TemplateError { .. } => "Check that the template is valid HTML",
            AutofillError::TaskError(_) => "Run again with --verbose and report the log",
        }
    }
}

pub type Result<T> = std::result::Result<T, AutofillError>;
