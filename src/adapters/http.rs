use crate::domain::model::TaxFormPayload;
use crate::domain::ports::{ConfigProvider, PayloadSource};
use crate::utils::error::{AutofillError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5055/api/get_tax_form_data";

/// Fetches the payload with a single GET. No retries.
pub struct HttpPayloadSource {
    client: Client,
    endpoint: String,
}

impl HttpPayloadSource {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        if config.endpoint().trim().is_empty() {
            return Err(AutofillError::MissingConfigError {
                field: "source.endpoint".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        for (name, value) in config.headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                AutofillError::InvalidConfigValueError {
                    field: "source.headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let header_value = HeaderValue::from_str(&value).map_err(|e| {
                AutofillError::InvalidConfigValueError {
                    field: format!("source.headers.{}", name),
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PayloadSource for HttpPayloadSource {
    async fn fetch(&self) -> Result<TaxFormPayload> {
        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(AutofillError::StatusError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload = serde_json::from_str(&body)?;
        Ok(payload)
    }
}
