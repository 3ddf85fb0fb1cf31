use crate::core::schedule::FillSchedule;
use crate::domain::model::TaxFormPayload;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// A text-holding UI element, such as a form input.
pub trait TextField: Send + Sync {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);

    fn append(&self, ch: char) {
        let mut value = self.value();
        value.push(ch);
        self.set_value(&value);
    }
}

/// The spinner shown while the payload is being fetched.
pub trait LoadingIndicator: Send + Sync {
    fn set_visible(&self, visible: bool);
}

#[async_trait]
pub trait PayloadSource: Send + Sync {
    async fn fetch(&self) -> Result<TaxFormPayload>;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn headers(&self) -> HashMap<String, String>;
    fn schedule(&self) -> FillSchedule;
}
