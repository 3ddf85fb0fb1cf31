pub mod autofill;
pub mod form_template;
pub mod schedule;
pub mod typing;

pub use crate::domain::model::{FieldDescriptor, FormFieldId, TaxFormPayload};
pub use crate::domain::ports::{ConfigProvider, LoadingIndicator, PayloadSource, TextField};
pub use crate::utils::error::Result;
