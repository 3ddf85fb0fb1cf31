use serde::{Deserialize, Serialize};
use std::fmt;

/// The six fields the autofill endpoint answers for, in on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormFieldId {
    #[serde(rename = "fullName")]
    FullName,
    #[serde(rename = "ssn")]
    Ssn,
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "deductions")]
    Deductions,
    #[serde(rename = "taxPaid")]
    TaxPaid,
    #[serde(rename = "descriptions_request_for_extra_tax_return")]
    Descriptions,
}

impl FormFieldId {
    pub const ALL: [FormFieldId; 6] = [
        FormFieldId::FullName,
        FormFieldId::Ssn,
        FormFieldId::Income,
        FormFieldId::Deductions,
        FormFieldId::TaxPaid,
        FormFieldId::Descriptions,
    ];

    /// Element id in the form, also the payload key.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormFieldId::FullName => "fullName",
            FormFieldId::Ssn => "ssn",
            FormFieldId::Income => "income",
            FormFieldId::Deductions => "deductions",
            FormFieldId::TaxPaid => "taxPaid",
            FormFieldId::Descriptions => "descriptions_request_for_extra_tax_return",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == id)
    }
}

impl fmt::Display for FormFieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxFormPayload {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub ssn: String,
    pub income: String,
    pub deductions: String,
    #[serde(rename = "taxPaid")]
    pub tax_paid: String,
    #[serde(rename = "descriptions_request_for_extra_tax_return")]
    pub descriptions: String,
}

impl TaxFormPayload {
    pub fn value(&self, field: FormFieldId) -> &str {
        match field {
            FormFieldId::FullName => &self.full_name,
            FormFieldId::Ssn => &self.ssn,
            FormFieldId::Income => &self.income,
            FormFieldId::Deductions => &self.deductions,
            FormFieldId::TaxPaid => &self.tax_paid,
            FormFieldId::Descriptions => &self.descriptions,
        }
    }
}

/// A form control found in an HTML template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub label: String,
    pub id: String,
}
