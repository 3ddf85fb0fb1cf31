use crate::domain::model::{FieldDescriptor, FormFieldId};
use crate::utils::error::{AutofillError, Result};
use scraper::{ElementRef, Html, Selector};
use std::path::Path;

/// The fillable controls of an HTML form, with their human-readable labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormTemplate {
    fields: Vec<FieldDescriptor>,
}

impl FormTemplate {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let html = std::fs::read_to_string(&path)?;
        Self::parse(&html)
    }

    /// Collects `input`, `select` and `textarea` elements in document order.
    ///
    /// The label comes from a `<label for=...>` pointing at the element, falling back to
    /// its placeholder, then its name. Elements without both a label and an id (or name)
    /// are skipped.
    pub fn parse(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let controls = selector("input, select, textarea")?;
        let labels = selector("label[for]")?;

        let fields = document
            .select(&controls)
            .filter_map(|control| describe(&document, &labels, control))
            .collect();

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn label_for(&self, id: FormFieldId) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.id == id.as_str())
            .map(|field| field.label.as_str())
    }

    /// Autofill targets this template has no control for.
    pub fn missing_fields(&self) -> Vec<FormFieldId> {
        FormFieldId::ALL
            .into_iter()
            .filter(|id| self.label_for(*id).is_none())
            .collect()
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AutofillError::TemplateError {
        message: format!("bad selector '{}': {}", css, e),
    })
}

fn describe(document: &Html, labels: &Selector, control: ElementRef<'_>) -> Option<FieldDescriptor> {
    let element = control.value();
    let html_id = element.attr("id").filter(|id| !id.is_empty());
    let name = element.attr("name").filter(|name| !name.is_empty());

    let from_label = html_id.and_then(|id| {
        document
            .select(labels)
            .find(|label| label.value().attr("for") == Some(id))
            .map(|label| {
                let text: String = label.text().collect();
                text.trim().trim_end_matches(':').to_string()
            })
    });

    let label = from_label.or_else(|| {
        element
            .attr("placeholder")
            .filter(|placeholder| !placeholder.is_empty())
            .or(name)
            .map(|text| text.trim().to_string())
    })?;

    let id = html_id.or(name)?;

    Some(FieldDescriptor {
        label,
        id: id.to_string(),
    })
}
