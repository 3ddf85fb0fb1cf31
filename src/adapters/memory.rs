//! In-memory UI handles.
//!
//! These stand in for form inputs and the loading spinner. Every mutation is recorded with
//! a `tokio::time::Instant`, so tests running on a paused clock can check exactly when a
//! field changed.

use crate::core::autofill::FormHandles;
use crate::domain::model::FormFieldId;
use crate::domain::ports::{LoadingIndicator, TextField};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMutation {
    pub at: Instant,
    pub value: String,
}

#[derive(Debug, Default)]
struct FieldState {
    value: String,
    mutations: Vec<FieldMutation>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryField {
    state: Arc<Mutex<FieldState>>,
}

impl MemoryField {
    pub fn new() -> Self {
        Self::default()
    }

    /// A field that already holds `value`. The initial value is not a mutation.
    pub fn with_value(value: &str) -> Self {
        let field = Self::new();
        field.lock().value = value.to_string();
        field
    }

    pub fn mutations(&self) -> Vec<FieldMutation> {
        self.lock().mutations.clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.lock().mutations.len()
    }

    fn lock(&self) -> MutexGuard<'_, FieldState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TextField for MemoryField {
    fn value(&self) -> String {
        self.lock().value.clone()
    }

    fn set_value(&self, value: &str) {
        let mut state = self.lock();
        state.value = value.to_string();
        state.mutations.push(FieldMutation {
            at: Instant::now(),
            value: value.to_string(),
        });
    }

    fn append(&self, ch: char) {
        let mut state = self.lock();
        state.value.push(ch);
        let value = state.value.clone();
        state.mutations.push(FieldMutation {
            at: Instant::now(),
            value,
        });
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryIndicator {
    transitions: Arc<Mutex<Vec<(Instant, bool)>>>,
}

impl MemoryIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.lock().last().map(|(_, visible)| *visible).unwrap_or(false)
    }

    /// Every `set_visible` call in order, with the time it happened.
    pub fn transitions(&self) -> Vec<(Instant, bool)> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(Instant, bool)>> {
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl LoadingIndicator for MemoryIndicator {
    fn set_visible(&self, visible: bool) {
        tracing::debug!(visible, "loading indicator");
        self.lock().push((Instant::now(), visible));
    }
}

/// Six in-memory fields plus a spinner, wired together as one form.
#[derive(Debug, Clone, Default)]
pub struct MemoryForm {
    fields: [MemoryField; 6],
    spinner: MemoryIndicator,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, id: FormFieldId) -> &MemoryField {
        let index = FormFieldId::ALL
            .iter()
            .position(|field| *field == id)
            .unwrap_or_default();
        &self.fields[index]
    }

    pub fn spinner(&self) -> &MemoryIndicator {
        &self.spinner
    }

    pub fn handles(&self) -> FormHandles {
        let field = |id: FormFieldId| -> Arc<dyn TextField> { Arc::new(self.field(id).clone()) };
        FormHandles {
            full_name: field(FormFieldId::FullName),
            ssn: field(FormFieldId::Ssn),
            income: field(FormFieldId::Income),
            deductions: field(FormFieldId::Deductions),
            tax_paid: field(FormFieldId::TaxPaid),
            descriptions: field(FormFieldId::Descriptions),
            spinner: Arc::new(self.spinner.clone()),
        }
    }

    /// Current value of every field, in form order.
    pub fn snapshot(&self) -> Vec<(FormFieldId, String)> {
        FormFieldId::ALL
            .into_iter()
            .map(|id| (id, self.field(id).value()))
            .collect()
    }
}
