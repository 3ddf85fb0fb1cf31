use crate::domain::model::{FormFieldId, TaxFormPayload};
use std::time::Duration;

pub const DEFAULT_CHAR_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_SPINNER_TIMEOUT: Duration = Duration::from_millis(5000);

/// When the loading indicator goes away after a successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerPolicy {
    /// Hide at a fixed offset, whether or not typing is still running.
    FixedTimeout(Duration),
    /// Hide once every typing animation has appended its last character.
    AfterTyping,
}

impl Default for SpinnerPolicy {
    fn default() -> Self {
        SpinnerPolicy::FixedTimeout(DEFAULT_SPINNER_TIMEOUT)
    }
}

/// Start offsets (relative to the start of success handling), per-character delay and
/// spinner policy for one autofill run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillSchedule {
    pub char_delay: Duration,
    pub spinner: SpinnerPolicy,
    offsets: [(FormFieldId, Duration); 6],
}

impl Default for FillSchedule {
    fn default() -> Self {
        Self {
            char_delay: DEFAULT_CHAR_DELAY,
            spinner: SpinnerPolicy::default(),
            offsets: [
                (FormFieldId::FullName, Duration::from_millis(0)),
                (FormFieldId::Ssn, Duration::from_millis(1000)),
                (FormFieldId::Income, Duration::from_millis(2000)),
                (FormFieldId::Deductions, Duration::from_millis(3000)),
                (FormFieldId::TaxPaid, Duration::from_millis(4000)),
                (FormFieldId::Descriptions, Duration::from_millis(4500)),
            ],
        }
    }
}

impl FillSchedule {
    pub fn with_char_delay(mut self, char_delay: Duration) -> Self {
        self.char_delay = char_delay;
        self
    }

    pub fn with_spinner(mut self, spinner: SpinnerPolicy) -> Self {
        self.spinner = spinner;
        self
    }

    pub fn with_offset(mut self, field: FormFieldId, offset: Duration) -> Self {
        if let Some(slot) = self.offsets.iter_mut().find(|(id, _)| *id == field) {
            slot.1 = offset;
        }
        self
    }

    pub fn offset(&self, field: FormFieldId) -> Duration {
        self.offsets
            .iter()
            .find(|(id, _)| *id == field)
            .map(|(_, offset)| *offset)
            .unwrap_or_default()
    }

    pub fn offsets(&self) -> impl Iterator<Item = (FormFieldId, Duration)> + '_ {
        self.offsets.iter().copied()
    }

    /// Offset at which the last character of `text` lands in `field`.
    /// `None` when there is nothing to type.
    pub fn last_keystroke(&self, field: FormFieldId, text: &str) -> Option<Duration> {
        let count = text.chars().count() as u32;
        if count == 0 {
            return None;
        }
        Some(self.offset(field) + self.char_delay * (count - 1))
    }

    /// Offset at which the whole payload has been typed.
    pub fn typing_duration(&self, payload: &TaxFormPayload) -> Duration {
        FormFieldId::ALL
            .into_iter()
            .filter_map(|field| self.last_keystroke(field, payload.value(field)))
            .max()
            .unwrap_or_default()
    }

    /// True when a fixed spinner timeout would hide the indicator while typing continues.
    pub fn hides_spinner_early(&self, payload: &TaxFormPayload) -> bool {
        match self.spinner {
            SpinnerPolicy::FixedTimeout(timeout) => self.typing_duration(payload) > timeout,
            SpinnerPolicy::AfterTyping => false,
        }
    }
}
