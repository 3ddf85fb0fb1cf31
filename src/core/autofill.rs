use crate::core::schedule::{FillSchedule, SpinnerPolicy};
use crate::core::typing::type_effect;
use crate::domain::model::{FormFieldId, TaxFormPayload};
use crate::domain::ports::{LoadingIndicator, PayloadSource, TextField};
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;

/// The UI elements one autofill run writes to.
#[derive(Clone)]
pub struct FormHandles {
    pub full_name: Arc<dyn TextField>,
    pub ssn: Arc<dyn TextField>,
    pub income: Arc<dyn TextField>,
    pub deductions: Arc<dyn TextField>,
    pub tax_paid: Arc<dyn TextField>,
    pub descriptions: Arc<dyn TextField>,
    pub spinner: Arc<dyn LoadingIndicator>,
}

impl FormHandles {
    pub fn field(&self, id: FormFieldId) -> &Arc<dyn TextField> {
        match id {
            FormFieldId::FullName => &self.full_name,
            FormFieldId::Ssn => &self.ssn,
            FormFieldId::Income => &self.income,
            FormFieldId::Deductions => &self.deductions,
            FormFieldId::TaxPaid => &self.tax_paid,
            FormFieldId::Descriptions => &self.descriptions,
        }
    }
}

/// Timers started by a successful run.
///
/// Dropping this does not stop anything; awaiting [`ScheduledFill::wait`] only observes
/// completion.
pub struct ScheduledFill {
    typing: JoinHandle<Result<()>>,
    spinner: Option<JoinHandle<()>>,
}

impl ScheduledFill {
    /// Resolves once every field is typed and the spinner timer has fired.
    pub async fn wait(self) -> Result<()> {
        let typed = self.typing.await?;
        if let Some(spinner) = self.spinner {
            spinner.await?;
        }
        typed
    }
}

pub struct Autofiller<S: PayloadSource> {
    source: S,
    schedule: FillSchedule,
}

impl<S: PayloadSource> Autofiller<S> {
    pub fn new(source: S, schedule: FillSchedule) -> Self {
        Self { source, schedule }
    }

    pub fn schedule(&self) -> &FillSchedule {
        &self.schedule
    }

    /// Shows the spinner, fetches the payload once and schedules the typing animations.
    ///
    /// A fetch failure hides the spinner, is logged, and is handed back without touching
    /// any field.
    pub async fn run(&self, form: &FormHandles) -> Result<ScheduledFill> {
        form.spinner.set_visible(true);

        match self.source.fetch().await {
            Ok(payload) => Ok(self.fill(form, payload)),
            Err(e) => {
                tracing::error!("Error fetching tax form data: {}", e);
                form.spinner.set_visible(false);
                Err(e)
            }
        }
    }

    /// Clears every field, then starts one timer per field and one for the spinner.
    /// Must be called from inside a tokio runtime.
    pub fn fill(&self, form: &FormHandles, payload: TaxFormPayload) -> ScheduledFill {
        let start = Instant::now();

        for id in FormFieldId::ALL {
            form.field(id).set_value("");
        }

        if self.schedule.hides_spinner_early(&payload) {
            tracing::debug!(
                "Typing runs for {:?}, longer than the spinner timeout",
                self.schedule.typing_duration(&payload)
            );
        }

        let mut typing = JoinSet::new();
        for (id, offset) in self.schedule.offsets() {
            let field = Arc::clone(form.field(id));
            let text = payload.value(id).to_string();
            let delay = self.schedule.char_delay;
            typing.spawn(async move {
                tokio::time::sleep_until(start + offset).await;
                tracing::debug!(field = %id, chars = text.chars().count(), "typing");
                type_effect(field.as_ref(), &text, delay).await;
            });
        }

        let spinner = Arc::clone(&form.spinner);
        let fill = match self.schedule.spinner {
            SpinnerPolicy::FixedTimeout(timeout) => ScheduledFill {
                typing: tokio::spawn(drain(typing)),
                spinner: Some(tokio::spawn(async move {
                    tokio::time::sleep_until(start + timeout).await;
                    spinner.set_visible(false);
                })),
            },
            SpinnerPolicy::AfterTyping => ScheduledFill {
                typing: tokio::spawn(async move {
                    let typed = drain(typing).await;
                    spinner.set_visible(false);
                    typed
                }),
                spinner: None,
            },
        };

        tracing::info!(?payload, "Tax form has been auto-filled");
        fill
    }
}

/// Joins every typing task. A failed field must not abort the others, so the set is
/// drained to the end and the first failure is reported afterwards.
async fn drain(mut tasks: JoinSet<()>) -> Result<()> {
    let mut first_failure = None;
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Typing task failed: {}", e);
            first_failure.get_or_insert(e);
        }
    }

    match first_failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryForm;
    use crate::utils::error::AutofillError;
    use std::time::Duration;

    struct StubSource {
        payload: Option<TaxFormPayload>,
    }

    #[async_trait::async_trait]
    impl PayloadSource for StubSource {
        async fn fetch(&self) -> Result<TaxFormPayload> {
            self.payload
                .clone()
                .ok_or(AutofillError::StatusError { status: 502 })
        }
    }

    fn payload() -> TaxFormPayload {
        TaxFormPayload {
            full_name: "Jo".to_string(),
            ssn: "1".to_string(),
            income: "1".to_string(),
            deductions: "0".to_string(),
            tax_paid: "0".to_string(),
            descriptions: String::new(),
        }
    }

    fn prefilled_form() -> MemoryForm {
        let form = MemoryForm::new();
        for id in FormFieldId::ALL {
            form.field(id).set_value("stale");
        }
        form
    }

    #[tokio::test(start_paused = true)]
    async fn test_fields_cleared_before_any_typing() {
        let form = prefilled_form();
        let autofiller = Autofiller::new(
            StubSource {
                payload: Some(payload()),
            },
            FillSchedule::default(),
        );

        let start = Instant::now();
        autofiller.run(&form.handles()).await.unwrap().wait().await.unwrap();

        let first_keystroke = FormFieldId::ALL
            .into_iter()
            .flat_map(|id| form.field(id).mutations().into_iter().skip(2))
            .map(|m| m.at)
            .min()
            .unwrap();
        for id in FormFieldId::ALL {
            let mutations = form.field(id).mutations();
            assert_eq!(mutations[1].value, "", "{} was not cleared", id);
            assert_eq!(mutations[1].at, start);
            assert!(mutations[1].at <= first_keystroke);
        }
        assert_eq!(form.field(FormFieldId::FullName).value(), "Jo");
        assert_eq!(form.field(FormFieldId::Descriptions).value(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_spinner_hidden_once_at_fixed_timeout() {
        let form = MemoryForm::new();
        let autofiller = Autofiller::new(
            StubSource {
                payload: Some(payload()),
            },
            FillSchedule::default(),
        );

        let start = Instant::now();
        autofiller.run(&form.handles()).await.unwrap().wait().await.unwrap();

        assert_eq!(
            form.spinner().transitions(),
            vec![(start, true), (start + Duration::from_millis(5000), false)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_hides_spinner_and_leaves_fields() {
        let form = prefilled_form();
        let autofiller = Autofiller::new(StubSource { payload: None }, FillSchedule::default());

        let start = Instant::now();
        let result = autofiller.run(&form.handles()).await;

        assert!(matches!(result, Err(AutofillError::StatusError { status: 502 })));
        assert_eq!(
            form.spinner().transitions(),
            vec![(start, true), (start, false)]
        );

        tokio::time::sleep(Duration::from_secs(10)).await;
        for id in FormFieldId::ALL {
            assert_eq!(form.field(id).value(), "stale");
            assert_eq!(form.field(id).mutation_count(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_spinner_hides_while_long_text_still_typing() {
        let form = MemoryForm::new();
        let mut long = payload();
        long.descriptions = "a".repeat(20);
        let autofiller = Autofiller::new(
            StubSource {
                payload: Some(long),
            },
            FillSchedule::default(),
        );

        let start = Instant::now();
        let fill = autofiller.run(&form.handles()).await.unwrap();

        tokio::time::sleep_until(start + Duration::from_millis(5050)).await;
        assert!(!form.spinner().is_visible());
        assert_eq!(form.field(FormFieldId::Descriptions).value(), "a".repeat(6));

        fill.wait().await.unwrap();
        assert_eq!(form.field(FormFieldId::Descriptions).value(), "a".repeat(20));
        assert_eq!(form.spinner().transitions().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_after_typing_policy_waits_for_last_character() {
        let form = MemoryForm::new();
        let mut long = payload();
        long.descriptions = "a".repeat(20);
        let schedule = FillSchedule::default().with_spinner(SpinnerPolicy::AfterTyping);
        let autofiller = Autofiller::new(
            StubSource {
                payload: Some(long),
            },
            schedule,
        );

        let start = Instant::now();
        autofiller.run(&form.handles()).await.unwrap().wait().await.unwrap();

        // 4500ms offset + 19 * 100ms
        let transitions = form.spinner().transitions();
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[1], (start + Duration::from_millis(6400), false));
    }

    /// An element that was removed from the page after the form was cleared.
    struct DetachedField;

    impl TextField for DetachedField {
        fn value(&self) -> String {
            String::new()
        }

        fn set_value(&self, _value: &str) {}

        fn append(&self, _ch: char) {
            panic!("element is no longer attached");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_field_does_not_cancel_the_others() {
        let form = MemoryForm::new();
        let mut handles = form.handles();
        handles.full_name = Arc::new(DetachedField);
        let mut filled = payload();
        filled.descriptions = "hello".to_string();
        let autofiller = Autofiller::new(
            StubSource {
                payload: Some(filled),
            },
            FillSchedule::default(),
        );

        let result = autofiller.run(&handles).await.unwrap().wait().await;

        assert!(matches!(result, Err(AutofillError::TaskError(_))));
        assert_eq!(form.field(FormFieldId::Ssn).value(), "1");
        assert_eq!(form.field(FormFieldId::TaxPaid).value(), "0");
        assert_eq!(form.field(FormFieldId::Descriptions).value(), "hello");
        assert!(!form.spinner().is_visible());
    }
}
