use std::time::Duration;
use tax_autofill::core::{FormFieldId, PayloadSource, TaxFormPayload, TextField};
use tax_autofill::{Autofiller, FillSchedule, MemoryForm};
use tokio::time::{sleep_until, Instant};

struct StaticSource(TaxFormPayload);

#[async_trait::async_trait]
impl PayloadSource for StaticSource {
    async fn fetch(&self) -> tax_autofill::Result<TaxFormPayload> {
        Ok(self.0.clone())
    }
}

fn short_payload() -> TaxFormPayload {
    serde_json::from_value(serde_json::json!({
        "fullName": "Jo",
        "ssn": "1",
        "income": "1",
        "deductions": "0",
        "taxPaid": "0",
        "descriptions_request_for_extra_tax_return": ""
    }))
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_short_payload_timeline() -> anyhow::Result<()> {
    let form = MemoryForm::new();
    form.field(FormFieldId::Ssn).set_value("old ssn");
    let autofiller = Autofiller::new(StaticSource(short_payload()), FillSchedule::default());

    let start = Instant::now();
    let fill = autofiller.run(&form.handles()).await?;
    assert!(form.spinner().is_visible());

    sleep_until(start + Duration::from_millis(50)).await;
    assert_eq!(form.field(FormFieldId::FullName).value(), "J");

    // ssn is cleared right away but untouched until its 1000ms offset
    sleep_until(start + Duration::from_millis(999)).await;
    assert_eq!(form.field(FormFieldId::Ssn).value(), "");
    assert_eq!(form.field(FormFieldId::Ssn).mutation_count(), 2);

    sleep_until(start + Duration::from_millis(1100)).await;
    assert!(form.field(FormFieldId::FullName).value().contains('J'));
    assert_eq!(form.field(FormFieldId::Ssn).value(), "1");

    sleep_until(start + Duration::from_millis(1200)).await;
    assert_eq!(form.field(FormFieldId::FullName).value(), "Jo");

    sleep_until(start + Duration::from_millis(4999)).await;
    assert!(form.spinner().is_visible());
    assert_eq!(form.field(FormFieldId::TaxPaid).value(), "0");

    sleep_until(start + Duration::from_millis(5001)).await;
    assert!(!form.spinner().is_visible());

    fill.wait().await?;
    let snapshot: Vec<String> = form.snapshot().into_iter().map(|(_, v)| v).collect();
    assert_eq!(snapshot, vec!["Jo", "1", "1", "0", "0", ""]);
    assert_eq!(form.field(FormFieldId::Descriptions).mutation_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_each_field_starts_at_its_offset() -> anyhow::Result<()> {
    let form = MemoryForm::new();
    let schedule = FillSchedule::default();
    let mut payload = short_payload();
    payload.descriptions = "extra".to_string();

    let start = Instant::now();
    Autofiller::new(StaticSource(payload), schedule.clone())
        .run(&form.handles())
        .await?
        .wait()
        .await?;

    for (id, offset) in schedule.offsets() {
        let mutations = form.field(id).mutations();
        assert_eq!(mutations[0].value, "");
        assert_eq!(mutations[1].at - start, offset, "{} started late", id);
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_runs_interleave_output() -> anyhow::Result<()> {
    let form = MemoryForm::new();
    let autofiller = Autofiller::new(StaticSource(short_payload()), FillSchedule::default());

    let first = autofiller.run(&form.handles()).await?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = autofiller.run(&form.handles()).await?;

    first.wait().await?;
    second.wait().await?;

    // the second run cleared "J" at 50ms, then both runs typed into the same fields
    assert_eq!(form.field(FormFieldId::FullName).value(), "Joo");
    assert_eq!(form.field(FormFieldId::Ssn).value(), "11");
    assert_eq!(form.spinner().transitions().len(), 4);
    Ok(())
}
