use clap::Parser;
use tax_autofill::core::{ConfigProvider, FormFieldId, PayloadSource, TextField};
use tax_autofill::utils::{logger, validation::Validate};
use tax_autofill::{
    Autofiller, AutofillError, CliConfig, FilePayloadSource, FillSchedule, FormTemplate,
    HttpPayloadSource, MemoryForm, TomlConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting tax-autofill");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let template = match &cli.form_template {
        Some(path) => Some(FormTemplate::from_file(path).unwrap_or_else(|e| fail(&e))),
        None => None,
    };

    if cli.describe_form {
        let fields = template.as_ref().map(|t| t.fields()).unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(fields)?);
        return Ok(());
    }

    let config: Box<dyn ConfigProvider> = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let mut toml = TomlConfig::from_file(path).unwrap_or_else(|e| fail(&e));
            toml.apply_overrides(&cli);
            toml.validate().unwrap_or_else(|e| fail(&e));
            Box::new(toml)
        }
        None => {
            cli.validate().unwrap_or_else(|e| fail(&e));
            Box::new(cli.clone())
        }
    };

    if let Some(template) = &template {
        for missing in template.missing_fields() {
            tracing::warn!("Form template has no control with id '{}'", missing);
        }
    }

    let form = MemoryForm::new();
    let schedule = config.schedule();

    let outcome = match &cli.payload_file {
        Some(path) => autofill(FilePayloadSource::new(path), schedule, &form).await,
        None => {
            let source = HttpPayloadSource::new(config.as_ref()).unwrap_or_else(|e| fail(&e));
            tracing::info!("🌐 Fetching tax form data from {}", source.endpoint());
            autofill(source, schedule, &form).await
        }
    };

    if let Err(e) = outcome {
        fail(&e);
    }

    println!("✅ Tax form filled");
    for (id, value) in form.snapshot() {
        let label = template
            .as_ref()
            .and_then(|t| t.label_for(id))
            .unwrap_or(id.as_str());
        println!("{:>40}: {}", label, value);
    }

    Ok(())
}

async fn autofill<S: PayloadSource>(
    source: S,
    schedule: FillSchedule,
    form: &MemoryForm,
) -> tax_autofill::Result<()> {
    let autofiller = Autofiller::new(source, schedule);
    let fill = autofiller.run(&form.handles()).await?;
    fill.wait().await?;

    tracing::info!(
        "Typed {} fields",
        FormFieldId::ALL
            .into_iter()
            .filter(|id| !form.field(*id).value().is_empty())
            .count()
    );
    Ok(())
}

fn fail(e: &AutofillError) -> ! {
    tracing::error!("❌ {}", e);
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 2: the form data service failed, 1: anything on our side
    let exit_code = if e.is_fetch_failure() { 2 } else { 1 };
    std::process::exit(exit_code);
}
