use anyhow::{Result, bail};
use colored::Colorize;
use flowgen_application::{FlowgenApp, GenerateOutcome};

use super::display::{print_history, print_record, print_source, print_view};
use super::target;

pub async fn generate(app: &FlowgenApp, prompt: &str) -> Result<()> {
    match app.generate(prompt).await {
        GenerateOutcome::Created(record) => {
            print_record(&record);
            print_view(&app.viewer().view().await);
            Ok(())
        }
        GenerateOutcome::Failed => {
            let message = app.session().error().await.unwrap_or_default();
            bail!(message)
        }
        GenerateOutcome::Ignored => bail!("Describe the diagram to generate."),
        GenerateOutcome::Busy => bail!("A generation is already running."),
    }
}

pub async fn list(app: &FlowgenApp) {
    let history = app.session().history().await;
    let current = app.session().current_id().await;
    print_history(&history, current.as_deref());
}

pub async fn show(app: &FlowgenApp, token: &str) -> Result<()> {
    let history = app.session().history().await;
    let Some(id) = target::resolve(&history, token) else {
        bail!("No diagram matches '{}'", token);
    };
    let Some(record) = history.into_iter().find(|r| r.id == id) else {
        bail!("No diagram matches '{}'", token);
    };
    print_record(&record);
    println!("{}", record.id.bright_black());
    print_source(&record);
    Ok(())
}

pub async fn delete(app: &FlowgenApp, token: &str) -> Result<()> {
    let history = app.session().history().await;
    let Some(id) = target::resolve(&history, token) else {
        bail!("No diagram matches '{}'", token);
    };
    if let Some(removed) = app.delete(&id).await {
        println!("{}", format!("Deleted '{}'", removed.title).yellow());
    }
    Ok(())
}
