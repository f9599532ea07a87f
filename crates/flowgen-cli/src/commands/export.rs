use anyhow::{Result, bail};
use colored::Colorize;
use flowgen_application::{DocumentExport, FlowgenApp, RenderedView};

use super::display::print_view;
use super::target;

/// Selects `token` and renders it, failing unless a graphic came out.
async fn select_rendered(app: &FlowgenApp, token: &str) -> Result<()> {
    let history = app.session().history().await;
    let Some(id) = target::resolve(&history, token) else {
        bail!("No diagram matches '{}'", token);
    };
    let view = app.select(&id).await;
    if !matches!(view, RenderedView::Graphic(_)) {
        print_view(&view);
        bail!("Nothing to export");
    }
    Ok(())
}

pub async fn svg(app: &FlowgenApp, token: &str) -> Result<()> {
    select_rendered(app, token).await?;
    write_svg(app).await
}

pub async fn pdf(app: &FlowgenApp, token: &str) -> Result<()> {
    select_rendered(app, token).await?;
    write_pdf(app).await
}

/// Writes the diagram on display as SVG.
pub async fn write_svg(app: &FlowgenApp) -> Result<()> {
    let Some(artifact) = app.viewer().export_vector().await else {
        println!("{}", "No rendered diagram to export.".bright_black());
        return Ok(());
    };
    let path = app.save(&artifact).await?;
    println!("{}", format!("Saved {}", path.display()).green());
    Ok(())
}

/// Writes the diagram on display as an A4 PDF.
pub async fn write_pdf(app: &FlowgenApp) -> Result<()> {
    match app.viewer().export_document().await {
        DocumentExport::Ready(artifact) => {
            let path = app.save(&artifact).await?;
            println!("{}", format!("Saved {}", path.display()).green());
        }
        DocumentExport::NothingToExport => {
            println!("{}", "No rendered diagram to export.".bright_black());
        }
        // Already logged; nothing to tell the user.
        DocumentExport::Aborted => {}
        DocumentExport::Failed(notice) => println!("{}", notice.red()),
    }
    Ok(())
}
