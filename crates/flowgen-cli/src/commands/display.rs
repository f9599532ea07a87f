//! Terminal rendering of records, views and viewport state.

use colored::Colorize;
use flowgen_application::RenderedView;
use flowgen_core::{DiagramRecord, ViewportState};

pub fn print_history(records: &[DiagramRecord], current_id: Option<&str>) {
    if records.is_empty() {
        println!("{}", "No diagrams yet.".bright_black());
        return;
    }
    for (index, record) in records.iter().enumerate() {
        let marker = if current_id == Some(record.id.as_str()) { "*" } else { " " };
        let created = record
            .created_at_utc()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{} {:>3}. {}  {}  {}",
            marker.bright_green(),
            index + 1,
            record.title.bold(),
            created.bright_black(),
            short_id(&record.id).bright_black()
        );
    }
}

pub fn print_record(record: &DiagramRecord) {
    println!("{}", record.title.bright_magenta().bold());
    if !record.explanation.is_empty() {
        println!("{}", record.explanation.bright_blue());
    }
}

pub fn print_source(record: &DiagramRecord) {
    for line in record.diagram_source.lines() {
        println!("  {}", line.cyan());
    }
}

pub fn print_view(view: &RenderedView) {
    match view {
        RenderedView::Empty => println!("{}", "No diagram selected.".bright_black()),
        RenderedView::Graphic(graphic) => println!(
            "{}",
            format!("Rendered ({} bytes of SVG)", graphic.markup().len()).green()
        ),
        RenderedView::InvalidSyntax { message, hint } => {
            println!("{}", message.red());
            println!("{}", hint.bright_black());
        }
    }
}

pub fn print_viewport(state: &ViewportState) {
    let offset = state.offset();
    println!(
        "{}",
        format!(
            "scale {:.1}  offset ({:.0}, {:.0})",
            state.scale(),
            offset.x,
            offset.y
        )
        .bright_black()
    );
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
