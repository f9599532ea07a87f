//! Interactive FlowGen session on top of rustyline.

mod command;
mod helper;

use anyhow::Result;
use colored::Colorize;
use flowgen_application::{FlowgenApp, GenerateOutcome, RenderedView};
use flowgen_core::generation::{EXAMPLE_PROMPTS, exceeds_prompt_budget, prompt_budget_label};
use flowgen_core::messages;
use flowgen_core::{DiagramType, ViewMode};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use strum::IntoEnumIterator;

use crate::commands::display::{
    print_history, print_record, print_source, print_view, print_viewport,
};
use crate::commands::{export, target};
use command::{ReplCommand, ViewArg};
use helper::CliHelper;

pub async fn run(app: &FlowgenApp) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== FlowGen ===".bright_magenta().bold());
    println!(
        "{}",
        "Describe a diagram, or type 'help' for commands and 'quit' to exit.".bright_black()
    );
    println!("{}", format!("Supports: {}", diagram_types()).bright_black());
    println!();

    let history = app.session().history().await;
    if !history.is_empty() {
        print_history(&history, None);
        println!();
    }

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match command::parse(trimmed) {
                    Ok(ReplCommand::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute(app, cmd).await {
                            eprintln!("{}", format!("Error: {e:#}").red());
                        }
                    }
                    Err(usage) => println!("{}", usage.yellow()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

async fn execute(app: &FlowgenApp, cmd: ReplCommand) -> Result<()> {
    let session = app.session();
    let viewer = app.viewer();

    match cmd {
        ReplCommand::Generate(prompt) => generate(app, &prompt).await,
        ReplCommand::List => {
            let current = session.current_id().await;
            print_history(&session.history().await, current.as_deref());
        }
        ReplCommand::Select(token) => {
            let history = session.history().await;
            match target::resolve(&history, &token) {
                Some(id) => {
                    let view = app.select(&id).await;
                    if let Some(record) = session.current().await {
                        print_record(&record);
                    }
                    show(app, &view).await;
                }
                None => println!("{}", format!("No diagram matches '{token}'").yellow()),
            }
        }
        ReplCommand::Delete(token) => {
            let history = session.history().await;
            match target::resolve(&history, &token) {
                Some(id) => {
                    if let Some(removed) = app.delete(&id).await {
                        println!("{}", format!("Deleted '{}'", removed.title).yellow());
                    }
                }
                None => println!("{}", format!("No diagram matches '{token}'").yellow()),
            }
        }
        ReplCommand::New => {
            app.new_diagram().await;
            println!("{}", "Describe the next diagram.".bright_black());
        }
        ReplCommand::View(arg) => {
            let mode = match arg {
                ViewArg::Toggle => session.toggle_view().await,
                ViewArg::Preview | ViewArg::Code => {
                    let mode = if arg == ViewArg::Code {
                        ViewMode::Code
                    } else {
                        ViewMode::Preview
                    };
                    session.set_view_mode(mode).await;
                    mode
                }
            };
            println!("{}", format!("View: {mode:?}").bright_black());
            show(app, &viewer.view().await).await;
        }
        ReplCommand::ZoomIn => print_viewport(&viewer.zoom_in().await),
        ReplCommand::ZoomOut => print_viewport(&viewer.zoom_out().await),
        ReplCommand::Reset => print_viewport(&viewer.reset_view().await),
        ReplCommand::Drag(pointer) => {
            viewer.begin_drag(pointer).await;
            println!("{}", "Dragging.".bright_black());
        }
        ReplCommand::Move(pointer) => {
            if viewer.continue_drag(pointer).await {
                print_viewport(&viewer.viewport_state().await);
            } else {
                println!("{}", "Not dragging; use 'drag <x> <y>' first.".bright_black());
            }
        }
        ReplCommand::Release => {
            viewer.end_drag().await;
            print_viewport(&viewer.viewport_state().await);
        }
        ReplCommand::Transform => {
            print_viewport(&viewer.viewport_state().await);
            println!("{}", viewer.transform().await.to_css().cyan());
        }
        ReplCommand::ExportSvg => export::write_svg(app).await?,
        ReplCommand::ExportPdf => export::write_pdf(app).await?,
        ReplCommand::Copy => copy_source(app).await,
        ReplCommand::Examples => {
            for (index, example) in EXAMPLE_PROMPTS.iter().enumerate() {
                println!("  {}. {}", index + 1, example.cyan());
            }
        }
        ReplCommand::Budget(text) => {
            let label = prompt_budget_label(&text);
            if exceeds_prompt_budget(&text) {
                println!("{}", label.yellow());
            } else {
                println!("{}", label.bright_black());
            }
        }
        ReplCommand::Help => print_help(),
        ReplCommand::Quit => {}
    }
    Ok(())
}

async fn generate(app: &FlowgenApp, prompt: &str) {
    if prompt.trim().is_empty() {
        return;
    }
    if exceeds_prompt_budget(prompt) {
        println!("{}", prompt_budget_label(prompt).yellow());
    }
    println!("{}", "Generating...".bright_black());

    match app.generate(prompt).await {
        GenerateOutcome::Created(record) => {
            print_record(&record);
            show(app, &app.viewer().view().await).await;
        }
        GenerateOutcome::Failed => {
            if let Some(message) = app.session().error().await {
                println!("{}", message.red());
            }
        }
        GenerateOutcome::Busy => println!("{}", "Still generating.".yellow()),
        GenerateOutcome::Ignored => {}
    }
}

/// Shows the current diagram the way the active view mode asks for.
async fn show(app: &FlowgenApp, view: &RenderedView) {
    match app.session().view_mode().await {
        ViewMode::Code => match app.session().current().await {
            Some(record) => print_source(&record),
            None => print_view(view),
        },
        ViewMode::Preview => {
            print_view(view);
            if matches!(view, RenderedView::Graphic(_)) {
                print_viewport(&app.viewer().viewport_state().await);
            }
        }
    }
}

async fn copy_source(app: &FlowgenApp) {
    let Some(source) = app.session().copy_source().await else {
        println!("{}", "No diagram selected.".bright_black());
        return;
    };
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(source.clone())) {
        Ok(()) => println!("{}", messages::SOURCE_COPIED.green()),
        Err(e) => {
            tracing::warn!("[Repl] Clipboard unavailable: {}", e);
            println!("{source}");
        }
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_magenta());
    let lines = [
        ("generate <text>", "generate a diagram (bare text works too)"),
        ("list", "show the history, most recent first"),
        ("select <n|id>", "display a diagram"),
        ("delete <n|id>", "remove a diagram"),
        ("new", "clear the selection"),
        ("view [preview|code|toggle]", "switch between graphic and source"),
        ("zoom-in / zoom-out / reset", "adjust the viewport"),
        ("drag <x> <y>", "start panning at a pointer position"),
        ("move <x> <y>", "pan to a pointer position"),
        ("release", "stop panning"),
        ("transform", "print the current transform"),
        ("export-svg / export-pdf", "write the displayed diagram"),
        ("copy", "copy the diagram source"),
        ("examples", "example prompts"),
        ("budget <text>", "prompt length against the advisory budget"),
        ("quit", "exit"),
    ];
    for (usage, description) in lines {
        println!("  {:<28} {}", usage.cyan(), description.bright_black());
    }
}

fn diagram_types() -> String {
    DiagramType::iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
