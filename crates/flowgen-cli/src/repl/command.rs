use flowgen_core::Point;

/// Command names offered for completion, in help order.
pub const COMMAND_NAMES: [&str; 21] = [
    "generate",
    "list",
    "select",
    "delete",
    "new",
    "view",
    "zoom-in",
    "zoom-out",
    "reset",
    "drag",
    "move",
    "release",
    "transform",
    "export-svg",
    "export-pdf",
    "copy",
    "examples",
    "help",
    "quit",
    "exit",
    "budget",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewArg {
    Preview,
    Code,
    Toggle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Explicit `generate <text>` or any line that is not a command
    Generate(String),
    List,
    Select(String),
    Delete(String),
    New,
    View(ViewArg),
    ZoomIn,
    ZoomOut,
    Reset,
    Drag(Point),
    Move(Point),
    Release,
    Transform,
    ExportSvg,
    ExportPdf,
    Copy,
    Examples,
    Budget(String),
    Help,
    Quit,
}

/// Parses one input line. The leading `/` the completer may insert is
/// optional.
pub fn parse(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    let stripped = line.strip_prefix('/').unwrap_or(line);
    let (name, rest) = match stripped.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (stripped, ""),
    };

    let command = match name {
        "generate" | "gen" => ReplCommand::Generate(rest.to_string()),
        "list" | "ls" => ReplCommand::List,
        "select" => ReplCommand::Select(required(name, rest)?),
        "delete" | "rm" => ReplCommand::Delete(required(name, rest)?),
        "new" => ReplCommand::New,
        "view" => ReplCommand::View(match rest {
            "" | "toggle" => ViewArg::Toggle,
            "preview" => ViewArg::Preview,
            "code" => ViewArg::Code,
            other => return Err(format!("Unknown view '{other}', use preview, code or toggle")),
        }),
        "zoom-in" | "+" => ReplCommand::ZoomIn,
        "zoom-out" | "-" => ReplCommand::ZoomOut,
        "reset" => ReplCommand::Reset,
        "drag" => ReplCommand::Drag(point(name, rest)?),
        "move" => ReplCommand::Move(point(name, rest)?),
        "release" => ReplCommand::Release,
        "transform" => ReplCommand::Transform,
        "export-svg" => ReplCommand::ExportSvg,
        "export-pdf" => ReplCommand::ExportPdf,
        "copy" => ReplCommand::Copy,
        "examples" => ReplCommand::Examples,
        "budget" => ReplCommand::Budget(rest.to_string()),
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        _ => ReplCommand::Generate(line.to_string()),
    };
    Ok(command)
}

fn required(name: &str, rest: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("Usage: {name} <id|number>"))
    } else {
        Ok(rest.to_string())
    }
}

fn point(name: &str, rest: &str) -> Result<Point, String> {
    let usage = || format!("Usage: {name} <x> <y>");
    let mut parts = rest.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(usage());
    };
    let x = x.parse::<f64>().map_err(|_| usage())?;
    let y = y.parse::<f64>().map_err(|_| usage())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(usage());
    }
    Ok(Point::new(x, y))
}
