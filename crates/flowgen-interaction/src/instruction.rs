//! System instruction sent with every generation request.

use flowgen_core::DiagramType;
use minijinja::{Environment, context};
use strum::IntoEnumIterator;

const TEMPLATE: &str = r#"You are an expert diagram engineer specialized in Mermaid.js.
Convert the user's natural-language description into valid, syntactically correct Mermaid.js code.

Supported diagram types: {{ diagram_types | join(", ") }}.

Rules:
1. Always enclose node labels in double quotes, e.g. A["Start Process"] --> B["End"]. Parentheses and special characters inside unquoted labels break the parser.
2. Put the diagram declaration on its own line: write "flowchart TD" followed by a newline, never "flowchart TD A-->B" on one line.
3. Choose the diagram type that best fits the description.
4. Write the title and the explanation in {{ language }}.
5. Do not wrap the Mermaid code in markdown backticks.
6. Answer with a JSON object holding exactly three string fields: "title", "mermaidCode" and "explanation"."#;

/// Renders the instruction for the given response language.
pub fn system_instruction(language: &str) -> Result<String, minijinja::Error> {
    let diagram_types: Vec<String> = DiagramType::iter().map(|t| t.to_string()).collect();
    Environment::new().render_str(
        TEMPLATE,
        context! {
            diagram_types => diagram_types,
            language => language,
        },
    )
}
