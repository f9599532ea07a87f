//! Validation of the structured generation answer.

use flowgen_core::DiagramResponse;

use crate::error::GenerationError;

/// Parses the model's text into a [`DiagramResponse`].
///
/// The text must be a JSON object with string `title`, `mermaidCode` and
/// `explanation` fields. Markdown fences around the whole answer or around
/// the diagram source are tolerated and removed.
pub fn parse_diagram_response(text: &str) -> Result<DiagramResponse, GenerationError> {
    let body = strip_fences(text);
    let mut response: DiagramResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    response.diagram_source = strip_fences(&response.diagram_source).to_string();
    if response.diagram_source.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "mermaidCode is empty".to_string(),
        ));
    }
    response.title = response.title.trim().to_string();

    Ok(response)
}

/// Removes a surrounding ```lang ... ``` block, if any.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "mermaid") on the opening line.
    match inner.find('\n') {
        Some(newline) => inner[newline + 1..].trim(),
        None => inner.trim(),
    }
}
