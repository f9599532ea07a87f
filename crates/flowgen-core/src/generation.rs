//! Generation collaborator trait and prompt helpers.

use async_trait::async_trait;

use crate::diagram::model::DiagramResponse;
use crate::error::Result;

/// Advisory prompt length shown next to the input. Not enforced.
pub const PROMPT_CHAR_BUDGET: usize = 500;

/// Prompts offered on the empty screen.
pub const EXAMPLE_PROMPTS: [&str; 4] = [
    "Fluxograma de login",
    "Sequência de pedido online",
    "Mapa mental de IA",
    "Classes de sistema escolar",
];

/// Turns a natural-language prompt into a diagram.
///
/// Implementations must validate the response shape at the boundary and
/// return `FlowgenError::Generation` for any missing or malformed field
/// rather than a partially populated response.
#[async_trait]
pub trait DiagramGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<DiagramResponse>;
}

/// Returns the `<used>/<budget>` counter for a prompt draft.
pub fn prompt_budget_label(prompt: &str) -> String {
    format!("{}/{}", prompt.chars().count(), PROMPT_CHAR_BUDGET)
}

/// Whether a prompt exceeds the advisory budget.
pub fn exceeds_prompt_budget(prompt: &str) -> bool {
    prompt.chars().count() > PROMPT_CHAR_BUDGET
}
