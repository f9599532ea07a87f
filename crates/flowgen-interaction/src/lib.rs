//! Adapters for the external collaborators: the Gemini text-generation
//! service and the Mermaid command-line renderer.

pub mod error;
pub mod gemini_generator;
pub mod instruction;
pub mod mermaid_cli;
pub mod response;

pub use error::GenerationError;
pub use gemini_generator::GeminiDiagramGenerator;
pub use instruction::system_instruction;
pub use mermaid_cli::MermaidCliRenderer;
