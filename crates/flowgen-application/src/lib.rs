//! Application layer for FlowGen.
//!
//! Coordinates the generate → display → persist cycle and binds rendering,
//! the viewport and the export pipeline to the current selection.

pub mod factory;
pub mod session;
pub mod viewer;

pub use factory::FlowgenApp;
pub use session::{DiagramSession, GenerateOutcome};
pub use viewer::{DiagramViewer, DocumentExport, RenderedView};
